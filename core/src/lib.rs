//! Async network-access core for the box-office client.
//!
//! # Overview
//! Fetches ranked movie listings, movie detail records and poster images
//! from two JSON/HTTP services and decodes them into typed models. Callers
//! pass a target type and an `Endpoint`; they get back either the decoded
//! value or a `NetworkError`.
//!
//! # Design
//! - `Endpoint` describes an operation and builds an `HttpRequest`; it never
//!   performs I/O.
//! - `Dispatcher` is the only network seam. `ReqwestDispatcher` owns one
//!   shared `reqwest::Client`; tests substitute stubs.
//! - `ApiManager<D>` is the generic pipeline: build, dispatch, check status,
//!   decode. Decoding is a compile-time type parameter, not a runtime cast.
//! - `MovieService<D>` strings the pipeline together for the chart and movie
//!   page flows.
//! - Everything is passed in explicitly; there is no global client.

pub mod config;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod manager;
pub mod movies;
pub mod services;
pub mod types;

pub use config::{ClientConfig, ConfigError, ServiceConfig};
pub use dispatcher::{Dispatcher, ReqwestDispatcher};
pub use endpoint::{Endpoint, ServiceBase};
pub use error::NetworkError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use manager::ApiManager;
pub use movies::{DailyChart, MoviePage, MovieService};
pub use services::{target_date, yesterday, BoxOfficeApi, ImageSearchApi};
pub use types::{
    Audit, BoxOffice, BoxOfficeResult, DailyBoxOffice, Genre, MovieDetail, MovieInformation,
    MovieInformationResult, MovieOverview, Nation, Person, RankChange, SearchedImage,
};
pub use types::{poster_search_name, POSTER_QUERY_SUFFIX};
pub use tokio_util::sync::CancellationToken;
