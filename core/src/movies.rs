//! Typed movie operations built on the generic pipeline.
//!
//! These are the flows the presentation layer runs: the daily chart with the
//! top movie's poster, and a movie page with its detail and poster. Every
//! step surfaces its own typed error; nothing is silently dropped and no
//! placeholder is substituted.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::endpoint::Endpoint;
use crate::error::NetworkError;
use crate::manager::ApiManager;
use crate::services::{BoxOfficeApi, ImageSearchApi};
use crate::types::{BoxOffice, DailyBoxOffice, MovieDetail, MovieOverview, SearchedImage};

/// Daily ranking split into the headline movie and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyChart {
    /// First-ranked movie, `None` when the ranking is empty.
    pub headliner: Option<DailyBoxOffice>,
    /// Poster bytes for the headliner, `None` when no image was found.
    pub poster: Option<Vec<u8>>,
    pub others: Vec<DailyBoxOffice>,
}

/// Detail and poster for a single movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePage {
    pub overview: MovieOverview,
    pub poster: Option<Vec<u8>>,
}

pub struct MovieService<D> {
    manager: ApiManager<D>,
    box_office: BoxOfficeApi,
    image_search: ImageSearchApi,
}

impl<D: Dispatcher> MovieService<D> {
    pub fn new(manager: ApiManager<D>, box_office: BoxOfficeApi, image_search: ImageSearchApi) -> Self {
        Self {
            manager,
            box_office,
            image_search,
        }
    }

    pub fn from_config(dispatcher: D, config: &ClientConfig) -> Self {
        Self::new(
            ApiManager::new(dispatcher),
            BoxOfficeApi::from_config(&config.data_service),
            ImageSearchApi::from_config(&config.image_search),
        )
    }

    pub fn manager(&self) -> &ApiManager<D> {
        &self.manager
    }

    pub async fn daily_box_office(&self, date: NaiveDate) -> Result<Vec<DailyBoxOffice>, NetworkError> {
        let box_office: BoxOffice = self.manager.fetch(&self.box_office.daily_box_office_on(date)).await?;
        Ok(box_office.result.daily_box_offices)
    }

    pub async fn movie_detail(&self, movie_code: &str) -> Result<MovieDetail, NetworkError> {
        self.manager.fetch(&self.box_office.movie_detail(movie_code)).await
    }

    /// Search for a poster and download it.
    ///
    /// `Ok(None)` when the search finds no image; the download is skipped.
    /// A URL that cannot be parsed is `InvalidUrl`, and the download goes
    /// through the same status policy as every other fetch.
    pub async fn poster(&self, movie_name: &str) -> Result<Option<Vec<u8>>, NetworkError> {
        let searched: SearchedImage = self.manager.fetch(&self.image_search.movie_poster(movie_name)).await?;
        let Some(image_url) = searched.image_url else {
            debug!(movie_name, "no poster image found");
            return Ok(None);
        };
        let endpoint = Endpoint::from_url(&image_url)?;
        let bytes = self.manager.fetch_bytes(&endpoint).await?;
        Ok(Some(bytes))
    }

    /// The ranking for `date` with the first-ranked movie's poster.
    pub async fn daily_chart(&self, date: NaiveDate) -> Result<DailyChart, NetworkError> {
        let mut movies = self.daily_box_office(date).await?;
        if movies.is_empty() {
            return Ok(DailyChart {
                headliner: None,
                poster: None,
                others: movies,
            });
        }
        let headliner = movies.remove(0);
        let poster = self.poster(&headliner.movie_name).await?;
        Ok(DailyChart {
            headliner: Some(headliner),
            poster,
            others: movies,
        })
    }

    /// Detail and poster fetched concurrently.
    pub async fn movie_page(&self, movie_code: &str, movie_name: &str) -> Result<MoviePage, NetworkError> {
        let (detail, poster) = tokio::join!(self.movie_detail(movie_code), self.poster(movie_name));
        Ok(MoviePage {
            overview: detail?.movie_information_result.movie_information.overview(),
            poster: poster?,
        })
    }
}
