//! Endpoint families for the two remote services.
//!
//! Both families only fill in host, path and query values on a plain
//! `Endpoint`; the pipeline treats them identically.

use chrono::{Days, NaiveDate};

use crate::config::ServiceConfig;
use crate::endpoint::{Endpoint, ServiceBase};
use crate::types::poster_search_name;

const DAILY_BOX_OFFICE_PATH: &str = "/kobisopenapi/webservice/rest/boxoffice/searchDailyBoxOfficeList.json";
const MOVIE_INFO_PATH: &str = "/kobisopenapi/webservice/rest/movie/searchMovieInfo.json";
const IMAGE_SEARCH_PATH: &str = "/v2/search/image";

/// Date format the data service expects for `targetDt`.
const TARGET_DATE_FORMAT: &str = "%Y%m%d";

/// Data service: daily ranking and per-movie detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxOfficeApi {
    base: ServiceBase,
    api_key: String,
}

impl BoxOfficeApi {
    pub fn new(base: ServiceBase, api_key: &str) -> Self {
        Self {
            base,
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.base.clone(), &config.api_key)
    }

    /// Ranking for `target_date`, given as `YYYYMMDD`.
    pub fn daily_box_office(&self, target_date: &str) -> Endpoint {
        self.base
            .endpoint(DAILY_BOX_OFFICE_PATH)
            .query("key", &self.api_key)
            .query("targetDt", target_date)
    }

    pub fn daily_box_office_on(&self, date: NaiveDate) -> Endpoint {
        self.daily_box_office(&target_date(date))
    }

    pub fn movie_detail(&self, movie_code: &str) -> Endpoint {
        self.base
            .endpoint(MOVIE_INFO_PATH)
            .query("key", &self.api_key)
            .query("movieCd", movie_code)
    }
}

/// Image-search service: poster lookup by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSearchApi {
    base: ServiceBase,
    api_key: String,
}

impl ImageSearchApi {
    pub fn new(base: ServiceBase, api_key: &str) -> Self {
        Self {
            base,
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.base.clone(), &config.api_key)
    }

    /// Search for one poster image of `movie_name`.
    pub fn movie_poster(&self, movie_name: &str) -> Endpoint {
        self.base
            .endpoint(IMAGE_SEARCH_PATH)
            .query("query", &poster_search_name(movie_name))
            .query("size", "1")
            .header("Authorization", &format!("KakaoAK {}", self.api_key))
    }
}

/// `date` in the `YYYYMMDD` form used by `targetDt`.
pub fn target_date(date: NaiveDate) -> String {
    date.format(TARGET_DATE_FORMAT).to_string()
}

/// The day before `today`; the newest ranking the data service publishes.
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}
