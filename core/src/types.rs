//! Domain models decoded from the data service and the image-search service.
//!
//! # Design
//! Field names follow the camelCase fixture shape (`movieCode`, `result`)
//! and also accept the abbreviated names the live box-office service uses
//! (`movieCd`, `boxOfficeResult`) through serde aliases. Counts and ranks
//! stay as strings on the wire; numeric accessors parse on demand.

use serde::{Deserialize, Serialize};

/// Ranked daily box-office listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoxOffice {
    #[serde(alias = "boxOfficeResult")]
    pub result: BoxOfficeResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BoxOfficeResult {
    #[serde(default, alias = "boxofficeType", skip_serializing_if = "Option::is_none")]
    pub box_office_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_range: Option<String>,
    #[serde(rename = "dailyBoxOfficeList")]
    pub daily_box_offices: Vec<DailyBoxOffice>,
}

/// One entry of the daily ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct DailyBoxOffice {
    pub rank: String,
    #[serde(alias = "movieCd")]
    pub movie_code: String,
    #[serde(alias = "movieNm")]
    pub movie_name: String,
    #[serde(default, alias = "openDt", skip_serializing_if = "Option::is_none")]
    pub open_date: Option<String>,
    #[serde(default, alias = "audiCnt", skip_serializing_if = "Option::is_none")]
    pub audience_count: Option<String>,
    #[serde(default, alias = "audiAcc", skip_serializing_if = "Option::is_none")]
    pub audience_accumulation: Option<String>,
    #[serde(default, alias = "rankInten", skip_serializing_if = "Option::is_none")]
    pub daily_rank_changes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_old_and_new: Option<String>,
}

/// Movement of a movie in the ranking compared with the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankChange {
    /// First day in the ranking.
    New,
    Up(u32),
    Down(u32),
    Steady,
}

impl DailyBoxOffice {
    /// `None` when the change field is absent or not a number.
    pub fn rank_change(&self) -> Option<RankChange> {
        if self.rank_old_and_new.as_deref() == Some("NEW") {
            return Some(RankChange::New);
        }
        let delta: i64 = self.daily_rank_changes.as_deref()?.trim().parse().ok()?;
        let magnitude = u32::try_from(delta.unsigned_abs()).ok()?;
        Some(match delta {
            d if d > 0 => RankChange::Up(magnitude),
            d if d < 0 => RankChange::Down(magnitude),
            _ => RankChange::Steady,
        })
    }

    pub fn audience_count_value(&self) -> Option<u64> {
        parse_count(self.audience_count.as_deref())
    }

    pub fn audience_accumulation_value(&self) -> Option<u64> {
        parse_count(self.audience_accumulation.as_deref())
    }
}

fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw?.trim().replace(',', "").parse().ok()
}

/// Detail record for a single movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieDetail {
    #[serde(rename = "movieInfoResult")]
    pub movie_information_result: MovieInformationResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieInformationResult {
    #[serde(rename = "movieInfo")]
    pub movie_information: MovieInformation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieInformation {
    #[serde(rename = "movieCd")]
    pub code: String,
    #[serde(rename = "movieNm")]
    pub name: String,
    #[serde(rename = "prdtYear", default)]
    pub year_of_production: String,
    #[serde(rename = "openDt", default)]
    pub open_date: String,
    #[serde(rename = "showTm", default)]
    pub running_time: String,
    #[serde(default)]
    pub directors: Vec<Person>,
    #[serde(default)]
    pub actors: Vec<Person>,
    #[serde(default)]
    pub audits: Vec<Audit>,
    #[serde(default)]
    pub nations: Vec<Nation>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    #[serde(rename = "peopleNm")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Audit {
    #[serde(rename = "watchGradeNm")]
    pub movie_rating: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Nation {
    #[serde(rename = "nationNm")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    #[serde(rename = "genreNm")]
    pub name: String,
}

/// Suffix appended to a title so the image search favours poster art.
pub const POSTER_QUERY_SUFFIX: &str = "영화 포스터";

/// Image search text for `movie_name`'s poster.
pub fn poster_search_name(movie_name: &str) -> String {
    format!("{movie_name} {POSTER_QUERY_SUFFIX}")
}

/// Flattened view of a `MovieInformation`, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieOverview {
    pub name: String,
    pub directors: Vec<String>,
    pub year_of_production: String,
    pub open_date: String,
    pub running_time: String,
    pub movie_rating: Option<String>,
    pub nation: Option<String>,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    /// Query the poster lookup sends for this movie.
    pub image_search_name: String,
}

impl MovieInformation {
    /// Only the first audit rating and the first nation are kept.
    pub fn overview(&self) -> MovieOverview {
        MovieOverview {
            name: self.name.clone(),
            directors: self.directors.iter().map(|p| p.name.clone()).collect(),
            year_of_production: self.year_of_production.clone(),
            open_date: self.open_date.clone(),
            running_time: self.running_time.clone(),
            movie_rating: self.audits.first().map(|a| a.movie_rating.clone()),
            nation: self.nations.first().map(|n| n.name.clone()),
            genres: self.genres.iter().map(|g| g.name.clone()).collect(),
            actors: self.actors.iter().map(|p| p.name.clone()).collect(),
            image_search_name: poster_search_name(&self.name),
        }
    }
}

/// Result of a poster lookup: zero or one image URL.
///
/// Decodes either `{"imageUrl": ...}` or the search API's
/// `{"documents": [{"image_url": ...}, ...]}`, taking the first document.
/// A null, missing or blank URL means no image is available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "SearchedImageWire")]
pub struct SearchedImage {
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
struct SearchedImageWire {
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
    #[serde(default)]
    documents: Vec<ImageDocument>,
}

#[derive(Deserialize)]
struct ImageDocument {
    image_url: Option<String>,
}

impl From<SearchedImageWire> for SearchedImage {
    fn from(wire: SearchedImageWire) -> Self {
        let image_url = wire
            .image_url
            .or_else(|| wire.documents.into_iter().next().and_then(|d| d.image_url))
            .filter(|url| !url.trim().is_empty());
        SearchedImage { image_url }
    }
}
