use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const DAILY_BOX_OFFICE_PATH: &str = "/kobisopenapi/webservice/rest/boxoffice/searchDailyBoxOfficeList.json";
pub const MOVIE_INFO_PATH: &str = "/kobisopenapi/webservice/rest/movie/searchMovieInfo.json";
pub const IMAGE_SEARCH_PATH: &str = "/v2/search/image";

/// Smallest valid PNG: signature plus a 1x1 transparent pixel.
pub const POSTER_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

const POSTER_QUERY_SUFFIX: &str = "영화 포스터";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyBoxOffice {
    pub rnum: String,
    pub rank: String,
    #[serde(rename = "rankInten")]
    pub rank_inten: String,
    #[serde(rename = "rankOldAndNew")]
    pub rank_old_and_new: String,
    #[serde(rename = "movieCd")]
    pub movie_cd: String,
    #[serde(rename = "movieNm")]
    pub movie_nm: String,
    #[serde(rename = "openDt")]
    pub open_dt: String,
    #[serde(rename = "audiCnt")]
    pub audi_cnt: String,
    #[serde(rename = "audiAcc")]
    pub audi_acc: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoxOfficeResult {
    #[serde(rename = "boxofficeType")]
    pub boxoffice_type: String,
    #[serde(rename = "showRange")]
    pub show_range: String,
    #[serde(rename = "dailyBoxOfficeList")]
    pub daily_box_office_list: Vec<DailyBoxOffice>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoxOfficeResponse {
    #[serde(rename = "boxOfficeResult")]
    pub box_office_result: BoxOfficeResult,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MovieInfo {
    #[serde(rename = "movieCd")]
    pub movie_cd: String,
    #[serde(rename = "movieNm")]
    pub movie_nm: String,
    #[serde(rename = "prdtYear")]
    pub prdt_year: String,
    #[serde(rename = "openDt")]
    pub open_dt: String,
    #[serde(rename = "showTm")]
    pub show_tm: String,
    pub directors: Vec<serde_json::Value>,
    pub actors: Vec<serde_json::Value>,
    pub audits: Vec<serde_json::Value>,
    pub nations: Vec<serde_json::Value>,
    pub genres: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MovieInfoResult {
    #[serde(rename = "movieInfo")]
    pub movie_info: MovieInfo,
    pub source: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MovieInfoResponse {
    #[serde(rename = "movieInfoResult")]
    pub movie_info_result: MovieInfoResult,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageDocument {
    pub image_url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageSearchResponse {
    pub documents: Vec<ImageDocument>,
}

#[derive(Deserialize)]
pub struct BoxOfficeParams {
    pub key: Option<String>,
    #[serde(rename = "targetDt")]
    pub target_dt: Option<String>,
}

#[derive(Deserialize)]
pub struct MovieInfoParams {
    pub key: Option<String>,
    #[serde(rename = "movieCd")]
    pub movie_cd: Option<String>,
}

#[derive(Deserialize)]
pub struct ImageSearchParams {
    pub query: Option<String>,
}

/// Canned catalogue served by every route.
#[derive(Debug)]
pub struct Catalogue {
    pub ranking: Vec<DailyBoxOffice>,
    pub details: HashMap<String, MovieInfo>,
    /// Title -> poster file name. Titles without an entry have no poster.
    pub posters: HashMap<String, String>,
}

pub type Db = Arc<Catalogue>;

fn ranked(rank: u32, code: &str, name: &str, inten: &str, old_and_new: &str, audi_cnt: &str, audi_acc: &str) -> DailyBoxOffice {
    DailyBoxOffice {
        rnum: rank.to_string(),
        rank: rank.to_string(),
        rank_inten: inten.to_string(),
        rank_old_and_new: old_and_new.to_string(),
        movie_cd: code.to_string(),
        movie_nm: name.to_string(),
        open_dt: "2023-07-12".to_string(),
        audi_cnt: audi_cnt.to_string(),
        audi_acc: audi_acc.to_string(),
    }
}

fn names(key: &str, values: &[&str]) -> Vec<serde_json::Value> {
    values
        .iter()
        .map(|v| {
            let mut record = serde_json::Map::new();
            record.insert(key.to_string(), serde_json::Value::from(*v));
            serde_json::Value::Object(record)
        })
        .collect()
}

fn detail(code: &str, name: &str, directors: &[&str], actors: &[&str], rating: Option<&str>) -> MovieInfo {
    MovieInfo {
        movie_cd: code.to_string(),
        movie_nm: name.to_string(),
        prdt_year: "2023".to_string(),
        open_dt: "20230712".to_string(),
        show_tm: "128".to_string(),
        directors: names("peopleNm", directors),
        actors: names("peopleNm", actors),
        audits: rating
            .map(|r| vec![serde_json::json!({ "auditNo": "2023-MF00001", "watchGradeNm": r })])
            .unwrap_or_default(),
        nations: names("nationNm", &["한국"]),
        genres: names("genreNm", &["드라마", "액션"]),
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        let ranking = vec![
            ranked(1, "20230001", "Movie A", "0", "OLD", "120000", "3400000"),
            ranked(2, "20230002", "Movie B", "1", "OLD", "80000", "910000"),
            ranked(3, "20230003", "Movie C", "0", "NEW", "45000", "45000"),
        ];
        let details = [
            detail("20230001", "Movie A", &["Director A"], &["Actor One", "Actor Two"], Some("12세이상관람가")),
            detail("20230002", "Movie B", &["Director B"], &["Actor Three"], Some("15세이상관람가")),
            detail("20230003", "Movie C", &[], &[], None),
        ]
        .into_iter()
        .map(|d| (d.movie_cd.clone(), d))
        .collect();
        let posters = [("Movie A", "movie-a.png"), ("Movie B", "movie-b.png")]
            .into_iter()
            .map(|(title, file)| (title.to_string(), file.to_string()))
            .collect();
        Self {
            ranking,
            details,
            posters,
        }
    }
}

pub fn app() -> Router {
    app_with(Catalogue::default())
}

pub fn app_with(catalogue: Catalogue) -> Router {
    let db: Db = Arc::new(catalogue);
    Router::new()
        .route(DAILY_BOX_OFFICE_PATH, get(daily_box_office))
        .route(MOVIE_INFO_PATH, get(movie_info))
        .route(IMAGE_SEARCH_PATH, get(image_search))
        .route("/posters/{file}", get(poster))
        .route("/empty", get(empty))
        .route("/broken", get(broken))
        .route("/slow", get(slow))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn is_target_date(raw: &str) -> bool {
    raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit())
}

async fn daily_box_office(
    State(db): State<Db>,
    Query(params): Query<BoxOfficeParams>,
) -> Result<Json<BoxOfficeResponse>, StatusCode> {
    params.key.filter(|k| !k.is_empty()).ok_or(StatusCode::UNAUTHORIZED)?;
    let target = params
        .target_dt
        .filter(|d| is_target_date(d))
        .ok_or(StatusCode::BAD_REQUEST)?;
    tracing::debug!(target_dt = %target, "daily box office");
    Ok(Json(BoxOfficeResponse {
        box_office_result: BoxOfficeResult {
            boxoffice_type: "일별 박스오피스".to_string(),
            show_range: format!("{target}~{target}"),
            daily_box_office_list: db.ranking.clone(),
        },
    }))
}

async fn movie_info(
    State(db): State<Db>,
    Query(params): Query<MovieInfoParams>,
) -> Result<Json<MovieInfoResponse>, StatusCode> {
    params.key.filter(|k| !k.is_empty()).ok_or(StatusCode::UNAUTHORIZED)?;
    let code = params.movie_cd.ok_or(StatusCode::BAD_REQUEST)?;
    let info = db.details.get(&code).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(MovieInfoResponse {
        movie_info_result: MovieInfoResult {
            movie_info: info,
            source: "영화진흥위원회".to_string(),
        },
    }))
}

async fn image_search(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ImageSearchParams>,
) -> Result<Json<ImageSearchResponse>, StatusCode> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("KakaoAK "));
    if !authorized {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let query = params.query.ok_or(StatusCode::BAD_REQUEST)?;
    let title = query.trim_end_matches(POSTER_QUERY_SUFFIX).trim();
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let documents = db
        .posters
        .get(title)
        .map(|file| ImageDocument {
            image_url: format!("http://{host}/posters/{file}"),
            width: 1,
            height: 1,
        })
        .into_iter()
        .collect();
    Ok(Json(ImageSearchResponse { documents }))
}

async fn poster(State(db): State<Db>, Path(file): Path<String>) -> Result<impl IntoResponse, StatusCode> {
    if !db.posters.values().any(|f| *f == file) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(([(header::CONTENT_TYPE, "image/png")], POSTER_PNG))
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn broken() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], r#"{"boxOfficeResult": ["#)
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(30)).await;
    "{}"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_serializes_with_service_names() {
        let catalogue = Catalogue::default();
        let json = serde_json::to_value(&catalogue.ranking[0]).unwrap();
        assert_eq!(json["movieCd"], "20230001");
        assert_eq!(json["movieNm"], "Movie A");
        assert_eq!(json["rankOldAndNew"], "OLD");
        assert_eq!(json["audiAcc"], "3400000");
    }

    #[test]
    fn detail_lists_use_named_records() {
        let catalogue = Catalogue::default();
        let info = &catalogue.details["20230001"];
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["directors"][0]["peopleNm"], "Director A");
        assert_eq!(json["audits"][0]["watchGradeNm"], "12세이상관람가");
        assert_eq!(json["genres"][1]["genreNm"], "액션");
    }

    #[test]
    fn movie_without_audits_has_empty_list() {
        let catalogue = Catalogue::default();
        assert!(catalogue.details["20230003"].audits.is_empty());
    }

    #[test]
    fn target_date_must_be_eight_digits() {
        assert!(is_target_date("20230724"));
        assert!(!is_target_date("2023-07-24"));
        assert!(!is_target_date("2023072"));
        assert!(!is_target_date("2023072a"));
    }

    #[test]
    fn poster_fixture_is_png() {
        assert_eq!(&POSTER_PNG[..8], b"\x89PNG\r\n\x1a\n");
    }
}
