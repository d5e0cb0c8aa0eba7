//! Verify endpoint building and the fetch pipeline against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Endpoint vectors describe the expected method, path, query pairs and
//! headers for each endpoint family. Decode vectors pair a simulated response
//! with either the expected decoded value or the expected error kind.
//! Comparing decoded values (not raw strings) avoids false negatives from
//! field ordering.

use boxoffice_core::{
    ApiManager, BoxOffice, BoxOfficeApi, Dispatcher, HttpMethod, HttpRequest, HttpResponse,
    ImageSearchApi, MovieDetail, NetworkError, SearchedImage, ServiceBase,
};
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Answers every request with the same simulated response.
struct Simulated(HttpResponse);

impl Dispatcher for Simulated {
    async fn perform(&self, _request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        Ok(self.0.clone())
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn string_pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

#[test]
fn endpoint_test_vectors() {
    let raw = include_str!("../../test-vectors/endpoints.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let base = ServiceBase::parse(vectors["base_url"].as_str().unwrap()).unwrap();
    let key = vectors["api_key"].as_str().unwrap();
    let box_office = BoxOfficeApi::new(base.clone(), key);
    let image_search = ImageSearchApi::new(base, key);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        let endpoint = match case["operation"].as_str().unwrap() {
            "daily_box_office" => box_office.daily_box_office(input),
            "movie_detail" => box_office.movie_detail(input),
            "movie_poster" => image_search.movie_poster(input),
            other => panic!("{name}: unknown operation: {other}"),
        };
        let req = endpoint.build_request().unwrap();

        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url.scheme(), "http", "{name}: scheme");
        assert_eq!(req.url.host_str(), Some("localhost"), "{name}: host");
        assert_eq!(req.url.path(), expected_req["path"].as_str().unwrap(), "{name}: path");

        let query: Vec<(String, String)> = req
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(query, string_pairs(&expected_req["query"]), "{name}: query");
        assert_eq!(req.headers, string_pairs(&expected_req["headers"]), "{name}: headers");
        assert!(req.body.is_none(), "{name}: body should be None");
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

async fn check_case<T>(case: &serde_json::Value)
where
    T: DeserializeOwned + PartialEq + Debug,
{
    let name = case["name"].as_str().unwrap();
    let sim = &case["simulated_response"];
    let response = HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    );
    let manager = ApiManager::new(Simulated(response));
    let endpoint = boxoffice_core::Endpoint::new("http", "localhost", "/fixture");
    let result = manager.fetch::<T>(&endpoint).await;

    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        match expected_error.as_str().unwrap() {
            "RequestFailed" => {
                let status = case["expected_status"].as_u64().unwrap() as u16;
                assert_eq!(err, NetworkError::RequestFailed { status }, "{name}");
            }
            "DecodingFailed" => assert!(matches!(err, NetworkError::DecodingFailed(_)), "{name}: {err:?}"),
            "NoData" => assert_eq!(err, NetworkError::NoData, "{name}"),
            other => panic!("{name}: unknown expected_error: {other}"),
        }
    } else {
        let decoded = result.unwrap();
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(decoded, expected, "{name}: decoded result");
    }
}

#[tokio::test]
async fn decode_test_vectors() {
    let raw = include_str!("../../test-vectors/decode.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        match case["target"].as_str().unwrap() {
            "box_office" => check_case::<BoxOffice>(case).await,
            "movie_detail" => check_case::<MovieDetail>(case).await,
            "searched_image" => check_case::<SearchedImage>(case).await,
            other => panic!("unknown target: {other}"),
        }
    }
}
