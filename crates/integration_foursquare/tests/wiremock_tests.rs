//! Integration tests for the Foursquare client (wiremock-based)

use chrono::Weekday;
use domain::{GeoLocation, VenueId};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_foursquare::{FoursquareConfig, FoursquareError, FoursquareVenueClient, VenueClient};

fn client_for(server: &MockServer) -> FoursquareVenueClient {
    FoursquareVenueClient::new(&FoursquareConfig::for_testing(&server.uri())).unwrap()
}

fn center() -> GeoLocation {
    GeoLocation::new(52.52, 13.405).unwrap()
}

const fn sample_explore_json() -> &'static str {
    r#"{
        "meta": {"code": 200, "requestId": "abc"},
        "response": {
            "groups": [{
                "type": "Recommended Places",
                "items": [
                    {"venue": {
                        "id": "4b0588c4f964a520d6da22e3",
                        "name": "Café Einstein",
                        "location": {"lat": 52.5145, "lng": 13.3891, "distance": 1250},
                        "categories": [{"id": "4bf58dd8d48988d16d941735", "name": "Café"}]
                    }},
                    {"venue": {
                        "id": "4c2b7a8f8ef52d7f8d3e5b1a",
                        "name": "Kaffeebar",
                        "location": {"lat": 52.5210, "lng": 13.4100},
                        "categories": []
                    }}
                ]
            }]
        }
    }"#
}

const fn sample_hours_json() -> &'static str {
    r#"{
        "meta": {"code": 200},
        "response": {
            "hours": {"timeframes": [
                {"days": [1, 2, 3, 4, 5], "includesToday": true,
                 "open": [{"start": "0800", "end": "2000"}], "segments": []},
                {"days": [6, 7], "open": [{"start": "1000", "end": "+0100"}], "segments": []}
            ]},
            "popular": {"timeframes": [
                {"days": [1, 2, 3, 4, 5, 6, 7],
                 "open": [{"start": "1200", "end": "1400"}, {"start": "1700", "end": "1900"}],
                 "segments": []}
            ]}
        }
    }"#
}

#[tokio::test]
async fn test_explore_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/venues/explore"))
        .and(query_param("ll", "52.52,13.405"))
        .and(query_param("query", "coffee"))
        .and(query_param("radius", "1500"))
        .and(query_param("limit", "50"))
        .and(query_param("client_id", "test-client"))
        .and(query_param("v", "20201120"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_explore_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let venues = client.explore(&center(), "coffee", 1500, 50).await.unwrap();

    assert_eq!(venues.len(), 2);
    assert_eq!(venues[0].name, "Café Einstein");
    assert_eq!(venues[0].distance_m, 1250);
    assert_eq!(venues[0].category, "Café");
    assert_eq!(venues[1].category, "Uncategorized");
    assert!(venues[1].distance_m > 0);
}

#[tokio::test]
async fn test_explore_meta_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/venues/explore"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"meta": {"code": 400, "errorType": "invalid_auth",
                "errorDetail": "Missing access credentials."}, "response": {}}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.explore(&center(), "coffee", 1000, 10).await.unwrap_err();

    assert!(matches!(err, FoursquareError::ApiError { code: 400, .. }));
    assert!(err.to_string().contains("Missing access credentials"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_explore_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/venues/explore"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.explore(&center(), "coffee", 1000, 10).await.unwrap_err();

    assert!(matches!(
        err,
        FoursquareError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_explore_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/venues/explore"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.explore(&center(), "coffee", 1000, 10).await.unwrap_err();
    assert!(matches!(err, FoursquareError::ServiceUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_explore_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/venues/explore"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.explore(&center(), "coffee", 1000, 10).await.unwrap_err();
    assert!(matches!(err, FoursquareError::ParseError(_)));
}

#[tokio::test]
async fn test_venue_hours_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/venues/4b0588c4f964a520d6da22e3/hours"))
        .and(query_param("client_secret", "test-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_hours_json()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = VenueId::new("4b0588c4f964a520d6da22e3").unwrap();
    let week = client.venue_hours(&id).await.unwrap().unwrap();

    assert_eq!(week.known_days(), 7);
    let monday = week.get(Weekday::Mon).unwrap();
    assert_eq!(monday.open.hhmm(), 800);
    assert_eq!(monday.close.hhmm(), 2000);
    // last popular segment wins
    assert_eq!(monday.popular_start.hhmm(), 1700);
    let sunday = week.get(Weekday::Sun).unwrap();
    assert_eq!(sunday.close.hhmm(), 100);
    assert!(sunday.closes_after_midnight());
}

#[tokio::test]
async fn test_venue_hours_without_popular() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/venues/abc/hours"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"meta": {"code": 200}, "response": {
                "hours": {"timeframes": [{"days": [1], "open": [{"start": "0800", "end": "2000"}]}]},
                "popular": {}
            }}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let hours = client
        .venue_hours(&VenueId::new("abc").unwrap())
        .await
        .unwrap();
    assert!(hours.is_none());
}

#[tokio::test]
async fn test_venue_hours_unknown_venue() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/venues/missing/hours"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"meta": {"code": 400, "errorType": "param_error",
                "errorDetail": "Value missing is invalid for venue id"}, "response": {}}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .venue_hours(&VenueId::new("missing").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, FoursquareError::ApiError { code: 400, .. }));
}
