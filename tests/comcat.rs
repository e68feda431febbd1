//! ComcatClient against a mock FDSN event service.

use finite_fault_product::*;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn client(server: &MockServer) -> ComcatClient {
    ComcatClient::new(&server.base_url())
        .unwrap()
        .with_retry_max(1)
        .with_timeout(Duration::from_secs(10))
}

fn feature(server: &MockServer) -> serde_json::Value {
    json!({
        "type": "Feature",
        "id": "us1000abcd",
        "properties": {
            "mag": 7.5,
            "products": {
                "finite-fault": [
                    {
                        "id": "urn:usgs-product:us:finite-fault:us1000abcd_1:1546300800000",
                        "type": "finite-fault",
                        "code": "us1000abcd_1",
                        "source": "us",
                        "status": "UPDATE",
                        "updateTime": 1546300800000i64,
                        "preferredWeight": 1,
                        "properties": {"eventsource": "us"},
                        "contents": {
                            "FFM.geojson": {
                                "contentType": "application/json",
                                "lastModified": 1546300800000i64,
                                "length": 2,
                                "url": server.url("/product/us1000abcd_1/FFM.geojson")
                            }
                        }
                    },
                    {
                        "id": "urn:usgs-product:us:finite-fault:us1000abcd_2:1546300900000",
                        "type": "finite-fault",
                        "code": "us1000abcd_2",
                        "source": "us",
                        "status": "UPDATE",
                        "updateTime": 1546300900000i64,
                        "preferredWeight": 1,
                        "contents": {
                            "FFM.geojson": {
                                "contentType": "application/json",
                                "length": 4,
                                "url": server.url("/product/us1000abcd_2/FFM.geojson")
                            }
                        }
                    }
                ],
                "origin": [
                    {"type": "origin", "code": "1000abcd", "source": "us", "updateTime": 1546300700000i64}
                ]
            }
        }
    })
}

#[test]
fn event_lookup_decodes_products() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/event/1/query")
            .query_param("eventid", "us1000abcd")
            .query_param("format", "geojson");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(feature(&server));
    });

    let detail = client(&server).event_by_id("us1000abcd").unwrap();
    mock.assert();
    assert_eq!(detail.id, "us1000abcd");
    assert!(detail.has_product("finite-fault"));
    assert!(detail.has_product("origin"));
    assert_eq!(detail.products("finite-fault").len(), 2);
    assert_eq!(detail.preferred_product("finite-fault").unwrap().code, "us1000abcd_2");
}

#[test]
fn missing_event_is_a_readable_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/fdsnws/event/1/query");
        then.status(404).body("Error 404: Not Found");
    });

    let err = client(&server).event_by_id("us0000none").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("HTTP 404"), "{msg}");
    assert!(msg.contains("eventid=us0000none"), "{msg}");
}

#[test]
fn unavailable_service_gives_up_after_retry_budget() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/fdsnws/event/1/query");
        then.status(503).body("maintenance");
    });

    let err = client(&server).event_by_id("us1000abcd").unwrap_err();
    assert_eq!(mock.hits(), 1);
    assert!(err.to_string().contains("HTTP 503"));
}

#[test]
fn download_writes_target() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/product/us1000abcd_1/FFM.geojson");
        then.status(200).body("{}");
    });

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("FFM.geojson");
    let content = Content {
        url: server.url("/product/us1000abcd_1/FFM.geojson"),
        length: 2,
        ..Default::default()
    };

    let written = client(&server).download(&content, &target).unwrap();
    assert_eq!(written, target);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "{}");
}

#[test]
fn short_download_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/short.bin");
        then.status(200).body("abc");
    });

    let dir = tempfile::tempdir().unwrap();
    let content = Content {
        url: server.url("/short.bin"),
        length: 10,
        ..Default::default()
    };
    let err = client(&server)
        .download(&content, &dir.path().join("short.bin"))
        .unwrap_err();
    assert!(err.to_string().contains("3 byte(s) out of 10"));
}

#[test]
fn inline_content_cannot_be_downloaded() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let err = client(&server)
        .download(&Content::default(), &dir.path().join("x"))
        .unwrap_err();
    assert!(err.to_string().contains("no download url"));
}

#[test]
fn two_model_fetch_end_to_end() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/fdsnws/event/1/query");
        then.status(200).json_body(feature(&server));
    });
    server.mock(|when, then| {
        when.method(GET).path("/product/us1000abcd_1/FFM.geojson");
        then.status(200).body("m1");
    });
    server.mock(|when, then| {
        when.method(GET).path("/product/us1000abcd_2/FFM.geojson");
        then.status(200).body("m2m2");
    });

    let out = tempfile::tempdir().unwrap();
    let retrieved = get_fault(
        &client(&server),
        &EventId::new("us", "1000abcd"),
        true,
        Some(out.path()),
    )
    .unwrap();

    assert_eq!(retrieved.directories.len(), 2);
    let first = std::fs::read_to_string(retrieved.directories[0].join("FFM.geojson")).unwrap();
    let second = std::fs::read_to_string(retrieved.directories[1].join("FFM.geojson")).unwrap();
    assert_eq!(first, "m1");
    assert_eq!(second, "m2m2");
}
