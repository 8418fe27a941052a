// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use holocron_api::Client;
use holocron_app::Collection;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body).with_status_code(status).with_header(
        Header::from_bytes("Content-Type", "application/json").expect("valid content type header"),
    )
}

#[test]
fn connection_failure_names_the_catalog_and_remediation() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .list_page(Collection::People, 1)
        .expect_err("fetch should fail for unreachable endpoint");
    let message = format!("{error:#}");
    assert!(message.contains("fetch people page 1"));
    assert!(message.contains("[catalog].base_url"));
}

#[test]
fn list_page_decodes_envelope_from_mock_server() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/people/?page=2");
        let body = r#"{
            "count": 82,
            "next": "https://example.test/people/?page=3",
            "previous": "https://example.test/people/?page=1",
            "results": [
                {"name": "Luke Skywalker", "height": "172", "films": ["f1"]},
                {"name": "C-3PO", "height": "167", "films": []}
            ]
        }"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let envelope = client.list_page(Collection::People, 2)?;

    assert_eq!(envelope.total_count, 82);
    assert_eq!(envelope.total_pages(), 9);
    assert_eq!(envelope.results.len(), 2);
    assert_eq!(envelope.results[0].name(), Some("Luke Skywalker"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn list_page_reports_non_success_status_with_page_context() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(r#"{"detail": "Not found"}"#, 404))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .list_page(Collection::Planets, 99)
        .expect_err("404 should fail");
    let message = format!("{error:#}");
    assert!(message.contains("fetch planets page 99"));
    assert!(message.contains("404"));
    assert!(message.contains("Not found"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn get_by_reference_fetches_a_single_record() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/planets/1/");
        let body = r#"{"name": "Tatooine", "diameter": "10465", "residents": ["r1", "r2"]}"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let record = client.get_by_reference(&format!("{addr}/planets/1/"))?;
    assert_eq!(record.name(), Some("Tatooine"));
    assert_eq!(record.text("diameter"), Some("10465"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn get_by_reference_rejects_relative_urls() -> Result<()> {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))?;
    let error = client
        .get_by_reference("/planets/1/")
        .expect_err("relative reference should fail");
    assert!(error.to_string().contains("invalid resource URL"));
    Ok(())
}

#[test]
fn transport_page_merges_vehicles_and_starships() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        for _ in 0..2 {
            let request = server.recv().expect("request expected");
            let body = match request.url() {
                "/vehicles/?page=1" => {
                    r#"{"count": 4, "next": null, "previous": null,
                        "results": [{"name": "v1"}, {"name": "v2"}]}"#
                }
                "/starships/?page=1" => {
                    r#"{"count": 6, "next": "https://example.test/starships/?page=2",
                        "previous": null,
                        "results": [{"name": "s1"}, {"name": "s2"}]}"#
                }
                other => panic!("unexpected request {other}"),
            };
            request
                .respond(json_response(body, 200))
                .expect("response should succeed");
        }
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let merged = client.list_transport_page(1)?;

    assert_eq!(merged.total_count, 10);
    assert_eq!(
        merged
            .results
            .iter()
            .filter_map(holocron_app::Record::name)
            .collect::<Vec<_>>(),
        vec!["v1", "v2", "s1", "s2"],
    );
    assert_eq!(
        merged.next.as_deref(),
        Some("https://example.test/starships/?page=2"),
    );

    handle.join().expect("server thread should join");
    Ok(())
}
