//! Tests for the blocking HTTP transport against a loopback listener.
//!
//! Each test binds `127.0.0.1:0`, serves a fixed number of requests from a
//! background thread, and hands the captured request lines/bodies back.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use url::Url;

use saplo::{ClientConfig, HttpTransport, SaploClient, SaploError, Transport};

/// Captured request: request line and body.
type Captured = (String, Vec<u8>);

/// Read one HTTP/1.1 request (Content-Length bodies only).
fn read_request(stream: &mut TcpStream) -> Captured {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            if key.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap();
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).unwrap();
    (request_line.trim().to_string(), body)
}

fn write_response(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();
}

/// Serve `responses` in order, one connection each.
fn serve(responses: Vec<(&'static str, &'static str)>) -> (Url, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let url = Url::parse(&format!("http://{}/rpc/json", addr)).unwrap();

    let handle = std::thread::spawn(move || {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            captured.push(read_request(&mut stream));
            write_response(&mut stream, status, body);
        }
        captured
    });

    (url, handle)
}

fn config(endpoint: Url) -> ClientConfig {
    ClientConfig {
        endpoint,
        timeout: Some(Duration::from_secs(5)),
        ..ClientConfig::default()
    }
}

#[test]
fn test_post_returns_raw_body() {
    let (url, server) = serve(vec![("200 OK", r#"{"result":{"ok":true}}"#)]);
    let transport = HttpTransport::new(&config(url.clone())).unwrap();

    let raw = transport
        .post(&saplo::rpc::endpoint_url(&url, "tok"), b"{\"method\":\"m\"}".to_vec())
        .unwrap();
    assert_eq!(raw, br#"{"result":{"ok":true}}"#.to_vec());

    let captured = server.join().unwrap();
    assert_eq!(captured[0].0, "POST /rpc/json?access_token=tok HTTP/1.1");
    assert_eq!(captured[0].1, b"{\"method\":\"m\"}".to_vec());
}

#[test]
fn test_full_client_round_trip() {
    let (url, server) = serve(vec![
        ("200 OK", r#"{"result":{"access_token":"tok123"}}"#),
        ("200 OK", r#"{"result":{"id":42,"name":"C1"}}"#),
    ]);

    let client = SaploClient::builder("api-key", "secret-key")
        .config(config(url))
        .connect()
        .unwrap();
    let created = client.collection().create(json!({"name": "C1"})).unwrap();
    assert_eq!(created, json!({"id": 42, "name": "C1"}));

    let captured = server.join().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].0, "POST /rpc/json?access_token= HTTP/1.1");
    assert_eq!(captured[1].0, "POST /rpc/json?access_token=tok123 HTTP/1.1");

    let body: Value = serde_json::from_slice(&captured[1].1).unwrap();
    assert_eq!(
        body,
        json!({"method": "collection.create", "params": {"name": "C1"}, "id": 0})
    );
}

#[test]
fn test_http_error_status_is_network_error() {
    let (url, server) = serve(vec![("500 Internal Server Error", "{}")]);
    let transport = HttpTransport::new(&config(url.clone())).unwrap();

    let err = transport.post(&url, b"{}".to_vec()).unwrap_err();
    assert!(matches!(err, SaploError::Network(_)), "got {:?}", err);
    server.join().unwrap();
}

#[test]
fn test_connection_refused_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let url = Url::parse(&format!("http://{}/rpc/json", addr)).unwrap();
    let transport = HttpTransport::new(&config(url.clone())).unwrap();

    let err = transport.post(&url, b"{}".to_vec()).unwrap_err();
    assert!(matches!(err, SaploError::Network(_)), "got {:?}", err);
}

#[test]
fn test_unreachable_service_fails_construction() {
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let url = Url::parse(&format!("http://{}/rpc/json", addr)).unwrap();

    let err = SaploClient::builder("k", "s")
        .config(config(url))
        .connect()
        .unwrap_err();
    assert!(matches!(err, SaploError::Authentication { code: None, .. }));
}
