//! Integration tests for the thermometer resource API.
//!
//! Uses axum's `tower::ServiceExt` to send requests directly to the router.

use axum::body::Body;
use axum::http::{header::LOCATION, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use pi_thermometer::{
    create_app, AppConfig, MonitorConfig, SafeRange, ThermometerConfig, ThermometerRegistry,
    WebConfig,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

const HOST: &str = "pi.local:5000";
const BASE: &str = "http://pi.local:5000";

fn build_app(dir: &Path, web_config: WebConfig) -> Router {
    let config = AppConfig {
        data_dir: dir.to_path_buf(),
        thermometers: vec![
            ThermometerConfig::emulated("w1", 21.5, SafeRange::new(18.0, 26.0)),
            ThermometerConfig::one_wire(
                "broken",
                dir.join("no-such-device").join("w1_slave"),
                SafeRange::new(18.0, 26.0),
            ),
        ],
        monitor: MonitorConfig::default(),
    };
    let registry = Arc::new(ThermometerRegistry::from_config(&config).unwrap());
    create_app(&web_config, registry)
}

async fn send(app: &Router, method: Method, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", HOST)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn capture_links(app: &Router) -> Vec<String> {
    let response = send(app, Method::GET, "/thermometers/w1/temperatures/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["temperatures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_thermometers() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path(), WebConfig::default());

    let response = send(&app, Method::GET, "/thermometers/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "thermometer": [
                format!("{}/thermometers/broken", BASE),
                format!("{}/thermometers/w1", BASE),
            ]
        })
    );
}

#[tokio::test]
async fn test_describe_thermometer() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path(), WebConfig::default());

    let response = send(&app, Method::GET, "/thermometers/w1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "self_url": format!("{}/thermometers/w1", BASE),
            "temperatures_url": format!("{}/thermometers/w1/temperatures/", BASE),
            "emulated": true,
        })
    );

    let response = send(&app, Method::GET, "/thermometers/broken").await;
    assert_eq!(body_json(response).await["emulated"], false);
}

#[tokio::test]
async fn test_unknown_thermometer() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path(), WebConfig::default());

    for (method, uri) in [
        (Method::GET, "/thermometers/bogus"),
        (Method::GET, "/thermometers/bogus/temperatures/"),
        (Method::POST, "/thermometers/bogus/temperatures/"),
        (Method::GET, "/thermometers/bogus/temperatures/0123456789abcdef0123456789abcdef"),
        (Method::DELETE, "/thermometers/bogus/temperatures/0123456789abcdef0123456789abcdef"),
    ] {
        let response = send(&app, method.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body_json(response).await, json!({ "error": "thermometer not found" }));
    }
    assert!(!dir.path().join("bogus").exists());
}

#[tokio::test]
async fn test_capture_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path(), WebConfig::default());
    assert!(capture_links(&app).await.is_empty());

    let response = send(&app, Method::POST, "/thermometers/w1/temperatures/").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with(&format!("{}/thermometers/w1/temperatures/", BASE)));
    assert!(body_bytes(response).await.is_empty());

    assert_eq!(capture_links(&app).await, vec![location.clone()]);

    let path = location.trim_start_matches(BASE).to_string();
    let response = send(&app, Method::GET, &path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "temperature": "21.5" }));

    let response = send(&app, Method::DELETE, &path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({}));
    assert!(capture_links(&app).await.is_empty());

    let response = send(&app, Method::GET, &path).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "error": "temperature not found" }));

    let response = send(&app, Method::DELETE, &path).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "error": "temperature not found" }));
}

#[tokio::test]
async fn test_capture_with_unavailable_hardware() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path(), WebConfig::default());

    let response = send(&app, Method::POST, "/thermometers/broken/temperatures/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({ "error": "internal server error" }));

    let response = send(&app, Method::GET, "/thermometers/broken/temperatures/").await;
    assert_eq!(body_json(response).await, json!({ "temperatures": [] }));
}

#[tokio::test]
async fn test_generic_errors() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path(), WebConfig::default());

    let response = send(&app, Method::GET, "/no/such/route").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "error": "resource not found" }));

    for (method, uri) in [
        (Method::PUT, "/thermometers/"),
        (Method::DELETE, "/thermometers/w1"),
        (Method::PATCH, "/thermometers/w1/temperatures/"),
        (Method::POST, "/thermometers/w1/temperatures/0123456789abcdef0123456789abcdef"),
    ] {
        let response = send(&app, method.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
        assert_eq!(body_json(response).await, json!({ "error": "method not supported" }));
    }
}

#[tokio::test]
async fn test_undecodable_path_segment_is_json_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path(), WebConfig::default());

    for (method, uri) in [
        (Method::GET, "/thermometers/%FF"),
        (Method::GET, "/thermometers/%FF/temperatures/"),
        (Method::POST, "/thermometers/%FF/temperatures/"),
        (Method::GET, "/thermometers/w1/temperatures/%FF"),
        (Method::DELETE, "/thermometers/w1/temperatures/%FF"),
    ] {
        let response = send(&app, method.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body_json(response).await, json!({ "error": "resource not found" }));
    }
}

#[tokio::test]
async fn test_public_url_overrides_host_header() {
    let dir = tempfile::tempdir().unwrap();
    let web_config = WebConfig::default().with_public_url(Some("https://thermo.example.org/".into()));
    let app = build_app(dir.path(), web_config);

    let response = send(&app, Method::GET, "/thermometers/w1").await;
    assert_eq!(
        body_json(response).await["self_url"],
        "https://thermo.example.org/thermometers/w1"
    );
}
