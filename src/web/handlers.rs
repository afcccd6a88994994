//! HTTP handlers for the thermometer resource API.

use crate::error::Result;
use crate::web::extract::ResourcePath;
use crate::web::response::error_response;
use crate::web::state::{temperature_url, temperatures_url, thermometer_url, AppState};
use axum::{
    extract::State,
    http::{header::LOCATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// List links to all known thermometers.
pub async fn list_thermometers(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let base = state.base_url(&headers);
    let links: Vec<String> = state
        .registry
        .ids()
        .map(|id| thermometer_url(&base, id))
        .collect();
    Json(json!({ "thermometer": links }))
}

/// Describe one thermometer.
pub async fn get_thermometer(
    State(state): State<AppState>,
    ResourcePath(thermid): ResourcePath<String>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let service = state.registry.get(&thermid)?;
    let base = state.base_url(&headers);
    Ok(Json(json!({
        "self_url": thermometer_url(&base, service.id()),
        "temperatures_url": temperatures_url(&base, service.id()),
        "emulated": service.thermometer().emulated,
    })))
}

/// List links to a thermometer's captures.
pub async fn list_temperatures(
    State(state): State<AppState>,
    ResourcePath(thermid): ResourcePath<String>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let service = state.registry.get(&thermid)?;
    let base = state.base_url(&headers);
    let links: Vec<String> = service
        .list_captures()
        .await?
        .iter()
        .map(|capture| temperature_url(&base, service.id(), capture))
        .collect();
    Ok(Json(json!({ "temperatures": links })))
}

/// Return one capture.
pub async fn get_temperature(
    State(state): State<AppState>,
    ResourcePath((thermid, capture)): ResourcePath<(String, String)>,
) -> Result<Json<Value>> {
    let service = state.registry.get(&thermid)?;
    let capture = service.retrieve(&capture).await?;
    Ok(Json(json!({ "temperature": capture.payload })))
}

/// Measure now and store the reading as a new capture.
pub async fn capture_temperature(
    State(state): State<AppState>,
    ResourcePath(thermid): ResourcePath<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let service = state.registry.get(&thermid)?;
    let capture = service.capture().await?;
    let location = temperature_url(&state.base_url(&headers), service.id(), &capture);
    Ok((StatusCode::CREATED, [(LOCATION, location)]).into_response())
}

/// Remove one capture.
pub async fn delete_temperature(
    State(state): State<AppState>,
    ResourcePath((thermid, capture)): ResourcePath<(String, String)>,
) -> Result<Json<Value>> {
    let service = state.registry.get(&thermid)?;
    service.delete(&capture).await?;
    Ok(Json(json!({})))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "resource not found")
}

/// Fallback for unsupported methods on known routes.
pub async fn method_not_supported() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "method not supported")
}
