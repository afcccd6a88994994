//! Web application router and middleware setup.

use crate::capture::ThermometerRegistry;
use crate::web::config::WebConfig;
use crate::web::handlers;
use crate::web::response::handle_panic;
use crate::web::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the axum application with all routes and middleware.
pub fn create_app(config: &WebConfig, registry: Arc<ThermometerRegistry>) -> Router {
    let state = AppState::new(registry, config.public_url.clone());

    let mut app = Router::new()
        .route(
            "/thermometers/",
            get(handlers::list_thermometers).fallback(handlers::method_not_supported),
        )
        .route(
            "/thermometers/:thermid",
            get(handlers::get_thermometer).fallback(handlers::method_not_supported),
        )
        .route(
            "/thermometers/:thermid/temperatures/",
            get(handlers::list_temperatures)
                .post(handlers::capture_temperature)
                .fallback(handlers::method_not_supported),
        )
        .route(
            "/thermometers/:thermid/temperatures/:capture",
            get(handlers::get_temperature)
                .delete(handlers::delete_temperature)
                .fallback(handlers::method_not_supported),
        )
        .fallback(handlers::not_found)
        .with_state(state);

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}
