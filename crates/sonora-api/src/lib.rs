//! sonora-api
//!
//! JSON HTTP API over patient charts. Runs on AWS Lambda, or on a plain
//! listener when `SONORA_LISTEN_ADDR` is set.

use axum::middleware as axum_mw;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the router with every route, the request log and CORS.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/patients",
            get(routes::patients::list_patients).post(routes::patients::create_patient),
        )
        .route("/patients/recent", get(routes::patients::recent_patients))
        .route(
            "/patients/{id}",
            get(routes::patients::get_patient_chart)
                .put(routes::patients::update_patient)
                .delete(routes::patients::delete_patient),
        )
        .route(
            "/patients/{id}/anamneses",
            get(routes::anamneses::list_anamneses).post(routes::anamneses::create_anamnesis),
        )
        .route(
            "/patients/{id}/audiograms",
            get(routes::audiograms::list_audiograms).post(routes::audiograms::create_audiogram),
        )
        .route(
            "/patients/{id}/audiograms/{audiogram_id}",
            get(routes::audiograms::get_audiogram),
        )
        .route(
            "/patients/{id}/audiograms/{audiogram_id}/pta/{ear}",
            get(routes::audiograms::get_pta),
        )
        .route(
            "/audiograms/threshold-layout",
            get(routes::audiograms::threshold_layout),
        )
        .route(
            "/patients/{id}/speech",
            get(routes::speech::list_speech_tests).post(routes::speech::create_speech_test),
        )
        .route(
            "/patients/{id}/ldl",
            get(routes::ldl::list_ldl_tests).post(routes::ldl::create_ldl_test),
        )
        .layer(axum_mw::from_fn(middleware::request_log::request_log))
        .layer(cors)
        .with_state(state)
}
