#![warn(missing_docs)]
// Note: this overwrites the link in the README to point to the rust docs of the pengajuan-core crate.
//! [pengajuan_core]: https://docs.rs/pengajuan_core/latest/pengajuan_core/index.html
#![doc = include_str!("../README.md")]

mod requirement_routes;
mod submission_routes;

use aide::{
    axum::{ApiRouter, routing::get},
    openapi::OpenApi,
};
use axum::{
    Extension, Json,
    extract::{DefaultBodyLimit, State},
    http::header,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use pengajuan_core::{
    models::{Envelope, Role, Session},
    ports::Application,
};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors;

mod openapi;
use openapi::{api_docs, docs_routes};

pub mod config;
use config::AxumConfig;

mod error;
pub use error::ApiError;

/// Response for the health check endpoint
#[derive(Serialize, JsonSchema)]
#[schemars(inline)]
struct HealthResponse {
    status: String,
}

/// Simple health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Resolve the session behind a request.
///
/// A missing header is as unauthorized as a bad token. Office operators
/// must belong to an office; a `user` token without one cannot own or see
/// anything and is refused outright.
pub(crate) async fn session<T: ApiApplication>(
    app: &T,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Session, ApiError> {
    let Some(TypedHeader(auth)) = auth else {
        return Err(ApiError::unauthorized());
    };
    let session = app.session(&auth).await.ok_or_else(ApiError::unauthorized)?;
    if session.role == Role::User && session.office_id.is_none() {
        return Err(ApiError::forbidden("user session has no office"));
    }
    Ok(session)
}

/// The profile of the current session.
///
/// # Returns
///
/// - `200 OK`: The session
/// - `401 Unauthorized`: Missing or invalid token
async fn get_session<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<Envelope<Session>>, ApiError> {
    Ok(Json(Envelope::ok(session(&app, auth).await?)))
}

fn api_router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route("/health", get(health_check))
        .api_route_with("/session", get(get_session::<T>), |route| {
            route.security_requirement("jwt").tag("session")
        })
        .nest("/submission", submission_routes::router())
        .nest("/job-type", requirement_routes::router())
        .nest_api_service("/docs", docs_routes())
}

/// Construct a full API router with the given state and config
pub fn router<T: ApiApplication>(state: T, config: AxumConfig) -> axum::Router {
    let mut api = OpenApi::default();

    // Browsers load the portal from another origin; credentials travel in
    // the Authorization header, never in cookies.
    let policy = cors::CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    api_router::<T>()
        .finish_api_with(&mut api, api_docs)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(Extension(Arc::new(api))) // Arc is very important here or you will face massive memory and performance issues
        .layer(Extension(Arc::new(config)))
        .layer(policy)
        .with_state(state)
}

/// The OpenAPI document of the API, without starting a server.
pub fn schema<T: ApiApplication>() -> OpenApi {
    let mut api = OpenApi::default();
    let _ = api_router::<T>().finish_api_with(&mut api, api_docs);
    api
}

/// Starts the HTTP server with the provided configuration
pub async fn start_server<T: ApiApplication>(
    config: AxumConfig,
    app: T,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    tracing::info!("Listening for requests on {}", listener.local_addr()?);

    let service = router(app, config);
    axum::serve(listener, service).await
}

/// Axum imposes all sorts of constraints on what can pass for state. This
/// trait, coupled with a blanket implementation, specifies it all upfront and
/// in one place. If a function takes a generic `T: ApiApplication`, then
/// everything one might reasonably want to do should work.
pub trait ApiApplication:
    Clone
    + Send
    + Sync
    + 'static
    + Application<
        Context = Authorization<Bearer>,
        Repository: Clone + Send + Sync + 'static,
    >
{
}

// this is the blanket implementation
impl<T: Clone + Send + Sync + 'static> ApiApplication for T where
    T: Application<
            Context = Authorization<Bearer>,
            Repository: Clone + Send + Sync + 'static,
        >
{
}
