use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::info;

use crate::error::ServiceError;
use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;
use crate::steam::service::AccountService;

static OK_MSG: &'static str = "ok";

type TokenPath = Result<(String, String), ServiceError>;

/// The router never matches an empty segment, so the two partial routes
/// give an empty `appID` or memo its own 400 instead of a bare 404.
pub fn router<S: AccountService + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/token/{app_id}/{memo}", get(handle_token_request::<S>))
        .route("/token/{app_id}/", get(handle_missing_memo::<S>))
        .route("/token//{memo}", get(handle_missing_app_id::<S>))
}

/// `GET /token/{app_id}/{memo}`: plain text login token, JSON `{"error"}` otherwise.
async fn handle_token_request<S: AccountService + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<(String, String)>, PathRejection>,
    headers: HeaderMap,
) -> Response {
    let path = path.map(|Path(params)| params).map_err(bad_path);
    respond(&state, &headers, path).await
}

async fn handle_missing_memo<S: AccountService + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Response {
    let path = path.map(|Path(app_id)| (app_id, String::new())).map_err(bad_path);
    respond(&state, &headers, path).await
}

async fn handle_missing_app_id<S: AccountService + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Response {
    let path = path.map(|Path(memo)| (String::new(), memo)).map_err(bad_path);
    respond(&state, &headers, path).await
}

fn bad_path(rejection: PathRejection) -> ServiceError {
    ServiceError::InvalidInput(format!("bad path: {}", rejection.body_text()))
}

async fn respond<S: AccountService + 'static>(state: &AppState<S>, headers: &HeaderMap, path: TokenPath) -> Response {
    let metrics = get_metrics().await;

    match pull_token(state, headers, path).await {
        Ok(token) => {
            metrics.token_requests.with_label_values(&[OK_MSG]).inc();
            (StatusCode::OK, [(CONTENT_TYPE, "text/plain")], token).into_response()
        }
        Err(err) => {
            metrics.token_requests.with_label_values(&[err.outcome()]).inc();
            err.into_response()
        }
    }
}

async fn pull_token<S: AccountService + 'static>(
    state: &AppState<S>,
    headers: &HeaderMap,
    path: TokenPath,
) -> Result<String, ServiceError> {
    authorize(&state.auth_token, headers)?;

    let (app_id, memo) = path?;
    let app_id = parse_app_id(&app_id)?;
    if memo.is_empty() {
        return Err(ServiceError::InvalidInput("Missing memo".to_owned()));
    }

    let token = state.resolver.resolve(app_id, &memo).await?;
    info!("issued login token for appid {} with memo '{}'", app_id, memo);
    Ok(token)
}

/// Exact `Bearer <token>` match; an empty configured token disables the check.
fn authorize(auth_token: &str, headers: &HeaderMap) -> Result<(), ServiceError> {
    if auth_token.is_empty() {
        return Ok(());
    }
    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match provided {
        Some(token) if token == auth_token => Ok(()),
        _ => Err(ServiceError::Unauthorized("Invalid authorization header".to_owned())),
    }
}

fn parse_app_id(raw: &str) -> Result<u32, ServiceError> {
    if raw.is_empty() {
        return Err(ServiceError::InvalidInput("Missing appID".to_owned()));
    }
    raw.parse::<u32>()
        .map_err(|e| ServiceError::InvalidInput(format!("bad appID: {}", e)))
}
