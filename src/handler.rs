//! HTTP request handlers
//!
//! Each handler validates its input, calls exactly one store operation and
//! shapes the result. Store errors are returned as [`AppError`], which renders
//! the status code and `{"error": ...}` body.

use axum::{
    extract::{ConnectInfo, Path, Query, Request, State},
    http::{
        header::{AsHeaderName, ACCEPT_LANGUAGE, LOCATION, USER_AGENT},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::net::SocketAddr;

use crate::database::AppState;
use crate::error::AppError;
use crate::extract::Payload;
use crate::model::{
    CreateUserRequest, ExerciseRequest, ExerciseResponse, GreetingResponse, LogQuery,
    LogResponse, ShortenRequest, ShortenResponse, UserResponse, WhoamiResponse,
};
use crate::timestamp::{parse_timestamp, TimestampResponse};
use crate::validation::{parse_duration, parse_optional_date};

/// Creates a new short URL
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/very/long/url" }
/// ```
///
/// # Response
///
/// - **200 OK** - `{"original_url": "...", "short_url": "<token>"}`
/// - **400 Bad Request** - `{"error": "invalid url"}`
pub async fn create_short_url(
    State(state): State<AppState>,
    Payload(payload): Payload<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    let mapping = state.links.create(&payload.url)?;
    Ok(Json(ShortenResponse::from(mapping)))
}

/// Redirects a token to its original URL
///
/// # Response
///
/// - **302 Found** - `Location` set to the stored URL
/// - **404 Not Found** - unknown token
pub async fn redirect_short_url(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let original_url = state.links.resolve(&token)?;
    let location = HeaderValue::from_str(&original_url)
        .map_err(|err| AppError::StoreFailure(format!("stored url is not a valid header: {err}")))?;

    Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
}

/// Echoes the caller's address, preferred language and user agent
///
/// The address is the first `X-Forwarded-For` hop when a proxy set one,
/// otherwise the peer socket address.
pub async fn whoami(request: Request) -> Json<WhoamiResponse> {
    let headers = request.headers();

    let forwarded = header_text(headers, "x-forwarded-for")
        .and_then(|value| value.split(',').next().map(|hop| hop.trim().to_string()))
        .filter(|hop| !hop.is_empty());
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    Json(WhoamiResponse {
        ipaddress: forwarded.or(peer),
        language: header_text(headers, ACCEPT_LANGUAGE),
        software: header_text(headers, USER_AGENT),
    })
}

fn header_text<K: AsHeaderName>(headers: &HeaderMap, name: K) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub async fn create_user(
    State(state): State<AppState>,
    Payload(payload): Payload<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let subject = state.logs.create_subject(&payload.username)?;
    Ok(Json(UserResponse::from(subject)))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let subjects = state.logs.list_subjects()?;
    Ok(Json(subjects.into_iter().map(UserResponse::from).collect()))
}

/// Logs an exercise for a user
///
/// # Request Body
///
/// ```json
/// { "description": "run", "duration": 30, "date": "2024-01-01" }
/// ```
///
/// # Response
///
/// - **200 OK** - `{"username", "description", "duration", "date", "_id"}`
/// - **400 Bad Request** - duration not a non-negative integer, bad date
/// - **404 Not Found** - unknown user id
pub async fn add_exercise(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    Payload(payload): Payload<ExerciseRequest>,
) -> Result<Json<ExerciseResponse>, AppError> {
    let duration = parse_duration(&payload.duration)?;
    let date = parse_optional_date("date", payload.date.as_deref())?;

    let (subject, entry) = state
        .logs
        .append_log(&user_id, &payload.description, duration, date)?;

    Ok(Json(ExerciseResponse::new(subject, entry)))
}

/// Returns a user's exercise log
///
/// # Query Parameters
///
/// - `from`, `to` (optional) - inclusive `YYYY-MM-DD` bounds
/// - `limit` (optional) - maximum number of entries
///
/// # Example Request
///
/// `GET /api/users/{id}/logs?from=2020-01-01&to=2020-12-31&limit=2`
pub async fn exercise_log(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogResponse>, AppError> {
    let report = state.logs.query_logs(&user_id, &query)?;
    Ok(Json(LogResponse::from(report)))
}

pub async fn hello() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        greeting: "hello API",
    })
}

/// `GET /api` - the current instant
pub async fn current_timestamp() -> Json<TimestampResponse> {
    Json(TimestampResponse::from(Utc::now()))
}

/// `GET /api/{date}` - an ISO date or epoch milliseconds
pub async fn timestamp(Path(date): Path<String>) -> Result<Json<TimestampResponse>, AppError> {
    let instant = parse_timestamp(Some(&date), Utc::now())?;
    Ok(Json(TimestampResponse::from(instant)))
}
