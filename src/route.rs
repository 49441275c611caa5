//! Route definitions
//!
//! Maps every HTTP verb and path onto its handler and injects the shared
//! [`AppState`].

use axum::routing::{get, post};
use axum::Router;

use crate::database::AppState;
use crate::handler::{
    add_exercise, create_short_url, create_user, current_timestamp, exercise_log, hello,
    list_users, redirect_short_url, timestamp, whoami,
};

/// Creates the application router
///
/// # Route Definitions
///
/// - `POST /api/shorturl` - Creates a short URL
/// - `GET /api/shorturl/{token}` - Redirects to the original URL
/// - `GET /api/whoami` - Echoes request metadata
/// - `GET|POST /api/users` - Lists or creates exercise tracker users
/// - `POST /api/users/{id}/exercises` - Logs an exercise
/// - `GET /api/users/{id}/logs` - Queries a user's exercise log
/// - `GET /api/hello` - Greeting
/// - `GET /api` and `GET /api/{date}` - Timestamp microservice
///
/// Static segments take priority over `{date}`, so `/api/hello` never reaches
/// the timestamp handler.
///
/// # Example Usage
///
/// ```no_run
/// # use microservices::database::{init_db, AppState};
/// # use microservices::route::create_app;
/// # let db = init_db("data.db").unwrap();
/// let app = create_app(AppState::new(db));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // URL shortener
        .route("/api/shorturl", post(create_short_url))
        .route("/api/shorturl/{token}", get(redirect_short_url))
        // Request header parser
        .route("/api/whoami", get(whoami))
        // Exercise tracker
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}/exercises", post(add_exercise))
        .route("/api/users/{id}/logs", get(exercise_log))
        // Timestamp microservice
        .route("/api/hello", get(hello))
        .route("/api", get(current_timestamp))
        .route("/api/", get(current_timestamp))
        .route("/api/{date}", get(timestamp))
        .with_state(state)
}
