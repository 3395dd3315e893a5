pub mod auth;
pub mod notes;
pub mod tenants;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        // Notes
        .route("/notes", get(notes::list).post(notes::create))
        .route(
            "/notes/{id}",
            get(notes::get).put(notes::update).delete(notes::delete),
        )
        // Tenants
        .route("/tenants/{slug}/upgrade", post(tenants::upgrade))
}
