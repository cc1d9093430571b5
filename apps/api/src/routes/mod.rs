pub mod health;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::profile::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/createcandidateprofile",
            post(handlers::handle_create),
        )
        .route(
            "/api/v1/updatecandidateprofile",
            put(handlers::handle_update),
        )
        .route(
            "/api/v1/deletecandidateprofile/:request_id/:id",
            delete(handlers::handle_delete),
        )
        .route(
            "/api/v1/undeletecandidateprofile/:request_id/:id",
            delete(handlers::handle_undelete),
        )
        // The trailing searchString and id segments are optional, which axum
        // expresses as separate routes over the same handler family.
        .route(
            "/api/v1/candidateprofilelookup/:request_id/:start/:limit/:is_admin",
            get(handlers::handle_lookup),
        )
        .route(
            "/api/v1/candidateprofilelookup/:request_id/:start/:limit/:is_admin/:search_string",
            get(handlers::handle_lookup_search),
        )
        .route(
            "/api/v1/candidateprofilelookup/:request_id/:start/:limit/:is_admin/:search_string/:id",
            get(handlers::handle_lookup_search_id),
        )
        .with_state(state)
}
