//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod files;
pub mod health;
pub mod maintenance;
pub mod users;

/// Creates the API router: public routes plus token-protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(files::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // The purge endpoint is called by a trusted scheduler, not end users
    Router::new()
        .merge(health::routes())
        .merge(maintenance::routes())
        .merge(protected_routes)
}
