use axum::Router;

pub mod users;

pub use users::UserStore;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
pub fn routes(store: UserStore) -> Router {
    Router::new().nest("/users", users::router(store))
}
