use axum::Router;
use domain_users::{handlers, InMemoryUserRepository, PgUserRepository, UserService};
use sea_orm::DatabaseConnection;

/// Storage backing for user records.
pub enum UserStore {
    Postgres(DatabaseConnection),
    InMemory,
}

pub fn router(store: UserStore) -> Router {
    match store {
        UserStore::Postgres(db) => {
            let repository = PgUserRepository::new(db);
            handlers::router(UserService::new(repository))
        }
        UserStore::InMemory => {
            let repository = InMemoryUserRepository::new();
            handlers::router(UserService::new(repository))
        }
    }
}
