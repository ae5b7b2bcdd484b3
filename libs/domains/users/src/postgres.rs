use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User};
use crate::repository::UserRepository;

/// PostgreSQL implementation of UserRepository.
///
/// Ids come from the table's BIGSERIAL sequence and `created_at` from its
/// `now()` default, so storage is the single writer of both. The unique
/// index on email turns duplicate inserts into conflict errors, closing the
/// check-then-insert window the service layer leaves open.
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Helper struct for deserializing user rows from the database
#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    role: String,
    active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Helper struct for EXISTS queries
#[derive(Debug, FromQueryResult)]
struct PresenceRow {
    present: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password: row.password,
            role: row.role.parse().unwrap_or_default(),
            active: row.active,
            created_at: row.created_at,
        }
    }
}

fn map_write_err(email: &str, e: sea_orm::DbErr) -> UserError {
    let err_str = e.to_string();
    if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
        UserError::DuplicateEmail(email.to_string())
    } else {
        UserError::Internal(format!("Database error: {}", e))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let sql = r#"
            INSERT INTO users (name, email, password, role, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.name.clone().into(),
                user.email.clone().into(),
                user.password.clone().into(),
                user.role.to_string().into(),
                user.active.into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| map_write_err(&user.email, e))?
            .ok_or_else(|| UserError::Internal("Failed to create user".to_string()))?;

        tracing::info!(user_id = row.id, "Created user");
        Ok(row.into())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let sql = r#"
            UPDATE users
            SET name = $1, email = $2, password = $3, role = $4, active = $5
            WHERE id = $6
            RETURNING *
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.name.clone().into(),
                user.email.clone().into(),
                user.password.clone().into(),
                user.role.to_string().into(),
                user.active.into(),
                user.id.into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| map_write_err(&user.email, e))?
            .ok_or(UserError::NotFound(user.id))?;

        tracing::info!(user_id = row.id, "Updated user");
        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let sql = "SELECT * FROM users WHERE id = $1";

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        // id order = insertion order; ids come from the table's sequence.
        let sql = "SELECT * FROM users ORDER BY id";

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, []);

        let rows = UserRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let sql = "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) AS present";

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [email.into()]);

        let row = PresenceRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(row.map(|r| r.present).unwrap_or(false))
    }

    async fn exists_by_id(&self, id: i64) -> UserResult<bool> {
        let sql = "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1) AS present";

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let row = PresenceRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(row.map(|r| r.present).unwrap_or(false))
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<bool> {
        let sql = "DELETE FROM users WHERE id = $1";

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let result = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        if result.rows_affected() > 0 {
            tracing::info!(user_id = id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
