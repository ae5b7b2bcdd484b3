use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Moderator,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
            Role::Moderator => write!(f, "moderator"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// User entity - a persisted record.
///
/// `id` and `created_at` are assigned by storage on insert and never change
/// afterwards.
///
/// The password is stored exactly as submitted - no hashing. A known defect,
/// documented in DESIGN.md rather than fixed here. `skip_serializing` keeps
/// the field out of any serialized form; API responses go through
/// [`UserResponse`], which does not carry it at all.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique identifier, assigned by storage
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address (unique across users)
    pub email: String,
    /// Plaintext password (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password: String,
    /// Assigned role
    pub role: Role,
    /// Account active flag
    pub active: bool,
    /// Creation timestamp, assigned by storage
    pub created_at: DateTime<Utc>,
}

/// An unsaved user record. No id or creation timestamp yet - storage assigns
/// both on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub active: bool,
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub role: Role,
}

/// DTO for updating an existing user.
///
/// Updates are a full replace: every mutable field must be present and is
/// overwritten, including `active`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub role: Role,
    pub active: bool,
}

/// User response DTO (never carries the password)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CreateUser> for NewUser {
    /// New accounts start active.
    fn from(input: CreateUser) -> Self {
        Self {
            name: input.name,
            email: input.email,
            password: input.password,
            role: input.role,
            active: true,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
        }
    }
}

impl User {
    /// Apply a full-replace update. `id` and `created_at` are untouched.
    pub fn apply_update(&mut self, update: UpdateUser) {
        self.name = update.name;
        self.email = update.email;
        self.password = update.password;
        self.role = update.role;
        self.active = update.active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            name: "Jamie Doe".to_string(),
            email: "jamie@example.com".to_string(),
            password: "hunter22".to_string(),
            role: Role::User,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_user_starts_active() {
        let input = CreateUser {
            name: "Jamie Doe".to_string(),
            email: "jamie@example.com".to_string(),
            password: "hunter22".to_string(),
            role: Role::Admin,
        };

        let new_user = NewUser::from(input);
        assert!(new_user.active);
        assert_eq!(new_user.role, Role::Admin);
        assert_eq!(new_user.email, "jamie@example.com");
    }

    #[test]
    fn test_response_never_contains_password() {
        let response = UserResponse::from(sample_user());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["id"], 7);
        assert_eq!(json["email"], "jamie@example.com");
    }

    #[test]
    fn test_entity_serialization_skips_password() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_apply_update_replaces_all_mutable_fields() {
        let mut user = sample_user();
        let created_at = user.created_at;

        user.apply_update(UpdateUser {
            name: "Jamie Updated".to_string(),
            email: "updated@example.com".to_string(),
            password: "changed-secret".to_string(),
            role: Role::Moderator,
            active: false,
        });

        assert_eq!(user.id, 7);
        assert_eq!(user.created_at, created_at);
        assert_eq!(user.name, "Jamie Updated");
        assert_eq!(user.email, "updated@example.com");
        assert_eq!(user.password, "changed-secret");
        assert_eq!(user.role, Role::Moderator);
        assert!(!user.active);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Admin, Role::Moderator] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_create_user_validation_rules() {
        use validator::Validate;

        let valid = CreateUser {
            name: "Jamie Doe".to_string(),
            email: "jamie@example.com".to_string(),
            password: "secret1".to_string(),
            role: Role::User,
        };
        assert!(valid.validate().is_ok());

        let mut short_name = valid.clone();
        short_name.name = "ab".to_string();
        assert!(short_name.validate().is_err());

        let mut bad_email = valid.clone();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_password = valid;
        short_password.password = "12345".to_string();
        assert!(short_password.validate().is_err());
    }
}
