//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::Row;
use sqlx::postgres::PgRow;

use gigbook_application::{ProviderIdentity, UserProfile, UserRecord, UserRepository};
use gigbook_core::{AppError, AppResult};
use gigbook_domain::{AuthProvider, BusynessFilter, NewUser, ProfileField, UniqueAttribute, UserId};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    salt: String,
    hash: String,
    name: String,
    email: String,
    dob: Option<chrono::NaiveDate>,
    city: Option<String>,
    phone: Option<String>,
    gender: Option<String>,
    user_type: String,
    musical_instrument: Option<String>,
    year_commercial_exp: Option<i32>,
    image_url: Option<String>,
    google_id: Option<String>,
    facebook_id: Option<String>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            salt: row.salt,
            hash: row.hash,
            name: row.name,
            email: row.email,
            dob: row.dob,
            city: row.city,
            phone: row.phone,
            gender: row.gender,
            user_type: row.user_type,
            musical_instrument: row.musical_instrument,
            year_commercial_exp: row.year_commercial_exp,
            image_url: row.image_url,
            google_id: row.google_id,
            facebook_id: row.facebook_id,
        }
    }
}

mod account;
mod busyness;
mod lookup;
mod profile;


#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn ensure_unique(&self, attribute: UniqueAttribute, value: &str) -> AppResult<bool> {
        self.ensure_unique_impl(attribute, value).await
    }

    async fn create_profile(&self, user: &NewUser) -> AppResult<UserId> {
        self.create_profile_impl(user).await
    }

    async fn get_profile(
        &self,
        user_id: UserId,
        fields: &[ProfileField],
    ) -> AppResult<Option<UserProfile>> {
        self.get_profile_impl(user_id, fields).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn find_identity(
        &self,
        provider: AuthProvider,
        provider_id: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<Option<ProviderIdentity>> {
        self.find_identity_impl(provider, provider_id, email).await
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        changes: &[(ProfileField, Value)],
    ) -> AppResult<()> {
        self.update_profile_impl(user_id, changes).await
    }

    async fn update_provider_id(
        &self,
        user_id: UserId,
        provider: AuthProvider,
        provider_id: &str,
    ) -> AppResult<()> {
        self.update_provider_id_impl(user_id, provider, provider_id)
            .await
    }

    async fn find_users_by_busyness(
        &self,
        filter: &BusynessFilter,
    ) -> AppResult<Vec<UserProfile>> {
        self.find_users_by_busyness_impl(filter).await
    }
}

/// Reads a projected profile out of a dynamically-selected row.
fn profile_from_row(row: &PgRow, fields: &[ProfileField]) -> AppResult<UserProfile> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|error| AppError::Internal(format!("failed to read user id: {error}")))?;

    let mut attributes = Vec::with_capacity(fields.len());
    for field in fields {
        let value = match field {
            ProfileField::Dob => row
                .try_get::<Option<chrono::NaiveDate>, _>(field.column())
                .map_err(|error| column_read_error(*field, error))?
                .map_or(Value::Null, |date| Value::String(date.to_string())),
            ProfileField::YearCommercialExp => row
                .try_get::<Option<i32>, _>(field.column())
                .map_err(|error| column_read_error(*field, error))?
                .map_or(Value::Null, Value::from),
            _ => row
                .try_get::<Option<String>, _>(field.column())
                .map_err(|error| column_read_error(*field, error))?
                .map_or(Value::Null, Value::String),
        };
        attributes.push((*field, value));
    }

    Ok(UserProfile {
        id: UserId::from_uuid(id),
        attributes,
    })
}

fn column_read_error(field: ProfileField, error: sqlx::Error) -> AppError {
    AppError::Internal(format!("failed to read column '{field}': {error}"))
}

fn unique_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(
            "a user with this email or provider id already exists".to_owned(),
        );
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
