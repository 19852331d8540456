//! User profile ports and application service.
//!
//! Owns the business rules layered on top of persistence: payload key
//! validation, uniqueness pre-checks, and the not-found policy per lookup.
//! Credential columns never cross this surface except through
//! [`UserRecord`], the full-row shape reserved for the authentication
//! caller.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};

use gigbook_core::{AppError, AppResult};
use gigbook_domain::{
    AuthProvider, BusynessFilter, NewUser, PUBLIC_ATTRIBUTES, ProfileField, UniqueAttribute,
    UserId, WorkdayEntry,
};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Full user row returned by credential-bearing lookups.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Password salt.
    pub salt: String,
    /// Password hash.
    pub hash: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Date of birth.
    pub dob: Option<NaiveDate>,
    /// Home city.
    pub city: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Gender.
    pub gender: Option<String>,
    /// Account type.
    pub user_type: String,
    /// Primary musical instrument.
    pub musical_instrument: Option<String>,
    /// Years of commercial experience.
    pub year_commercial_exp: Option<i32>,
    /// Avatar image URL.
    pub image_url: Option<String>,
    /// Linked Google account id.
    pub google_id: Option<String>,
    /// Linked Facebook account id.
    pub facebook_id: Option<String>,
}

impl UserRecord {
    /// Returns the stored id for the given provider, if any.
    #[must_use]
    pub fn provider_id(&self, provider: AuthProvider) -> Option<&str> {
        match provider {
            AuthProvider::Google => self.google_id.as_deref(),
            AuthProvider::Facebook => self.facebook_id.as_deref(),
        }
    }
}

/// Projection of a user row onto the id plus a subset of public fields.
///
/// Attribute order follows the whitelist order the projection was built
/// from. Credential columns are not representable here.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    /// Unique user identifier.
    pub id: UserId,
    /// Projected public attributes in whitelist order.
    pub attributes: Vec<(ProfileField, Value)>,
}

impl UserProfile {
    /// Returns the projected value for a field, if it was selected.
    #[must_use]
    pub fn attribute(&self, field: ProfileField) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, value)| value)
    }

    /// Flattens the projection into a JSON object keyed by external names,
    /// with the id included.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_owned(), Value::String(self.id.to_string()));
        for (field, value) in self.attributes {
            map.insert(field.as_str().to_owned(), value);
        }
        map
    }
}

/// Minimal identity row for provider-linked lookups: the user id plus the
/// requested provider's id column, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    /// Unique user identifier.
    pub id: UserId,
    /// Provider the lookup was keyed on.
    pub provider: AuthProvider,
    /// The stored id for that provider, if linked.
    pub provider_id: Option<String>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns true iff no row has the given attribute equal to `value`.
    ///
    /// Callers own the race between this check and a later insert; the
    /// store's unique indexes are the backstop.
    async fn ensure_unique(&self, attribute: UniqueAttribute, value: &str) -> AppResult<bool>;

    /// Inserts one user row and returns the generated id.
    async fn create_profile(&self, user: &NewUser) -> AppResult<UserId>;

    /// Returns a single row projected onto `id` plus the given fields, or
    /// `None` when no row matches.
    async fn get_profile(
        &self,
        user_id: UserId,
        fields: &[ProfileField],
    ) -> AppResult<Option<UserProfile>>;

    /// Finds a full user row by exact email match.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds the user matching the provider-specific id or the email, each
    /// branch active only when its argument is present. Projects only the
    /// id and the provider's id column.
    async fn find_identity(
        &self,
        provider: AuthProvider,
        provider_id: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<Option<ProviderIdentity>>;

    /// Applies typed field changes to the row with the given id.
    async fn update_profile(
        &self,
        user_id: UserId,
        changes: &[(ProfileField, Value)],
    ) -> AppResult<()>;

    /// Stores the provider-linked id for the given user.
    async fn update_provider_id(
        &self,
        user_id: UserId,
        provider: AuthProvider,
        provider_id: &str,
    ) -> AppResult<()>;

    /// Joins users to their work days and returns each user matching the
    /// filter at most once, projected onto the public whitelist.
    async fn find_users_by_busyness(
        &self,
        filter: &BusynessFilter,
    ) -> AppResult<Vec<UserProfile>>;
}

/// Repository port for work-day persistence.
#[async_trait]
pub trait WorkdayRepository: Send + Sync {
    /// Marks one working day for the user, overwriting the day-off flag if
    /// the date was already marked.
    async fn mark_working_day(&self, user_id: UserId, entry: &WorkdayEntry) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service over user and work-day persistence.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    workday_repository: Arc<dyn WorkdayRepository>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        workday_repository: Arc<dyn WorkdayRepository>,
    ) -> Self {
        Self {
            user_repository,
            workday_repository,
        }
    }

    /// Returns the full public profile for a user, or `None` when the id
    /// does not exist.
    pub async fn get_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        self.user_repository
            .get_profile(user_id, &PUBLIC_ATTRIBUTES)
            .await
    }

    /// Returns the full user row for an email address.
    ///
    /// Unlike the other lookups this fails loudly: absence is a business
    /// error carrying the email that was searched for.
    pub async fn find_by_email(&self, email: &str) -> AppResult<UserRecord> {
        self.user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("unable to find user by email: {email}")))
    }

    /// Finds the user matching a provider id or an email address.
    ///
    /// An empty email is treated as absent. When neither key is usable the
    /// lookup short-circuits to `None` without touching the store.
    pub async fn ids_by_provider_id_or_email(
        &self,
        provider_id: Option<&str>,
        email: Option<&str>,
        provider: AuthProvider,
    ) -> AppResult<Option<ProviderIdentity>> {
        let email = email.filter(|value| !value.is_empty());

        if provider_id.is_none() && email.is_none() {
            return Ok(None);
        }

        self.user_repository
            .find_identity(provider, provider_id, email)
            .await
    }

    /// Returns true iff no stored user has the given email.
    pub async fn ensure_unique_user(&self, email: &str) -> AppResult<bool> {
        self.user_repository
            .ensure_unique(UniqueAttribute::Email, email)
            .await
    }

    /// Creates a user row and returns the generated id.
    pub async fn create_profile(&self, user: &NewUser) -> AppResult<UserId> {
        self.user_repository.create_profile(user).await
    }

    /// Marks one working day for the user.
    pub async fn mark_working_day(&self, user_id: UserId, entry: &WorkdayEntry) -> AppResult<()> {
        self.workday_repository
            .mark_working_day(user_id, entry)
            .await
    }

    /// Finds users by work-day availability.
    pub async fn find_users_by_busyness(
        &self,
        filter: &BusynessFilter,
    ) -> AppResult<Vec<UserProfile>> {
        self.user_repository.find_users_by_busyness(filter).await
    }

    /// Validates and applies a string-keyed profile update payload.
    ///
    /// Every key must name a public profile field, otherwise the whole
    /// payload is rejected before any store call. The validated payload is
    /// returned unchanged.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        data: &Map<String, Value>,
    ) -> AppResult<Map<String, Value>> {
        let mut changes = Vec::with_capacity(data.len());
        for (key, value) in data {
            let field = ProfileField::parse(key)?;
            changes.push((field, value.clone()));
        }

        self.user_repository
            .update_profile(user_id, &changes)
            .await?;

        Ok(data.clone())
    }

    /// Stores the provider-linked id for the given user.
    pub async fn update_provider_id(
        &self,
        user_id: UserId,
        provider: AuthProvider,
        provider_id: &str,
    ) -> AppResult<()> {
        self.user_repository
            .update_provider_id(user_id, provider, provider_id)
            .await
    }
}
