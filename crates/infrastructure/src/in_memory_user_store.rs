//! In-memory user and work-day store.
//!
//! Implements both repository ports over shared state so service-level
//! behavior can be exercised without a database. Mirrors the PostgreSQL
//! adapter's semantics, including the unique-index backstop on email and
//! provider ids.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::RwLock;

use gigbook_application::{
    ProviderIdentity, UserProfile, UserRecord, UserRepository, WorkdayRepository,
};
use gigbook_core::{AppError, AppResult};
use gigbook_domain::{
    AuthProvider, BusynessFilter, NewUser, PUBLIC_ATTRIBUTES, ProfileField, UniqueAttribute,
    UserId, WorkdayEntry,
};

use crate::field_values::{attribute_value, date_from_value, int_from_value, string_from_value};

/// In-memory implementation of the user and work-day repository ports.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
    workdays: RwLock<HashMap<(UserId, NaiveDate), bool>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn attribute_taken(
        users: &HashMap<UserId, UserRecord>,
        attribute: UniqueAttribute,
        value: &str,
    ) -> bool {
        users.values().any(|user| match attribute {
            UniqueAttribute::Email => user.email == value,
            UniqueAttribute::ProviderId(provider) => user.provider_id(provider) == Some(value),
        })
    }

    fn project(user: &UserRecord, fields: &[ProfileField]) -> UserProfile {
        UserProfile {
            id: user.id,
            attributes: fields
                .iter()
                .map(|field| (*field, attribute_value(user, *field)))
                .collect(),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn ensure_unique(&self, attribute: UniqueAttribute, value: &str) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(!Self::attribute_taken(&users, attribute, value))
    }

    async fn create_profile(&self, user: &NewUser) -> AppResult<UserId> {
        let mut users = self.users.write().await;

        if Self::attribute_taken(&users, UniqueAttribute::Email, &user.email) {
            return Err(AppError::Conflict(
                "a user with this email or provider id already exists".to_owned(),
            ));
        }

        let id = UserId::new();
        users.insert(
            id,
            UserRecord {
                id,
                salt: user.salt.clone(),
                hash: user.hash.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                dob: user.dob,
                city: user.city.clone(),
                phone: user.phone.clone(),
                gender: user.gender.clone(),
                user_type: user.user_type.clone(),
                musical_instrument: user.musical_instrument.clone(),
                year_commercial_exp: user.year_commercial_exp,
                image_url: user.image_url.clone(),
                google_id: user.google_id.clone(),
                facebook_id: user.facebook_id.clone(),
            },
        );

        Ok(id)
    }

    async fn get_profile(
        &self,
        user_id: UserId,
        fields: &[ProfileField],
    ) -> AppResult<Option<UserProfile>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).map(|user| Self::project(user, fields)))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_identity(
        &self,
        provider: AuthProvider,
        provider_id: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<Option<ProviderIdentity>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| {
                let provider_match = provider_id
                    .is_some_and(|candidate| user.provider_id(provider) == Some(candidate));
                let email_match = email.is_some_and(|candidate| user.email == candidate);
                provider_match || email_match
            })
            .map(|user| ProviderIdentity {
                id: user.id,
                provider,
                provider_id: user.provider_id(provider).map(str::to_owned),
            }))
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        changes: &[(ProfileField, Value)],
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&user_id) else {
            // Matches the SQL adapter: an UPDATE touching zero rows is not
            // an error.
            return Ok(());
        };

        for (field, value) in changes {
            match field {
                ProfileField::YearCommercialExp => {
                    user.year_commercial_exp = int_from_value(*field, value)?;
                }
                ProfileField::Phone => user.phone = string_from_value(*field, value)?,
                ProfileField::MusicalInstrument => {
                    user.musical_instrument = string_from_value(*field, value)?;
                }
                ProfileField::ImageUrl => user.image_url = string_from_value(*field, value)?,
                ProfileField::Name => {
                    user.name = string_from_value(*field, value)?.unwrap_or_default();
                }
                ProfileField::Dob => user.dob = date_from_value(*field, value)?,
                ProfileField::City => user.city = string_from_value(*field, value)?,
                ProfileField::Email => {
                    user.email = string_from_value(*field, value)?.unwrap_or_default();
                }
                ProfileField::Gender => user.gender = string_from_value(*field, value)?,
                ProfileField::UserType => {
                    user.user_type = string_from_value(*field, value)?.unwrap_or_default();
                }
            }
        }

        Ok(())
    }

    async fn update_provider_id(
        &self,
        user_id: UserId,
        provider: AuthProvider,
        provider_id: &str,
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&user_id) {
            match provider {
                AuthProvider::Google => user.google_id = Some(provider_id.to_owned()),
                AuthProvider::Facebook => user.facebook_id = Some(provider_id.to_owned()),
            }
        }
        Ok(())
    }

    async fn find_users_by_busyness(
        &self,
        filter: &BusynessFilter,
    ) -> AppResult<Vec<UserProfile>> {
        let (from, to) = filter.window(chrono::Utc::now().date_naive());

        let users = self.users.read().await;
        let workdays = self.workdays.read().await;

        let mut matches: Vec<UserProfile> = users
            .values()
            .filter(|user| {
                let instrument_match = filter
                    .musical_instrument
                    .as_deref()
                    .is_none_or(|instrument| {
                        user.musical_instrument.as_deref() == Some(instrument)
                    });

                let has_matching_day = workdays.iter().any(|((owner, date), day_off)| {
                    *owner == user.id && *date >= from && *date <= to && *day_off == filter.day_off
                });

                instrument_match && user.user_type == filter.user_type && has_matching_day
            })
            .map(|user| Self::project(user, &PUBLIC_ATTRIBUTES))
            .collect();

        matches.sort_by_key(|profile| profile.id.to_string());
        Ok(matches)
    }
}

#[async_trait]
impl WorkdayRepository for InMemoryUserStore {
    async fn mark_working_day(&self, user_id: UserId, entry: &WorkdayEntry) -> AppResult<()> {
        let users = self.users.read().await;
        if !users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!(
                "no user with id {user_id} to mark a working day for"
            )));
        }
        drop(users);

        self.workdays
            .write()
            .await
            .insert((user_id, entry.date), entry.day_off);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
