//! User domain types: identifiers, the public attribute whitelist, and
//! provider-linked identity fields.
//!
//! `ProfileField` is the single source of truth for which user columns are
//! externally readable or writable. Credential columns (`salt`, `hash`) have
//! no variant, so no projection or update built from these types can reach
//! them.

use chrono::NaiveDate;
use gigbook_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A user profile field that may be read or written through public methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileField {
    /// Years of commercial experience.
    YearCommercialExp,
    /// Contact phone number.
    Phone,
    /// Primary musical instrument.
    MusicalInstrument,
    /// Avatar image URL.
    ImageUrl,
    /// Display name.
    Name,
    /// Date of birth.
    Dob,
    /// Home city.
    City,
    /// Email address.
    Email,
    /// Gender.
    Gender,
    /// Account type (for example `pro` or `client`).
    UserType,
}

/// Every public profile field, in projection order.
pub const PUBLIC_ATTRIBUTES: [ProfileField; 10] = [
    ProfileField::YearCommercialExp,
    ProfileField::Phone,
    ProfileField::MusicalInstrument,
    ProfileField::ImageUrl,
    ProfileField::Name,
    ProfileField::Dob,
    ProfileField::City,
    ProfileField::Email,
    ProfileField::Gender,
    ProfileField::UserType,
];

impl ProfileField {
    /// Parses an external field name into a profile field.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "yearCommercialExp" => Ok(Self::YearCommercialExp),
            "phone" => Ok(Self::Phone),
            "musicalInstrument" => Ok(Self::MusicalInstrument),
            "imageUrl" => Ok(Self::ImageUrl),
            "name" => Ok(Self::Name),
            "dob" => Ok(Self::Dob),
            "city" => Ok(Self::City),
            "email" => Ok(Self::Email),
            "gender" => Ok(Self::Gender),
            "type" => Ok(Self::UserType),
            _ => Err(AppError::Validation(format!(
                "'{value}' is not a public profile field"
            ))),
        }
    }

    /// Returns the stable external name for this field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YearCommercialExp => "yearCommercialExp",
            Self::Phone => "phone",
            Self::MusicalInstrument => "musicalInstrument",
            Self::ImageUrl => "imageUrl",
            Self::Name => "name",
            Self::Dob => "dob",
            Self::City => "city",
            Self::Email => "email",
            Self::Gender => "gender",
            Self::UserType => "type",
        }
    }

    /// Returns the storage column for this field.
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::YearCommercialExp => "year_commercial_exp",
            Self::Phone => "phone",
            Self::MusicalInstrument => "musical_instrument",
            Self::ImageUrl => "image_url",
            Self::Name => "name",
            Self::Dob => "dob",
            Self::City => "city",
            Self::Email => "email",
            Self::Gender => "gender",
            Self::UserType => "user_type",
        }
    }

    /// Intersects a comma-separated props string with the public whitelist.
    ///
    /// Returns fields in whitelist order with duplicates removed. Names that
    /// are not public fields (including `salt` and `hash`) are dropped
    /// silently, so the result is always a safe projection.
    #[must_use]
    pub fn project_props(props: &str) -> Vec<Self> {
        let requested: Vec<&str> = props
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        PUBLIC_ATTRIBUTES
            .iter()
            .filter(|field| requested.contains(&field.as_str()))
            .copied()
            .collect()
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// External authentication provider with a linked id column per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Google sign-in.
    Google,
    /// Facebook sign-in.
    Facebook,
}

impl AuthProvider {
    /// Parses an external provider name.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "google" => Ok(Self::Google),
            "facebook" => Ok(Self::Facebook),
            _ => Err(AppError::Validation(format!(
                "unknown auth provider '{value}'"
            ))),
        }
    }

    /// Returns the stable external provider name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Facebook => "facebook",
        }
    }

    /// Returns the storage column holding this provider's user id.
    #[must_use]
    pub fn id_column(&self) -> &'static str {
        match self {
            Self::Google => "google_id",
            Self::Facebook => "facebook_id",
        }
    }
}

/// Attribute a uniqueness check can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueAttribute {
    /// The email address column.
    Email,
    /// A provider-linked id column.
    ProviderId(AuthProvider),
}

impl UniqueAttribute {
    /// Returns the storage column for this attribute.
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::ProviderId(provider) => provider.id_column(),
        }
    }
}

/// Payload for creating a user row.
///
/// Credential material (`salt`, `hash`) is carried opaquely; hashing policy
/// belongs to the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Password salt, already generated by the caller.
    pub salt: String,
    /// Password hash, already derived by the caller.
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
    #[serde(rename = "type")]
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_round_trips_through_parse() {
        for field in PUBLIC_ATTRIBUTES {
            let parsed = ProfileField::parse(field.as_str());
            assert_eq!(parsed.ok(), Some(field));
        }
    }

    #[test]
    fn credential_fields_are_not_parseable() {
        assert!(ProfileField::parse("salt").is_err());
        assert!(ProfileField::parse("hash").is_err());
        assert!(ProfileField::parse("googleId").is_err());
    }

    #[test]
    fn project_props_keeps_whitelist_order() {
        let fields = ProfileField::project_props("email,name,phone");
        assert_eq!(
            fields,
            vec![ProfileField::Phone, ProfileField::Name, ProfileField::Email]
        );
    }

    #[test]
    fn project_props_drops_unknown_names_and_duplicates() {
        let fields = ProfileField::project_props("email, salt ,hash,email,nonsense");
        assert_eq!(fields, vec![ProfileField::Email]);
    }

    #[test]
    fn project_props_of_empty_string_is_empty() {
        assert!(ProfileField::project_props("").is_empty());
    }

    #[test]
    fn provider_maps_to_a_known_column() {
        assert_eq!(AuthProvider::Google.id_column(), "google_id");
        assert_eq!(AuthProvider::Facebook.id_column(), "facebook_id");
        assert!(AuthProvider::parse("myspace").is_err());
    }

    #[test]
    fn unique_attribute_columns() {
        assert_eq!(UniqueAttribute::Email.column(), "email");
        assert_eq!(
            UniqueAttribute::ProviderId(AuthProvider::Facebook).column(),
            "facebook_id"
        );
    }

    #[test]
    fn user_type_external_name_is_type() {
        assert_eq!(ProfileField::UserType.as_str(), "type");
        assert_eq!(ProfileField::UserType.column(), "user_type");
    }
}
