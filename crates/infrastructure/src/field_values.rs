//! Conversions between JSON payload values and typed profile columns.
//!
//! Update payloads arrive as JSON; each whitelist field has one storage
//! type. Mismatches are validation errors raised before any store write.

use chrono::NaiveDate;
use serde_json::Value;

use gigbook_application::UserRecord;
use gigbook_core::{AppError, AppResult};
use gigbook_domain::ProfileField;

pub(crate) fn string_from_value(field: ProfileField, value: &Value) -> AppResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err(AppError::Validation(format!(
            "field '{field}' expects a string value"
        ))),
    }
}

pub(crate) fn int_from_value(field: ProfileField, value: &Value) -> AppResult<Option<i32>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_i64()
            .and_then(|wide| i32::try_from(wide).ok())
            .map(Some)
            .ok_or_else(|| {
                AppError::Validation(format!("field '{field}' expects a 32-bit integer"))
            }),
        _ => Err(AppError::Validation(format!(
            "field '{field}' expects an integer value"
        ))),
    }
}

pub(crate) fn date_from_value(field: ProfileField, value: &Value) -> AppResult<Option<NaiveDate>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::Validation(format!("field '{field}' expects a YYYY-MM-DD date"))
            }),
        _ => Err(AppError::Validation(format!(
            "field '{field}' expects a date value"
        ))),
    }
}

/// Reads one whitelist field out of a full user record as a JSON value.
pub(crate) fn attribute_value(record: &UserRecord, field: ProfileField) -> Value {
    match field {
        ProfileField::YearCommercialExp => {
            record.year_commercial_exp.map_or(Value::Null, Value::from)
        }
        ProfileField::Phone => record.phone.clone().map_or(Value::Null, Value::String),
        ProfileField::MusicalInstrument => record
            .musical_instrument
            .clone()
            .map_or(Value::Null, Value::String),
        ProfileField::ImageUrl => record.image_url.clone().map_or(Value::Null, Value::String),
        ProfileField::Name => Value::String(record.name.clone()),
        ProfileField::Dob => record
            .dob
            .map_or(Value::Null, |date| Value::String(date.to_string())),
        ProfileField::City => record.city.clone().map_or(Value::Null, Value::String),
        ProfileField::Email => Value::String(record.email.clone()),
        ProfileField::Gender => record.gender.clone().map_or(Value::Null, Value::String),
        ProfileField::UserType => Value::String(record.user_type.clone()),
    }
}
