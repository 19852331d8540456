use crate::field_values::{date_from_value, int_from_value, string_from_value};

use super::*;

impl PostgresUserRepository {
    pub(super) async fn update_profile_impl(
        &self,
        user_id: UserId,
        changes: &[(ProfileField, Value)],
    ) -> AppResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut assignments = Vec::with_capacity(changes.len() + 1);
        for (index, (field, _)) in changes.iter().enumerate() {
            assignments.push(format!("{} = ${}", field.column(), index + 2));
        }
        assignments.push("updated_at = now()".to_owned());

        let sql = format!("UPDATE users SET {} WHERE id = $1", assignments.join(", "));

        let mut query = sqlx::query(&sql).bind(user_id.as_uuid());
        for (field, value) in changes {
            query = match field {
                ProfileField::Dob => query.bind(date_from_value(*field, value)?),
                ProfileField::YearCommercialExp => query.bind(int_from_value(*field, value)?),
                _ => query.bind(string_from_value(*field, value)?),
            };
        }

        query
            .execute(&self.pool)
            .await
            .map_err(|error| unique_conflict_or_internal(error, "update profile"))?;

        Ok(())
    }

    pub(super) async fn update_provider_id_impl(
        &self,
        user_id: UserId,
        provider: AuthProvider,
        provider_id: &str,
    ) -> AppResult<()> {
        let sql = format!(
            "UPDATE users SET {} = $2, updated_at = now() WHERE id = $1",
            provider.id_column()
        );

        sqlx::query(&sql)
            .bind(user_id.as_uuid())
            .bind(provider_id)
            .execute(&self.pool)
            .await
            .map_err(|error| unique_conflict_or_internal(error, "update provider id"))?;

        Ok(())
    }
}
