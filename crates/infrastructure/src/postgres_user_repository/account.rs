use super::*;

impl PostgresUserRepository {
    pub(super) async fn ensure_unique_impl(
        &self,
        attribute: UniqueAttribute,
        value: &str,
    ) -> AppResult<bool> {
        // Column names come from the attribute enum, never from callers.
        let sql = format!("SELECT COUNT(*) FROM users WHERE {} = $1", attribute.column());

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to check uniqueness: {error}"))
            })?;

        Ok(count == 0)
    }

    pub(super) async fn create_profile_impl(&self, user: &NewUser) -> AppResult<UserId> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO users (
                salt, hash, name, email, dob, city, phone, gender, user_type,
                musical_instrument, year_commercial_exp, image_url,
                google_id, facebook_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(user.salt.as_str())
        .bind(user.hash.as_str())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.dob)
        .bind(user.city.as_deref())
        .bind(user.phone.as_deref())
        .bind(user.gender.as_deref())
        .bind(user.user_type.as_str())
        .bind(user.musical_instrument.as_deref())
        .bind(user.year_commercial_exp)
        .bind(user.image_url.as_deref())
        .bind(user.google_id.as_deref())
        .bind(user.facebook_id.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| unique_conflict_or_internal(error, "create user profile"))?;

        Ok(UserId::from_uuid(id))
    }
}
