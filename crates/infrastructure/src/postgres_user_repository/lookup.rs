use super::*;

impl PostgresUserRepository {
    pub(super) async fn get_profile_impl(
        &self,
        user_id: UserId,
        fields: &[ProfileField],
    ) -> AppResult<Option<UserProfile>> {
        let mut columns: Vec<&str> = Vec::with_capacity(fields.len() + 1);
        columns.push("id");
        columns.extend(fields.iter().map(ProfileField::column));

        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 LIMIT 1",
            columns.join(", ")
        );

        let row = sqlx::query(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to get profile: {error}")))?;

        row.map(|row| profile_from_row(&row, fields)).transpose()
    }

    pub(super) async fn find_by_email_impl(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, salt, hash, name, email, dob, city, phone, gender, user_type,
                   musical_instrument, year_commercial_exp, image_url,
                   google_id, facebook_id
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    pub(super) async fn find_identity_impl(
        &self,
        provider: AuthProvider,
        provider_id: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<Option<ProviderIdentity>> {
        // A NULL bind never matches its branch, so an absent key simply
        // deactivates that side of the OR.
        let sql = format!(
            "SELECT id, {column} FROM users WHERE {column} = $1 OR email = $2 LIMIT 1",
            column = provider.id_column()
        );

        let row = sqlx::query(&sql)
            .bind(provider_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find user identity: {error}"))
            })?;

        row.map(|row| -> AppResult<ProviderIdentity> {
            let id: uuid::Uuid = row
                .try_get("id")
                .map_err(|error| AppError::Internal(format!("failed to read user id: {error}")))?;
            let provider_id: Option<String> =
                row.try_get(provider.id_column()).map_err(|error| {
                    AppError::Internal(format!("failed to read provider id: {error}"))
                })?;

            Ok(ProviderIdentity {
                id: UserId::from_uuid(id),
                provider,
                provider_id,
            })
        })
        .transpose()
    }
}
