use gigbook_domain::PUBLIC_ATTRIBUTES;

use super::*;

impl PostgresUserRepository {
    pub(super) async fn find_users_by_busyness_impl(
        &self,
        filter: &BusynessFilter,
    ) -> AppResult<Vec<UserProfile>> {
        let (from, to) = filter.window(chrono::Utc::now().date_naive());

        let select: Vec<String> = PUBLIC_ATTRIBUTES
            .iter()
            .map(|field| format!("users.{}", field.column()))
            .collect();
        let select = select.join(", ");

        // All selected columns are functionally dependent on users.id, so
        // GROUP BY users.id yields one well-defined row per matching user.
        let rows = if let Some(instrument) = filter.musical_instrument.as_deref() {
            sqlx::query(&format!(
                r#"
                SELECT users.id, {select}
                FROM users
                INNER JOIN workdays ON users.id = workdays.user_id
                WHERE users.musical_instrument = $1
                  AND workdays.date BETWEEN $2 AND $3
                  AND users.user_type = $4
                  AND workdays.day_off = $5
                GROUP BY users.id
                "#
            ))
            .bind(instrument)
            .bind(from)
            .bind(to)
            .bind(filter.user_type.as_str())
            .bind(filter.day_off)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query(&format!(
                r#"
                SELECT users.id, {select}
                FROM users
                INNER JOIN workdays ON users.id = workdays.user_id
                WHERE workdays.date BETWEEN $1 AND $2
                  AND users.user_type = $3
                  AND workdays.day_off = $4
                GROUP BY users.id
                "#
            ))
            .bind(from)
            .bind(to)
            .bind(filter.user_type.as_str())
            .bind(filter.day_off)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|error| AppError::Internal(format!("failed to query users by busyness: {error}")))?;

        rows.iter()
            .map(|row| profile_from_row(row, &PUBLIC_ATTRIBUTES))
            .collect()
    }
}
