//! Current-month aggregation feeding the linear forecast.

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, Statement};

use crate::{MonthlyForecast, ResultEngine};

use super::Engine;

impl Engine {
    /// Sum of `user_id`'s expenses whose timestamp falls in the calendar
    /// month of `now`. Month truncation happens in SQL; timestamps are
    /// stored as RFC 3339 UTC strings, so a `%Y-%m` prefix compare is the
    /// SQLite equivalent of `DATE_TRUNC('month', ...)`.
    pub async fn month_total(&self, user_id: &str, now: DateTime<Utc>) -> ResultEngine<f64> {
        let month = now.format("%Y-%m").to_string();
        let backend = self.database.get_database_backend();
        let row = self
            .database
            .query_one(Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount), 0.0) AS total \
                 FROM expenses WHERE user_id = ? AND strftime('%Y-%m', timestamp) = ?",
                [user_id.into(), month.into()],
            ))
            .await?;

        match row {
            Some(row) => Ok(row.try_get("", "total")?),
            None => Ok(0.0),
        }
    }

    /// Project `user_id`'s current-month total onto the fixed horizons.
    pub async fn monthly_forecast(&self, user_id: &str) -> ResultEngine<MonthlyForecast> {
        let total = self.month_total(user_id, Utc::now()).await?;
        Ok(MonthlyForecast::project(total))
    }
}
