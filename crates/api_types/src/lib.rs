use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MessageResponse {
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeResponse {
        pub user_id: String,
    }

    /// Profile fields mirrored from the identity provider.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserMetadataResponse {
        pub user_id: String,
        pub email: Option<String>,
        pub country: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordUpdate {
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CountryUpdate {
        pub country: String,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount: f64,
        pub item: String,
        pub notes: Option<String>,
    }

    /// Partial update; absent fields are left untouched. A body with none
    /// of them set is rejected.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub amount: Option<f64>,
        pub item: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount: f64,
        /// Currency-symbol formatted amount, when the caller's country
        /// resolves to a known currency.
        pub display_amount: Option<String>,
        pub item: String,
        pub category: String,
        pub notes: Option<String>,
        /// RFC3339 UTC timestamp, server-assigned at creation.
        pub timestamp: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub total_count: u64,
        pub data: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub category: String,
        pub total: f64,
        pub display_total: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub totals: Vec<CategoryTotalView>,
        pub grand_total: f64,
        pub display_grand_total: Option<String>,
    }
}

pub mod forecast {
    use super::*;

    /// Linear projection of the current month. `next_six_month` and
    /// `next_year` are straight multiples of `this_month`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ForecastResponse {
        pub this_month: f64,
        pub next_month: f64,
        pub next_six_month: f64,
        pub next_year: f64,
        /// Resolved currency symbol, when the caller's country is known.
        pub symbol: Option<String>,
    }
}

pub mod suggest {
    use super::*;

    /// Optional context for the advice prompt. The loan narrative is only
    /// included when all five loan fields are present.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SuggestionRequest {
        pub location: Option<String>,
        pub loan_principal: Option<f64>,
        pub loan_tenure_months: Option<u32>,
        /// 1 - 12
        pub loan_inception_month: Option<u32>,
        pub loan_inception_year: Option<i32>,
        /// Annual rate of interest in percent.
        pub loan_interest_rate: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SuggestionResponse {
        pub suggestion: String,
    }
}
