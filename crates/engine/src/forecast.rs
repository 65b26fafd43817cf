//! Linear spending projection.
//!
//! Deliberately a placeholder model: next month repeats the current month,
//! and the longer horizons are straight multiples of it. No regression,
//! seasonality, or confidence intervals.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyForecast {
    pub this_month: f64,
    pub next_month: f64,
    pub next_six_month: f64,
    pub next_year: f64,
}

impl MonthlyForecast {
    /// Project the current calendar-month total onto the fixed horizons,
    /// rounding every figure to two decimal places.
    #[must_use]
    pub fn project(month_total: f64) -> Self {
        Self {
            this_month: round2(month_total),
            next_month: round2(month_total),
            next_six_month: round2(month_total * 6.0),
            next_year: round2(month_total * 12.0),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
