//! Flat-rate loan estimate for the advice prompt.
//!
//! The EMI figure assumes a constant repayment across the tenure and the
//! remaining principal is approximated as EMI times the remaining months.
//! True amortization schedules are out of scope; this only feeds narrative
//! text for the model.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// The five loan inputs; a narrative is built only when all are present.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoanTerms {
    pub principal: f64,
    pub tenure_months: u32,
    /// 1 - 12
    pub inception_month: u32,
    pub inception_year: i32,
    /// Annual rate of interest in percent.
    pub annual_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoanEstimate {
    pub emi: f64,
    pub remaining_months: u32,
    pub remaining_principal: f64,
    pub inception: NaiveDate,
}

impl LoanTerms {
    /// Flat-rate estimate as of `now`. `None` when the inception date is
    /// not a valid calendar month.
    #[must_use]
    pub fn estimate(&self, now: DateTime<Utc>) -> Option<LoanEstimate> {
        let inception = NaiveDate::from_ymd_opt(self.inception_year, self.inception_month, 1)?;

        let months_passed = (now.year() - inception.year()) * 12
            + (now.month() as i32 - inception.month() as i32);
        let remaining_months = (self.tenure_months as i64 - months_passed as i64).max(1) as u32;

        let monthly_rate = self.annual_rate / 1200.0;
        let emi = if monthly_rate == 0.0 {
            self.principal / f64::from(self.tenure_months)
        } else {
            (self.principal * monthly_rate)
                / (1.0 - (1.0 + monthly_rate).powi(-(self.tenure_months as i32)))
        };

        Some(LoanEstimate {
            emi,
            remaining_months,
            remaining_principal: emi * f64::from(remaining_months),
            inception,
        })
    }
}
