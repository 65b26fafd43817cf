//! Spending-advice prompt composition and the single-turn model exchange.

use chrono::{DateTime, Utc};
use engine::CategoryTotal;

use crate::{AdvisorError, LoanTerms, TextModel};

/// Ask the model for spending advice built from the caller's per-category
/// totals, optional location, and optional loan context. The reply is
/// returned verbatim.
pub async fn suggest<M: TextModel + ?Sized>(
    model: &M,
    location: Option<&str>,
    totals: &[CategoryTotal],
    loan: Option<&LoanTerms>,
    now: DateTime<Utc>,
) -> Result<String, AdvisorError> {
    let prompt = build_prompt(location, totals, loan, now);
    model.generate(&prompt).await
}

fn build_prompt(
    location: Option<&str>,
    totals: &[CategoryTotal],
    loan: Option<&LoanTerms>,
    now: DateTime<Utc>,
) -> String {
    let location = location
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("unknown");

    let mut summary = String::new();
    for entry in totals {
        summary.push_str(&format!("{}: {:.2}\n", entry.category, entry.total));
    }

    let loan_info = loan
        .and_then(|terms| terms.estimate(now).map(|estimate| (terms, estimate)))
        .map(|(terms, estimate)| {
            format!(
                "\nThe user has an ongoing loan of {} taken in {} for {} months at {}% interest. \
                 They have about {} months left and an estimated remaining principal of {:.2}.\n",
                terms.principal,
                estimate.inception.format("%B %Y"),
                terms.tenure_months,
                terms.annual_rate,
                estimate.remaining_months,
                estimate.remaining_principal,
            )
        })
        .unwrap_or_default();

    format!(
        "The user is from {location}. Consider Purchasing Power Parity while suggesting improvements.\n\
         Their recent monthly expense breakdown is:\n{summary}{loan_info}\
         Based on this, suggest 3 practical and empathetic ways the user can reduce spending, \
         increase savings, and optionally take small steps to clear outstanding loans faster. \
         Don't be too personal or judgmental and keep suggestions friendly and realistic. \
         Focus on helpful, encouraging advice."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use engine::Category;

    fn totals() -> Vec<CategoryTotal> {
        vec![
            CategoryTotal {
                category: Category::Groceries,
                total: 250.0,
            },
            CategoryTotal {
                category: Category::Transportation,
                total: 90.5,
            },
        ]
    }

    #[test]
    fn prompt_contains_location_and_breakdown() {
        let prompt = build_prompt(Some("Ireland"), &totals(), None, Utc::now());
        assert!(prompt.contains("The user is from Ireland."));
        assert!(prompt.contains("Groceries: 250.00"));
        assert!(prompt.contains("Transportation: 90.50"));
        assert!(!prompt.contains("ongoing loan"));
    }

    #[test]
    fn missing_location_reads_unknown() {
        let prompt = build_prompt(None, &totals(), None, Utc::now());
        assert!(prompt.contains("The user is from unknown."));
        let prompt = build_prompt(Some("   "), &totals(), None, Utc::now());
        assert!(prompt.contains("The user is from unknown."));
    }

    #[test]
    fn loan_narrative_is_included_when_terms_are_complete() {
        let terms = LoanTerms {
            principal: 50_000.0,
            tenure_months: 60,
            inception_month: 3,
            inception_year: 2025,
            annual_rate: 8.5,
        };
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let prompt = build_prompt(None, &totals(), Some(&terms), now);
        assert!(prompt.contains("ongoing loan of 50000"));
        assert!(prompt.contains("March 2025"));
        assert!(prompt.contains("48 months left"));
    }
}
