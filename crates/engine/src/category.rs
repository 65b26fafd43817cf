//! The closed set of spending buckets an expense can be filed under.
//!
//! Categories are assigned by the categorizer, never chosen by the caller.
//! Anything the classifier cannot place lands in [`Category::Miscellaneous`].

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    #[serde(rename = "Dining Out")]
    DiningOut,
    Transportation,
    Housing,
    Utilities,
    Healthcare,
    Insurance,
    Entertainment,
    Shopping,
    Travel,
    Education,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    Fitness,
    Subscriptions,
    #[serde(rename = "Gifts & Donations")]
    GiftsAndDonations,
    Investments,
    #[serde(rename = "Debt Payments")]
    DebtPayments,
    #[default]
    Miscellaneous,
}

/// Every member, in prompt/display order. The default sits last.
pub const CATEGORIES: [Category; 18] = [
    Category::Groceries,
    Category::DiningOut,
    Category::Transportation,
    Category::Housing,
    Category::Utilities,
    Category::Healthcare,
    Category::Insurance,
    Category::Entertainment,
    Category::Shopping,
    Category::Travel,
    Category::Education,
    Category::PersonalCare,
    Category::Fitness,
    Category::Subscriptions,
    Category::GiftsAndDonations,
    Category::Investments,
    Category::DebtPayments,
    Category::Miscellaneous,
];

impl Category {
    /// Canonical display name, also the stored and wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::DiningOut => "Dining Out",
            Category::Transportation => "Transportation",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Healthcare => "Healthcare",
            Category::Insurance => "Insurance",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Travel => "Travel",
            Category::Education => "Education",
            Category::PersonalCare => "Personal Care",
            Category::Fitness => "Fitness",
            Category::Subscriptions => "Subscriptions",
            Category::GiftsAndDonations => "Gifts & Donations",
            Category::Investments => "Investments",
            Category::DebtPayments => "Debt Payments",
            Category::Miscellaneous => "Miscellaneous",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive, whole-string match. Model replies that do not
/// match any member are not a `Category`.
impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        CATEGORIES
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| EngineError::InvalidItem(format!("unknown category: {value}")))
    }
}
