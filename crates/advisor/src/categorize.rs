//! Best-effort expense categorization.
//!
//! The model reply is accepted only on an exact, case-sensitive match
//! against the category set; anything else, including a failed call, falls
//! back to `Miscellaneous`. Errors never leave this module.

use engine::{CATEGORIES, Category};

use crate::TextModel;

/// Resolve the category for a free-text item description.
pub async fn categorize<M: TextModel + ?Sized>(model: &M, item: &str) -> Category {
    let prompt = build_prompt(item);
    match model.generate(&prompt).await {
        Ok(reply) => match Category::try_from(reply.trim()) {
            Ok(category) => category,
            Err(_) => {
                tracing::warn!(item, reply = reply.trim(), "unrecognized category reply");
                Category::Miscellaneous
            }
        },
        Err(err) => {
            tracing::warn!(item, "categorization call failed: {err}");
            Category::Miscellaneous
        }
    }
}

fn build_prompt(item: &str) -> String {
    let mut names = String::new();
    for category in CATEGORIES {
        if !names.is_empty() {
            names.push_str(", ");
        }
        names.push_str(category.as_str());
    }

    format!(
        "Classify the expense item below into exactly one of these categories:\n\
         {names}\n\
         \n\
         Reply with the category name only, nothing else.\n\
         \n\
         Examples:\n\
         Item: Uber ride\n\
         Category: Transportation\n\
         Item: Tesco weekly shop\n\
         Category: Groceries\n\
         Item: Netflix\n\
         Category: Subscriptions\n\
         Item: Dinner at a restaurant\n\
         Category: Dining Out\n\
         \n\
         Item: {item}\n\
         Category:"
    )
}
