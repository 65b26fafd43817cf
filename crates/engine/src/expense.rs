//! Expense primitives.
//!
//! An `Expense` is a single spending record owned by exactly one user. Every
//! read and write in the engine is scoped by that owner.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: String,
    pub amount: f64,
    pub item: String,
    pub category: Category,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        user_id: String,
        amount: f64,
        item: String,
        category: Category,
        notes: Option<String>,
    ) -> ResultEngine<Self> {
        validate_amount(amount)?;
        let item = validate_item(&item)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            item,
            category,
            notes,
            timestamp: Utc::now(),
        })
    }
}

pub(crate) fn validate_amount(amount: f64) -> ResultEngine<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_item(item: &str) -> ResultEngine<String> {
    let trimmed = item.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidItem(
            "item must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub item: String,
    pub category: String,
    pub notes: Option<String>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            user_id: ActiveValue::Set(expense.user_id.clone()),
            amount: ActiveValue::Set(expense.amount),
            item: ActiveValue::Set(expense.item.clone()),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            notes: ActiveValue::Set(expense.notes.clone()),
            timestamp: ActiveValue::Set(expense.timestamp),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("expense not exists".to_string()))?,
            user_id: model.user_id,
            amount: model.amount,
            item: model.item,
            category: Category::try_from(model.category.as_str()).unwrap_or_default(),
            notes: model.notes,
            timestamp: model.timestamp,
        })
    }
}
