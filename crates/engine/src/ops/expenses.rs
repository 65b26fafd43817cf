//! Expense CRUD and summary operations, all ownership-scoped.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Statement,
};
use uuid::Uuid;

use crate::{Category, EngineError, Expense, ResultEngine, expense};

use super::{Engine, normalize_optional_text};

/// Partial update for an expense. `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UpdateExpenseCmd {
    pub amount: Option<f64>,
    pub item: Option<String>,
    pub notes: Option<String>,
    /// Set when `item` changed and the categorizer re-resolved it.
    pub category: Option<Category>,
}

impl UpdateExpenseCmd {
    fn is_empty(&self) -> bool {
        self.amount.is_none() && self.item.is_none() && self.notes.is_none()
    }
}

/// Per-category aggregate for one user.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

impl Engine {
    /// Persist a new expense for `user_id` and return the stored record.
    ///
    /// The category comes from the categorizer, never from the caller.
    pub async fn add_expense(
        &self,
        user_id: &str,
        amount: f64,
        item: &str,
        notes: Option<&str>,
        category: Category,
    ) -> ResultEngine<Expense> {
        let record = Expense::new(
            user_id.to_string(),
            amount,
            item.to_string(),
            category,
            normalize_optional_text(notes),
        )?;

        expense::ActiveModel::from(&record)
            .insert(&self.database)
            .await?;

        Ok(record)
    }

    /// Apply a partial update to one of `user_id`'s expenses.
    ///
    /// The row is matched on `id AND user_id`; a missing match means the
    /// expense does not exist or belongs to someone else, and both cases
    /// surface as [`EngineError::NotFound`].
    pub async fn update_expense(
        &self,
        user_id: &str,
        expense_id: Uuid,
        cmd: UpdateExpenseCmd,
    ) -> ResultEngine<Expense> {
        if cmd.is_empty() {
            return Err(EngineError::EmptyUpdate);
        }

        let model = expense::Entity::find()
            .filter(expense::Column::Id.eq(expense_id.to_string()))
            .filter(expense::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(expense_id.to_string()))?;

        let mut active: expense::ActiveModel = model.into();
        if let Some(amount) = cmd.amount {
            expense::validate_amount(amount)?;
            active.amount = ActiveValue::Set(amount);
        }
        if let Some(item) = cmd.item {
            active.item = ActiveValue::Set(expense::validate_item(&item)?);
        }
        if let Some(notes) = cmd.notes {
            active.notes = ActiveValue::Set(normalize_optional_text(Some(&notes)));
        }
        if let Some(category) = cmd.category {
            active.category = ActiveValue::Set(category.as_str().to_string());
        }

        let updated = active.update(&self.database).await?;
        Expense::try_from(updated)
    }

    /// All expenses owned by `user_id`, newest first, with the total count.
    pub async fn expenses_for_user(&self, user_id: &str) -> ResultEngine<(Vec<Expense>, u64)> {
        let total_count = expense::Entity::find()
            .filter(expense::Column::UserId.eq(user_id))
            .count(&self.database)
            .await?;

        let models = expense::Entity::find()
            .filter(expense::Column::UserId.eq(user_id))
            .order_by_desc(expense::Column::Timestamp)
            .all(&self.database)
            .await?;

        let expenses = models
            .into_iter()
            .map(Expense::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok((expenses, total_count))
    }

    /// Per-category spending totals for `user_id`.
    pub async fn category_totals(&self, user_id: &str) -> ResultEngine<Vec<CategoryTotal>> {
        let backend = self.database.get_database_backend();
        let rows = self
            .database
            .query_all(Statement::from_sql_and_values(
                backend,
                "SELECT category, SUM(amount) AS total \
                 FROM expenses WHERE user_id = ? \
                 GROUP BY category ORDER BY total DESC",
                [user_id.into()],
            ))
            .await?;

        let mut totals = Vec::with_capacity(rows.len());
        for row in rows {
            let category: String = row.try_get("", "category")?;
            let total: f64 = row.try_get("", "total")?;
            totals.push(CategoryTotal {
                category: Category::try_from(category.as_str()).unwrap_or_default(),
                total,
            });
        }
        Ok(totals)
    }

    /// Delete one of `user_id`'s expenses.
    ///
    /// A single conditional delete: the affected-row count doubles as the
    /// existence and ownership check, so there is no read-then-write race.
    pub async fn delete_expense(&self, user_id: &str, expense_id: Uuid) -> ResultEngine<()> {
        let result = expense::Entity::delete_many()
            .filter(expense::Column::Id.eq(expense_id.to_string()))
            .filter(expense::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::NotFound(expense_id.to_string()));
        }
        Ok(())
    }
}
