use chrono::{Duration, Utc};
use sea_orm::{ActiveValue, Database, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use engine::{CATEGORIES, Category, Engine, EngineError, UpdateExpenseCmd, expense};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

#[tokio::test]
async fn create_returns_the_submitted_amount_and_a_known_category() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .add_expense("alice", 42.50, "Uber ride", None, Category::Transportation)
        .await
        .unwrap();

    assert_eq!(expense.amount, 42.50);
    assert_eq!(expense.category, Category::Transportation);
    assert!(CATEGORIES.contains(&expense.category));
    assert!(!expense.id.is_nil());
    assert_eq!(expense.user_id, "alice");
}

#[tokio::test]
async fn create_rejects_non_positive_amounts() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .add_expense("alice", 0.0, "Lunch", None, Category::DiningOut)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("amount must be > 0".to_string())
    );
}

#[tokio::test]
async fn list_is_scoped_to_the_owner_and_newest_first() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .add_expense("alice", 10.0, "Coffee", None, Category::DiningOut)
        .await
        .unwrap();
    engine
        .add_expense("alice", 20.0, "Bus ticket", None, Category::Transportation)
        .await
        .unwrap();
    engine
        .add_expense("bob", 99.0, "Rent", None, Category::Housing)
        .await
        .unwrap();

    let (expenses, total_count) = engine.expenses_for_user("alice").await.unwrap();
    assert_eq!(total_count, 2);
    assert_eq!(expenses.len(), 2);
    assert!(expenses.iter().all(|e| e.user_id == "alice"));
    // Newest first: the coffee was inserted before the bus ticket.
    assert_eq!(expenses.last().unwrap().id, first.id);
}

#[tokio::test]
async fn update_applies_only_the_supplied_fields() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .add_expense("alice", 10.0, "Coffee", Some("morning"), Category::DiningOut)
        .await
        .unwrap();

    let updated = engine
        .update_expense(
            "alice",
            expense.id,
            UpdateExpenseCmd {
                amount: Some(12.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, 12.5);
    assert_eq!(updated.item, "Coffee");
    assert_eq!(updated.notes.as_deref(), Some("morning"));
    assert_eq!(updated.category, Category::DiningOut);
}

#[tokio::test]
async fn update_with_new_item_takes_the_reresolved_category() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .add_expense("alice", 10.0, "Coffee", None, Category::DiningOut)
        .await
        .unwrap();

    let updated = engine
        .update_expense(
            "alice",
            expense.id,
            UpdateExpenseCmd {
                item: Some("Taxi".to_string()),
                category: Some(Category::Transportation),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.item, "Taxi");
    assert_eq!(updated.category, Category::Transportation);
}

#[tokio::test]
async fn empty_update_is_rejected_and_mutates_nothing() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .add_expense("alice", 10.0, "Coffee", None, Category::DiningOut)
        .await
        .unwrap();

    let err = engine
        .update_expense("alice", expense.id, UpdateExpenseCmd::default())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EmptyUpdate);

    let (expenses, _) = engine.expenses_for_user("alice").await.unwrap();
    assert_eq!(expenses[0].amount, 10.0);
    assert_eq!(expenses[0].item, "Coffee");
}

#[tokio::test]
async fn update_of_someone_elses_expense_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .add_expense("bob", 50.0, "Groceries", None, Category::Groceries)
        .await
        .unwrap();

    let err = engine
        .update_expense(
            "alice",
            expense.id,
            UpdateExpenseCmd {
                amount: Some(1.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound(expense.id.to_string()));
}

#[tokio::test]
async fn delete_of_someone_elses_expense_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .add_expense("bob", 50.0, "Groceries", None, Category::Groceries)
        .await
        .unwrap();

    let err = engine
        .delete_expense("alice", expense.id)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound(expense.id.to_string()));

    // Bob still sees his row.
    let (expenses, total_count) = engine.expenses_for_user("bob").await.unwrap();
    assert_eq!(total_count, 1);
    assert_eq!(expenses[0].id, expense.id);
}

#[tokio::test]
async fn delete_removes_the_row_once() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .add_expense("alice", 5.0, "Snack", None, Category::Groceries)
        .await
        .unwrap();

    engine.delete_expense("alice", expense.id).await.unwrap();
    let err = engine
        .delete_expense("alice", expense.id)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound(expense.id.to_string()));

    let err = engine
        .delete_expense("alice", Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn summary_groups_totals_by_category() {
    let (engine, _db) = engine_with_db().await;

    engine
        .add_expense("alice", 10.0, "Coffee", None, Category::DiningOut)
        .await
        .unwrap();
    engine
        .add_expense("alice", 15.5, "Lunch", None, Category::DiningOut)
        .await
        .unwrap();
    engine
        .add_expense("alice", 30.0, "Taxi", None, Category::Transportation)
        .await
        .unwrap();
    engine
        .add_expense("bob", 99.0, "Rent", None, Category::Housing)
        .await
        .unwrap();

    let totals = engine.category_totals("alice").await.unwrap();
    assert_eq!(totals.len(), 2);

    let dining = totals
        .iter()
        .find(|t| t.category == Category::DiningOut)
        .unwrap();
    assert!((dining.total - 25.5).abs() < 1e-9);
    let transport = totals
        .iter()
        .find(|t| t.category == Category::Transportation)
        .unwrap();
    assert!((transport.total - 30.0).abs() < 1e-9);
}

#[tokio::test]
async fn forecast_projects_straight_multiples_of_the_current_month() {
    let (engine, _db) = engine_with_db().await;

    engine
        .add_expense("alice", 100.0, "Rent share", None, Category::Housing)
        .await
        .unwrap();
    engine
        .add_expense("alice", 20.5, "Groceries", None, Category::Groceries)
        .await
        .unwrap();

    let forecast = engine.monthly_forecast("alice").await.unwrap();
    assert_eq!(forecast.this_month, 120.5);
    assert_eq!(forecast.next_month, forecast.this_month);
    assert_eq!(forecast.next_six_month, forecast.this_month * 6.0);
    assert_eq!(forecast.next_year, forecast.this_month * 12.0);
}

#[tokio::test]
async fn forecast_ignores_previous_months_and_other_users() {
    let (engine, db) = engine_with_db().await;

    let current = engine
        .add_expense("alice", 40.0, "Groceries", None, Category::Groceries)
        .await
        .unwrap();
    engine
        .add_expense("bob", 500.0, "Rent", None, Category::Housing)
        .await
        .unwrap();

    // Backdate a second row well into a previous month.
    let old = engine
        .add_expense("alice", 75.0, "Old purchase", None, Category::Shopping)
        .await
        .unwrap();
    let now = Utc::now();
    let model = expense::ActiveModel {
        id: ActiveValue::Unchanged(old.id.to_string()),
        timestamp: ActiveValue::Set(now - Duration::days(62)),
        ..Default::default()
    };
    expense::Entity::update(model).exec(&db).await.unwrap();

    let total = engine.month_total("alice", now).await.unwrap();
    assert!((total - current.amount).abs() < 1e-9);
}
