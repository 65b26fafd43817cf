//! Expense API endpoints.

use api_types::expense::{
    CategoryTotalView, ExpenseListResponse, ExpenseNew, ExpenseUpdate, ExpenseView,
    SummaryResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Expense, UpdateExpenseCmd, currency};
use uuid::Uuid;

use crate::{ServerError, auth::SessionUser, server::ServerState};

fn expense_view(expense: Expense, symbol: Option<&str>) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount,
        display_amount: symbol.map(|symbol| currency::format_amount(symbol, expense.amount)),
        item: expense.item,
        category: expense.category.as_str().to_string(),
        notes: expense.notes,
        timestamp: expense.timestamp,
    }
}

/// Resolved currency symbol for the caller, or `None` when the profile has
/// no usable country. Never fails the request.
async fn caller_symbol(state: &ServerState, user: &SessionUser) -> Option<&'static str> {
    let country = state.identity.country_of(&user.access_token).await?;
    currency::currency_symbol(&country)
}

pub async fn create(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let category = advisor::categorize(state.model.as_ref(), &payload.item).await;

    let expense = state
        .engine
        .add_expense(
            &user.user_id,
            payload.amount,
            &payload.item,
            payload.notes.as_deref(),
            category,
        )
        .await?;

    let symbol = caller_symbol(&state, &user).await;
    Ok((StatusCode::CREATED, Json(expense_view(expense, symbol))))
}

pub async fn list(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let (expenses, total_count) = state.engine.expenses_for_user(&user.user_id).await?;
    let symbol = caller_symbol(&state, &user).await;

    let data = expenses
        .into_iter()
        .map(|expense| expense_view(expense, symbol))
        .collect();

    Ok(Json(ExpenseListResponse { total_count, data }))
}

pub async fn update(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    // A changed item invalidates the stored category, so re-resolve it.
    let category = match payload.item.as_deref() {
        Some(item) => Some(advisor::categorize(state.model.as_ref(), item).await),
        None => None,
    };

    let expense = state
        .engine
        .update_expense(
            &user.user_id,
            id,
            UpdateExpenseCmd {
                amount: payload.amount,
                item: payload.item,
                notes: payload.notes,
                category,
            },
        )
        .await?;

    let symbol = caller_symbol(&state, &user).await;
    Ok(Json(expense_view(expense, symbol)))
}

pub async fn delete(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let totals = state.engine.category_totals(&user.user_id).await?;
    let symbol = caller_symbol(&state, &user).await;

    let grand_total: f64 = totals.iter().map(|entry| entry.total).sum();
    let totals = totals
        .into_iter()
        .map(|entry| CategoryTotalView {
            category: entry.category.as_str().to_string(),
            total: entry.total,
            display_total: symbol.map(|symbol| currency::format_amount(symbol, entry.total)),
        })
        .collect();

    Ok(Json(SummaryResponse {
        totals,
        grand_total,
        display_grand_total: symbol.map(|symbol| currency::format_amount(symbol, grand_total)),
    }))
}
