use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::Result,
    models::{balance::MonthlyLeaveBalance, common::MonthParams},
    scope_guard::verify_can_view_employee,
    AppState,
};

/// The caller's own balance; the month defaults to the current one.
pub async fn own(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<MonthParams>,
) -> Result<Json<MonthlyLeaveBalance>> {
    let (year, month) = params.resolve(state.leave.today()?)?;
    let balance = state
        .leave
        .ledger()
        .get_or_create_balance(auth.id, year, month)
        .await?;
    Ok(Json(balance))
}

pub async fn for_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(params): Query<MonthParams>,
) -> Result<Json<MonthlyLeaveBalance>> {
    let employee =
        verify_can_view_employee(state.store.as_ref(), &auth, user_id, state.reviewer_scope).await?;
    let (year, month) = params.resolve(state.leave.today()?)?;
    let balance = state
        .leave
        .ledger()
        .get_or_create_balance(employee.id, year, month)
        .await?;
    Ok(Json(balance))
}
