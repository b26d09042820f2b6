use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    models::{common::MonthParams, report::MonthlyStats},
    services::{leave_workflow::LeaveWorkflow, reports::monthly_stats},
};

/// Statistics over the applications the caller is allowed to see.
pub async fn monthly(
    State(leave): State<LeaveWorkflow>,
    auth: AuthUser,
    Query(params): Query<MonthParams>,
) -> Result<Json<MonthlyStats>> {
    if !auth.role.can_view_reports() {
        return Err(AppError::Forbidden(
            "Only HOD or Principal can view reports".into(),
        ));
    }
    let (year, month) = params.resolve(leave.today()?)?;
    let visible = leave.list(&auth).await?;
    Ok(Json(monthly_stats(&visible, year, month)))
}
