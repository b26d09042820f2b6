use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    models::leave::{CreateLeaveRequest, LeaveApplication, LeaveApplicationView, ReviewLeaveRequest},
    services::leave_workflow::LeaveWorkflow,
};

pub async fn list(
    State(leave): State<LeaveWorkflow>,
    auth: AuthUser,
) -> Result<Json<Vec<LeaveApplicationView>>> {
    Ok(Json(leave.list(&auth).await?))
}

pub async fn get_one(
    State(leave): State<LeaveWorkflow>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LeaveApplicationView>> {
    Ok(Json(leave.get(id, &auth).await?))
}

pub async fn create(
    State(leave): State<LeaveWorkflow>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<CreateLeaveRequest>, AppError>,
) -> Result<Json<LeaveApplication>> {
    body.validate()?;
    let today = leave.today()?;
    Ok(Json(leave.submit(&auth, body, today).await?))
}

pub async fn approve(
    State(leave): State<LeaveWorkflow>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<ReviewLeaveRequest>>,
) -> Result<Json<LeaveApplication>> {
    let comments = body.and_then(|Json(b)| b.comments);
    Ok(Json(leave.approve(id, &auth, comments).await?))
}

pub async fn reject(
    State(leave): State<LeaveWorkflow>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<ReviewLeaveRequest>>,
) -> Result<Json<LeaveApplication>> {
    let comments = body.and_then(|Json(b)| b.comments);
    Ok(Json(leave.reject(id, &auth, comments).await?))
}
