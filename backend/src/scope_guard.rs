//! Department-boundary checks for reviewers.
//!
//! Teachers only ever act on their own records. HODs act on records of
//! their own department when the reviewer scope is `Department`; principals
//! are never scoped.

use uuid::Uuid;

use crate::auth::AuthUser;
use crate::config::ReviewerScope;
use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::store::Store;

/// Whether `reviewer` may see and act on records belonging to `department`.
pub fn in_scope(reviewer: &AuthUser, department: &str, scope: ReviewerScope) -> bool {
    reviewer.role.can_review_leave()
        && (scope == ReviewerScope::All
            || !reviewer.role.is_department_scoped()
            || reviewer.department == department)
}

pub fn verify_reviewer(caller: &AuthUser) -> Result<()> {
    if !caller.role.can_review_leave() {
        return Err(AppError::Forbidden(
            "Only HOD or Principal can review leave applications".into(),
        ));
    }
    Ok(())
}

pub fn verify_department(reviewer: &AuthUser, department: &str, scope: ReviewerScope) -> Result<()> {
    if !in_scope(reviewer, department, scope) {
        return Err(AppError::Forbidden(
            "You can only review leave applications from your department".into(),
        ));
    }
    Ok(())
}

/// Loads `employee_id` if the caller is that employee or an in-scope reviewer.
pub async fn verify_can_view_employee(
    store: &dyn Store,
    caller: &AuthUser,
    employee_id: Uuid,
    scope: ReviewerScope,
) -> Result<User> {
    let employee = store
        .get_user(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", employee_id)))?;

    if employee.id != caller.id && !in_scope(caller, &employee.department, scope) {
        return Err(AppError::Forbidden("You cannot view this employee's records".into()));
    }
    Ok(employee)
}
