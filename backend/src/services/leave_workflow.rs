//! Leave application lifecycle: `pending -> approved | rejected`, nothing else.
//!
//! Every review happens while holding the ledger lock for the application's
//! balance key, and re-reads the application under that lock, so two
//! reviewers racing on the same application (or on two applications drawing
//! from the same month) are applied one after the other.

use std::sync::Arc;

use chrono::Datelike;
use chrono_tz::Tz;
use futures::future::try_join_all;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::config::ReviewerScope;
use crate::error::{AppError, Result};
use crate::models::balance::BalanceKey;
use crate::models::leave::{
    inclusive_days, CreateLeaveRequest, LeaveApplication, LeaveApplicationView, LeaveStatus,
};
use crate::scope_guard;
use crate::services::ledger::BalanceLedger;
use crate::store::Store;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Clone)]
pub struct LeaveWorkflow {
    store: Arc<dyn Store>,
    ledger: Arc<BalanceLedger>,
    scope: ReviewerScope,
    timezone: Tz,
}

impl LeaveWorkflow {
    pub fn new(
        store: Arc<dyn Store>,
        ledger: Arc<BalanceLedger>,
        scope: ReviewerScope,
        timezone: Tz,
    ) -> Self {
        Self {
            store,
            ledger,
            scope,
            timezone,
        }
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// The current calendar date in the configured timezone.
    pub fn today(&self) -> Result<time::Date> {
        let local = chrono::Utc::now().with_timezone(&self.timezone).date_naive();
        let month = time::Month::try_from(local.month() as u8)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid month: {}", e)))?;
        time::Date::from_calendar_date(local.year(), month, local.day() as u8)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid date: {}", e)))
    }

    /// Creates a pending application. The ledger is consulted, not modified.
    pub async fn submit(
        &self,
        applicant: &AuthUser,
        req: CreateLeaveRequest,
        today: time::Date,
    ) -> Result<LeaveApplication> {
        let reason = req.reason.trim();
        if reason.is_empty() {
            return Err(AppError::BadRequest("Reason is required".into()));
        }
        if req.start_date < today {
            return Err(AppError::PastDate);
        }
        let days_count = inclusive_days(req.start_date, req.end_date).ok_or(AppError::InvalidRange)?;

        self.ledger
            .ensure_available(applicant.id, req.start_date, req.leave_type, days_count)
            .await?;

        let now = OffsetDateTime::now_utc();
        let application = LeaveApplication {
            id: Uuid::new_v4(),
            employee_id: applicant.id,
            start_date: req.start_date,
            end_date: req.end_date,
            leave_type: req.leave_type,
            reason: reason.to_string(),
            status: LeaveStatus::Pending,
            applied_at: now,
            reviewed_by: None,
            reviewed_at: None,
            review_comments: None,
            days_count,
            attachments: req.attachments,
            updated_at: now,
        };
        self.store.put_application(application.clone()).await?;

        tracing::info!(
            application_id = %application.id,
            employee_id = %applicant.id,
            leave_type = application.leave_type.as_str(),
            days = days_count,
            "Leave application submitted"
        );
        Ok(application)
    }

    pub async fn approve(
        &self,
        id: Uuid,
        reviewer: &AuthUser,
        comments: Option<String>,
    ) -> Result<LeaveApplication> {
        self.review(id, reviewer, comments, Decision::Approve).await
    }

    pub async fn reject(
        &self,
        id: Uuid,
        reviewer: &AuthUser,
        comments: Option<String>,
    ) -> Result<LeaveApplication> {
        self.review(id, reviewer, comments, Decision::Reject).await
    }

    async fn review(
        &self,
        id: Uuid,
        reviewer: &AuthUser,
        comments: Option<String>,
        decision: Decision,
    ) -> Result<LeaveApplication> {
        scope_guard::verify_reviewer(reviewer)?;

        let found = self.load(id).await?;
        if found.status != LeaveStatus::Pending {
            return Err(AppError::AlreadyProcessed);
        }
        let applicant_department = self
            .store
            .get_user(found.employee_id)
            .await?
            .map(|u| u.department)
            .unwrap_or_default();
        scope_guard::verify_department(reviewer, &applicant_department, self.scope)?;

        let key = BalanceKey::for_date(found.employee_id, found.start_date);
        let _guard = self.ledger.lock(key).await;

        let mut application = self.load(id).await?;
        if application.status != LeaveStatus::Pending {
            tracing::warn!(application_id = %id, reviewer_id = %reviewer.id, "Review of processed application refused");
            return Err(AppError::AlreadyProcessed);
        }

        let now = OffsetDateTime::now_utc();
        let new_balance = match decision {
            Decision::Approve => {
                let balance = self
                    .ledger
                    .get_or_create_balance(key.employee_id, key.year, key.month)
                    .await?;
                Some(BalanceLedger::apply_usage(
                    &balance,
                    application.leave_type,
                    application.days_count,
                )?)
            }
            Decision::Reject => None,
        };

        application.status = match decision {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        };
        application.reviewed_by = Some(reviewer.id);
        application.reviewed_at = Some(now);
        application.review_comments = Some(comments.unwrap_or_default());
        application.updated_at = now;

        if let Some(balance) = &new_balance {
            tracing::info!(
                balance_id = %balance.id,
                taken = balance.total_taken,
                remaining = balance.total_remaining,
                "Leave balance updated"
            );
        }
        self.store
            .commit_review(application.clone(), new_balance)
            .await?;

        tracing::info!(
            application_id = %id,
            reviewer_id = %reviewer.id,
            decision = ?decision,
            "Leave application reviewed"
        );
        Ok(application)
    }

    /// Teachers see their own applications; reviewers see everything in scope,
    /// pending first. Within a group, newest first.
    pub async fn list(&self, viewer: &AuthUser) -> Result<Vec<LeaveApplicationView>> {
        let is_reviewer = viewer.role.can_review_leave();
        let viewer_id = viewer.id;
        let applications = self
            .store
            .query_applications(&move |a: &LeaveApplication| is_reviewer || a.employee_id == viewer_id)
            .await?;

        let mut views: Vec<LeaveApplicationView> =
            try_join_all(applications.into_iter().map(|a| self.augment(a)))
                .await?
                .into_iter()
                .filter(|v| !is_reviewer || scope_guard::in_scope(viewer, &v.employee_department, self.scope))
                .collect();

        if is_reviewer {
            views.sort_by(|a, b| {
                let a_pending = a.application.status == LeaveStatus::Pending;
                let b_pending = b.application.status == LeaveStatus::Pending;
                b_pending
                    .cmp(&a_pending)
                    .then_with(|| b.application.applied_at.cmp(&a.application.applied_at))
            });
        } else {
            views.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at));
        }
        Ok(views)
    }

    pub async fn get(&self, id: Uuid, viewer: &AuthUser) -> Result<LeaveApplicationView> {
        let view = self.augment(self.load(id).await?).await?;
        if view.application.employee_id != viewer.id
            && !scope_guard::in_scope(viewer, &view.employee_department, self.scope)
        {
            return Err(AppError::Forbidden(
                "You cannot view this leave application".into(),
            ));
        }
        Ok(view)
    }

    async fn load(&self, id: Uuid) -> Result<LeaveApplication> {
        self.store
            .get_application(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Leave application {} not found", id)))
    }

    async fn augment(&self, application: LeaveApplication) -> Result<LeaveApplicationView> {
        let employee = self.store.get_user(application.employee_id).await?;
        let (employee_name, employee_department) = match employee {
            Some(u) => (u.name, u.department),
            None => ("Unknown".to_string(), "Unknown".to_string()),
        };
        Ok(LeaveApplicationView {
            application,
            employee_name,
            employee_department,
        })
    }
}
