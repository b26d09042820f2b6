use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

/// Leave categories. Every category draws from the same monthly allowance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Casual,
    Sick,
    Emergency,
    Other,
}

impl LeaveType {
    pub const ALL: [LeaveType; 4] = [
        LeaveType::Casual,
        LeaveType::Sick,
        LeaveType::Emergency,
        LeaveType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Casual => "casual",
            LeaveType::Sick => "sick",
            LeaveType::Emergency => "emergency",
            LeaveType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveApplication {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_date: time::Date,
    pub end_date: time::Date,
    pub leave_type: LeaveType,
    pub reason: String,
    pub status: LeaveStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub applied_at: OffsetDateTime,
    pub reviewed_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub reviewed_at: Option<OffsetDateTime>,
    pub review_comments: Option<String>,
    pub days_count: u32,
    pub attachments: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Inclusive day span between two dates; `None` when `end` precedes `start`.
pub fn inclusive_days(start: time::Date, end: time::Date) -> Option<u32> {
    let span = (end - start).whole_days();
    u32::try_from(span).ok().map(|d| d + 1)
}

/// Application with the applicant's display details filled in from the user store.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveApplicationView {
    #[serde(flatten)]
    pub application: LeaveApplication,
    pub employee_name: String,
    pub employee_department: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeaveRequest {
    pub start_date: time::Date,
    pub end_date: time::Date,
    pub leave_type: LeaveType,
    #[validate(length(max = 2000, message = "Reason must be at most 2000 characters"))]
    pub reason: String,
    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 attachments are allowed"))]
    pub attachments: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewLeaveRequest {
    pub comments: Option<String>,
}
