use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use super::leave::LeaveType;

/// Aggregate leave activity for one calendar month, as seen by a reviewer.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u8,
    pub total: u32,
    pub approved: u32,
    pub pending: u32,
    pub rejected: u32,
    pub by_department: BTreeMap<String, u32>,
    pub by_leave_type: BTreeMap<LeaveType, u32>,
    pub top_employees: Vec<EmployeeLeaveCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeLeaveCount {
    pub employee_id: Uuid,
    pub name: String,
    pub department: String,
    pub applications: u32,
}
