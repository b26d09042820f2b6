use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::leave::LeaveType;

/// Identifies one employee's ledger for one calendar month (`month` is 1-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    pub employee_id: Uuid,
    pub year: i32,
    pub month: u8,
}

impl BalanceKey {
    pub fn new(employee_id: Uuid, year: i32, month: u8) -> Self {
        Self { employee_id, year, month }
    }

    /// The ledger a leave starting on `date` draws from.
    pub fn for_date(employee_id: Uuid, date: time::Date) -> Self {
        Self::new(employee_id, date.year(), u8::from(date.month()))
    }
}

impl fmt::Display for BalanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.employee_id, self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyLeaveBalance {
    pub id: String,
    pub employee_id: Uuid,
    pub year: i32,
    pub month: u8,
    pub total_monthly_allowance: u32,
    pub total_taken: u32,
    pub total_remaining: u32,
    pub per_category_taken: BTreeMap<LeaveType, u32>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl MonthlyLeaveBalance {
    /// A zero-usage record with every category present.
    pub fn fresh(key: BalanceKey, allowance: u32, now: OffsetDateTime) -> Self {
        Self {
            id: key.to_string(),
            employee_id: key.employee_id,
            year: key.year,
            month: key.month,
            total_monthly_allowance: allowance,
            total_taken: 0,
            total_remaining: allowance,
            per_category_taken: LeaveType::ALL.iter().map(|t| (*t, 0)).collect(),
            last_updated: now,
        }
    }

    pub fn key(&self) -> BalanceKey {
        BalanceKey::new(self.employee_id, self.year, self.month)
    }

    pub fn taken(&self, leave_type: LeaveType) -> u32 {
        self.per_category_taken.get(&leave_type).copied().unwrap_or(0)
    }
}
