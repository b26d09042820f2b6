//! Monthly leave balance bookkeeping.
//!
//! One record per (employee, year, month), created lazily at zero usage.
//! Usage is only ever added, on approval; nothing reverses it. The balance
//! check is pooled: a request fits if its day count is within the month's
//! total remaining days, whatever its category.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use time::OffsetDateTime;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::balance::{BalanceKey, MonthlyLeaveBalance};
use crate::models::leave::LeaveType;
use crate::store::Store;

type LockTable = Arc<StdMutex<HashMap<BalanceKey, Arc<Mutex<()>>>>>;

/// One async mutex per balance key. Holding the guard serialises every
/// check-then-mutate against that employee's month. An entry lives only
/// while someone holds or waits on it.
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: LockTable,
}

impl KeyLocks {
    pub async fn acquire(&self, key: BalanceKey) -> KeyGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(key).or_default().clone()
        };
        KeyGuard {
            key,
            guard: Some(lock.lock_owned().await),
            locks: self.locks.clone(),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Releases the key on drop and forgets it once nobody else is queued.
pub struct KeyGuard {
    key: BalanceKey,
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockTable,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // the table's own handle is the only one left
        if locks.get(&self.key).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(&self.key);
        }
    }
}

pub struct BalanceLedger {
    store: Arc<dyn Store>,
    allowance: u32,
    locks: KeyLocks,
}

impl BalanceLedger {
    pub fn new(store: Arc<dyn Store>, allowance: u32) -> Self {
        Self {
            store,
            allowance,
            locks: KeyLocks::default(),
        }
    }

    pub async fn lock(&self, key: BalanceKey) -> KeyGuard {
        self.locks.acquire(key).await
    }

    /// Idempotent: an existing record is returned untouched, never reset.
    pub async fn get_or_create_balance(
        &self,
        employee_id: Uuid,
        year: i32,
        month: u8,
    ) -> Result<MonthlyLeaveBalance> {
        let key = BalanceKey::new(employee_id, year, month);
        let fresh = MonthlyLeaveBalance::fresh(key, self.allowance, OffsetDateTime::now_utc());
        self.store.get_or_insert_balance(fresh).await
    }

    /// Adds `days` of `leave_type` usage, returning the updated record.
    /// The input is left unchanged; the caller persists the result.
    pub fn apply_usage(
        balance: &MonthlyLeaveBalance,
        leave_type: LeaveType,
        days: u32,
    ) -> Result<MonthlyLeaveBalance> {
        if days > balance.total_remaining {
            return Err(insufficient(leave_type, days, balance.total_remaining));
        }

        let mut updated = balance.clone();
        *updated.per_category_taken.entry(leave_type).or_insert(0) += days;
        updated.total_taken += days;
        updated.total_remaining -= days;
        updated.last_updated = OffsetDateTime::now_utc();
        Ok(updated)
    }

    /// Fails with `InsufficientBalance` if the month of `start_date` cannot absorb `days`.
    pub async fn ensure_available(
        &self,
        employee_id: Uuid,
        start_date: time::Date,
        leave_type: LeaveType,
        days: u32,
    ) -> Result<MonthlyLeaveBalance> {
        let key = BalanceKey::for_date(employee_id, start_date);
        let balance = self
            .get_or_create_balance(key.employee_id, key.year, key.month)
            .await?;
        if days > balance.total_remaining {
            return Err(insufficient(leave_type, days, balance.total_remaining));
        }
        Ok(balance)
    }
}

fn insufficient(leave_type: LeaveType, requested: u32, remaining: u32) -> AppError {
    AppError::InsufficientBalance(format!(
        "Insufficient leave balance for {} leave: requested {} day(s), {} remaining this month",
        leave_type.as_str(),
        requested,
        remaining
    ))
}
