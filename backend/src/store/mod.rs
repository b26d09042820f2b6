//! Storage interface for every collection the service owns.
//!
//! Handlers and services only talk to `dyn Store`; the process ships with
//! [`MemoryStore`]. Implementations must make each single call atomic. Any
//! multi-step read-modify-write is serialised by the caller (see
//! `services::ledger::KeyLocks`).

mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    balance::MonthlyLeaveBalance,
    department::Department,
    leave::LeaveApplication,
    slot::TimeSlot,
    user::{Session, User},
};

pub use memory::MemoryStore;

#[async_trait]
pub trait Store: Send + Sync {
    // -- Users --

    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Inserts a new user; fails with `Conflict` if the email or employee id is taken.
    async fn insert_user(&self, user: User) -> Result<()>;

    // -- Sessions --

    /// Stores `session` and drops any sessions that have already expired.
    async fn put_session(&self, session: Session) -> Result<()>;

    async fn get_session(&self, token_hash: &str) -> Result<Option<Session>>;

    /// Returns whether a session was removed.
    async fn delete_session(&self, token_hash: &str) -> Result<bool>;

    // -- Departments --

    async fn put_department(&self, department: Department) -> Result<()>;

    async fn list_departments(&self) -> Result<Vec<Department>>;

    // -- Leave applications --

    async fn get_application(&self, id: Uuid) -> Result<Option<LeaveApplication>>;

    async fn put_application(&self, application: LeaveApplication) -> Result<()>;

    async fn query_applications(
        &self,
        filter: &(dyn for<'a> Fn(&'a LeaveApplication) -> bool + Send + Sync),
    ) -> Result<Vec<LeaveApplication>>;

    // -- Leave balances --

    /// Returns the stored record for `fresh.key()`, inserting `fresh` only if none exists.
    async fn get_or_insert_balance(&self, fresh: MonthlyLeaveBalance) -> Result<MonthlyLeaveBalance>;

    /// Writes a reviewed application together with the balance it charged,
    /// all or nothing.
    async fn commit_review(
        &self,
        application: LeaveApplication,
        balance: Option<MonthlyLeaveBalance>,
    ) -> Result<()>;

    // -- Time slots --

    /// Slots in schedule order.
    async fn list_slots(&self) -> Result<Vec<TimeSlot>>;

    async fn get_slot(&self, id: &str) -> Result<Option<TimeSlot>>;

    /// Replaces the slot with the same id, or appends it to the schedule.
    async fn put_slot(&self, slot: TimeSlot) -> Result<()>;
}
