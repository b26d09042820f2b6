use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::{AppError, Result};
use crate::models::{
    balance::{BalanceKey, MonthlyLeaveBalance},
    department::Department,
    leave::LeaveApplication,
    slot::TimeSlot,
    user::{Session, User},
};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    sessions: RwLock<HashMap<String, Session>>,
    departments: RwLock<Vec<Department>>,
    applications: RwLock<HashMap<Uuid, LeaveApplication>>,
    balances: RwLock<HashMap<BalanceKey, MonthlyLeaveBalance>>,
    slots: RwLock<Vec<TimeSlot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites a balance record directly, for tests that start from prior usage.
    #[cfg(test)]
    pub(crate) async fn insert_balance(&self, balance: MonthlyLeaveBalance) {
        self.balances.write().await.insert(balance.key(), balance);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        if users.values().any(|u| u.employee_id == user.employee_id) {
            return Err(AppError::Conflict("Employee ID already exists".into()));
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn put_session(&self, session: Session) -> Result<()> {
        let now = OffsetDateTime::now_utc();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn get_session(&self, token_hash: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool> {
        Ok(self.sessions.write().await.remove(token_hash).is_some())
    }

    async fn put_department(&self, department: Department) -> Result<()> {
        let mut departments = self.departments.write().await;
        match departments.iter_mut().find(|d| d.id == department.id) {
            Some(existing) => *existing = department,
            None => departments.push(department),
        }
        Ok(())
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        Ok(self.departments.read().await.clone())
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<LeaveApplication>> {
        Ok(self.applications.read().await.get(&id).cloned())
    }

    async fn put_application(&self, application: LeaveApplication) -> Result<()> {
        self.applications
            .write()
            .await
            .insert(application.id, application);
        Ok(())
    }

    async fn query_applications(
        &self,
        filter: &(dyn for<'a> Fn(&'a LeaveApplication) -> bool + Send + Sync),
    ) -> Result<Vec<LeaveApplication>> {
        let applications = self.applications.read().await;
        Ok(applications.values().filter(|a| filter(a)).cloned().collect())
    }

    async fn get_or_insert_balance(&self, fresh: MonthlyLeaveBalance) -> Result<MonthlyLeaveBalance> {
        let mut balances = self.balances.write().await;
        Ok(balances.entry(fresh.key()).or_insert(fresh).clone())
    }

    async fn commit_review(
        &self,
        application: LeaveApplication,
        balance: Option<MonthlyLeaveBalance>,
    ) -> Result<()> {
        // applications before balances, always
        let mut applications = self.applications.write().await;
        let mut balances = self.balances.write().await;
        if let Some(balance) = balance {
            balances.insert(balance.key(), balance);
        }
        applications.insert(application.id, application);
        Ok(())
    }

    async fn list_slots(&self) -> Result<Vec<TimeSlot>> {
        Ok(self.slots.read().await.clone())
    }

    async fn get_slot(&self, id: &str) -> Result<Option<TimeSlot>> {
        Ok(self.slots.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn put_slot(&self, slot: TimeSlot) -> Result<()> {
        let mut slots = self.slots.write().await;
        match slots.iter_mut().find(|s| s.id == slot.id) {
            Some(existing) => *existing = slot,
            None => slots.push(slot),
        }
        Ok(())
    }
}
