//! Daily booking board: a fixed set of half-hour slots, each either free or
//! held by exactly one user. Only the holder may release a slot.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::slot::TimeSlot;
use crate::store::Store;

const FIRST_HOUR: u8 = 9;
const LAST_HOUR: u8 = 17;

/// 09:00 through 16:30 in 30-minute steps.
pub fn daily_schedule() -> Vec<TimeSlot> {
    (FIRST_HOUR..LAST_HOUR)
        .flat_map(|hour| [0, 30].map(|minute| TimeSlot::available(hour, minute)))
        .collect()
}

#[derive(Clone)]
pub struct SlotRegistry {
    store: Arc<dyn Store>,
    // book/cancel are check-then-set; this makes them atomic
    write_lock: Arc<Mutex<()>>,
}

impl SlotRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Writes the daily schedule into an empty store. Existing slots are kept.
    pub async fn install_schedule(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !self.store.list_slots().await?.is_empty() {
            return Ok(());
        }
        let schedule = daily_schedule();
        let count = schedule.len();
        for slot in schedule {
            self.store.put_slot(slot).await?;
        }
        tracing::info!(slots = count, "Daily slot schedule installed");
        Ok(())
    }

    pub async fn list_slots(&self) -> Result<Vec<TimeSlot>> {
        self.store.list_slots().await
    }

    pub async fn book(&self, slot_id: &str, who: &AuthUser) -> Result<TimeSlot> {
        let _guard = self.write_lock.lock().await;
        let mut slot = self.load(slot_id).await?;
        if slot.is_booked {
            return Err(AppError::AlreadyBooked(slot.id));
        }

        slot.is_booked = true;
        slot.booked_by = Some(who.id);
        slot.booked_by_name = Some(who.name.clone());
        self.store.put_slot(slot.clone()).await?;

        tracing::info!(slot_id = %slot.id, user_id = %who.id, "Slot booked");
        Ok(slot)
    }

    pub async fn cancel(&self, slot_id: &str, who: &AuthUser) -> Result<TimeSlot> {
        let _guard = self.write_lock.lock().await;
        let mut slot = self.load(slot_id).await?;
        if !slot.is_booked {
            return Err(AppError::NotBooked(slot.id));
        }
        if slot.booked_by != Some(who.id) {
            tracing::warn!(slot_id = %slot.id, user_id = %who.id, "Cancel of another user's booking refused");
            return Err(AppError::Forbidden(
                "You can only cancel your own booking".into(),
            ));
        }

        slot.is_booked = false;
        slot.booked_by = None;
        slot.booked_by_name = None;
        self.store.put_slot(slot.clone()).await?;

        tracing::info!(slot_id = %slot.id, user_id = %who.id, "Slot booking cancelled");
        Ok(slot)
    }

    async fn load(&self, slot_id: &str) -> Result<TimeSlot> {
        self.store
            .get_slot(slot_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Time slot {} not found", slot_id)))
    }
}
