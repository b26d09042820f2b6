use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::AuthUser,
    error::Result,
    models::slot::TimeSlot,
    services::slot_registry::SlotRegistry,
};

pub async fn list(State(slots): State<SlotRegistry>) -> Result<Json<Vec<TimeSlot>>> {
    Ok(Json(slots.list_slots().await?))
}

pub async fn book(
    State(slots): State<SlotRegistry>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TimeSlot>> {
    Ok(Json(slots.book(&id, &auth).await?))
}

pub async fn cancel(
    State(slots): State<SlotRegistry>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TimeSlot>> {
    Ok(Json(slots.cancel(&id, &auth).await?))
}
