use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{error::Result, models::department::Department, store::Store};

pub async fn list(State(store): State<Arc<dyn Store>>) -> Result<Json<Vec<Department>>> {
    let mut departments: Vec<Department> = store
        .list_departments()
        .await?
        .into_iter()
        .filter(|d| d.is_active)
        .collect();
    departments.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(departments))
}
