use serde::Deserialize;

use crate::error::{AppError, Result};

/// Optional `year`/`month` query params; missing parts default to the given date's month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    pub year: Option<i32>,
    pub month: Option<u8>,
}

impl MonthParams {
    pub fn resolve(&self, today: time::Date) -> Result<(i32, u8)> {
        let year = self.year.unwrap_or_else(|| today.year());
        let month = self.month.unwrap_or_else(|| u8::from(today.month()));
        if !(1..=12).contains(&month) {
            return Err(AppError::BadRequest("month must be between 1 and 12".into()));
        }
        if !(1970..=9999).contains(&year) {
            return Err(AppError::BadRequest("year is out of range".into()));
        }
        Ok((year, month))
    }
}
