use serde::Serialize;
use uuid::Uuid;

/// One half-hour slot on the daily booking board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlot {
    pub id: String,
    pub time: String,
    pub is_booked: bool,
    pub booked_by: Option<Uuid>,
    pub booked_by_name: Option<String>,
}

impl TimeSlot {
    pub fn available(hour: u8, minute: u8) -> Self {
        Self {
            id: format!("slot-{}-{:02}", hour, minute),
            time: clock_label(hour, minute),
            is_booked: false,
            booked_by: None,
            booked_by_name: None,
        }
    }
}

/// 12-hour label, e.g. `9:30 AM`, `12:00 PM`, `4:30 PM`.
fn clock_label(hour: u8, minute: u8) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display, minute, suffix)
}
