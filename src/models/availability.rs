use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring weekly interval during which a counselor accepts bookings.
///
/// `day_of_week` is 0-based starting on Monday (Monday=0 .. Sunday=6) and
/// `[start_time, end_time)` is half-open: a session may start at `start_time`
/// but never at `end_time`. Slots for the same counselor may overlap; the
/// store does not merge or reject them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    /// The unique identifier for the slot.
    pub id: Uuid,
    /// The counselor this slot belongs to.
    pub counselor_id: Uuid,
    /// Day of the week, Monday=0 through Sunday=6.
    pub day_of_week: i16,
    /// Start of the window (inclusive).
    pub start_time: NaiveTime,
    /// End of the window (exclusive).
    pub end_time: NaiveTime,
}
