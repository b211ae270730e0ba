use crate::model::*;

use super::EngineError;

pub(crate) fn today() -> Day {
    chrono::Utc::now().date_naive()
}

/// Overlap check backing the atomic reserve path. Unlike the read-only
/// availability checker this is a true interval test: any shared night is
/// a conflict. Caller holds the room's write lock, so the answer stays
/// valid until the booking is applied.
pub(crate) fn check_no_overlap(room: &RoomState, stay: &StayRange) -> Result<(), EngineError> {
    if let Some(existing) = room.bookings_overlapping(stay).next() {
        return Err(EngineError::AlreadyBooked(existing.id));
    }
    Ok(())
}
