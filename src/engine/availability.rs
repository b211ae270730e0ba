use crate::model::StayRange;

// ── Availability Checker ─────────────────────────────────────────
//
// Read-only. Room existence is judged from booking history, not the room
// catalog: a room that was never booked answers RoomNotFound even though
// it exists. Callers wanting catalog truth use the reserve path instead.

/// Outcome of an availability check. All four are ordinary values — none
/// of them is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Room reference or one of the dates was missing.
    InsufficientInput,
    /// No booking history on any room matching the reference.
    RoomNotFound,
    /// An existing booking lies entirely inside the requested range.
    AlreadyBooked,
    Available,
}

impl Availability {
    pub fn label(&self) -> &'static str {
        match self {
            Availability::InsufficientInput => "insufficient_input",
            Availability::RoomNotFound => "room_not_found",
            Availability::AlreadyBooked => "already_booked",
            Availability::Available => "available",
        }
    }

    pub fn message(&self, room_ref: &str) -> String {
        match self {
            Availability::InsufficientInput => "Not enough conditions.".into(),
            Availability::RoomNotFound => format!("Room '{room_ref}' not found."),
            Availability::AlreadyBooked => "This room is already booked.".into(),
            Availability::Available => "This room is ready to book.".into(),
        }
    }
}

/// Decide availability from the stays booked on every room matching the
/// reference. Empty history means the room is unknown here. A stay counts
/// as blocking only when the requested range fully contains it, boundary
/// equality included — partial overlap does not block.
pub fn judge_history<'a, I>(stays: I, requested: &StayRange) -> Availability
where
    I: IntoIterator<Item = &'a StayRange>,
{
    let mut any_history = false;
    for stay in stays {
        any_history = true;
        if requested.contains(stay) {
            return Availability::AlreadyBooked;
        }
    }
    if any_history {
        Availability::Available
    } else {
        Availability::RoomNotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Day;

    fn stay(ci: &str, co: &str) -> StayRange {
        StayRange::new(ci.parse::<Day>().unwrap(), co.parse::<Day>().unwrap())
    }

    #[test]
    fn no_history_is_room_not_found() {
        let requested = stay("2024-02-01", "2024-02-05");
        assert_eq!(judge_history([], &requested), Availability::RoomNotFound);
    }

    #[test]
    fn exact_boundary_containment_is_booked() {
        let existing = stay("2024-01-03", "2024-01-05");
        let requested = stay("2024-01-03", "2024-01-05");
        assert_eq!(
            judge_history([&existing], &requested),
            Availability::AlreadyBooked
        );
    }

    #[test]
    fn contained_booking_is_booked() {
        let existing = stay("2024-01-03", "2024-01-05");
        let requested = stay("2024-01-01", "2024-01-10");
        assert_eq!(
            judge_history([&existing], &requested),
            Availability::AlreadyBooked
        );
    }

    #[test]
    fn partial_overlap_does_not_block() {
        // The existing stay sticks out of the requested range, so the
        // containment rule lets it through.
        let existing = stay("2024-01-03", "2024-01-08");
        let requested = stay("2024-01-05", "2024-01-10");
        assert_eq!(
            judge_history([&existing], &requested),
            Availability::Available
        );
    }

    #[test]
    fn disjoint_history_is_available() {
        let existing = stay("2024-01-03", "2024-01-05");
        let requested = stay("2024-02-01", "2024-02-05");
        assert_eq!(
            judge_history([&existing], &requested),
            Availability::Available
        );
    }

    #[test]
    fn any_contained_stay_wins_over_others() {
        let far = stay("2023-11-01", "2023-11-03");
        let inside = stay("2024-01-04", "2024-01-06");
        let requested = stay("2024-01-01", "2024-01-10");
        assert_eq!(
            judge_history([&far, &inside], &requested),
            Availability::AlreadyBooked
        );
    }
}
