use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Calendar date — the only time type. No time-of-day anywhere.
pub type Day = NaiveDate;

/// A stay: nights from `check_in` (inclusive) to `check_out` (exclusive).
/// Checkout day is not an occupied night, so a stay ending on day X never
/// collides with a stay starting on day X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRange {
    pub check_in: Day,
    pub check_out: Day,
}

impl StayRange {
    pub fn new(check_in: Day, check_out: Day) -> Self {
        debug_assert!(check_in < check_out, "check_in must be before check_out");
        Self { check_in, check_out }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// True interval overlap under half-open night semantics.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Returns true if `other` lies entirely within `self`, boundaries
    /// included. This is the test the read-only availability checker runs,
    /// not a general overlap test.
    pub fn contains(&self, other: &StayRange) -> bool {
        self.check_in <= other.check_in && other.check_out <= self.check_out
    }
}

// ── Entity records ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: Ulid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: Ulid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub blocked: bool,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A payment against a booking. Lives inside its booking so deleting the
/// booking takes the payment with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Ulid,
    pub amount: Decimal,
    pub paid_on: Day,
}

/// A reservation on a room. `total_price` is fixed at reservation time
/// (rate × nights) and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Ulid,
    pub guest_id: Ulid,
    pub stay: StayRange,
    pub total_price: Decimal,
    pub booking_name: String,
    pub paid: bool,
    pub payments: Vec<PaymentRecord>,
}

/// A room review. `guest_name` is free text, not a guest reference —
/// reviews are identified only by the name string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: Ulid,
    pub guest_name: String,
    pub rating: u8,
    pub comment: String,
    pub posted_on: Day,
}

/// A room and everything that cascades with it: bookings (sorted by
/// check-in) and reviews. Deleting the room is deleting this value.
#[derive(Debug, Clone)]
pub struct RoomState {
    pub id: Ulid,
    pub name: String,
    pub room_number: String,
    pub room_type: String,
    pub price_per_night: Decimal,
    pub max_occupancy: u32,
    pub amenity_ids: Vec<Ulid>,
    pub image: Option<String>,
    /// Sorted by `stay.check_in`.
    pub bookings: Vec<BookingRecord>,
    pub reviews: Vec<ReviewRecord>,
}

impl RoomState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Ulid,
        name: String,
        room_number: String,
        room_type: String,
        price_per_night: Decimal,
        max_occupancy: u32,
        image: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            room_number,
            room_type,
            price_per_night,
            max_occupancy,
            amenity_ids: Vec::new(),
            image,
            bookings: Vec::new(),
            reviews: Vec::new(),
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Insert a booking keeping the vec sorted by check-in day.
    pub fn insert_booking(&mut self, booking: BookingRecord) {
        let pos = self
            .bookings
            .binary_search_by_key(&booking.stay.check_in, |b| b.stay.check_in)
            .unwrap_or_else(|e| e);
        self.bookings.insert(pos, booking);
    }

    pub fn remove_booking(&mut self, id: Ulid) -> Option<BookingRecord> {
        let pos = self.bookings.iter().position(|b| b.id == id)?;
        Some(self.bookings.remove(pos))
    }

    pub fn booking(&self, id: Ulid) -> Option<&BookingRecord> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn booking_mut(&mut self, id: Ulid) -> Option<&mut BookingRecord> {
        self.bookings.iter_mut().find(|b| b.id == id)
    }

    /// Bookings whose stay overlaps the query range. Binary search skips
    /// everything checking in at or after the query's checkout.
    pub fn bookings_overlapping<'a>(
        &'a self,
        query: &'a StayRange,
    ) -> impl Iterator<Item = &'a BookingRecord> {
        let right_bound = self
            .bookings
            .partition_point(|b| b.stay.check_in < query.check_out);
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.stay.overlaps(query))
    }

    pub fn remove_review(&mut self, id: Ulid) -> Option<ReviewRecord> {
        let pos = self.reviews.iter().position(|r| r.id == id)?;
        Some(self.reviews.remove(pos))
    }
}

// ── WAL events ───────────────────────────────────────────────────

/// The event types — flat, no nesting. This is the WAL record format.
/// Room-scoped events carry `room_id` so replay can route them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    AmenityCreated {
        id: Ulid,
        name: String,
    },
    AmenityRenamed {
        id: Ulid,
        name: String,
    },
    AmenityDeleted {
        id: Ulid,
    },
    RoomCreated {
        id: Ulid,
        name: String,
        room_number: String,
        room_type: String,
        price_per_night: Decimal,
        max_occupancy: u32,
        image: Option<String>,
    },
    RoomUpdated {
        id: Ulid,
        name: String,
        room_number: String,
        room_type: String,
        price_per_night: Decimal,
        max_occupancy: u32,
        image: Option<String>,
    },
    RoomDeleted {
        id: Ulid,
    },
    AmenityAttached {
        room_id: Ulid,
        amenity_id: Ulid,
    },
    AmenityDetached {
        room_id: Ulid,
        amenity_id: Ulid,
    },
    GuestRegistered {
        id: Ulid,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    },
    GuestUpdated {
        id: Ulid,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    },
    GuestBlocked {
        id: Ulid,
    },
    GuestDeleted {
        id: Ulid,
    },
    BookingReserved {
        id: Ulid,
        room_id: Ulid,
        guest_id: Ulid,
        stay: StayRange,
        total_price: Decimal,
        booking_name: String,
    },
    BookingPaid {
        id: Ulid,
        room_id: Ulid,
    },
    BookingCancelled {
        id: Ulid,
        room_id: Ulid,
    },
    PaymentRecorded {
        id: Ulid,
        booking_id: Ulid,
        room_id: Ulid,
        amount: Decimal,
        paid_on: Day,
    },
    PaymentDeleted {
        id: Ulid,
        booking_id: Ulid,
        room_id: Ulid,
    },
    ReviewPosted {
        id: Ulid,
        room_id: Ulid,
        guest_name: String,
        rating: u8,
        comment: String,
        posted_on: Day,
    },
    ReviewDeleted {
        id: Ulid,
        room_id: Ulid,
    },
}

// ── Listing rows ─────────────────────────────────────────────────
//
// Flattened snapshots with related names resolved. These are what the
// filter engine evaluates and what the wire layer serializes; one entity
// produces exactly one row, so relation-traversing criteria can never
// duplicate results.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRow {
    pub id: Ulid,
    pub name: String,
    pub room_number: String,
    pub room_type: String,
    pub price_per_night: Decimal,
    pub max_occupancy: u32,
    pub amenity_names: Vec<String>,
    pub has_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRow {
    pub id: Ulid,
    pub room_id: Ulid,
    pub guest_id: Ulid,
    pub booking_name: String,
    pub guest_name: String,
    pub room_number: String,
    pub check_in: Day,
    pub check_out: Day,
    pub total_price: Decimal,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub id: Ulid,
    pub room_id: Ulid,
    pub guest_name: String,
    pub room_name: String,
    pub rating: u8,
    pub comment: String,
    pub posted_on: Day,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRow {
    pub id: Ulid,
    pub booking_id: Ulid,
    pub amount: Decimal,
    pub paid_on: Day,
    pub guest_name: String,
    pub booking_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmenityRow {
    pub id: Ulid,
    pub name: String,
    pub room_count: usize,
}
