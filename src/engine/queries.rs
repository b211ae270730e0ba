use crate::model::*;

use super::availability::{judge_history, Availability};
use super::filter::*;
use super::{Engine, EngineError, SharedRoomState};

impl Engine {
    fn room_states(&self) -> Vec<SharedRoomState> {
        // Clone the Arcs out first; never hold a DashMap shard guard
        // across an await.
        self.rooms.iter().map(|e| e.value().clone()).collect()
    }

    // ── Availability Checker ─────────────────────────────

    /// Answer "can this room be booked for this range?" from booking
    /// history. Missing inputs short-circuit before any state is read.
    ///
    /// The room reference matches by case-insensitive name substring or
    /// exact room id, and existence is judged from booking history — a
    /// room that exists in the catalog but was never booked answers
    /// RoomNotFound. The write path (`reserve_if_available`) resolves
    /// rooms from the catalog instead.
    pub async fn check_availability(
        &self,
        room_ref: Option<&str>,
        check_in: Option<Day>,
        check_out: Option<Day>,
    ) -> Availability {
        let (Some(room_ref), Some(check_in), Some(check_out)) = (room_ref, check_in, check_out)
        else {
            return Availability::InsufficientInput;
        };
        if room_ref.is_empty() {
            return Availability::InsufficientInput;
        }
        // Built without ordering checks: a reversed range is answered,
        // not rejected — containment then simply never holds.
        let requested = StayRange { check_in, check_out };

        let mut stays = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            let referenced = contains_ci(&guard.name, room_ref)
                || guard.id.to_string().eq_ignore_ascii_case(room_ref);
            if referenced {
                stays.extend(guard.bookings.iter().map(|b| b.stay));
            }
        }
        judge_history(stays.iter(), &requested)
    }

    // ── Filtered listings ────────────────────────────────

    async fn snapshot_rooms(&self) -> Vec<RoomRow> {
        let mut rows = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            let amenity_names = guard
                .amenity_ids
                .iter()
                .filter_map(|id| self.amenities.get(id).map(|a| a.name.clone()))
                .collect();
            rows.push(RoomRow {
                id: guard.id,
                name: guard.name.clone(),
                room_number: guard.room_number.clone(),
                room_type: guard.room_type.clone(),
                price_per_night: guard.price_per_night,
                max_occupancy: guard.max_occupancy,
                amenity_names,
                has_image: guard.has_image(),
            });
        }
        // Cheapest first, matching the public room listing.
        rows.sort_by(|a, b| {
            a.price_per_night
                .cmp(&b.price_per_night)
                .then(a.id.cmp(&b.id))
        });
        rows
    }

    async fn snapshot_bookings(&self) -> Vec<BookingRow> {
        let mut rows = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            for b in &guard.bookings {
                let guest_name = self
                    .guests
                    .get(&b.guest_id)
                    .map(|g| g.full_name())
                    .unwrap_or_default();
                rows.push(BookingRow {
                    id: b.id,
                    room_id: guard.id,
                    guest_id: b.guest_id,
                    booking_name: b.booking_name.clone(),
                    guest_name,
                    room_number: guard.room_number.clone(),
                    check_in: b.stay.check_in,
                    check_out: b.stay.check_out,
                    total_price: b.total_price,
                    paid: b.paid,
                });
            }
        }
        rows.sort_by(|a, b| a.check_in.cmp(&b.check_in).then(a.id.cmp(&b.id)));
        rows
    }

    async fn snapshot_reviews(&self) -> Vec<ReviewRow> {
        let mut rows = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            for r in &guard.reviews {
                rows.push(ReviewRow {
                    id: r.id,
                    room_id: guard.id,
                    guest_name: r.guest_name.clone(),
                    room_name: guard.name.clone(),
                    rating: r.rating,
                    comment: r.comment.clone(),
                    posted_on: r.posted_on,
                });
            }
        }
        rows.sort_by(|a, b| a.posted_on.cmp(&b.posted_on).then(a.id.cmp(&b.id)));
        rows
    }

    async fn snapshot_payments(&self) -> Vec<PaymentRow> {
        let mut rows = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            for b in &guard.bookings {
                let guest_name = self
                    .guests
                    .get(&b.guest_id)
                    .map(|g| g.full_name())
                    .unwrap_or_default();
                for p in &b.payments {
                    rows.push(PaymentRow {
                        id: p.id,
                        booking_id: b.id,
                        amount: p.amount,
                        paid_on: p.paid_on,
                        guest_name: guest_name.clone(),
                        booking_name: b.booking_name.clone(),
                    });
                }
            }
        }
        rows.sort_by(|a, b| a.paid_on.cmp(&b.paid_on).then(a.id.cmp(&b.id)));
        rows
    }

    fn snapshot_guests(&self) -> Vec<Guest> {
        let mut rows: Vec<Guest> = self.guests.iter().map(|e| e.value().clone()).collect();
        rows.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        rows
    }

    async fn snapshot_amenities(&self) -> Vec<AmenityRow> {
        let mut counts = std::collections::HashMap::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            for id in &guard.amenity_ids {
                *counts.entry(*id).or_insert(0usize) += 1;
            }
        }
        let mut rows: Vec<AmenityRow> = self
            .amenities
            .iter()
            .map(|e| {
                let a = e.value();
                AmenityRow {
                    id: a.id,
                    name: a.name.clone(),
                    room_count: counts.get(&a.id).copied().unwrap_or(0),
                }
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        rows
    }

    pub async fn list_rooms(&self, raw: &RawCriteria) -> Result<Vec<RoomRow>, EngineError> {
        let expr = RoomCriteria::parse(raw)?.build();
        let mut rows = self.snapshot_rooms().await;
        rows.retain(|r| expr.matches(r));
        Ok(rows)
    }

    pub async fn list_bookings(&self, raw: &RawCriteria) -> Result<Vec<BookingRow>, EngineError> {
        let expr = BookingCriteria::parse(raw)?.build();
        let mut rows = self.snapshot_bookings().await;
        rows.retain(|r| expr.matches(r));
        Ok(rows)
    }

    pub async fn list_reviews(&self, raw: &RawCriteria) -> Result<Vec<ReviewRow>, EngineError> {
        let expr = ReviewCriteria::parse(raw)?.build();
        let mut rows = self.snapshot_reviews().await;
        rows.retain(|r| expr.matches(r));
        Ok(rows)
    }

    pub async fn list_payments(&self, raw: &RawCriteria) -> Result<Vec<PaymentRow>, EngineError> {
        let expr = PaymentCriteria::parse(raw)?.build();
        let mut rows = self.snapshot_payments().await;
        rows.retain(|r| expr.matches(r));
        Ok(rows)
    }

    pub async fn list_guests(&self, raw: &RawCriteria) -> Result<Vec<Guest>, EngineError> {
        let expr = GuestCriteria::parse(raw)?.build();
        let mut rows = self.snapshot_guests();
        rows.retain(|r| expr.matches(r));
        Ok(rows)
    }

    pub async fn list_amenities(&self, raw: &RawCriteria) -> Result<Vec<AmenityRow>, EngineError> {
        let expr = AmenityCriteria::parse(raw)?.build();
        let mut rows = self.snapshot_amenities().await;
        rows.retain(|r| expr.matches(r));
        Ok(rows)
    }

    // ── Reports ──────────────────────────────────────────

    /// Bookings whose stay covers the given day.
    pub async fn active_bookings(&self, on: Day) -> Vec<BookingRow> {
        let mut rows = self.snapshot_bookings().await;
        rows.retain(|b| b.check_in <= on && b.check_out >= on);
        rows
    }

    /// Five-star reviews, newest first, capped at ten.
    pub async fn top_reviews(&self) -> Vec<ReviewRow> {
        let mut rows = self.snapshot_reviews().await;
        rows.retain(|r| r.rating == 5);
        rows.sort_by(|a, b| b.posted_on.cmp(&a.posted_on).then(a.id.cmp(&b.id)));
        rows.truncate(10);
        rows
    }

    /// Amenities furnishing at least five rooms.
    pub async fn popular_amenities(&self) -> Vec<AmenityRow> {
        let mut rows = self.snapshot_amenities().await;
        rows.retain(|a| a.room_count >= 5);
        rows
    }

    /// Last five registered guests, newest first. Ulids order by creation
    /// time.
    pub fn recent_guests(&self) -> Vec<Guest> {
        let mut rows: Vec<Guest> = self.guests.iter().map(|e| e.value().clone()).collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(5);
        rows
    }

    /// Last five payments by payment date.
    pub async fn recent_payments(&self) -> Vec<PaymentRow> {
        let mut rows = self.snapshot_payments().await;
        rows.sort_by(|a, b| b.paid_on.cmp(&a.paid_on).then(a.id.cmp(&b.id)));
        rows.truncate(5);
        rows
    }
}
