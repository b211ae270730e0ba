use rust_decimal::Decimal;
use tokio::sync::oneshot;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::conflict::{check_no_overlap, today};
use super::validate::*;
use super::{Engine, EngineError, WalCommand};

impl Engine {
    // ── Amenities ────────────────────────────────────────

    pub async fn create_amenity(&self, id: Ulid, name: String) -> Result<(), EngineError> {
        if self.amenities.len() >= MAX_AMENITIES_PER_TENANT {
            return Err(EngineError::LimitExceeded("too many amenities"));
        }
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(EngineError::validation("name", "empty or too long"));
        }
        if self.amenities.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }
        let event = Event::AmenityCreated { id, name: name.clone() };
        self.wal_append(&event).await?;
        self.amenities.insert(id, Amenity { id, name });
        Ok(())
    }

    pub async fn rename_amenity(&self, id: Ulid, name: String) -> Result<(), EngineError> {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(EngineError::validation("name", "empty or too long"));
        }
        if !self.amenities.contains_key(&id) {
            return Err(EngineError::NotFound(id));
        }
        let event = Event::AmenityRenamed { id, name: name.clone() };
        self.wal_append(&event).await?;
        if let Some(mut a) = self.amenities.get_mut(&id) {
            a.name = name;
        }
        Ok(())
    }

    /// Delete an amenity and detach it from every room furnishing it.
    pub async fn delete_amenity(&self, id: Ulid) -> Result<(), EngineError> {
        if !self.amenities.contains_key(&id) {
            return Err(EngineError::NotFound(id));
        }
        let event = Event::AmenityDeleted { id };
        self.wal_append(&event).await?;
        self.amenities.remove(&id);
        let rooms: Vec<_> = self.rooms.iter().map(|e| e.value().clone()).collect();
        for rs in rooms {
            let mut guard = rs.write().await;
            guard.amenity_ids.retain(|a| a != &id);
        }
        Ok(())
    }

    // ── Rooms ────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub async fn create_room(
        &self,
        id: Ulid,
        name: String,
        room_number: String,
        room_type: String,
        price_per_night: Decimal,
        max_occupancy: u32,
        image: Option<String>,
    ) -> Result<(), EngineError> {
        if self.rooms.len() >= MAX_ROOMS_PER_TENANT {
            return Err(EngineError::LimitExceeded("too many rooms"));
        }
        validate_room(
            &name,
            &room_number,
            &room_type,
            price_per_night,
            max_occupancy,
            image.as_deref(),
        )?;
        if self.rooms.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }

        let event = Event::RoomCreated {
            id,
            name: name.clone(),
            room_number: room_number.clone(),
            room_type: room_type.clone(),
            price_per_night,
            max_occupancy,
            image: image.clone(),
        };
        self.wal_append(&event).await?;
        let rs = RoomState::new(id, name, room_number, room_type, price_per_night, max_occupancy, image);
        self.rooms.insert(id, std::sync::Arc::new(tokio::sync::RwLock::new(rs)));
        self.notify.send(id, &event);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_room(
        &self,
        id: Ulid,
        name: String,
        room_number: String,
        room_type: String,
        price_per_night: Decimal,
        max_occupancy: u32,
        image: Option<String>,
    ) -> Result<(), EngineError> {
        validate_room(
            &name,
            &room_number,
            &room_type,
            price_per_night,
            max_occupancy,
            image.as_deref(),
        )?;
        let rs = self.get_room(&id).ok_or(EngineError::NotFound(id))?;
        let mut guard = rs.write().await;
        let event = Event::RoomUpdated {
            id,
            name,
            room_number,
            room_type,
            price_per_night,
            max_occupancy,
            image,
        };
        self.persist_and_apply(id, &mut guard, &event).await
    }

    /// Delete a room. Its bookings (with their payments) and reviews go
    /// with it.
    pub async fn delete_room(&self, id: Ulid) -> Result<(), EngineError> {
        let rs = self.get_room(&id).ok_or(EngineError::NotFound(id))?;
        let guard = rs.write().await;

        let event = Event::RoomDeleted { id };
        self.wal_append(&event).await?;
        self.unindex_room(&guard);
        drop(guard);
        self.rooms.remove(&id);
        self.notify.send(id, &event);
        self.notify.remove(&id);
        Ok(())
    }

    /// Attach an amenity to a room. Attaching twice is a no-op success.
    pub async fn attach_amenity(&self, room_id: Ulid, amenity_id: Ulid) -> Result<(), EngineError> {
        if !self.amenities.contains_key(&amenity_id) {
            return Err(EngineError::NotFound(amenity_id));
        }
        let rs = self.get_room(&room_id).ok_or(EngineError::NotFound(room_id))?;
        let mut guard = rs.write().await;
        if guard.amenity_ids.contains(&amenity_id) {
            return Ok(());
        }
        let event = Event::AmenityAttached { room_id, amenity_id };
        self.persist_and_apply(room_id, &mut guard, &event).await
    }

    /// Detach an amenity from a room. Detaching an absent one is a no-op.
    pub async fn detach_amenity(&self, room_id: Ulid, amenity_id: Ulid) -> Result<(), EngineError> {
        let rs = self.get_room(&room_id).ok_or(EngineError::NotFound(room_id))?;
        let mut guard = rs.write().await;
        if !guard.amenity_ids.contains(&amenity_id) {
            return Ok(());
        }
        let event = Event::AmenityDetached { room_id, amenity_id };
        self.persist_and_apply(room_id, &mut guard, &event).await
    }

    // ── Guests ───────────────────────────────────────────

    pub async fn register_guest(
        &self,
        id: Ulid,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    ) -> Result<(), EngineError> {
        if self.guests.len() >= MAX_GUESTS_PER_TENANT {
            return Err(EngineError::LimitExceeded("too many guests"));
        }
        validate_guest(&first_name, &last_name, &email, &phone)?;
        if self.guests.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }
        let event = Event::GuestRegistered {
            id,
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            email: email.clone(),
            phone: phone.clone(),
        };
        self.wal_append(&event).await?;
        self.guests.insert(
            id,
            Guest { id, first_name, last_name, email, phone, blocked: false },
        );
        Ok(())
    }

    pub async fn update_guest(
        &self,
        id: Ulid,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    ) -> Result<(), EngineError> {
        validate_guest(&first_name, &last_name, &email, &phone)?;
        if !self.guests.contains_key(&id) {
            return Err(EngineError::NotFound(id));
        }
        let event = Event::GuestUpdated {
            id,
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            email: email.clone(),
            phone: phone.clone(),
        };
        self.wal_append(&event).await?;
        if let Some(mut g) = self.guests.get_mut(&id) {
            g.first_name = first_name;
            g.last_name = last_name;
            g.email = email;
            g.phone = phone;
        }
        Ok(())
    }

    /// Block a guest. Idempotent: blocking a blocked guest changes
    /// nothing and appends nothing.
    pub async fn block_guest(&self, id: Ulid) -> Result<(), EngineError> {
        {
            let g = self.guests.get(&id).ok_or(EngineError::NotFound(id))?;
            if g.blocked {
                return Ok(());
            }
        }
        let event = Event::GuestBlocked { id };
        self.wal_append(&event).await?;
        if let Some(mut g) = self.guests.get_mut(&id) {
            g.blocked = true;
        }
        Ok(())
    }

    /// Delete a guest and cascade away the guest's bookings.
    pub async fn delete_guest(&self, id: Ulid) -> Result<(), EngineError> {
        if !self.guests.contains_key(&id) {
            return Err(EngineError::NotFound(id));
        }
        let event = Event::GuestDeleted { id };
        self.wal_append(&event).await?;
        self.guests.remove(&id);

        let booking_ids = self
            .guest_bookings
            .remove(&id)
            .map(|(_, v)| v)
            .unwrap_or_default();
        for bid in booking_ids {
            let Some(room_id) = self.room_for_entity(&bid) else {
                continue;
            };
            if let Some(rs) = self.get_room(&room_id) {
                let mut guard = rs.write().await;
                if let Some(b) = guard.remove_booking(bid) {
                    self.unindex_booking(&b);
                }
            }
        }
        Ok(())
    }

    // ── Bookings ─────────────────────────────────────────

    /// Reserve a room if the stay is free: the overlap check and the WAL
    /// append both run under the room's write lock, so two racing
    /// reservations can never both land on the same nights. Total price
    /// is fixed here as rate × nights and never recomputed.
    pub async fn reserve_if_available(
        &self,
        id: Ulid,
        room_id: Ulid,
        guest_id: Ulid,
        check_in: Day,
        check_out: Day,
        booking_name: String,
    ) -> Result<(), EngineError> {
        let stay = validate_stay(check_in, check_out)?;
        validate_booking_name(&booking_name)?;
        // A blocked guest is not refused here.
        if !self.guests.contains_key(&guest_id) {
            return Err(EngineError::NotFound(guest_id));
        }
        if self.entity_to_room.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }
        let rs = self.get_room(&room_id).ok_or(EngineError::NotFound(room_id))?;
        let mut guard = rs.write().await;
        if guard.bookings.len() >= MAX_BOOKINGS_PER_ROOM {
            return Err(EngineError::LimitExceeded("too many bookings on room"));
        }

        check_no_overlap(&guard, &stay)?;

        let total_price = guard.price_per_night * Decimal::from(stay.nights());
        let event = Event::BookingReserved {
            id,
            room_id,
            guest_id,
            stay,
            total_price,
            booking_name,
        };
        self.persist_and_apply(room_id, &mut guard, &event).await
    }

    /// Mark a booking paid. Idempotent.
    pub async fn mark_paid(&self, id: Ulid) -> Result<(), EngineError> {
        let (room_id, mut guard) = self.resolve_room_entity_write(&id).await?;
        match guard.booking(id) {
            Some(b) if b.paid => return Ok(()),
            Some(_) => {}
            None => return Err(EngineError::NotFound(id)),
        }
        let event = Event::BookingPaid { id, room_id };
        self.persist_and_apply(room_id, &mut guard, &event).await
    }

    /// Cancel a booking; its payments go with it.
    pub async fn cancel_booking(&self, id: Ulid) -> Result<Ulid, EngineError> {
        let (room_id, mut guard) = self.resolve_room_entity_write(&id).await?;
        let event = Event::BookingCancelled { id, room_id };
        self.persist_and_apply(room_id, &mut guard, &event).await?;
        Ok(room_id)
    }

    // ── Payments ─────────────────────────────────────────

    pub async fn record_payment(
        &self,
        id: Ulid,
        booking_id: Ulid,
        amount: Decimal,
        paid_on: Day,
    ) -> Result<(), EngineError> {
        validate_payment(amount, paid_on, today())?;
        if self.payment_to_booking.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }
        let (room_id, mut guard) = self.resolve_room_entity_write(&booking_id).await?;
        let Some(booking) = guard.booking(booking_id) else {
            return Err(EngineError::NotFound(booking_id));
        };
        if booking.payments.len() >= MAX_PAYMENTS_PER_BOOKING {
            return Err(EngineError::LimitExceeded("too many payments on booking"));
        }
        let event = Event::PaymentRecorded { id, booking_id, room_id, amount, paid_on };
        self.persist_and_apply(room_id, &mut guard, &event).await
    }

    pub async fn delete_payment(&self, id: Ulid) -> Result<(), EngineError> {
        let booking_id = self
            .booking_for_payment(&id)
            .ok_or(EngineError::NotFound(id))?;
        let (room_id, mut guard) = self.resolve_room_entity_write(&booking_id).await?;
        let event = Event::PaymentDeleted { id, booking_id, room_id };
        self.persist_and_apply(room_id, &mut guard, &event).await
    }

    // ── Reviews ──────────────────────────────────────────

    /// Post a review on a room. `posted_on` defaults to today.
    pub async fn post_review(
        &self,
        id: Ulid,
        room_id: Ulid,
        guest_name: String,
        rating: u8,
        comment: String,
        posted_on: Option<Day>,
    ) -> Result<(), EngineError> {
        let posted_on = posted_on.unwrap_or_else(today);
        validate_review(&guest_name, rating, &comment, posted_on, today())?;
        if self.entity_to_room.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }
        let rs = self.get_room(&room_id).ok_or(EngineError::NotFound(room_id))?;
        let mut guard = rs.write().await;
        if guard.reviews.len() >= MAX_REVIEWS_PER_ROOM {
            return Err(EngineError::LimitExceeded("too many reviews on room"));
        }
        let event = Event::ReviewPosted { id, room_id, guest_name, rating, comment, posted_on };
        self.persist_and_apply(room_id, &mut guard, &event).await
    }

    pub async fn delete_review(&self, id: Ulid) -> Result<Ulid, EngineError> {
        let (room_id, mut guard) = self.resolve_room_entity_write(&id).await?;
        if guard.reviews.iter().all(|r| r.id != id) {
            return Err(EngineError::NotFound(id));
        }
        let event = Event::ReviewDeleted { id, room_id };
        self.persist_and_apply(room_id, &mut guard, &event).await?;
        Ok(room_id)
    }

    // ── WAL maintenance ──────────────────────────────────

    /// Rewrite the WAL with only the events needed to recreate current
    /// state.
    pub async fn compact_wal(&self) -> Result<(), EngineError> {
        let mut events = Vec::new();

        for entry in self.amenities.iter() {
            let a = entry.value();
            events.push(Event::AmenityCreated { id: a.id, name: a.name.clone() });
        }
        for entry in self.guests.iter() {
            let g = entry.value();
            events.push(Event::GuestRegistered {
                id: g.id,
                first_name: g.first_name.clone(),
                last_name: g.last_name.clone(),
                email: g.email.clone(),
                phone: g.phone.clone(),
            });
            if g.blocked {
                events.push(Event::GuestBlocked { id: g.id });
            }
        }

        let rooms: Vec<_> = self.rooms.iter().map(|e| e.value().clone()).collect();
        for rs in rooms {
            let guard = rs.read().await;
            events.push(Event::RoomCreated {
                id: guard.id,
                name: guard.name.clone(),
                room_number: guard.room_number.clone(),
                room_type: guard.room_type.clone(),
                price_per_night: guard.price_per_night,
                max_occupancy: guard.max_occupancy,
                image: guard.image.clone(),
            });
            for amenity_id in &guard.amenity_ids {
                events.push(Event::AmenityAttached { room_id: guard.id, amenity_id: *amenity_id });
            }
            for b in &guard.bookings {
                events.push(Event::BookingReserved {
                    id: b.id,
                    room_id: guard.id,
                    guest_id: b.guest_id,
                    stay: b.stay,
                    total_price: b.total_price,
                    booking_name: b.booking_name.clone(),
                });
                if b.paid {
                    events.push(Event::BookingPaid { id: b.id, room_id: guard.id });
                }
                for p in &b.payments {
                    events.push(Event::PaymentRecorded {
                        id: p.id,
                        booking_id: b.id,
                        room_id: guard.id,
                        amount: p.amount,
                        paid_on: p.paid_on,
                    });
                }
            }
            for r in &guard.reviews {
                events.push(Event::ReviewPosted {
                    id: r.id,
                    room_id: guard.id,
                    guest_name: r.guest_name.clone(),
                    rating: r.rating,
                    comment: r.comment.clone(),
                    posted_on: r.posted_on,
                });
            }
        }

        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Compact { events, response: tx })
            .await
            .map_err(|_| EngineError::Wal("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| EngineError::Wal("WAL writer dropped response".into()))?
            .map_err(|e| EngineError::Wal(e.to_string()))
    }

    pub async fn wal_appends_since_compact(&self) -> u64 {
        let (tx, rx) = oneshot::channel();
        if self
            .wal_tx
            .send(WalCommand::AppendsSinceCompact { response: tx })
            .await
            .is_err()
        {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}
