mod availability;
mod conflict;
mod error;
mod filter;
mod mutations;
mod queries;
mod validate;

pub use availability::{judge_history, Availability};
pub use error::EngineError;
pub use filter::{
    AmenityCriteria, BookingCriteria, FilterExpr, GuestCriteria, PaymentCriteria, Predicate,
    RawCriteria, ReviewCriteria, RoomCriteria,
};

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot, RwLock};
use ulid::Ulid;

use crate::model::*;
use crate::notify::NotifyHub;
use crate::wal::Wal;

pub type SharedRoomState = Arc<RwLock<RoomState>>;

// ── Group-commit WAL channel ─────────────────────────────

pub(super) enum WalCommand {
    Append {
        event: Event,
        response: oneshot::Sender<io::Result<()>>,
    },
    Compact {
        events: Vec<Event>,
        response: oneshot::Sender<io::Result<()>>,
    },
    AppendsSinceCompact {
        response: oneshot::Sender<u64>,
    },
}

/// Background task that owns the WAL and batches appends for group commit:
/// block on the first append, drain whatever else is immediately queued,
/// flush once, answer every sender.
async fn wal_writer_loop(mut wal: Wal, mut rx: mpsc::Receiver<WalCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WalCommand::Append { event, response } => {
                let mut batch = vec![(event, response)];

                loop {
                    match rx.try_recv() {
                        Ok(WalCommand::Append { event, response }) => {
                            batch.push((event, response));
                        }
                        Ok(other) => {
                            // Flush the batch before the non-append command.
                            flush_and_respond(&mut wal, &mut batch);
                            handle_non_append(&mut wal, other);
                            break;
                        }
                        Err(_) => break, // channel empty — flush batch
                    }
                }

                if !batch.is_empty() {
                    flush_and_respond(&mut wal, &mut batch);
                }
            }
            other => handle_non_append(&mut wal, other),
        }
    }
}

fn flush_and_respond(wal: &mut Wal, batch: &mut Vec<(Event, oneshot::Sender<io::Result<()>>)>) {
    metrics::histogram!(crate::observability::WAL_FLUSH_BATCH_SIZE).record(batch.len() as f64);
    let flush_start = std::time::Instant::now();
    let result = flush_batch(wal, batch);
    metrics::histogram!(crate::observability::WAL_FLUSH_DURATION_SECONDS)
        .record(flush_start.elapsed().as_secs_f64());
    for (_, tx) in batch.drain(..) {
        let r = match &result {
            Ok(()) => Ok(()),
            Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
        };
        let _ = tx.send(r);
    }
}

fn flush_batch(
    wal: &mut Wal,
    batch: &mut [(Event, oneshot::Sender<io::Result<()>>)],
) -> io::Result<()> {
    let mut append_err: Option<io::Error> = None;
    for (event, _) in batch.iter() {
        if let Err(e) = wal.append_buffered(event) {
            append_err = Some(e);
            break;
        }
    }
    // Always flush — even on append error — so partially buffered bytes
    // don't leak into the next batch (callers were told this batch failed).
    let flush_err = wal.flush_sync().err();
    if let Some(e) = append_err {
        return Err(e);
    }
    if let Some(e) = flush_err {
        return Err(e);
    }
    Ok(())
}

fn handle_non_append(wal: &mut Wal, cmd: WalCommand) {
    match cmd {
        WalCommand::Compact { events, response } => {
            let result = Wal::write_compact_file(wal.path(), &events)
                .and_then(|()| wal.swap_compact_file());
            let _ = response.send(result);
        }
        WalCommand::AppendsSinceCompact { response } => {
            let _ = response.send(wal.appends_since_compact());
        }
        WalCommand::Append { .. } => unreachable!(),
    }
}

// ── Engine ───────────────────────────────────────────────

pub struct Engine {
    pub amenities: DashMap<Ulid, Amenity>,
    pub rooms: DashMap<Ulid, SharedRoomState>,
    pub guests: DashMap<Ulid, Guest>,
    pub(super) wal_tx: mpsc::Sender<WalCommand>,
    pub notify: Arc<NotifyHub>,
    /// Reverse lookup: booking or review id → owning room id.
    pub(super) entity_to_room: DashMap<Ulid, Ulid>,
    /// Reverse lookup: payment id → owning booking id.
    pub(super) payment_to_booking: DashMap<Ulid, Ulid>,
    /// Guest id → that guest's booking ids, for guest-delete cascades.
    pub(super) guest_bookings: DashMap<Ulid, Vec<Ulid>>,
}

/// Room ids for events that route to a room's state.
fn event_room_id(event: &Event) -> Option<Ulid> {
    match event {
        Event::AmenityAttached { room_id, .. }
        | Event::AmenityDetached { room_id, .. }
        | Event::BookingReserved { room_id, .. }
        | Event::BookingPaid { room_id, .. }
        | Event::BookingCancelled { room_id, .. }
        | Event::PaymentRecorded { room_id, .. }
        | Event::PaymentDeleted { room_id, .. }
        | Event::ReviewPosted { room_id, .. }
        | Event::ReviewDeleted { room_id, .. } => Some(*room_id),
        Event::RoomUpdated { id, .. } => Some(*id),
        _ => None,
    }
}

impl Engine {
    pub fn new(wal_path: PathBuf, notify: Arc<NotifyHub>) -> io::Result<Self> {
        let events = Wal::replay(&wal_path)?;
        let wal = Wal::open(&wal_path)?;
        let (wal_tx, wal_rx) = mpsc::channel(4096);
        tokio::spawn(wal_writer_loop(wal, wal_rx));

        let engine = Self {
            amenities: DashMap::new(),
            rooms: DashMap::new(),
            guests: DashMap::new(),
            wal_tx,
            notify,
            entity_to_room: DashMap::new(),
            payment_to_booking: DashMap::new(),
            guest_bookings: DashMap::new(),
        };

        // Replay — we're the sole owner of every Arc here, so try_write
        // always succeeds. Never blocking_write: this may run inside an
        // async context (lazy tenant creation).
        for event in &events {
            engine.apply_event_uncontended(event);
        }

        Ok(engine)
    }

    /// Apply any event to uncontended state. Replay only.
    fn apply_event_uncontended(&self, event: &Event) {
        match event {
            Event::AmenityCreated { id, name } => {
                self.amenities.insert(*id, Amenity { id: *id, name: name.clone() });
            }
            Event::AmenityRenamed { id, name } => {
                if let Some(mut a) = self.amenities.get_mut(id) {
                    a.name = name.clone();
                }
            }
            Event::AmenityDeleted { id } => {
                self.amenities.remove(id);
                for entry in self.rooms.iter() {
                    let rs = entry.value().clone();
                    let mut guard = rs.try_write().expect("replay: uncontended write");
                    guard.amenity_ids.retain(|a| a != id);
                }
            }
            Event::RoomCreated {
                id,
                name,
                room_number,
                room_type,
                price_per_night,
                max_occupancy,
                image,
            } => {
                let rs = RoomState::new(
                    *id,
                    name.clone(),
                    room_number.clone(),
                    room_type.clone(),
                    *price_per_night,
                    *max_occupancy,
                    image.clone(),
                );
                self.rooms.insert(*id, Arc::new(RwLock::new(rs)));
            }
            Event::RoomDeleted { id } => {
                if let Some((_, rs)) = self.rooms.remove(id) {
                    let guard = rs.try_read().expect("replay: uncontended read");
                    self.unindex_room(&guard);
                }
            }
            Event::GuestRegistered { id, first_name, last_name, email, phone } => {
                self.guests.insert(
                    *id,
                    Guest {
                        id: *id,
                        first_name: first_name.clone(),
                        last_name: last_name.clone(),
                        email: email.clone(),
                        phone: phone.clone(),
                        blocked: false,
                    },
                );
            }
            Event::GuestUpdated { id, first_name, last_name, email, phone } => {
                if let Some(mut g) = self.guests.get_mut(id) {
                    g.first_name = first_name.clone();
                    g.last_name = last_name.clone();
                    g.email = email.clone();
                    g.phone = phone.clone();
                }
            }
            Event::GuestBlocked { id } => {
                if let Some(mut g) = self.guests.get_mut(id) {
                    g.blocked = true;
                }
            }
            Event::GuestDeleted { id } => {
                self.guests.remove(id);
                let booking_ids = self
                    .guest_bookings
                    .remove(id)
                    .map(|(_, v)| v)
                    .unwrap_or_default();
                for bid in booking_ids {
                    let Some(room_id) = self.entity_to_room.get(&bid).map(|e| *e.value()) else {
                        continue;
                    };
                    if let Some(rs) = self.get_room(&room_id) {
                        let mut guard = rs.try_write().expect("replay: uncontended write");
                        if let Some(b) = guard.remove_booking(bid) {
                            self.unindex_booking(&b);
                        }
                    }
                }
            }
            other => {
                if let Some(room_id) = event_room_id(other)
                    && let Some(rs) = self.get_room(&room_id) {
                        let mut guard = rs.try_write().expect("replay: uncontended write");
                        self.apply_room_event(&mut guard, other);
                    }
            }
        }
    }

    /// Apply a room-scoped event to a locked room state, keeping the
    /// reverse indexes in step. Caller holds the room's write lock.
    pub(super) fn apply_room_event(&self, rs: &mut RoomState, event: &Event) {
        match event {
            Event::RoomUpdated {
                name,
                room_number,
                room_type,
                price_per_night,
                max_occupancy,
                image,
                ..
            } => {
                rs.name = name.clone();
                rs.room_number = room_number.clone();
                rs.room_type = room_type.clone();
                rs.price_per_night = *price_per_night;
                rs.max_occupancy = *max_occupancy;
                rs.image = image.clone();
            }
            Event::AmenityAttached { amenity_id, .. } => {
                if !rs.amenity_ids.contains(amenity_id) {
                    rs.amenity_ids.push(*amenity_id);
                }
            }
            Event::AmenityDetached { amenity_id, .. } => {
                rs.amenity_ids.retain(|a| a != amenity_id);
            }
            Event::BookingReserved {
                id,
                room_id,
                guest_id,
                stay,
                total_price,
                booking_name,
            } => {
                rs.insert_booking(BookingRecord {
                    id: *id,
                    guest_id: *guest_id,
                    stay: *stay,
                    total_price: *total_price,
                    booking_name: booking_name.clone(),
                    paid: false,
                    payments: Vec::new(),
                });
                self.entity_to_room.insert(*id, *room_id);
                self.guest_bookings.entry(*guest_id).or_default().push(*id);
            }
            Event::BookingPaid { id, .. } => {
                if let Some(b) = rs.booking_mut(*id) {
                    b.paid = true;
                }
            }
            Event::BookingCancelled { id, .. } => {
                if let Some(b) = rs.remove_booking(*id) {
                    self.unindex_booking(&b);
                }
            }
            Event::PaymentRecorded { id, booking_id, amount, paid_on, .. } => {
                if let Some(b) = rs.booking_mut(*booking_id) {
                    b.payments.push(PaymentRecord {
                        id: *id,
                        amount: *amount,
                        paid_on: *paid_on,
                    });
                    self.payment_to_booking.insert(*id, *booking_id);
                }
            }
            Event::PaymentDeleted { id, booking_id, .. } => {
                if let Some(b) = rs.booking_mut(*booking_id) {
                    b.payments.retain(|p| p.id != *id);
                }
                self.payment_to_booking.remove(id);
            }
            Event::ReviewPosted { id, room_id, guest_name, rating, comment, posted_on } => {
                rs.reviews.push(ReviewRecord {
                    id: *id,
                    guest_name: guest_name.clone(),
                    rating: *rating,
                    comment: comment.clone(),
                    posted_on: *posted_on,
                });
                self.entity_to_room.insert(*id, *room_id);
            }
            Event::ReviewDeleted { id, .. } => {
                rs.remove_review(*id);
                self.entity_to_room.remove(id);
            }
            _ => {}
        }
    }

    /// Drop every index entry pointing at a removed booking.
    pub(super) fn unindex_booking(&self, booking: &BookingRecord) {
        self.entity_to_room.remove(&booking.id);
        if let Some(mut v) = self.guest_bookings.get_mut(&booking.guest_id) {
            v.retain(|b| *b != booking.id);
        }
        for p in &booking.payments {
            self.payment_to_booking.remove(&p.id);
        }
    }

    /// Drop every index entry pointing into a removed room.
    pub(super) fn unindex_room(&self, rs: &RoomState) {
        for b in &rs.bookings {
            self.unindex_booking(b);
        }
        for r in &rs.reviews {
            self.entity_to_room.remove(&r.id);
        }
    }

    /// Write event to WAL via the background group-commit writer.
    pub(super) async fn wal_append(&self, event: &Event) -> Result<(), EngineError> {
        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Append {
                event: event.clone(),
                response: tx,
            })
            .await
            .map_err(|_| EngineError::Wal("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| EngineError::Wal("WAL writer dropped response".into()))?
            .map_err(|e| EngineError::Wal(e.to_string()))
    }

    pub fn get_room(&self, id: &Ulid) -> Option<SharedRoomState> {
        self.rooms.get(id).map(|e| e.value().clone())
    }

    /// Room owning a booking or review.
    pub fn room_for_entity(&self, entity_id: &Ulid) -> Option<Ulid> {
        self.entity_to_room.get(entity_id).map(|e| *e.value())
    }

    pub fn booking_for_payment(&self, payment_id: &Ulid) -> Option<Ulid> {
        self.payment_to_booking.get(payment_id).map(|e| *e.value())
    }

    /// WAL-append + apply + notify in one call.
    pub(super) async fn persist_and_apply(
        &self,
        room_id: Ulid,
        rs: &mut RoomState,
        event: &Event,
    ) -> Result<(), EngineError> {
        self.wal_append(event).await?;
        self.apply_room_event(rs, event);
        self.notify.send(room_id, event);
        Ok(())
    }

    /// Lookup booking/review → room, acquire the room's write lock.
    pub(super) async fn resolve_room_entity_write(
        &self,
        entity_id: &Ulid,
    ) -> Result<(Ulid, tokio::sync::OwnedRwLockWriteGuard<RoomState>), EngineError> {
        let room_id = self
            .room_for_entity(entity_id)
            .ok_or(EngineError::NotFound(*entity_id))?;
        let rs = self
            .get_room(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.write_owned().await;
        Ok((room_id, guard))
    }
}
