//! Hard bounds on inputs and per-tenant state. Everything here exists to
//! keep a single misbehaving client from growing memory or the WAL without
//! bound.

/// Room, amenity and guest name fields.
pub const MAX_NAME_LEN: usize = 100;

/// Room number field.
pub const MAX_ROOM_NUMBER_LEN: usize = 10;

/// Free-text room category.
pub const MAX_ROOM_TYPE_LEN: usize = 50;

/// Guest phone number.
pub const MAX_PHONE_LEN: usize = 20;

/// Guest email address.
pub const MAX_EMAIL_LEN: usize = 254;

/// Human-readable booking name.
pub const MAX_BOOKING_NAME_LEN: usize = 255;

/// Review comment body.
pub const MAX_COMMENT_LEN: usize = 4000;

/// Image reference carried on a room.
pub const MAX_IMAGE_REF_LEN: usize = 512;

/// Terms accepted in a single multi-valued filter criterion.
pub const MAX_FILTER_TERMS: usize = 32;

pub const MAX_ROOMS_PER_TENANT: usize = 10_000;
pub const MAX_AMENITIES_PER_TENANT: usize = 1_000;
pub const MAX_GUESTS_PER_TENANT: usize = 100_000;
pub const MAX_BOOKINGS_PER_ROOM: usize = 10_000;
pub const MAX_REVIEWS_PER_ROOM: usize = 10_000;
pub const MAX_PAYMENTS_PER_BOOKING: usize = 100;

/// Calendar years accepted for any stay, payment or review date.
pub const MIN_CALENDAR_YEAR: i32 = 1900;
pub const MAX_CALENDAR_YEAR: i32 = 2200;

/// Longest accepted stay.
pub const MAX_STAY_NIGHTS: i64 = 500;

pub const MAX_TENANTS: usize = 256;
pub const MAX_TENANT_NAME_LEN: usize = 256;
