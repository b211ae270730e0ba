use chrono::Datelike;
use rust_decimal::Decimal;

use crate::limits::*;
use crate::model::{Day, StayRange};

use super::EngineError;

/// Check date order and calendar sanity, returning the stay on success.
/// Mutations never construct a `StayRange` any other way.
pub(crate) fn validate_stay(check_in: Day, check_out: Day) -> Result<StayRange, EngineError> {
    if check_out <= check_in {
        return Err(EngineError::validation(
            "check_out",
            "check-out must be after check-in",
        ));
    }
    for (field, day) in [("check_in", check_in), ("check_out", check_out)] {
        if day.year() < MIN_CALENDAR_YEAR || day.year() > MAX_CALENDAR_YEAR {
            return Err(EngineError::validation(field, "date out of calendar range"));
        }
    }
    let stay = StayRange::new(check_in, check_out);
    if stay.nights() > MAX_STAY_NIGHTS {
        return Err(EngineError::validation("check_out", "stay too long"));
    }
    Ok(stay)
}

pub(crate) fn validate_room(
    name: &str,
    room_number: &str,
    room_type: &str,
    price_per_night: Decimal,
    max_occupancy: u32,
    image: Option<&str>,
) -> Result<(), EngineError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(EngineError::validation("name", "empty or too long"));
    }
    if room_number.is_empty() || room_number.len() > MAX_ROOM_NUMBER_LEN {
        return Err(EngineError::validation("room_number", "empty or too long"));
    }
    if room_type.len() > MAX_ROOM_TYPE_LEN {
        return Err(EngineError::validation("room_type", "too long"));
    }
    if price_per_night <= Decimal::ZERO {
        return Err(EngineError::validation(
            "price_per_night",
            "must be positive",
        ));
    }
    if max_occupancy < 1 {
        return Err(EngineError::validation("max_occupancy", "must be at least 1"));
    }
    if let Some(image) = image
        && image.len() > MAX_IMAGE_REF_LEN {
            return Err(EngineError::validation("image", "reference too long"));
        }
    Ok(())
}

pub(crate) fn validate_guest(
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
) -> Result<(), EngineError> {
    if first_name.is_empty() || first_name.len() > MAX_NAME_LEN {
        return Err(EngineError::validation("first_name", "empty or too long"));
    }
    if last_name.is_empty() || last_name.len() > MAX_NAME_LEN {
        return Err(EngineError::validation("last_name", "empty or too long"));
    }
    validate_email(email)?;
    validate_phone(phone)?;
    Ok(())
}

fn validate_email(email: &str) -> Result<(), EngineError> {
    if email.len() > MAX_EMAIL_LEN {
        return Err(EngineError::validation("email", "too long"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(EngineError::validation("email", "contains whitespace"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(EngineError::validation("email", "missing @"));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(EngineError::validation("email", "malformed address"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(EngineError::validation("email", "malformed domain"));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), EngineError> {
    if phone.len() > MAX_PHONE_LEN {
        return Err(EngineError::validation("phone", "too long"));
    }
    let mut digits = 0usize;
    for c in phone.chars() {
        match c {
            '0'..='9' => digits += 1,
            '+' | '-' | ' ' | '(' | ')' => {}
            _ => {
                return Err(EngineError::validation("phone", "invalid character"));
            }
        }
    }
    if digits < 7 {
        return Err(EngineError::validation("phone", "too few digits"));
    }
    Ok(())
}

pub(crate) fn validate_booking_name(booking_name: &str) -> Result<(), EngineError> {
    if booking_name.is_empty() || booking_name.len() > MAX_BOOKING_NAME_LEN {
        return Err(EngineError::validation("booking_name", "empty or too long"));
    }
    Ok(())
}

pub(crate) fn validate_payment(
    amount: Decimal,
    paid_on: Day,
    today: Day,
) -> Result<(), EngineError> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::validation("amount", "must be positive"));
    }
    if paid_on > today {
        return Err(EngineError::validation(
            "payment_date",
            "must not be in the future",
        ));
    }
    if paid_on.year() < MIN_CALENDAR_YEAR {
        return Err(EngineError::validation("payment_date", "date out of calendar range"));
    }
    Ok(())
}

pub(crate) fn validate_review(
    guest_name: &str,
    rating: u8,
    comment: &str,
    posted_on: Day,
    today: Day,
) -> Result<(), EngineError> {
    if guest_name.is_empty() || guest_name.len() > MAX_NAME_LEN {
        return Err(EngineError::validation("guest_name", "empty or too long"));
    }
    if !(1..=5).contains(&rating) {
        return Err(EngineError::validation("rating", "must be between 1 and 5"));
    }
    if comment.len() > MAX_COMMENT_LEN {
        return Err(EngineError::validation("comment", "too long"));
    }
    if posted_on > today {
        return Err(EngineError::validation(
            "review_date",
            "must not be in the future",
        ));
    }
    Ok(())
}
