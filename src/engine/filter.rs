use std::collections::BTreeMap;

use rust_decimal::Decimal;
use ulid::Ulid;

use crate::limits::MAX_FILTER_TERMS;
use crate::model::*;

use super::EngineError;

/// Criteria as they arrive from the SQL layer: sparse `name → raw value`.
/// Unknown names are ignored; empty values contribute no constraint.
pub type RawCriteria = BTreeMap<String, String>;

// ── Expression tree ──────────────────────────────────────────────

pub trait Predicate {
    type Row;
    fn matches(&self, row: &Self::Row) -> bool;
}

/// Composable predicate over listing rows. `All(vec![])` matches
/// everything, so an absent criterion is the identity for conjunction,
/// and evaluation is independent of the order leaves were added.
#[derive(Debug)]
pub enum FilterExpr<P> {
    All(Vec<FilterExpr<P>>),
    Any(Vec<FilterExpr<P>>),
    Not(Box<FilterExpr<P>>),
    Is(P),
}

impl<P: Predicate> FilterExpr<P> {
    pub fn matches(&self, row: &P::Row) -> bool {
        match self {
            FilterExpr::All(children) => children.iter().all(|c| c.matches(row)),
            FilterExpr::Any(children) => children.iter().any(|c| c.matches(row)),
            FilterExpr::Not(child) => !child.matches(row),
            FilterExpr::Is(p) => p.matches(row),
        }
    }
}

// ── Coercion helpers ─────────────────────────────────────────────

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn coerce_decimal(criterion: &'static str, raw: &str) -> Result<Decimal, EngineError> {
    raw.trim()
        .parse()
        .map_err(|_| EngineError::bad_filter(criterion, raw))
}

fn coerce_day(criterion: &'static str, raw: &str) -> Result<Day, EngineError> {
    raw.trim()
        .parse()
        .map_err(|_| EngineError::bad_filter(criterion, raw))
}

fn coerce_u32(criterion: &'static str, raw: &str) -> Result<u32, EngineError> {
    raw.trim()
        .parse()
        .map_err(|_| EngineError::bad_filter(criterion, raw))
}

fn coerce_u8(criterion: &'static str, raw: &str) -> Result<u8, EngineError> {
    raw.trim()
        .parse()
        .map_err(|_| EngineError::bad_filter(criterion, raw))
}

fn coerce_bool(criterion: &'static str, raw: &str) -> Result<bool, EngineError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(EngineError::bad_filter(criterion, raw)),
    }
}

fn coerce_ulid(criterion: &'static str, raw: &str) -> Result<Ulid, EngineError> {
    Ulid::from_string(raw.trim()).map_err(|_| EngineError::bad_filter(criterion, raw))
}

/// Split a comma-separated multi-value criterion into trimmed terms.
fn split_terms(criterion: &'static str, raw: &str) -> Result<Vec<String>, EngineError> {
    let terms: Vec<String> = raw
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if terms.is_empty() {
        return Err(EngineError::bad_filter(criterion, raw));
    }
    if terms.len() > MAX_FILTER_TERMS {
        return Err(EngineError::LimitExceeded("too many filter terms"));
    }
    Ok(terms)
}

// ── Rooms ────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum RoomPredicate {
    AmenityLike(String),
    PriceAtLeast(Decimal),
    PriceAtMost(Decimal),
    OccupancyAtMost(u32),
    TypeLike(String),
    HasImage(bool),
    Search(String),
}

impl Predicate for RoomPredicate {
    type Row = RoomRow;

    fn matches(&self, row: &RoomRow) -> bool {
        match self {
            RoomPredicate::AmenityLike(term) => {
                row.amenity_names.iter().any(|n| contains_ci(n, term))
            }
            RoomPredicate::PriceAtLeast(min) => row.price_per_night >= *min,
            RoomPredicate::PriceAtMost(max) => row.price_per_night <= *max,
            RoomPredicate::OccupancyAtMost(cap) => row.max_occupancy <= *cap,
            RoomPredicate::TypeLike(term) => contains_ci(&row.room_type, term),
            RoomPredicate::HasImage(wanted) => row.has_image == *wanted,
            RoomPredicate::Search(term) => {
                contains_ci(&row.name, term) || contains_ci(&row.room_number, term)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RoomCriteria {
    pub amenities: Option<Vec<String>>,
    pub exclude_amenity: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub max_occupancy: Option<u32>,
    pub room_type: Option<String>,
    pub has_image: Option<bool>,
    pub search: Option<String>,
}

impl RoomCriteria {
    pub fn parse(raw: &RawCriteria) -> Result<Self, EngineError> {
        let mut crit = Self::default();
        for (name, value) in raw {
            if value.is_empty() {
                continue;
            }
            match name.as_str() {
                "amenities" => crit.amenities = Some(split_terms("amenities", value)?),
                "exclude_amenity" => crit.exclude_amenity = Some(value.clone()),
                "price_min" => crit.price_min = Some(coerce_decimal("price_min", value)?),
                "price_max" => crit.price_max = Some(coerce_decimal("price_max", value)?),
                "max_occupancy" => {
                    crit.max_occupancy = Some(coerce_u32("max_occupancy", value)?)
                }
                "room_type" => crit.room_type = Some(value.clone()),
                "has_image" => crit.has_image = Some(coerce_bool("has_image", value)?),
                "search" => crit.search = Some(value.clone()),
                _ => {}
            }
        }
        Ok(crit)
    }

    pub fn build(&self) -> FilterExpr<RoomPredicate> {
        let mut all = Vec::new();
        if let Some(terms) = &self.amenities {
            all.push(FilterExpr::Any(
                terms
                    .iter()
                    .map(|t| FilterExpr::Is(RoomPredicate::AmenityLike(t.clone())))
                    .collect(),
            ));
        }
        if let Some(term) = &self.exclude_amenity {
            all.push(FilterExpr::Not(Box::new(FilterExpr::Is(
                RoomPredicate::AmenityLike(term.clone()),
            ))));
        }
        if let Some(min) = self.price_min {
            all.push(FilterExpr::Is(RoomPredicate::PriceAtLeast(min)));
        }
        if let Some(max) = self.price_max {
            all.push(FilterExpr::Is(RoomPredicate::PriceAtMost(max)));
        }
        if let Some(cap) = self.max_occupancy {
            all.push(FilterExpr::Is(RoomPredicate::OccupancyAtMost(cap)));
        }
        if let Some(term) = &self.room_type {
            all.push(FilterExpr::Is(RoomPredicate::TypeLike(term.clone())));
        }
        if let Some(wanted) = self.has_image {
            all.push(FilterExpr::Is(RoomPredicate::HasImage(wanted)));
        }
        if let Some(term) = &self.search {
            all.push(FilterExpr::Is(RoomPredicate::Search(term.clone())));
        }
        FilterExpr::All(all)
    }
}

// ── Bookings ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum BookingPredicate {
    Search(String),
    CheckInAfter(Day),
    CheckOutBefore(Day),
    PriceAtLeast(Decimal),
    PriceAtMost(Decimal),
    Paid(bool),
    GuestIs(Ulid),
}

impl Predicate for BookingPredicate {
    type Row = BookingRow;

    fn matches(&self, row: &BookingRow) -> bool {
        match self {
            BookingPredicate::Search(term) => {
                contains_ci(&row.guest_name, term)
                    || contains_ci(&row.booking_name, term)
                    || contains_ci(&row.room_number, term)
            }
            BookingPredicate::CheckInAfter(day) => row.check_in >= *day,
            BookingPredicate::CheckOutBefore(day) => row.check_out <= *day,
            BookingPredicate::PriceAtLeast(min) => row.total_price >= *min,
            BookingPredicate::PriceAtMost(max) => row.total_price <= *max,
            BookingPredicate::Paid(wanted) => row.paid == *wanted,
            BookingPredicate::GuestIs(id) => row.guest_id == *id,
        }
    }
}

#[derive(Debug, Default)]
pub struct BookingCriteria {
    pub search: Option<String>,
    pub check_in_after: Option<Day>,
    pub check_out_before: Option<Day>,
    pub min_total_price: Option<Decimal>,
    pub max_total_price: Option<Decimal>,
    pub paid: Option<bool>,
    pub guest: Option<Ulid>,
}

impl BookingCriteria {
    pub fn parse(raw: &RawCriteria) -> Result<Self, EngineError> {
        let mut crit = Self::default();
        for (name, value) in raw {
            if value.is_empty() {
                continue;
            }
            match name.as_str() {
                "search" => crit.search = Some(value.clone()),
                "check_in_after" => {
                    crit.check_in_after = Some(coerce_day("check_in_after", value)?)
                }
                "check_out_before" => {
                    crit.check_out_before = Some(coerce_day("check_out_before", value)?)
                }
                "min_total_price" => {
                    crit.min_total_price = Some(coerce_decimal("min_total_price", value)?)
                }
                "max_total_price" => {
                    crit.max_total_price = Some(coerce_decimal("max_total_price", value)?)
                }
                "paid" => crit.paid = Some(coerce_bool("paid", value)?),
                "guest" => crit.guest = Some(coerce_ulid("guest", value)?),
                _ => {}
            }
        }
        Ok(crit)
    }

    pub fn build(&self) -> FilterExpr<BookingPredicate> {
        let mut all = Vec::new();
        if let Some(term) = &self.search {
            all.push(FilterExpr::Is(BookingPredicate::Search(term.clone())));
        }
        if let Some(day) = self.check_in_after {
            all.push(FilterExpr::Is(BookingPredicate::CheckInAfter(day)));
        }
        if let Some(day) = self.check_out_before {
            all.push(FilterExpr::Is(BookingPredicate::CheckOutBefore(day)));
        }
        if let Some(min) = self.min_total_price {
            all.push(FilterExpr::Is(BookingPredicate::PriceAtLeast(min)));
        }
        if let Some(max) = self.max_total_price {
            all.push(FilterExpr::Is(BookingPredicate::PriceAtMost(max)));
        }
        if let Some(paid) = self.paid {
            all.push(FilterExpr::Is(BookingPredicate::Paid(paid)));
        }
        if let Some(id) = self.guest {
            all.push(FilterExpr::Is(BookingPredicate::GuestIs(id)));
        }
        FilterExpr::All(all)
    }
}

// ── Reviews ──────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ReviewPredicate {
    Search(String),
    RatingAtLeast(u8),
    RatingAtMost(u8),
    PostedOn(Day),
}

impl Predicate for ReviewPredicate {
    type Row = ReviewRow;

    fn matches(&self, row: &ReviewRow) -> bool {
        match self {
            ReviewPredicate::Search(term) => {
                contains_ci(&row.guest_name, term)
                    || contains_ci(&row.room_name, term)
                    || contains_ci(&row.comment, term)
            }
            ReviewPredicate::RatingAtLeast(min) => row.rating >= *min,
            ReviewPredicate::RatingAtMost(max) => row.rating <= *max,
            ReviewPredicate::PostedOn(day) => row.posted_on == *day,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReviewCriteria {
    pub search: Option<String>,
    pub min_rating: Option<u8>,
    pub max_rating: Option<u8>,
    pub review_date: Option<Day>,
}

impl ReviewCriteria {
    pub fn parse(raw: &RawCriteria) -> Result<Self, EngineError> {
        let mut crit = Self::default();
        for (name, value) in raw {
            if value.is_empty() {
                continue;
            }
            match name.as_str() {
                "search" => crit.search = Some(value.clone()),
                "min_rating" => crit.min_rating = Some(coerce_u8("min_rating", value)?),
                "max_rating" => crit.max_rating = Some(coerce_u8("max_rating", value)?),
                "review_date" => crit.review_date = Some(coerce_day("review_date", value)?),
                _ => {}
            }
        }
        Ok(crit)
    }

    pub fn build(&self) -> FilterExpr<ReviewPredicate> {
        let mut all = Vec::new();
        if let Some(term) = &self.search {
            all.push(FilterExpr::Is(ReviewPredicate::Search(term.clone())));
        }
        if let Some(min) = self.min_rating {
            all.push(FilterExpr::Is(ReviewPredicate::RatingAtLeast(min)));
        }
        if let Some(max) = self.max_rating {
            all.push(FilterExpr::Is(ReviewPredicate::RatingAtMost(max)));
        }
        if let Some(day) = self.review_date {
            all.push(FilterExpr::Is(ReviewPredicate::PostedOn(day)));
        }
        FilterExpr::All(all)
    }
}

// ── Payments ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum PaymentPredicate {
    Search(String),
    AmountAtLeast(Decimal),
    AmountAtMost(Decimal),
    PaidOn(Day),
}

impl Predicate for PaymentPredicate {
    type Row = PaymentRow;

    fn matches(&self, row: &PaymentRow) -> bool {
        match self {
            PaymentPredicate::Search(term) => {
                contains_ci(&row.guest_name, term) || contains_ci(&row.booking_name, term)
            }
            PaymentPredicate::AmountAtLeast(min) => row.amount >= *min,
            PaymentPredicate::AmountAtMost(max) => row.amount <= *max,
            PaymentPredicate::PaidOn(day) => row.paid_on == *day,
        }
    }
}

#[derive(Debug, Default)]
pub struct PaymentCriteria {
    pub search: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub payment_date: Option<Day>,
}

impl PaymentCriteria {
    pub fn parse(raw: &RawCriteria) -> Result<Self, EngineError> {
        let mut crit = Self::default();
        for (name, value) in raw {
            if value.is_empty() {
                continue;
            }
            match name.as_str() {
                "search" => crit.search = Some(value.clone()),
                "min_amount" => crit.min_amount = Some(coerce_decimal("min_amount", value)?),
                "max_amount" => crit.max_amount = Some(coerce_decimal("max_amount", value)?),
                "payment_date" => {
                    crit.payment_date = Some(coerce_day("payment_date", value)?)
                }
                _ => {}
            }
        }
        Ok(crit)
    }

    pub fn build(&self) -> FilterExpr<PaymentPredicate> {
        let mut all = Vec::new();
        if let Some(term) = &self.search {
            all.push(FilterExpr::Is(PaymentPredicate::Search(term.clone())));
        }
        if let Some(min) = self.min_amount {
            all.push(FilterExpr::Is(PaymentPredicate::AmountAtLeast(min)));
        }
        if let Some(max) = self.max_amount {
            all.push(FilterExpr::Is(PaymentPredicate::AmountAtMost(max)));
        }
        if let Some(day) = self.payment_date {
            all.push(FilterExpr::Is(PaymentPredicate::PaidOn(day)));
        }
        FilterExpr::All(all)
    }
}

// ── Guests ───────────────────────────────────────────────────────

#[derive(Debug)]
pub enum GuestPredicate {
    Search(String),
    Blocked(bool),
}

impl Predicate for GuestPredicate {
    type Row = Guest;

    fn matches(&self, row: &Guest) -> bool {
        match self {
            GuestPredicate::Search(term) => {
                contains_ci(&row.first_name, term)
                    || contains_ci(&row.last_name, term)
                    || contains_ci(&row.email, term)
                    || contains_ci(&row.phone, term)
            }
            GuestPredicate::Blocked(wanted) => row.blocked == *wanted,
        }
    }
}

#[derive(Debug, Default)]
pub struct GuestCriteria {
    pub search: Option<String>,
    pub blocked: Option<bool>,
}

impl GuestCriteria {
    pub fn parse(raw: &RawCriteria) -> Result<Self, EngineError> {
        let mut crit = Self::default();
        for (name, value) in raw {
            if value.is_empty() {
                continue;
            }
            match name.as_str() {
                "search" => crit.search = Some(value.clone()),
                "blocked" => crit.blocked = Some(coerce_bool("blocked", value)?),
                _ => {}
            }
        }
        Ok(crit)
    }

    pub fn build(&self) -> FilterExpr<GuestPredicate> {
        let mut all = Vec::new();
        if let Some(term) = &self.search {
            all.push(FilterExpr::Is(GuestPredicate::Search(term.clone())));
        }
        if let Some(blocked) = self.blocked {
            all.push(FilterExpr::Is(GuestPredicate::Blocked(blocked)));
        }
        FilterExpr::All(all)
    }
}

// ── Amenities ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum AmenityPredicate {
    Search(String),
}

impl Predicate for AmenityPredicate {
    type Row = AmenityRow;

    fn matches(&self, row: &AmenityRow) -> bool {
        match self {
            AmenityPredicate::Search(term) => contains_ci(&row.name, term),
        }
    }
}

#[derive(Debug, Default)]
pub struct AmenityCriteria {
    pub search: Option<String>,
}

impl AmenityCriteria {
    pub fn parse(raw: &RawCriteria) -> Result<Self, EngineError> {
        let mut crit = Self::default();
        for (name, value) in raw {
            if value.is_empty() {
                continue;
            }
            if name.as_str() == "search" {
                crit.search = Some(value.clone());
            }
        }
        Ok(crit)
    }

    pub fn build(&self) -> FilterExpr<AmenityPredicate> {
        match &self.search {
            Some(term) => FilterExpr::All(vec![FilterExpr::Is(AmenityPredicate::Search(
                term.clone(),
            ))]),
            None => FilterExpr::All(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawCriteria {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn room(name: &str, price: i64, occupancy: u32, amenities: &[&str]) -> RoomRow {
        RoomRow {
            id: Ulid::new(),
            name: name.into(),
            room_number: "101".into(),
            room_type: "Suite".into(),
            price_per_night: Decimal::new(price, 0),
            max_occupancy: occupancy,
            amenity_names: amenities.iter().map(|a| a.to_string()).collect(),
            has_image: false,
        }
    }

    fn apply(expr: &FilterExpr<RoomPredicate>, rows: &[RoomRow]) -> Vec<String> {
        rows.iter()
            .filter(|r| expr.matches(r))
            .map(|r| r.name.clone())
            .collect()
    }

    #[test]
    fn empty_criteria_match_everything() {
        let expr = RoomCriteria::parse(&raw(&[])).unwrap().build();
        let rows = vec![room("A", 50, 1, &[]), room("B", 500, 4, &["Wifi"])];
        assert_eq!(apply(&expr, &rows), vec!["A", "B"]);
    }

    #[test]
    fn empty_values_contribute_no_constraint() {
        let expr = RoomCriteria::parse(&raw(&[("price_min", ""), ("room_type", "")]))
            .unwrap()
            .build();
        let rows = vec![room("A", 50, 1, &[])];
        assert_eq!(apply(&expr, &rows), vec!["A"]);
    }

    #[test]
    fn price_bounds_intersect() {
        let expr = RoomCriteria::parse(&raw(&[
            ("price_min", "50"),
            ("price_max", "150"),
            ("max_occupancy", "2"),
        ]))
        .unwrap()
        .build();
        let rows = vec![
            room("cheap", 30, 2, &[]),
            room("fits", 100, 2, &[]),
            room("pricey", 200, 2, &[]),
            room("big", 100, 6, &[]),
        ];
        assert_eq!(apply(&expr, &rows), vec!["fits"]);
    }

    #[test]
    fn single_bound_applies_alone() {
        let expr = RoomCriteria::parse(&raw(&[("price_min", "100")])).unwrap().build();
        let rows = vec![room("low", 50, 1, &[]), room("high", 150, 1, &[])];
        assert_eq!(apply(&expr, &rows), vec!["high"]);
    }

    #[test]
    fn amenity_or_group_unions_without_duplicates() {
        let expr = RoomCriteria::parse(&raw(&[("amenities", "Wifi,Balcony")]))
            .unwrap()
            .build();
        let rows = vec![
            room("wifi-only", 50, 1, &["Wifi"]),
            room("balcony-only", 50, 1, &["Balcony"]),
            room("both", 50, 1, &["Wifi", "Balcony"]),
            room("neither", 50, 1, &["Minibar"]),
        ];
        // "both" matches two terms but appears exactly once.
        assert_eq!(apply(&expr, &rows), vec!["wifi-only", "balcony-only", "both"]);
    }

    #[test]
    fn amenity_match_is_case_insensitive_substring() {
        let expr = RoomCriteria::parse(&raw(&[("amenities", "wifi")])).unwrap().build();
        let rows = vec![room("A", 50, 1, &["Fast WiFi"])];
        assert_eq!(apply(&expr, &rows), vec!["A"]);
    }

    #[test]
    fn exclude_is_disjoint_from_include() {
        let include = RoomCriteria::parse(&raw(&[("amenities", "Wifi")])).unwrap().build();
        let exclude = RoomCriteria::parse(&raw(&[("exclude_amenity", "Wifi")]))
            .unwrap()
            .build();
        let rows = vec![
            room("with", 50, 1, &["Wifi"]),
            room("without", 50, 1, &["Balcony"]),
        ];
        let included = apply(&include, &rows);
        let excluded = apply(&exclude, &rows);
        assert_eq!(included, vec!["with"]);
        assert_eq!(excluded, vec!["without"]);
        assert!(included.iter().all(|n| !excluded.contains(n)));
    }

    #[test]
    fn boolean_flag_partitions() {
        let mut with_image = room("imaged", 50, 1, &[]);
        with_image.has_image = true;
        let rows = vec![with_image, room("plain", 50, 1, &[])];

        let yes = RoomCriteria::parse(&raw(&[("has_image", "true")])).unwrap().build();
        let no = RoomCriteria::parse(&raw(&[("has_image", "false")])).unwrap().build();
        assert_eq!(apply(&yes, &rows), vec!["imaged"]);
        assert_eq!(apply(&no, &rows), vec!["plain"]);
    }

    #[test]
    fn composition_is_order_independent() {
        let pairs: [(&str, &str); 3] = [
            ("price_min", "50"),
            ("room_type", "suite"),
            ("amenities", "Wifi,Spa"),
        ];
        let rows = vec![
            room("A", 100, 2, &["Wifi"]),
            room("B", 40, 2, &["Spa"]),
            room("C", 100, 2, &["Minibar"]),
        ];
        // BTreeMap normalizes insertion order; feed every rotation anyway.
        let mut results = Vec::new();
        for rot in 0..pairs.len() {
            let mut rotated = pairs;
            rotated.rotate_left(rot);
            let expr = RoomCriteria::parse(&raw(&rotated)).unwrap().build();
            results.push(apply(&expr, &rows));
        }
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(results[0], vec!["A"]);
    }

    #[test]
    fn bad_numeric_value_names_the_criterion() {
        let err = RoomCriteria::parse(&raw(&[("price_min", "cheap")])).unwrap_err();
        match err {
            EngineError::BadFilter { criterion, value } => {
                assert_eq!(criterion, "price_min");
                assert_eq!(value, "cheap");
            }
            other => panic!("expected BadFilter, got {other:?}"),
        }
    }

    #[test]
    fn bad_bool_and_date_values_rejected() {
        assert!(matches!(
            RoomCriteria::parse(&raw(&[("has_image", "maybe")])),
            Err(EngineError::BadFilter { criterion: "has_image", .. })
        ));
        assert!(matches!(
            BookingCriteria::parse(&raw(&[("check_in_after", "not-a-date")])),
            Err(EngineError::BadFilter { criterion: "check_in_after", .. })
        ));
    }

    #[test]
    fn unknown_criteria_ignored() {
        let expr = RoomCriteria::parse(&raw(&[("favourite_colour", "teal")]))
            .unwrap()
            .build();
        let rows = vec![room("A", 50, 1, &[])];
        assert_eq!(apply(&expr, &rows), vec!["A"]);
    }

    #[test]
    fn too_many_amenity_terms_rejected() {
        let list = vec!["x"; MAX_FILTER_TERMS + 1].join(",");
        assert!(matches!(
            RoomCriteria::parse(&raw(&[("amenities", &list)])),
            Err(EngineError::LimitExceeded(_))
        ));
    }

    #[test]
    fn booking_criteria_filters() {
        let guest_id = Ulid::new();
        let mk = |name: &str, ci: &str, co: &str, price: i64, paid: bool, gid: Ulid| BookingRow {
            id: Ulid::new(),
            room_id: Ulid::new(),
            guest_id: gid,
            booking_name: name.into(),
            guest_name: "Ada Lovelace".into(),
            room_number: "101".into(),
            check_in: ci.parse().unwrap(),
            check_out: co.parse().unwrap(),
            total_price: Decimal::new(price, 0),
            paid,
        };
        let rows = vec![
            mk("early", "2024-01-01", "2024-01-05", 100, false, guest_id),
            mk("late", "2024-06-01", "2024-06-05", 400, true, Ulid::new()),
        ];

        let expr = BookingCriteria::parse(&raw(&[
            ("check_in_after", "2024-03-01"),
            ("paid", "true"),
        ]))
        .unwrap()
        .build();
        let names: Vec<_> = rows
            .iter()
            .filter(|r| expr.matches(r))
            .map(|r| r.booking_name.clone())
            .collect();
        assert_eq!(names, vec!["late"]);

        let by_guest = BookingCriteria::parse(&raw(&[("guest", &guest_id.to_string())]))
            .unwrap()
            .build();
        assert_eq!(rows.iter().filter(|r| by_guest.matches(r)).count(), 1);
    }

    #[test]
    fn review_rating_bounds() {
        let mk = |rating: u8| ReviewRow {
            id: Ulid::new(),
            room_id: Ulid::new(),
            guest_name: "anon".into(),
            room_name: "Deluxe".into(),
            rating,
            comment: "fine".into(),
            posted_on: "2024-01-01".parse().unwrap(),
        };
        let rows = vec![mk(1), mk(3), mk(5)];
        let expr = ReviewCriteria::parse(&raw(&[("min_rating", "2"), ("max_rating", "4")]))
            .unwrap()
            .build();
        let kept: Vec<_> = rows.iter().filter(|r| expr.matches(r)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].rating, 3);
    }

    #[test]
    fn guest_search_spans_fields() {
        let guest = Guest {
            id: Ulid::new(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@analytical.example".into(),
            phone: "+44 555 0101".into(),
            blocked: false,
        };
        for term in ["ada", "LOVE", "analytical", "0101"] {
            let expr = GuestCriteria::parse(&raw(&[("search", term)])).unwrap().build();
            assert!(expr.matches(&guest), "term {term:?} should match");
        }
        let miss = GuestCriteria::parse(&raw(&[("search", "babbage")])).unwrap().build();
        assert!(!miss.matches(&guest));
    }
}
