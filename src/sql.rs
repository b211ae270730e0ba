use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlparser::ast::{
    self, Expr, FromTable, ObjectNamePart, SetExpr, Statement, TableFactor, TableObject, Value,
    ValueWithSpan,
};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use ulid::Ulid;

use crate::engine::RawCriteria;
use crate::model::Day;

/// Parsed command from SQL input.
#[derive(Debug, PartialEq)]
pub enum Command {
    InsertAmenity {
        id: Ulid,
        name: String,
    },
    RenameAmenity {
        id: Ulid,
        name: String,
    },
    DeleteAmenity {
        id: Ulid,
    },
    InsertRoom {
        id: Ulid,
        name: String,
        room_number: String,
        room_type: String,
        price_per_night: Decimal,
        max_occupancy: u32,
        image: Option<String>,
    },
    UpdateRoom {
        id: Ulid,
        name: String,
        room_number: String,
        room_type: String,
        price_per_night: Decimal,
        max_occupancy: u32,
        image: Option<String>,
    },
    DeleteRoom {
        id: Ulid,
    },
    AttachAmenity {
        room_id: Ulid,
        amenity_id: Ulid,
    },
    DetachAmenity {
        room_id: Ulid,
        amenity_id: Ulid,
    },
    InsertGuest {
        id: Ulid,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    },
    UpdateGuest {
        id: Ulid,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    },
    BlockGuest {
        id: Ulid,
    },
    DeleteGuest {
        id: Ulid,
    },
    InsertBooking {
        id: Ulid,
        room_id: Ulid,
        guest_id: Ulid,
        check_in: Day,
        check_out: Day,
        booking_name: String,
    },
    MarkPaid {
        id: Ulid,
    },
    DeleteBooking {
        id: Ulid,
    },
    InsertPayment {
        id: Ulid,
        booking_id: Ulid,
        amount: Decimal,
        paid_on: Day,
    },
    DeletePayment {
        id: Ulid,
    },
    InsertReview {
        id: Ulid,
        room_id: Ulid,
        guest_name: String,
        rating: u8,
        comment: String,
        posted_on: Option<Day>,
    },
    DeleteReview {
        id: Ulid,
    },
    SelectRooms {
        criteria: RawCriteria,
    },
    SelectBookings {
        criteria: RawCriteria,
    },
    SelectReviews {
        criteria: RawCriteria,
    },
    SelectPayments {
        criteria: RawCriteria,
    },
    SelectGuests {
        criteria: RawCriteria,
    },
    SelectAmenities {
        criteria: RawCriteria,
    },
    SelectAvailability {
        room: Option<String>,
        check_in: Option<Day>,
        check_out: Option<Day>,
    },
    SelectActiveBookings,
    SelectTopReviews,
    SelectPopularAmenities,
    SelectRecentGuests,
    SelectRecentPayments,
    Listen {
        channel: String,
    },
}

pub fn parse_sql(sql: &str) -> Result<Command, SqlError> {
    let trimmed = sql.trim();
    if trimmed.to_uppercase().starts_with("LISTEN ") {
        let channel = trimmed[7..].trim().trim_matches(';').to_string();
        return Ok(Command::Listen { channel });
    }

    let dialect = PostgreSqlDialect {};
    let stmts = Parser::parse_sql(&dialect, sql).map_err(|e| SqlError::Parse(e.to_string()))?;
    if stmts.is_empty() {
        return Err(SqlError::Empty);
    }

    match &stmts[0] {
        Statement::Insert(insert) => parse_insert(insert),
        Statement::Delete(delete) => parse_delete(delete),
        Statement::Update {
            table,
            assignments,
            selection,
            ..
        } => parse_update(table, assignments, selection),
        Statement::Query(query) => parse_select(query),
        other => Err(SqlError::Unsupported(format!("{other}"))),
    }
}

// ── INSERT ────────────────────────────────────────────────────

/// Column-name → value map for an INSERT. The column list is required;
/// positional VALUES alone are ambiguous across seven tables.
fn insert_fields(insert: &ast::Insert) -> Result<BTreeMap<String, Expr>, SqlError> {
    if insert.columns.is_empty() {
        return Err(SqlError::Parse("INSERT requires a column list".into()));
    }
    let body = insert
        .source
        .as_ref()
        .ok_or(SqlError::Parse("no VALUES".into()))?;
    let rows = match body.body.as_ref() {
        SetExpr::Values(values) => &values.rows,
        _ => return Err(SqlError::Parse("expected VALUES".into())),
    };
    if rows.len() != 1 {
        return Err(SqlError::Unsupported("multi-row INSERT".into()));
    }
    if rows[0].len() != insert.columns.len() {
        return Err(SqlError::Parse(format!(
            "column list has {} names but VALUES has {} entries",
            insert.columns.len(),
            rows[0].len()
        )));
    }
    Ok(insert
        .columns
        .iter()
        .map(|c| c.value.to_lowercase())
        .zip(rows[0].iter().cloned())
        .collect())
}

fn parse_insert(insert: &ast::Insert) -> Result<Command, SqlError> {
    let table = insert_table_name(insert)?;
    let fields = insert_fields(insert)?;

    match table.as_str() {
        "amenities" => Ok(Command::InsertAmenity {
            id: ulid_field(&fields, "id")?,
            name: string_field(&fields, "name")?,
        }),
        "rooms" => Ok(Command::InsertRoom {
            id: ulid_field(&fields, "id")?,
            name: string_field(&fields, "name")?,
            room_number: string_field(&fields, "room_number")?,
            room_type: string_field(&fields, "room_type")?,
            price_per_night: decimal_field(&fields, "price_per_night")?,
            max_occupancy: u32_field(&fields, "max_occupancy")?,
            image: opt_string_field(&fields, "image")?,
        }),
        "room_amenities" => Ok(Command::AttachAmenity {
            room_id: ulid_field(&fields, "room_id")?,
            amenity_id: ulid_field(&fields, "amenity_id")?,
        }),
        "guests" => Ok(Command::InsertGuest {
            id: ulid_field(&fields, "id")?,
            first_name: string_field(&fields, "first_name")?,
            last_name: string_field(&fields, "last_name")?,
            email: string_field(&fields, "email")?,
            phone: string_field(&fields, "phone")?,
        }),
        "bookings" => Ok(Command::InsertBooking {
            id: ulid_field(&fields, "id")?,
            room_id: ulid_field(&fields, "room_id")?,
            guest_id: ulid_field(&fields, "guest_id")?,
            check_in: day_field(&fields, "check_in")?,
            check_out: day_field(&fields, "check_out")?,
            booking_name: string_field(&fields, "booking_name")?,
        }),
        "payments" => Ok(Command::InsertPayment {
            id: ulid_field(&fields, "id")?,
            booking_id: ulid_field(&fields, "booking_id")?,
            amount: decimal_field(&fields, "amount")?,
            paid_on: day_field(&fields, "payment_date")?,
        }),
        "reviews" => Ok(Command::InsertReview {
            id: ulid_field(&fields, "id")?,
            room_id: ulid_field(&fields, "room_id")?,
            guest_name: string_field(&fields, "guest_name")?,
            rating: u8_field(&fields, "rating")?,
            comment: string_field(&fields, "comment")?,
            posted_on: opt_day_field(&fields, "review_date")?,
        }),
        _ => Err(SqlError::UnknownTable(table)),
    }
}

// ── DELETE ────────────────────────────────────────────────────

fn parse_delete(delete: &ast::Delete) -> Result<Command, SqlError> {
    let table = delete_table_name(delete)?;

    if table == "room_amenities" {
        let (room_id, amenity_id) = extract_room_amenity_pair(&delete.selection)?;
        return Ok(Command::DetachAmenity { room_id, amenity_id });
    }

    let id = extract_where_id(&delete.selection)?;
    match table.as_str() {
        "amenities" => Ok(Command::DeleteAmenity { id }),
        "rooms" => Ok(Command::DeleteRoom { id }),
        "guests" => Ok(Command::DeleteGuest { id }),
        "bookings" => Ok(Command::DeleteBooking { id }),
        "payments" => Ok(Command::DeletePayment { id }),
        "reviews" => Ok(Command::DeleteReview { id }),
        _ => Err(SqlError::UnknownTable(table)),
    }
}

// ── UPDATE ────────────────────────────────────────────────────

fn parse_update(
    table: &ast::TableWithJoins,
    assignments: &[ast::Assignment],
    selection: &Option<Expr>,
) -> Result<Command, SqlError> {
    let table = table_factor_name(&table.relation)?;
    let id = extract_where_id(selection)?;

    let mut fields: BTreeMap<String, Expr> = BTreeMap::new();
    for a in assignments {
        let col = assignment_column(a)?;
        fields.insert(col, a.value.clone());
    }

    match table.as_str() {
        "amenities" => Ok(Command::RenameAmenity {
            id,
            name: string_field(&fields, "name")?,
        }),
        "rooms" => Ok(Command::UpdateRoom {
            id,
            name: string_field(&fields, "name")?,
            room_number: string_field(&fields, "room_number")?,
            room_type: string_field(&fields, "room_type")?,
            price_per_night: decimal_field(&fields, "price_per_night")?,
            max_occupancy: u32_field(&fields, "max_occupancy")?,
            image: opt_string_field(&fields, "image")?,
        }),
        "guests" => {
            if fields.len() == 1 && fields.contains_key("blocked") {
                if !bool_field(&fields, "blocked")? {
                    return Err(SqlError::Unsupported("unblocking a guest".into()));
                }
                return Ok(Command::BlockGuest { id });
            }
            Ok(Command::UpdateGuest {
                id,
                first_name: string_field(&fields, "first_name")?,
                last_name: string_field(&fields, "last_name")?,
                email: string_field(&fields, "email")?,
                phone: string_field(&fields, "phone")?,
            })
        }
        "bookings" => {
            if !bool_field(&fields, "paid")? {
                return Err(SqlError::Unsupported("unmarking a paid booking".into()));
            }
            Ok(Command::MarkPaid { id })
        }
        _ => Err(SqlError::UnknownTable(table)),
    }
}

fn assignment_column(a: &ast::Assignment) -> Result<String, SqlError> {
    match &a.target {
        ast::AssignmentTarget::ColumnName(name) => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty column name".into()))
        }
        _ => Err(SqlError::Parse("unsupported assignment target".into())),
    }
}

// ── SELECT ────────────────────────────────────────────────────

fn parse_select(query: &ast::Query) -> Result<Command, SqlError> {
    let select = match query.body.as_ref() {
        SetExpr::Select(s) => s,
        _ => return Err(SqlError::Unsupported("non-SELECT query".into())),
    };

    if select.from.is_empty() {
        return Err(SqlError::Parse("SELECT without FROM".into()));
    }
    let table = table_factor_name(&select.from[0].relation)?;

    match table.as_str() {
        "availability" => {
            let (mut room, mut check_in, mut check_out) = (None, None, None);
            if let Some(selection) = &select.selection {
                extract_availability_filters(selection, &mut room, &mut check_in, &mut check_out)?;
            }
            Ok(Command::SelectAvailability { room, check_in, check_out })
        }
        "active_bookings" => Ok(Command::SelectActiveBookings),
        "top_reviews" => Ok(Command::SelectTopReviews),
        "popular_amenities" => Ok(Command::SelectPopularAmenities),
        "recent_guests" => Ok(Command::SelectRecentGuests),
        "recent_payments" => Ok(Command::SelectRecentPayments),
        "rooms" | "bookings" | "reviews" | "payments" | "guests" | "amenities" => {
            let mut criteria = RawCriteria::new();
            if let Some(selection) = &select.selection {
                extract_criteria(selection, &table, &mut criteria)?;
            }
            Ok(match table.as_str() {
                "rooms" => Command::SelectRooms { criteria },
                "bookings" => Command::SelectBookings { criteria },
                "reviews" => Command::SelectReviews { criteria },
                "payments" => Command::SelectPayments { criteria },
                "guests" => Command::SelectGuests { criteria },
                _ => Command::SelectAmenities { criteria },
            })
        }
        _ => Err(SqlError::UnknownTable(table)),
    }
}

fn extract_availability_filters(
    expr: &Expr,
    room: &mut Option<String>,
    check_in: &mut Option<Day>,
    check_out: &mut Option<Day>,
) -> Result<(), SqlError> {
    if let Expr::BinaryOp { left, op, right } = expr {
        match op {
            ast::BinaryOperator::And => {
                extract_availability_filters(left, room, check_in, check_out)?;
                extract_availability_filters(right, room, check_in, check_out)?;
            }
            ast::BinaryOperator::Eq => {
                let col = expr_column_name(left);
                if matches!(col.as_deref(), Some("room") | Some("room_name")) {
                    *room = Some(expr_string(right)?);
                }
            }
            ast::BinaryOperator::GtEq => {
                if expr_column_name(left).as_deref() == Some("check_in") {
                    *check_in = Some(expr_day(right)?);
                }
            }
            ast::BinaryOperator::LtEq => {
                if expr_column_name(left).as_deref() == Some("check_out") {
                    *check_out = Some(expr_day(right)?);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Flatten an AND-chain of comparisons into the raw criteria map the
/// filter engine consumes. Equality keeps the column name as the
/// criterion; range operators map to the `min_`/`_max` style criterion
/// names. Unknown columns and operators contribute nothing.
fn extract_criteria(expr: &Expr, table: &str, crit: &mut RawCriteria) -> Result<(), SqlError> {
    match expr {
        Expr::Nested(inner) => extract_criteria(inner, table, crit)?,
        Expr::BinaryOp { left, op, right } => match op {
            ast::BinaryOperator::And => {
                extract_criteria(left, table, crit)?;
                extract_criteria(right, table, crit)?;
            }
            ast::BinaryOperator::Eq => {
                if let Some(col) = expr_column_name(left)
                    && let Some(value) = expr_raw_value(right) {
                        crit.insert(col, value);
                    }
            }
            ast::BinaryOperator::GtEq => {
                if let Some(col) = expr_column_name(left)
                    && let Some(key) = lower_bound_key(table, &col)
                    && let Some(value) = expr_raw_value(right) {
                        crit.insert(key.to_string(), value);
                    }
            }
            ast::BinaryOperator::LtEq => {
                if let Some(col) = expr_column_name(left)
                    && let Some(key) = upper_bound_key(table, &col)
                    && let Some(value) = expr_raw_value(right) {
                        crit.insert(key.to_string(), value);
                    }
            }
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

fn lower_bound_key(table: &str, col: &str) -> Option<&'static str> {
    match (table, col) {
        ("rooms", "price_per_night") => Some("price_min"),
        ("bookings", "check_in") => Some("check_in_after"),
        ("bookings", "total_price") => Some("min_total_price"),
        ("reviews", "rating") => Some("min_rating"),
        ("payments", "amount") => Some("min_amount"),
        _ => None,
    }
}

fn upper_bound_key(table: &str, col: &str) -> Option<&'static str> {
    match (table, col) {
        ("rooms", "price_per_night") => Some("price_max"),
        ("rooms", "max_occupancy") => Some("max_occupancy"),
        ("bookings", "check_out") => Some("check_out_before"),
        ("bookings", "total_price") => Some("max_total_price"),
        ("reviews", "rating") => Some("max_rating"),
        ("payments", "amount") => Some("max_amount"),
        _ => None,
    }
}

// ── Expression helpers ────────────────────────────────────────

fn object_name_last(name: &ast::ObjectName) -> Option<String> {
    name.0.last().and_then(|part| match part {
        ObjectNamePart::Identifier(ident) => Some(ident.value.to_lowercase()),
        _ => None,
    })
}

fn insert_table_name(insert: &ast::Insert) -> Result<String, SqlError> {
    match &insert.table {
        TableObject::TableName(name) => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("unsupported table object in INSERT".into())),
    }
}

fn delete_table_name(delete: &ast::Delete) -> Result<String, SqlError> {
    let tables_with_joins = match &delete.from {
        FromTable::WithFromKeyword(t) | FromTable::WithoutKeyword(t) => t,
    };
    if let Some(first) = tables_with_joins.first() {
        table_factor_name(&first.relation)
    } else {
        Err(SqlError::Parse("DELETE without table".into()))
    }
}

fn table_factor_name(tf: &TableFactor) -> Result<String, SqlError> {
    match tf {
        TableFactor::Table { name, .. } => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("complex table expression".into())),
    }
}

fn extract_where_id(selection: &Option<Expr>) -> Result<Ulid, SqlError> {
    let sel = selection.as_ref().ok_or(SqlError::MissingFilter("id"))?;
    match sel {
        Expr::BinaryOp {
            left,
            op: ast::BinaryOperator::Eq,
            right,
        } => {
            if expr_column_name(left).as_deref() == Some("id") {
                expr_ulid(right)
            } else {
                Err(SqlError::MissingFilter("id"))
            }
        }
        _ => Err(SqlError::MissingFilter("id")),
    }
}

fn extract_room_amenity_pair(selection: &Option<Expr>) -> Result<(Ulid, Ulid), SqlError> {
    let sel = selection
        .as_ref()
        .ok_or(SqlError::MissingFilter("room_id"))?;
    let (mut room_id, mut amenity_id) = (None, None);
    collect_eq_ulids(sel, &mut room_id, &mut amenity_id)?;
    Ok((
        room_id.ok_or(SqlError::MissingFilter("room_id"))?,
        amenity_id.ok_or(SqlError::MissingFilter("amenity_id"))?,
    ))
}

fn collect_eq_ulids(
    expr: &Expr,
    room_id: &mut Option<Ulid>,
    amenity_id: &mut Option<Ulid>,
) -> Result<(), SqlError> {
    if let Expr::BinaryOp { left, op, right } = expr {
        match op {
            ast::BinaryOperator::And => {
                collect_eq_ulids(left, room_id, amenity_id)?;
                collect_eq_ulids(right, room_id, amenity_id)?;
            }
            ast::BinaryOperator::Eq => match expr_column_name(left).as_deref() {
                Some("room_id") => *room_id = Some(expr_ulid(right)?),
                Some("amenity_id") => *amenity_id = Some(expr_ulid(right)?),
                _ => {}
            },
            _ => {}
        }
    }
    Ok(())
}

fn expr_column_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.to_lowercase()),
        Expr::CompoundIdentifier(parts) => parts.last().map(|i| i.value.to_lowercase()),
        _ => None,
    }
}

fn extract_value(expr: &Expr) -> Option<&Value> {
    match expr {
        Expr::Value(ValueWithSpan { value, .. }) => Some(value),
        _ => None,
    }
}

/// Render a literal as the raw string handed to the filter engine.
fn expr_raw_value(expr: &Expr) -> Option<String> {
    match extract_value(expr)? {
        Value::SingleQuotedString(s) => Some(s.clone()),
        Value::Number(s, _) => Some(s.clone()),
        Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn expr_string(expr: &Expr) -> Result<String, SqlError> {
    match extract_value(expr) {
        Some(Value::SingleQuotedString(s)) => Ok(s.clone()),
        Some(other) => Err(SqlError::Parse(format!("expected string, got {other:?}"))),
        None => Err(SqlError::Parse(format!("expected value, got {expr:?}"))),
    }
}

fn expr_ulid(expr: &Expr) -> Result<Ulid, SqlError> {
    match extract_value(expr) {
        Some(Value::SingleQuotedString(s)) | Some(Value::Number(s, _)) => {
            Ulid::from_string(s).map_err(|e| SqlError::Parse(format!("bad ULID: {e}")))
        }
        Some(other) => Err(SqlError::Parse(format!("expected string, got {other:?}"))),
        None => Err(SqlError::Parse(format!("expected value, got {expr:?}"))),
    }
}

fn expr_decimal(expr: &Expr) -> Result<Decimal, SqlError> {
    match extract_value(expr) {
        Some(Value::Number(s, _)) | Some(Value::SingleQuotedString(s)) => s
            .parse()
            .map_err(|e| SqlError::Parse(format!("bad decimal: {e}"))),
        Some(other) => Err(SqlError::Parse(format!("expected number, got {other:?}"))),
        None => Err(SqlError::Parse(format!("expected value, got {expr:?}"))),
    }
}

fn expr_i64(expr: &Expr) -> Result<i64, SqlError> {
    match extract_value(expr) {
        Some(Value::Number(s, _)) | Some(Value::SingleQuotedString(s)) => s
            .parse()
            .map_err(|e| SqlError::Parse(format!("bad integer: {e}"))),
        Some(other) => Err(SqlError::Parse(format!("expected number, got {other:?}"))),
        None => Err(SqlError::Parse(format!("expected value, got {expr:?}"))),
    }
}

fn expr_day(expr: &Expr) -> Result<Day, SqlError> {
    let s = expr_string(expr)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|e| SqlError::Parse(format!("bad date {s:?}: {e}")))
}

fn expr_bool(expr: &Expr) -> Result<bool, SqlError> {
    match extract_value(expr) {
        Some(Value::Boolean(b)) => Ok(*b),
        Some(Value::SingleQuotedString(s)) => match s.to_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(SqlError::Parse(format!("bad bool: {s}"))),
        },
        Some(Value::Number(n, _)) => Ok(n != "0"),
        Some(other) => Err(SqlError::Parse(format!("expected bool, got {other:?}"))),
        None => Err(SqlError::Parse(format!("expected value, got {expr:?}"))),
    }
}

// ── Field-map accessors ───────────────────────────────────────

fn field<'a>(
    fields: &'a BTreeMap<String, Expr>,
    name: &'static str,
) -> Result<&'a Expr, SqlError> {
    fields.get(name).ok_or(SqlError::MissingColumn(name))
}

fn string_field(fields: &BTreeMap<String, Expr>, name: &'static str) -> Result<String, SqlError> {
    expr_string(field(fields, name)?)
}

fn opt_string_field(
    fields: &BTreeMap<String, Expr>,
    name: &'static str,
) -> Result<Option<String>, SqlError> {
    match fields.get(name) {
        None => Ok(None),
        Some(expr) => match extract_value(expr) {
            Some(Value::Null) => Ok(None),
            _ => Ok(Some(expr_string(expr)?)),
        },
    }
}

fn ulid_field(fields: &BTreeMap<String, Expr>, name: &'static str) -> Result<Ulid, SqlError> {
    expr_ulid(field(fields, name)?)
}

fn decimal_field(fields: &BTreeMap<String, Expr>, name: &'static str) -> Result<Decimal, SqlError> {
    expr_decimal(field(fields, name)?)
}

fn u32_field(fields: &BTreeMap<String, Expr>, name: &'static str) -> Result<u32, SqlError> {
    let v = expr_i64(field(fields, name)?)?;
    u32::try_from(v).map_err(|_| SqlError::Parse(format!("{v} out of range for {name}")))
}

fn u8_field(fields: &BTreeMap<String, Expr>, name: &'static str) -> Result<u8, SqlError> {
    let v = expr_i64(field(fields, name)?)?;
    u8::try_from(v).map_err(|_| SqlError::Parse(format!("{v} out of range for {name}")))
}

fn day_field(fields: &BTreeMap<String, Expr>, name: &'static str) -> Result<Day, SqlError> {
    expr_day(field(fields, name)?)
}

fn opt_day_field(
    fields: &BTreeMap<String, Expr>,
    name: &'static str,
) -> Result<Option<Day>, SqlError> {
    match fields.get(name) {
        None => Ok(None),
        Some(expr) => match extract_value(expr) {
            Some(Value::Null) => Ok(None),
            _ => Ok(Some(expr_day(expr)?)),
        },
    }
}

fn bool_field(fields: &BTreeMap<String, Expr>, name: &'static str) -> Result<bool, SqlError> {
    expr_bool(field(fields, name)?)
}

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SqlError {
    Parse(String),
    Empty,
    Unsupported(String),
    UnknownTable(String),
    MissingColumn(&'static str),
    MissingFilter(&'static str),
}

impl std::fmt::Display for SqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlError::Parse(s) => write!(f, "parse error: {s}"),
            SqlError::Empty => write!(f, "empty query"),
            SqlError::Unsupported(s) => write!(f, "unsupported: {s}"),
            SqlError::UnknownTable(t) => write!(f, "unknown table: {t}"),
            SqlError::MissingColumn(col) => write!(f, "missing column: {col}"),
            SqlError::MissingFilter(col) => write!(f, "missing filter: {col}"),
        }
    }
}

impl std::error::Error for SqlError {}
