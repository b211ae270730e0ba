use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use futures::Sink;
use pgwire::api::auth::cleartext::CleartextPasswordAuthStartupHandler;
use pgwire::api::auth::{DefaultServerParameterProvider, StartupHandler};
use pgwire::api::copy::CopyHandler;
use pgwire::api::portal::{Format, Portal};
use pgwire::api::query::{ExtendedQueryHandler, SimpleQueryHandler};
use pgwire::api::results::{
    DataRowEncoder, DescribePortalResponse, DescribeStatementResponse, FieldFormat, FieldInfo,
    QueryResponse, Response, Tag,
};
use pgwire::api::stmt::{QueryParser, StoredStatement};
use pgwire::api::store::PortalStore;
use pgwire::api::{ClientInfo, ClientPortalStore, NoopHandler, PgWireServerHandlers, Type};
use pgwire::error::{ErrorInfo, PgWireError, PgWireResult};
use pgwire::messages::PgWireBackendMessage;
use pgwire::tokio::TlsAcceptor;
use tokio::net::TcpStream;
use ulid::Ulid;

use crate::auth::InnkeepAuthSource;
use crate::engine::Engine;
use crate::model::*;
use crate::observability;
use crate::sql::{self, Command};
use crate::tenant::TenantManager;

pub struct InnkeepHandler {
    tenant_manager: Arc<TenantManager>,
    query_parser: Arc<InnkeepQueryParser>,
}

impl InnkeepHandler {
    pub fn new(tenant_manager: Arc<TenantManager>) -> Self {
        Self {
            tenant_manager,
            query_parser: Arc::new(InnkeepQueryParser),
        }
    }

    fn resolve_engine<C: ClientInfo>(&self, client: &C) -> PgWireResult<Arc<Engine>> {
        let db = client
            .metadata()
            .get("database")
            .cloned()
            .unwrap_or_else(|| "default".to_string());
        self.tenant_manager.get_or_create(&db).map_err(|e| {
            PgWireError::UserError(Box::new(ErrorInfo::new(
                "ERROR".into(),
                "08006".into(),
                format!("tenant error: {e}"),
            )))
        })
    }

    async fn execute_command(
        &self,
        engine: &Engine,
        cmd: Command,
    ) -> PgWireResult<Vec<Response>> {
        let label = observability::command_label(&cmd);
        let start = std::time::Instant::now();
        let result = self.dispatch(engine, cmd).await;
        metrics::histogram!(observability::QUERY_DURATION_SECONDS, "command" => label)
            .record(start.elapsed().as_secs_f64());
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(observability::QUERIES_TOTAL, "command" => label, "status" => status)
            .increment(1);
        result
    }

    async fn dispatch(&self, engine: &Engine, cmd: Command) -> PgWireResult<Vec<Response>> {
        match cmd {
            // ── Mutations ────────────────────────────────
            Command::InsertAmenity { id, name } => {
                engine.create_amenity(id, name).await.map_err(engine_err)?;
                Ok(vec![insert_tag(1)])
            }
            Command::RenameAmenity { id, name } => {
                engine.rename_amenity(id, name).await.map_err(engine_err)?;
                Ok(vec![update_tag(1)])
            }
            Command::DeleteAmenity { id } => {
                engine.delete_amenity(id).await.map_err(engine_err)?;
                Ok(vec![delete_tag(1)])
            }
            Command::InsertRoom {
                id,
                name,
                room_number,
                room_type,
                price_per_night,
                max_occupancy,
                image,
            } => {
                engine
                    .create_room(id, name, room_number, room_type, price_per_night, max_occupancy, image)
                    .await
                    .map_err(engine_err)?;
                Ok(vec![insert_tag(1)])
            }
            Command::UpdateRoom {
                id,
                name,
                room_number,
                room_type,
                price_per_night,
                max_occupancy,
                image,
            } => {
                engine
                    .update_room(id, name, room_number, room_type, price_per_night, max_occupancy, image)
                    .await
                    .map_err(engine_err)?;
                Ok(vec![update_tag(1)])
            }
            Command::DeleteRoom { id } => {
                engine.delete_room(id).await.map_err(engine_err)?;
                Ok(vec![delete_tag(1)])
            }
            Command::AttachAmenity { room_id, amenity_id } => {
                engine
                    .attach_amenity(room_id, amenity_id)
                    .await
                    .map_err(engine_err)?;
                Ok(vec![insert_tag(1)])
            }
            Command::DetachAmenity { room_id, amenity_id } => {
                engine
                    .detach_amenity(room_id, amenity_id)
                    .await
                    .map_err(engine_err)?;
                Ok(vec![delete_tag(1)])
            }
            Command::InsertGuest { id, first_name, last_name, email, phone } => {
                engine
                    .register_guest(id, first_name, last_name, email, phone)
                    .await
                    .map_err(engine_err)?;
                Ok(vec![insert_tag(1)])
            }
            Command::UpdateGuest { id, first_name, last_name, email, phone } => {
                engine
                    .update_guest(id, first_name, last_name, email, phone)
                    .await
                    .map_err(engine_err)?;
                Ok(vec![update_tag(1)])
            }
            Command::BlockGuest { id } => {
                engine.block_guest(id).await.map_err(engine_err)?;
                Ok(vec![update_tag(1)])
            }
            Command::DeleteGuest { id } => {
                engine.delete_guest(id).await.map_err(engine_err)?;
                Ok(vec![delete_tag(1)])
            }
            Command::InsertBooking { id, room_id, guest_id, check_in, check_out, booking_name } => {
                engine
                    .reserve_if_available(id, room_id, guest_id, check_in, check_out, booking_name)
                    .await
                    .map_err(engine_err)?;
                Ok(vec![insert_tag(1)])
            }
            Command::MarkPaid { id } => {
                engine.mark_paid(id).await.map_err(engine_err)?;
                Ok(vec![update_tag(1)])
            }
            Command::DeleteBooking { id } => {
                engine.cancel_booking(id).await.map_err(engine_err)?;
                Ok(vec![delete_tag(1)])
            }
            Command::InsertPayment { id, booking_id, amount, paid_on } => {
                engine
                    .record_payment(id, booking_id, amount, paid_on)
                    .await
                    .map_err(engine_err)?;
                Ok(vec![insert_tag(1)])
            }
            Command::DeletePayment { id } => {
                engine.delete_payment(id).await.map_err(engine_err)?;
                Ok(vec![delete_tag(1)])
            }
            Command::InsertReview { id, room_id, guest_name, rating, comment, posted_on } => {
                engine
                    .post_review(id, room_id, guest_name, rating, comment, posted_on)
                    .await
                    .map_err(engine_err)?;
                Ok(vec![insert_tag(1)])
            }
            Command::DeleteReview { id } => {
                engine.delete_review(id).await.map_err(engine_err)?;
                Ok(vec![delete_tag(1)])
            }

            // ── Queries ──────────────────────────────────
            Command::SelectRooms { criteria } => {
                let rows = engine.list_rooms(&criteria).await.map_err(engine_err)?;
                Ok(vec![room_rows_response(rows)?])
            }
            Command::SelectBookings { criteria } => {
                let rows = engine.list_bookings(&criteria).await.map_err(engine_err)?;
                Ok(vec![booking_rows_response(rows)?])
            }
            Command::SelectReviews { criteria } => {
                let rows = engine.list_reviews(&criteria).await.map_err(engine_err)?;
                Ok(vec![review_rows_response(rows)?])
            }
            Command::SelectPayments { criteria } => {
                let rows = engine.list_payments(&criteria).await.map_err(engine_err)?;
                Ok(vec![payment_rows_response(rows)?])
            }
            Command::SelectGuests { criteria } => {
                let rows = engine.list_guests(&criteria).await.map_err(engine_err)?;
                Ok(vec![guest_rows_response(rows)?])
            }
            Command::SelectAmenities { criteria } => {
                let rows = engine.list_amenities(&criteria).await.map_err(engine_err)?;
                Ok(vec![amenity_rows_response(rows)?])
            }
            Command::SelectAvailability { room, check_in, check_out } => {
                let outcome = engine
                    .check_availability(room.as_deref(), check_in, check_out)
                    .await;
                let room_ref = room.unwrap_or_default();

                let schema = Arc::new(availability_schema());
                let mut encoder = DataRowEncoder::new(schema.clone());
                encoder.encode_field(&outcome.label().to_string())?;
                encoder.encode_field(&outcome.message(&room_ref))?;
                let rows: Vec<PgWireResult<_>> = vec![Ok(encoder.take_row())];
                Ok(vec![Response::Query(QueryResponse::new(
                    schema,
                    stream::iter(rows),
                ))])
            }
            Command::SelectActiveBookings => {
                let rows = engine.active_bookings(today()).await;
                Ok(vec![booking_rows_response(rows)?])
            }
            Command::SelectTopReviews => {
                let rows = engine.top_reviews().await;
                Ok(vec![review_rows_response(rows)?])
            }
            Command::SelectPopularAmenities => {
                let rows = engine.popular_amenities().await;
                Ok(vec![amenity_rows_response(rows)?])
            }
            Command::SelectRecentGuests => {
                let rows = engine.recent_guests();
                Ok(vec![guest_rows_response(rows)?])
            }
            Command::SelectRecentPayments => {
                let rows = engine.recent_payments().await;
                Ok(vec![payment_rows_response(rows)?])
            }
            Command::Listen { channel } => {
                let room_id_str = channel.strip_prefix("room_").ok_or_else(|| {
                    PgWireError::UserError(Box::new(ErrorInfo::new(
                        "ERROR".into(),
                        "42000".into(),
                        format!("invalid channel: {channel} (expected room_{{id}})"),
                    )))
                })?;
                let _room_id = Ulid::from_string(room_id_str).map_err(|e| {
                    PgWireError::UserError(Box::new(ErrorInfo::new(
                        "ERROR".into(),
                        "42000".into(),
                        format!("bad ULID in channel: {e}"),
                    )))
                })?;
                Ok(vec![Response::Execution(Tag::new("LISTEN"))])
            }
        }
    }
}

fn today() -> Day {
    chrono::Utc::now().date_naive()
}

fn insert_tag(rows: usize) -> Response {
    Response::Execution(Tag::new("INSERT").with_rows(rows))
}

fn update_tag(rows: usize) -> Response {
    Response::Execution(Tag::new("UPDATE").with_rows(rows))
}

fn delete_tag(rows: usize) -> Response {
    Response::Execution(Tag::new("DELETE").with_rows(rows))
}

// ── Result schemas (text format throughout) ──────────────────────

fn varchar(name: &str) -> FieldInfo {
    FieldInfo::new(name.into(), None, None, Type::VARCHAR, FieldFormat::Text)
}

fn int4(name: &str) -> FieldInfo {
    FieldInfo::new(name.into(), None, None, Type::INT4, FieldFormat::Text)
}

fn int8(name: &str) -> FieldInfo {
    FieldInfo::new(name.into(), None, None, Type::INT8, FieldFormat::Text)
}

fn numeric(name: &str) -> FieldInfo {
    FieldInfo::new(name.into(), None, None, Type::NUMERIC, FieldFormat::Text)
}

fn date(name: &str) -> FieldInfo {
    FieldInfo::new(name.into(), None, None, Type::DATE, FieldFormat::Text)
}

fn room_schema() -> Vec<FieldInfo> {
    vec![
        varchar("id"),
        varchar("name"),
        varchar("room_number"),
        varchar("room_type"),
        numeric("price_per_night"),
        int4("max_occupancy"),
        varchar("amenities"),
        varchar("has_image"),
    ]
}

fn booking_schema() -> Vec<FieldInfo> {
    vec![
        varchar("id"),
        varchar("room_id"),
        varchar("guest_id"),
        varchar("booking_name"),
        varchar("guest_name"),
        varchar("room_number"),
        date("check_in"),
        date("check_out"),
        numeric("total_price"),
        varchar("paid"),
    ]
}

fn review_schema() -> Vec<FieldInfo> {
    vec![
        varchar("id"),
        varchar("room_id"),
        varchar("guest_name"),
        varchar("room_name"),
        int4("rating"),
        varchar("comment"),
        date("review_date"),
    ]
}

fn payment_schema() -> Vec<FieldInfo> {
    vec![
        varchar("id"),
        varchar("booking_id"),
        numeric("amount"),
        date("payment_date"),
        varchar("guest_name"),
        varchar("booking_name"),
    ]
}

fn guest_schema() -> Vec<FieldInfo> {
    vec![
        varchar("id"),
        varchar("first_name"),
        varchar("last_name"),
        varchar("email"),
        varchar("phone"),
        varchar("blocked"),
    ]
}

fn amenity_schema() -> Vec<FieldInfo> {
    vec![varchar("id"), varchar("name"), int8("room_count")]
}

fn availability_schema() -> Vec<FieldInfo> {
    vec![varchar("status"), varchar("message")]
}

// ── Row encoding ─────────────────────────────────────────────────

fn room_rows_response(rows: Vec<RoomRow>) -> PgWireResult<Response> {
    let schema = Arc::new(room_schema());
    let encoded: Vec<PgWireResult<_>> = rows
        .into_iter()
        .map(|r| {
            let mut enc = DataRowEncoder::new(schema.clone());
            enc.encode_field(&r.id.to_string())?;
            enc.encode_field(&r.name)?;
            enc.encode_field(&r.room_number)?;
            enc.encode_field(&r.room_type)?;
            enc.encode_field(&r.price_per_night.to_string())?;
            enc.encode_field(&(r.max_occupancy as i32))?;
            enc.encode_field(&r.amenity_names.join(","))?;
            enc.encode_field(&r.has_image.to_string())?;
            Ok(enc.take_row())
        })
        .collect();
    Ok(Response::Query(QueryResponse::new(schema, stream::iter(encoded))))
}

fn booking_rows_response(rows: Vec<BookingRow>) -> PgWireResult<Response> {
    let schema = Arc::new(booking_schema());
    let encoded: Vec<PgWireResult<_>> = rows
        .into_iter()
        .map(|r| {
            let mut enc = DataRowEncoder::new(schema.clone());
            enc.encode_field(&r.id.to_string())?;
            enc.encode_field(&r.room_id.to_string())?;
            enc.encode_field(&r.guest_id.to_string())?;
            enc.encode_field(&r.booking_name)?;
            enc.encode_field(&r.guest_name)?;
            enc.encode_field(&r.room_number)?;
            enc.encode_field(&r.check_in.to_string())?;
            enc.encode_field(&r.check_out.to_string())?;
            enc.encode_field(&r.total_price.to_string())?;
            enc.encode_field(&r.paid.to_string())?;
            Ok(enc.take_row())
        })
        .collect();
    Ok(Response::Query(QueryResponse::new(schema, stream::iter(encoded))))
}

fn review_rows_response(rows: Vec<ReviewRow>) -> PgWireResult<Response> {
    let schema = Arc::new(review_schema());
    let encoded: Vec<PgWireResult<_>> = rows
        .into_iter()
        .map(|r| {
            let mut enc = DataRowEncoder::new(schema.clone());
            enc.encode_field(&r.id.to_string())?;
            enc.encode_field(&r.room_id.to_string())?;
            enc.encode_field(&r.guest_name)?;
            enc.encode_field(&r.room_name)?;
            enc.encode_field(&(r.rating as i32))?;
            enc.encode_field(&r.comment)?;
            enc.encode_field(&r.posted_on.to_string())?;
            Ok(enc.take_row())
        })
        .collect();
    Ok(Response::Query(QueryResponse::new(schema, stream::iter(encoded))))
}

fn payment_rows_response(rows: Vec<PaymentRow>) -> PgWireResult<Response> {
    let schema = Arc::new(payment_schema());
    let encoded: Vec<PgWireResult<_>> = rows
        .into_iter()
        .map(|r| {
            let mut enc = DataRowEncoder::new(schema.clone());
            enc.encode_field(&r.id.to_string())?;
            enc.encode_field(&r.booking_id.to_string())?;
            enc.encode_field(&r.amount.to_string())?;
            enc.encode_field(&r.paid_on.to_string())?;
            enc.encode_field(&r.guest_name)?;
            enc.encode_field(&r.booking_name)?;
            Ok(enc.take_row())
        })
        .collect();
    Ok(Response::Query(QueryResponse::new(schema, stream::iter(encoded))))
}

fn guest_rows_response(rows: Vec<Guest>) -> PgWireResult<Response> {
    let schema = Arc::new(guest_schema());
    let encoded: Vec<PgWireResult<_>> = rows
        .into_iter()
        .map(|g| {
            let mut enc = DataRowEncoder::new(schema.clone());
            enc.encode_field(&g.id.to_string())?;
            enc.encode_field(&g.first_name)?;
            enc.encode_field(&g.last_name)?;
            enc.encode_field(&g.email)?;
            enc.encode_field(&g.phone)?;
            enc.encode_field(&g.blocked.to_string())?;
            Ok(enc.take_row())
        })
        .collect();
    Ok(Response::Query(QueryResponse::new(schema, stream::iter(encoded))))
}

fn amenity_rows_response(rows: Vec<AmenityRow>) -> PgWireResult<Response> {
    let schema = Arc::new(amenity_schema());
    let encoded: Vec<PgWireResult<_>> = rows
        .into_iter()
        .map(|a| {
            let mut enc = DataRowEncoder::new(schema.clone());
            enc.encode_field(&a.id.to_string())?;
            enc.encode_field(&a.name)?;
            enc.encode_field(&(a.room_count as i64))?;
            Ok(enc.take_row())
        })
        .collect();
    Ok(Response::Query(QueryResponse::new(schema, stream::iter(encoded))))
}

#[async_trait]
impl SimpleQueryHandler for InnkeepHandler {
    async fn do_query<C>(&self, client: &mut C, query: &str) -> PgWireResult<Vec<Response>>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        let engine = self.resolve_engine(client)?;
        let cmd = sql::parse_sql(query).map_err(sql_err)?;
        self.execute_command(&engine, cmd).await
    }
}

// ── Extended Query Protocol ──────────────────────────────────────

#[derive(Debug)]
pub struct InnkeepQueryParser;

#[async_trait]
impl QueryParser for InnkeepQueryParser {
    type Statement = String;

    async fn parse_sql<C>(
        &self,
        _client: &C,
        sql: &str,
        _types: &[Option<Type>],
    ) -> PgWireResult<String>
    where
        C: ClientInfo + Unpin + Send + Sync,
    {
        Ok(sql.to_string())
    }

    fn get_parameter_types(&self, stmt: &String) -> PgWireResult<Vec<Type>> {
        Ok(vec![Type::VARCHAR; count_params(stmt)])
    }

    fn get_result_schema(
        &self,
        stmt: &String,
        _column_format: Option<&Format>,
    ) -> PgWireResult<Vec<FieldInfo>> {
        Ok(sniff_result_schema(stmt))
    }
}

/// Pick the result schema for a statement by its target table. Only
/// SELECTs return rows; everything else describes as empty.
fn sniff_result_schema(sql: &str) -> Vec<FieldInfo> {
    let upper = sql.to_uppercase();
    if !upper.contains("SELECT") {
        return vec![];
    }
    if upper.contains("AVAILABILITY") {
        availability_schema()
    } else if upper.contains("ACTIVE_BOOKINGS") {
        booking_schema()
    } else if upper.contains("TOP_REVIEWS") {
        review_schema()
    } else if upper.contains("POPULAR_AMENITIES") {
        amenity_schema()
    } else if upper.contains("RECENT_GUESTS") {
        guest_schema()
    } else if upper.contains("RECENT_PAYMENTS") {
        payment_schema()
    } else if upper.contains("ROOMS") {
        room_schema()
    } else if upper.contains("BOOKINGS") {
        booking_schema()
    } else if upper.contains("REVIEWS") {
        review_schema()
    } else if upper.contains("PAYMENTS") {
        payment_schema()
    } else if upper.contains("GUESTS") {
        guest_schema()
    } else if upper.contains("AMENITIES") {
        amenity_schema()
    } else {
        vec![]
    }
}

#[async_trait]
impl ExtendedQueryHandler for InnkeepHandler {
    type Statement = String;
    type QueryParser = InnkeepQueryParser;

    fn query_parser(&self) -> Arc<Self::QueryParser> {
        self.query_parser.clone()
    }

    async fn do_query<C>(
        &self,
        client: &mut C,
        portal: &Portal<Self::Statement>,
        _max_rows: usize,
    ) -> PgWireResult<Response>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::PortalStore: PortalStore<Statement = Self::Statement>,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        let engine = self.resolve_engine(client)?;
        let sql = substitute_params(portal);
        let cmd = sql::parse_sql(&sql).map_err(sql_err)?;
        let mut responses = self.execute_command(&engine, cmd).await?;
        Ok(responses.remove(0))
    }

    async fn do_describe_statement<C>(
        &self,
        _client: &mut C,
        target: &StoredStatement<Self::Statement>,
    ) -> PgWireResult<DescribeStatementResponse>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::PortalStore: PortalStore<Statement = Self::Statement>,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        let param_types = vec![Type::VARCHAR; count_params(&target.statement)];
        Ok(DescribeStatementResponse::new(
            param_types,
            sniff_result_schema(&target.statement),
        ))
    }

    async fn do_describe_portal<C>(
        &self,
        _client: &mut C,
        target: &Portal<Self::Statement>,
    ) -> PgWireResult<DescribePortalResponse>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::PortalStore: PortalStore<Statement = Self::Statement>,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        Ok(DescribePortalResponse::new(sniff_result_schema(
            &target.statement.statement,
        )))
    }
}

/// Count the highest $N parameter placeholder in the SQL string.
fn count_params(sql: &str) -> usize {
    let mut max = 0usize;
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            i += 1;
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i > start
                && let Ok(n) = sql[start..i].parse::<usize>()
                && n > max {
                    max = n;
                }
        } else {
            i += 1;
        }
    }
    max
}

/// Substitute $1, $2, ... placeholders with bound parameter values (text
/// format).
fn substitute_params(portal: &Portal<String>) -> String {
    let sql = portal.statement.statement.to_string();
    let params = &portal.parameters;
    let mut result = sql;

    for (i, param) in params.iter().enumerate().rev() {
        let placeholder = format!("${}", i + 1);
        let value = match param {
            Some(bytes) => {
                let text = String::from_utf8_lossy(bytes);
                format!("'{}'", text.replace('\'', "''"))
            }
            None => "NULL".to_string(),
        };
        result = result.replace(&placeholder, &value);
    }

    result
}

// ── Factory ──────────────────────────────────────────────────────

pub struct InnkeepFactory {
    handler: Arc<InnkeepHandler>,
    auth_handler:
        Arc<CleartextPasswordAuthStartupHandler<InnkeepAuthSource, DefaultServerParameterProvider>>,
    noop: Arc<NoopHandler>,
}

impl InnkeepFactory {
    pub fn new(tenant_manager: Arc<TenantManager>, password: String) -> Self {
        let auth_source = InnkeepAuthSource::new(password);
        let param_provider = DefaultServerParameterProvider::default();
        Self {
            handler: Arc::new(InnkeepHandler::new(tenant_manager)),
            auth_handler: Arc::new(CleartextPasswordAuthStartupHandler::new(
                auth_source,
                param_provider,
            )),
            noop: Arc::new(NoopHandler),
        }
    }
}

impl PgWireServerHandlers for InnkeepFactory {
    fn simple_query_handler(&self) -> Arc<impl SimpleQueryHandler> {
        self.handler.clone()
    }

    fn extended_query_handler(&self) -> Arc<impl ExtendedQueryHandler> {
        self.handler.clone()
    }

    fn startup_handler(&self) -> Arc<impl StartupHandler> {
        self.auth_handler.clone()
    }

    fn copy_handler(&self) -> Arc<impl CopyHandler> {
        self.noop.clone()
    }
}

/// Serve one client connection to completion.
pub async fn process_connection(
    socket: TcpStream,
    tenant_manager: Arc<TenantManager>,
    password: String,
    tls: Option<TlsAcceptor>,
) -> Result<(), std::io::Error> {
    let factory = Arc::new(InnkeepFactory::new(tenant_manager, password));
    pgwire::tokio::process_socket(socket, tls, factory).await
}

fn engine_err(e: crate::engine::EngineError) -> PgWireError {
    PgWireError::UserError(Box::new(ErrorInfo::new(
        "ERROR".into(),
        "P0001".into(),
        e.to_string(),
    )))
}

fn sql_err(e: crate::sql::SqlError) -> PgWireError {
    PgWireError::UserError(Box::new(ErrorInfo::new(
        "ERROR".into(),
        "42601".into(),
        e.to_string(),
    )))
}
