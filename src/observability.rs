use std::net::SocketAddr;

use crate::sql::Command;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total queries executed. Labels: command, status.
pub const QUERIES_TOTAL: &str = "innkeep_queries_total";

/// Histogram: query latency in seconds. Labels: command.
pub const QUERY_DURATION_SECONDS: &str = "innkeep_query_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: active TCP connections.
pub const CONNECTIONS_ACTIVE: &str = "innkeep_connections_active";

/// Counter: total connections accepted.
pub const CONNECTIONS_TOTAL: &str = "innkeep_connections_total";

/// Counter: connections rejected due to limit.
pub const CONNECTIONS_REJECTED_TOTAL: &str = "innkeep_connections_rejected_total";

/// Gauge: number of active tenants (loaded engines).
pub const TENANTS_ACTIVE: &str = "innkeep_tenants_active";

/// Histogram: WAL group-commit flush duration in seconds.
pub const WAL_FLUSH_DURATION_SECONDS: &str = "innkeep_wal_flush_duration_seconds";

/// Histogram: WAL group-commit batch size (events per flush).
pub const WAL_FLUSH_BATCH_SIZE: &str = "innkeep_wal_flush_batch_size";

/// Install the Prometheus exporter on the given port. No-op if port is
/// None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::InsertAmenity { .. } => "insert_amenity",
        Command::RenameAmenity { .. } => "rename_amenity",
        Command::DeleteAmenity { .. } => "delete_amenity",
        Command::InsertRoom { .. } => "insert_room",
        Command::UpdateRoom { .. } => "update_room",
        Command::DeleteRoom { .. } => "delete_room",
        Command::AttachAmenity { .. } => "attach_amenity",
        Command::DetachAmenity { .. } => "detach_amenity",
        Command::InsertGuest { .. } => "insert_guest",
        Command::UpdateGuest { .. } => "update_guest",
        Command::BlockGuest { .. } => "block_guest",
        Command::DeleteGuest { .. } => "delete_guest",
        Command::InsertBooking { .. } => "insert_booking",
        Command::MarkPaid { .. } => "mark_paid",
        Command::DeleteBooking { .. } => "delete_booking",
        Command::InsertPayment { .. } => "insert_payment",
        Command::DeletePayment { .. } => "delete_payment",
        Command::InsertReview { .. } => "insert_review",
        Command::DeleteReview { .. } => "delete_review",
        Command::SelectRooms { .. } => "select_rooms",
        Command::SelectBookings { .. } => "select_bookings",
        Command::SelectReviews { .. } => "select_reviews",
        Command::SelectPayments { .. } => "select_payments",
        Command::SelectGuests { .. } => "select_guests",
        Command::SelectAmenities { .. } => "select_amenities",
        Command::SelectAvailability { .. } => "select_availability",
        Command::SelectActiveBookings => "select_active_bookings",
        Command::SelectTopReviews => "select_top_reviews",
        Command::SelectPopularAmenities => "select_popular_amenities",
        Command::SelectRecentGuests => "select_recent_guests",
        Command::SelectRecentPayments => "select_recent_payments",
        Command::Listen { .. } => "listen",
    }
}
