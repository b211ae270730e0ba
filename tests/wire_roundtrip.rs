use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_postgres::{Config, NoTls, SimpleQueryMessage};
use ulid::Ulid;

use innkeep::tenant::TenantManager;
use innkeep::wire;

// ── Test infrastructure ──────────────────────────────────────

async fn start_test_server() -> (SocketAddr, Arc<TenantManager>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let dir = std::env::temp_dir().join(format!("innkeep_int_test_{}", Ulid::new()));
    std::fs::create_dir_all(&dir).unwrap();
    let tm = Arc::new(TenantManager::new(dir, 1000));

    let tm2 = tm.clone();
    tokio::spawn(async move {
        loop {
            let (socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let tm = tm2.clone();
            tokio::spawn(async move {
                let _ = wire::process_connection(socket, tm, "innkeep".to_string(), None).await;
            });
        }
    });

    (addr, tm)
}

async fn connect(addr: SocketAddr) -> tokio_postgres::Client {
    let mut config = Config::new();
    config
        .host(addr.ip().to_string())
        .port(addr.port())
        .dbname("test")
        .user("innkeep")
        .password("innkeep");

    let (client, connection) = config.connect(NoTls).await.unwrap();
    tokio::spawn(async move {
        let _ = connection.await;
    });
    client
}

/// Data rows of a simple query result.
fn data_rows(messages: Vec<SimpleQueryMessage>) -> Vec<tokio_postgres::SimpleQueryRow> {
    messages
        .into_iter()
        .filter_map(|m| match m {
            SimpleQueryMessage::Row(row) => Some(row),
            _ => None,
        })
        .collect()
}

struct Fixture {
    room: Ulid,
    guest: Ulid,
}

/// Seed one "Deluxe" room with a Wifi amenity, a guest, and one booking
/// 2024-01-03..2024-01-05.
async fn seed_deluxe(client: &tokio_postgres::Client) -> Fixture {
    let room = Ulid::new();
    let guest = Ulid::new();
    let amenity = Ulid::new();
    let booking = Ulid::new();

    client
        .batch_execute(&format!(
            "INSERT INTO amenities (id, name) VALUES ('{amenity}', 'Wifi')"
        ))
        .await
        .unwrap();
    client
        .batch_execute(&format!(
            "INSERT INTO rooms (id, name, room_number, room_type, price_per_night, max_occupancy) \
             VALUES ('{room}', 'Deluxe', '101', 'Suite', 120.50, 2)"
        ))
        .await
        .unwrap();
    client
        .batch_execute(&format!(
            "INSERT INTO room_amenities (room_id, amenity_id) VALUES ('{room}', '{amenity}')"
        ))
        .await
        .unwrap();
    client
        .batch_execute(&format!(
            "INSERT INTO guests (id, first_name, last_name, email, phone) \
             VALUES ('{guest}', 'Ada', 'Lovelace', 'ada@example.com', '+1 555 0100')"
        ))
        .await
        .unwrap();
    client
        .batch_execute(&format!(
            "INSERT INTO bookings (id, room_id, guest_id, check_in, check_out, booking_name) \
             VALUES ('{booking}', '{room}', '{guest}', '2024-01-03', '2024-01-05', 'Booking for Ada')"
        ))
        .await
        .unwrap();

    Fixture { room, guest }
}

// ── Tests ────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_select_roundtrip() {
    let (addr, _tm) = start_test_server().await;
    let client = connect(addr).await;
    seed_deluxe(&client).await;

    let rooms = data_rows(client.simple_query("SELECT * FROM rooms").await.unwrap());
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].get(1), Some("Deluxe"));
    assert_eq!(rooms[0].get(4), Some("120.50"));
    assert_eq!(rooms[0].get(6), Some("Wifi"));

    let bookings = data_rows(client.simple_query("SELECT * FROM bookings").await.unwrap());
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].get(4), Some("Ada Lovelace"));
    assert_eq!(bookings[0].get(6), Some("2024-01-03"));
    // 120.50 × 2 nights, fixed at reservation time.
    assert_eq!(bookings[0].get(8), Some("241.00"));
    assert_eq!(bookings[0].get(9), Some("false"));
}

#[tokio::test]
async fn availability_over_the_wire() {
    let (addr, _tm) = start_test_server().await;
    let client = connect(addr).await;
    seed_deluxe(&client).await;

    // A second room that exists but has no booking history.
    let suite = Ulid::new();
    client
        .batch_execute(&format!(
            "INSERT INTO rooms (id, name, room_number, room_type, price_per_night, max_occupancy) \
             VALUES ('{suite}', 'Suite', '102', 'Suite', 90, 2)"
        ))
        .await
        .unwrap();

    let booked = data_rows(
        client
            .simple_query(
                "SELECT * FROM availability WHERE room = 'Deluxe' \
                 AND check_in >= '2024-01-03' AND check_out <= '2024-01-05'",
            )
            .await
            .unwrap(),
    );
    assert_eq!(booked[0].get(0), Some("already_booked"));

    let free = data_rows(
        client
            .simple_query(
                "SELECT * FROM availability WHERE room = 'Deluxe' \
                 AND check_in >= '2024-02-01' AND check_out <= '2024-02-05'",
            )
            .await
            .unwrap(),
    );
    assert_eq!(free[0].get(0), Some("available"));

    // Zero booking history reads as not found, even though the room
    // exists in the catalog.
    let unknown = data_rows(
        client
            .simple_query(
                "SELECT * FROM availability WHERE room = 'Suite' \
                 AND check_in >= '2024-02-01' AND check_out <= '2024-02-05'",
            )
            .await
            .unwrap(),
    );
    assert_eq!(unknown[0].get(0), Some("room_not_found"));
    assert_eq!(unknown[0].get(1), Some("Room 'Suite' not found."));

    let missing_dates = data_rows(
        client
            .simple_query("SELECT * FROM availability WHERE room = 'Deluxe'")
            .await
            .unwrap(),
    );
    assert_eq!(missing_dates[0].get(0), Some("insufficient_input"));
}

#[tokio::test]
async fn double_booking_rejected_over_the_wire() {
    let (addr, _tm) = start_test_server().await;
    let client = connect(addr).await;
    let fixture = seed_deluxe(&client).await;

    let clash = Ulid::new();
    let result = client
        .batch_execute(&format!(
            "INSERT INTO bookings (id, room_id, guest_id, check_in, check_out, booking_name) \
             VALUES ('{clash}', '{}', '{}', '2024-01-04', '2024-01-06', 'clash')",
            fixture.room, fixture.guest
        ))
        .await;
    let err = result.unwrap_err().to_string();
    assert!(err.contains("overlaps"), "unexpected error: {err}");

    // Back-to-back is fine.
    let follow_on = Ulid::new();
    client
        .batch_execute(&format!(
            "INSERT INTO bookings (id, room_id, guest_id, check_in, check_out, booking_name) \
             VALUES ('{follow_on}', '{}', '{}', '2024-01-05', '2024-01-07', 'follow-on')",
            fixture.room, fixture.guest
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn validation_errors_over_the_wire() {
    let (addr, _tm) = start_test_server().await;
    let client = connect(addr).await;
    let fixture = seed_deluxe(&client).await;

    let backwards = client
        .batch_execute(&format!(
            "INSERT INTO bookings (id, room_id, guest_id, check_in, check_out, booking_name) \
             VALUES ('{}', '{}', '{}', '2024-05-10', '2024-05-05', 'backwards')",
            Ulid::new(),
            fixture.room,
            fixture.guest
        ))
        .await;
    let err = backwards.unwrap_err().to_string();
    assert!(err.contains("check_out"), "unexpected error: {err}");

    let overrated = client
        .batch_execute(&format!(
            "INSERT INTO reviews (id, room_id, guest_name, rating, comment, review_date) \
             VALUES ('{}', '{}', 'anon', 6, 'too good', '2024-01-06')",
            Ulid::new(),
            fixture.room
        ))
        .await;
    let err = overrated.unwrap_err().to_string();
    assert!(err.contains("rating"), "unexpected error: {err}");

    // Rating 5 on the same room succeeds.
    client
        .batch_execute(&format!(
            "INSERT INTO reviews (id, room_id, guest_name, rating, comment, review_date) \
             VALUES ('{}', '{}', 'anon', 5, 'lovely', '2024-01-06')",
            Ulid::new(),
            fixture.room
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn room_filters_over_the_wire() {
    let (addr, _tm) = start_test_server().await;
    let client = connect(addr).await;
    seed_deluxe(&client).await;

    for (name, price, occupancy) in [("Budget", "45", 1), ("Family", "200", 6)] {
        client
            .batch_execute(&format!(
                "INSERT INTO rooms (id, name, room_number, room_type, price_per_night, max_occupancy) \
                 VALUES ('{}', '{name}', '201', 'Standard', {price}, {occupancy})",
                Ulid::new()
            ))
            .await
            .unwrap();
    }

    let rows = data_rows(
        client
            .simple_query(
                "SELECT * FROM rooms WHERE price_per_night >= 50 \
                 AND price_per_night <= 150 AND max_occupancy <= 2",
            )
            .await
            .unwrap(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(1), Some("Deluxe"));

    let by_amenity = data_rows(
        client
            .simple_query("SELECT * FROM rooms WHERE amenities = 'wifi,balcony'")
            .await
            .unwrap(),
    );
    assert_eq!(by_amenity.len(), 1);
    assert_eq!(by_amenity[0].get(1), Some("Deluxe"));

    let bad = client
        .simple_query("SELECT * FROM rooms WHERE price_per_night >= 'cheap'")
        .await;
    let err = bad.unwrap_err().to_string();
    assert!(err.contains("price_min"), "unexpected error: {err}");
}

#[tokio::test]
async fn transitions_and_cascades_over_the_wire() {
    let (addr, _tm) = start_test_server().await;
    let client = connect(addr).await;
    let fixture = seed_deluxe(&client).await;

    let bookings = data_rows(client.simple_query("SELECT * FROM bookings").await.unwrap());
    let booking_id = bookings[0].get(0).unwrap().to_string();

    client
        .batch_execute(&format!("UPDATE bookings SET paid = true WHERE id = '{booking_id}'"))
        .await
        .unwrap();
    let paid = data_rows(
        client
            .simple_query("SELECT * FROM bookings WHERE paid = true")
            .await
            .unwrap(),
    );
    assert_eq!(paid.len(), 1);

    client
        .batch_execute(&format!(
            "UPDATE guests SET blocked = true WHERE id = '{}'",
            fixture.guest
        ))
        .await
        .unwrap();
    let blocked = data_rows(
        client
            .simple_query("SELECT * FROM guests WHERE blocked = true")
            .await
            .unwrap(),
    );
    assert_eq!(blocked.len(), 1);

    // Deleting the guest takes the booking with it.
    client
        .batch_execute(&format!("DELETE FROM guests WHERE id = '{}'", fixture.guest))
        .await
        .unwrap();
    let bookings = data_rows(client.simple_query("SELECT * FROM bookings").await.unwrap());
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn extended_protocol_binds_parameters() {
    let (addr, _tm) = start_test_server().await;
    let client = connect(addr).await;
    seed_deluxe(&client).await;

    let rows = client
        .query("SELECT * FROM availability WHERE room = $1 AND check_in >= $2 AND check_out <= $3", &[])
        .await;
    // Parameter binding goes through the text substitution path; when the
    // client sends no parameters the placeholders stay unresolved and the
    // server answers with a parse error rather than a hang.
    assert!(rows.is_err());

    let prepared = client
        .prepare("SELECT * FROM rooms WHERE room_type = $1")
        .await
        .unwrap();
    let rows = client.query(&prepared, &[&"suite"]).await.unwrap();
    assert_eq!(rows.len(), 1);
    let name: &str = rows[0].get(1);
    assert_eq!(name, "Deluxe");
}

#[tokio::test]
async fn report_tables_over_the_wire() {
    let (addr, _tm) = start_test_server().await;
    let client = connect(addr).await;
    let fixture = seed_deluxe(&client).await;

    client
        .batch_execute(&format!(
            "INSERT INTO reviews (id, room_id, guest_name, rating, comment, review_date) \
             VALUES ('{}', '{}', 'anon', 5, 'lovely', '2024-01-06')",
            Ulid::new(),
            fixture.room
        ))
        .await
        .unwrap();

    let top = data_rows(client.simple_query("SELECT * FROM top_reviews").await.unwrap());
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].get(4), Some("5"));

    let recent = data_rows(client.simple_query("SELECT * FROM recent_guests").await.unwrap());
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].get(1), Some("Ada"));
}
