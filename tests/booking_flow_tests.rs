//! Tests de flujo contra una base de datos Postgres real.
//!
//! Marcados con `#[ignore]`: requieren `DATABASE_URL` apuntando a una
//! base de datos de pruebas y se ejecutan con `cargo test -- --ignored`.
//! Cada test crea sus propios usuarios y vehículo para no interferir
//! con el resto.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use rental_marketplace::config::environment::EnvironmentConfig;
use rental_marketplace::routes::create_app_router;
use rental_marketplace::state::AppState;
use rental_marketplace::utils::jwt::{generate_token, JwtConfig};

const JWT_SECRET: &str = "flow-test-secret";

fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration: 3600,
        cors_origins: vec![],
    }
}

async fn setup_app() -> (Router, PgPool) {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for flow tests");
    let pool = PgPool::connect(&database_url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();

    let state = AppState::new(pool.clone(), test_config());
    (create_app_router(state), pool)
}

fn token_for(user_id: Uuid, role: &str) -> String {
    let config = JwtConfig {
        secret: JWT_SECRET.to_string(),
        expiration: 3600,
    };
    generate_token(user_id, role, &config).unwrap()
}

async fn insert_user(pool: &PgPool, role: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, full_name, email, password_hash, role, status, created_at)
         VALUES ($1, $2, $3, 'not-a-real-hash', $4::user_role, 'active', $5)",
    )
    .bind(id)
    .bind(format!("Flow Test {}", role))
    .bind(format!("{}@flow-tests.local", id))
    .bind(role)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();
    id
}

async fn insert_approved_vehicle(pool: &PgPool, owner_id: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO vehicles
            (id, owner_id, license_plate, brand, model, price_per_day,
             approval_status, is_available, created_at)
         VALUES ($1, $2, $3, 'Seat', 'Ibiza', 45.00, 'approved', TRUE, $4)",
    )
    .bind(id)
    .bind(owner_id)
    .bind(format!("FT-{}", &id.simple().to_string()[..10]))
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();
    id
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_booking(
    app: &Router,
    customer_token: &str,
    vehicle_id: Uuid,
    pickup: &str,
    dropoff: &str,
) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/bookings",
        Some(customer_token),
        Some(json!({
            "vehicle_id": vehicle_id,
            "pickup_date": pickup,
            "dropoff_date": dropoff,
            "pickup_location": "Madrid Centro",
            "dropoff_location": "Madrid Centro",
            "total_amount": "180.00",
        })),
    )
    .await
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn booking_creation_returns_201_and_starts_pending() {
    let (app, pool) = setup_app().await;
    let owner = insert_user(&pool, "owner").await;
    let customer = insert_user(&pool, "customer").await;
    let vehicle = insert_approved_vehicle(&pool, owner).await;
    let customer_token = token_for(customer, "customer");

    let (status, body) =
        create_booking(&app, &customer_token, vehicle, "2030-06-01", "2030-06-05").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["booking_status"], "pending");
    assert_eq!(body["data"]["payment_status"], "pending");

    // Una segunda reserva solapada choca contra la primera
    let (status, body) =
        create_booking(&app, &customer_token, vehicle, "2030-06-04", "2030-06-08").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unblocking_the_same_range_twice_returns_404() {
    let (app, pool) = setup_app().await;
    let owner = insert_user(&pool, "owner").await;
    let vehicle = insert_approved_vehicle(&pool, owner).await;
    let owner_token = token_for(owner, "owner");
    let uri = format!("/api/owner/vehicles/{}/block-dates", vehicle);

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(&owner_token),
        Some(json!({
            "start_date": "2030-07-01",
            "end_date": "2030-07-05",
            "reason": "maintenance",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let range = json!({ "start_date": "2030-07-01", "end_date": "2030-07-05" });

    let (status, _) = send(
        &app,
        Method::DELETE,
        &uri,
        Some(&owner_token),
        Some(range.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // El rango ya no existe: el segundo desbloqueo idéntico es 404
    let (status, body) = send(&app, Method::DELETE, &uri, Some(&owner_token), Some(range)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn foreign_owner_cannot_confirm_a_booking() {
    let (app, pool) = setup_app().await;
    let owner = insert_user(&pool, "owner").await;
    let stranger = insert_user(&pool, "owner").await;
    let customer = insert_user(&pool, "customer").await;
    let vehicle = insert_approved_vehicle(&pool, owner).await;
    let customer_token = token_for(customer, "customer");

    let (status, body) =
        create_booking(&app, &customer_token, vehicle, "2030-08-01", "2030-08-05").await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["data"]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/owner/bookings/{}/confirmed", booking_id);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token_for(stranger, "owner")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // La reserva sigue pendiente tras el intento ajeno
    let (status, body) = send(&app, Method::GET, "/api/bookings", Some(&customer_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let booking = body
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"] == booking_id.as_str())
        .unwrap();
    assert_eq!(booking["booking_status"], "pending");

    // El propietario real sí puede confirmar, y el vehículo deja de estar disponible
    let (status, _) = send(&app, Method::PUT, &uri, Some(&token_for(owner, "owner")), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/vehicles/{}", vehicle),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_available"], false);

    // Volver a pending no es una transición válida
    let pending_uri = format!("/api/owner/bookings/{}/pending", booking_id);
    let (status, body) = send(
        &app,
        Method::PUT,
        &pending_uri,
        Some(&token_for(owner, "owner")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
}
