//! Tests de disponibilidad contra PostgreSQL
//!
//! Requieren una base con `DATABASE_URL` apuntando a una instancia de
//! prueba (las migraciones corren solas). Se ejecutan con:
//!
//! ```text
//! cargo test -- --ignored
//! ```

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::str::FromStr;
use tower::ServiceExt;
use uuid::Uuid;

use gamboa_rental::config::EnvironmentConfig;
use gamboa_rental::controllers::public_controller::PublicController;
use gamboa_rental::database::create_pool;
use gamboa_rental::models::car::{Car, CarStatus};
use gamboa_rental::models::customer::Customer;
use gamboa_rental::models::reservation::ReservationStatus;
use gamboa_rental::models::user::UserRole;
use gamboa_rental::repositories::car_repository::CarRepository;
use gamboa_rental::repositories::customer_repository::CustomerRepository;
use gamboa_rental::repositories::user_repository::UserRepository;
use gamboa_rental::routes::crm_routes;
use gamboa_rental::services::booking::{BookingService, CustomerRef};
use gamboa_rental::state::AppState;
use gamboa_rental::utils::errors::AppError;
use gamboa_rental::utils::jwt;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL para los tests de base de datos");
    create_pool(Some(&url)).await.expect("pool de pruebas")
}

async fn seed_car(pool: &PgPool, status: CarStatus) -> Car {
    let suffix = &Uuid::new_v4().to_string()[..8];
    CarRepository::new(pool.clone())
        .create(
            "Toyota".to_string(),
            "Yaris".to_string(),
            2022,
            format!("T-{suffix}"),
            status,
            Decimal::from_str("50.00").unwrap(),
            "Rojo".to_string(),
        )
        .await
        .expect("carro de prueba")
}

async fn seed_customer(pool: &PgPool) -> Customer {
    let suffix = &Uuid::new_v4().to_string()[..8];
    CustomerRepository::new(pool.clone())
        .create(
            "Ana".to_string(),
            "Pérez".to_string(),
            format!("ana+{suffix}@example.com"),
            "6000-0000".to_string(),
            String::new(),
        )
        .await
        .expect("cliente de prueba")
}

fn future(days: i64) -> NaiveDate {
    chrono::Utc::now().date_naive() + Duration::days(days)
}

#[tokio::test]
#[ignore]
async fn back_to_back_stays_do_not_conflict() {
    let pool = test_pool().await;
    let booking = BookingService::new(pool.clone());
    let car = seed_car(&pool, CarStatus::Available).await;
    let customer = seed_customer(&pool).await;

    booking
        .create_reservation(
            car.id,
            CustomerRef::Existing(customer.id),
            future(10),
            future(13),
            ReservationStatus::Booked,
        )
        .await
        .expect("primera reserva");

    // El día de fin queda libre: [10,13) y [13,16) no se cruzan
    booking
        .create_reservation(
            car.id,
            CustomerRef::Existing(customer.id),
            future(13),
            future(16),
            ReservationStatus::Booked,
        )
        .await
        .expect("reserva contigua");
}

#[tokio::test]
#[ignore]
async fn overlapping_stay_is_rejected() {
    let pool = test_pool().await;
    let booking = BookingService::new(pool.clone());
    let car = seed_car(&pool, CarStatus::Available).await;
    let customer = seed_customer(&pool).await;

    booking
        .create_reservation(
            car.id,
            CustomerRef::Existing(customer.id),
            future(10),
            future(14),
            ReservationStatus::Booked,
        )
        .await
        .expect("primera reserva");

    let result = booking
        .create_reservation(
            car.id,
            CustomerRef::Existing(customer.id),
            future(12),
            future(16),
            ReservationStatus::Booked,
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
#[ignore]
async fn cancelling_frees_the_range() {
    let pool = test_pool().await;
    let booking = BookingService::new(pool.clone());
    let car = seed_car(&pool, CarStatus::Available).await;
    let customer = seed_customer(&pool).await;

    let (reservation, _) = booking
        .create_reservation(
            car.id,
            CustomerRef::Existing(customer.id),
            future(10),
            future(14),
            ReservationStatus::Booked,
        )
        .await
        .expect("primera reserva");

    booking
        .update_reservation(
            reservation.id,
            customer.id,
            car.id,
            future(10),
            future(14),
            ReservationStatus::Cancelled,
        )
        .await
        .expect("cancelación");

    // El mismo rango vuelve a estar disponible
    booking
        .create_reservation(
            car.id,
            CustomerRef::Existing(customer.id),
            future(10),
            future(14),
            ReservationStatus::Booked,
        )
        .await
        .expect("re-reserva del rango liberado");
}

#[tokio::test]
#[ignore]
async fn maintenance_car_without_conflicts_is_bookable() {
    let pool = test_pool().await;
    let booking = BookingService::new(pool.clone());
    let car = seed_car(&pool, CarStatus::Maintenance).await;
    let customer = seed_customer(&pool).await;

    // El estado del carro no participa en la disponibilidad
    booking
        .create_reservation(
            car.id,
            CustomerRef::Existing(customer.id),
            future(10),
            future(12),
            ReservationStatus::Booked,
        )
        .await
        .expect("reserva sobre carro en mantenimiento");
}

#[tokio::test]
#[ignore]
async fn concurrent_double_submit_confirms_only_one() {
    let pool = test_pool().await;
    let car = seed_car(&pool, CarStatus::Available).await;
    let customer = seed_customer(&pool).await;

    let start = future(20);
    let end = future(23);

    let task = |pool: PgPool, car_id: Uuid, customer_id: Uuid| {
        tokio::spawn(async move {
            BookingService::new(pool)
                .create_reservation(
                    car_id,
                    CustomerRef::Existing(customer_id),
                    start,
                    end,
                    ReservationStatus::Booked,
                )
                .await
        })
    };

    let first = task(pool.clone(), car.id, customer.id);
    let second = task(pool.clone(), car.id, customer.id);

    let results = [first.await.unwrap(), second.await.unwrap()];
    let confirmed = results.iter().filter(|r| r.is_ok()).count();

    assert_eq!(confirmed, 1, "solo una de las dos debe confirmarse");

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservations WHERE car_id = $1 AND status <> 'cancelled'",
    )
    .bind(car.id)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(rows, 1);
}

#[tokio::test]
#[ignore]
async fn confirmation_keeps_the_booked_total_after_a_rate_change() {
    let pool = test_pool().await;
    let booking = BookingService::new(pool.clone());
    let car = seed_car(&pool, CarStatus::Available).await;
    let customer = seed_customer(&pool).await;

    let (reservation, _) = booking
        .create_reservation(
            car.id,
            CustomerRef::Existing(customer.id),
            future(10),
            future(13),
            ReservationStatus::Booked,
        )
        .await
        .expect("reserva a 50.00 la noche");

    // La tarifa sube después de reservar
    CarRepository::new(pool.clone())
        .update(
            car.id,
            None,
            None,
            None,
            None,
            None,
            Some(Decimal::from_str("80.00").unwrap()),
            None,
        )
        .await
        .expect("cambio de tarifa");

    let confirmation = PublicController::new(pool.clone())
        .reserve_success(reservation.id)
        .await
        .expect("confirmación");

    // Lo confirmado es lo que se reservó, no la tarifa vigente
    assert_eq!(confirmation.total_cost, Decimal::from_str("160.50").unwrap());
    assert_eq!(confirmation.customer, customer.display_name());
}

#[tokio::test]
#[ignore]
async fn editing_with_an_unknown_customer_is_rejected() {
    let pool = test_pool().await;
    let booking = BookingService::new(pool.clone());
    let car = seed_car(&pool, CarStatus::Available).await;
    let customer = seed_customer(&pool).await;

    let (reservation, _) = booking
        .create_reservation(
            car.id,
            CustomerRef::Existing(customer.id),
            future(10),
            future(13),
            ReservationStatus::Booked,
        )
        .await
        .expect("reserva inicial");

    let result = booking
        .update_reservation(
            reservation.id,
            Uuid::new_v4(),
            car.id,
            future(10),
            future(13),
            ReservationStatus::Booked,
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore]
async fn viewer_cannot_create_cars_through_the_router() {
    let pool = test_pool().await;
    let config = EnvironmentConfig::for_tests();
    let state = AppState::new(pool.clone(), config.clone());
    let app: Router = Router::new()
        .nest("/crm", crm_routes::create_crm_router(state.clone(), &config))
        .with_state(state);

    let suffix = &Uuid::new_v4().to_string()[..8];
    let password_hash = bcrypt::hash("paseo-prueba", 4).unwrap();
    let viewer = UserRepository::new(pool.clone())
        .create(
            format!("viewer_{suffix}"),
            password_hash,
            "Vista Previa".to_string(),
            UserRole::Viewer,
        )
        .await
        .expect("usuario viewer");

    let token = jwt::generate_token(viewer.id, &viewer.username, viewer.role, &config).unwrap();

    let response = app
        .oneshot(
            Request::post("/crm/cars")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "make": "Kia",
                        "model": "Rio",
                        "year": 2023,
                        "license_plate": format!("V-{suffix}"),
                        "daily_rate": "40.00",
                        "color": "Gris"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn checkout_upserts_the_customer_by_email() {
    let pool = test_pool().await;
    let booking = BookingService::new(pool.clone());
    let car = seed_car(&pool, CarStatus::Available).await;

    let suffix = &Uuid::new_v4().to_string()[..8];
    let email = format!("carlos+{suffix}@example.com");

    let (first, quote) = booking
        .create_reservation(
            car.id,
            CustomerRef::Upsert {
                first_name: "Carlos".to_string(),
                last_name: "Gómez".to_string(),
                email: email.clone(),
                phone: "6111-1111".to_string(),
            },
            future(30),
            future(33),
            ReservationStatus::Booked,
        )
        .await
        .expect("primer checkout");

    // 3 noches × 50.00 + 7% ITBMS
    assert_eq!(first.total_cost, Decimal::from_str("160.50").unwrap());
    assert_eq!(quote.total, first.total_cost);

    // Mismo email con otro teléfono: se refresca el cliente, no se duplica
    let (second, _) = booking
        .create_reservation(
            car.id,
            CustomerRef::Upsert {
                first_name: "Carlos".to_string(),
                last_name: "Gómez".to_string(),
                email: email.clone(),
                phone: "6222-2222".to_string(),
            },
            future(40),
            future(42),
            ReservationStatus::Booked,
        )
        .await
        .expect("segundo checkout");

    assert_eq!(first.customer_id, second.customer_id);

    let phone: String = sqlx::query_scalar("SELECT phone FROM customers WHERE id = $1")
        .bind(first.customer_id)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(phone, "6222-2222");
}
