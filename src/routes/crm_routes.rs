//! Router del CRM
//!
//! Todas las rutas pasan por el middleware JWT; los roles se verifican
//! en cada handler con `AuthenticatedUser`.

use axum::{extract::State, middleware, routing::get, Extension, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::controllers::reservation_controller::ReservationController;
use crate::dto::auth_dto::CrmRootResponse;
use crate::dto::reservation_dto::CalendarEvent;
use crate::config::EnvironmentConfig;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::routes::{car_routes, customer_routes, public_routes, reservation_routes};
use crate::services::dashboard::{DashboardService, DashboardStats};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_crm_router(state: AppState, config: &EnvironmentConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(crm_root))
        .route("/dashboard", get(dashboard))
        .route("/calendar/events", get(calendar_events))
        .nest("/cars", car_routes::create_car_router())
        .nest("/customers", customer_routes::create_customer_router())
        .nest(
            "/reservations",
            reservation_routes::create_reservation_router(),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
        // El checkout público comparte el prefijo /crm pero no requiere JWT:
        // se agrega después del route_layer para quedar fuera de él.
        .nest(
            "/public",
            public_routes::create_public_checkout_router(config),
        )
}

/// Landing según rol: el admin va al dashboard, el resto a reservas.
async fn crm_root(Extension(user): Extension<AuthenticatedUser>) -> Json<CrmRootResponse> {
    Json(AuthController::crm_root(user.role))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardStats>, AppError> {
    user.require_admin()?;
    let stats = DashboardService::new(state.pool.clone()).stats().await?;
    Ok(Json(stats))
}

async fn calendar_events(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    user.require_staff()?;
    let controller = ReservationController::new(state.pool.clone());
    let events = controller.calendar_events().await?;
    Ok(Json(events))
}
