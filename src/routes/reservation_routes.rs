use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::reservation_controller::ReservationController;
use crate::dto::common::{ApiResponse, Page};
use crate::dto::reservation_dto::{
    CreateReservationRequest, ReservationDetail, ReservationFilters, ReservationResponse,
    UpdateReservationRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

// Las reservas nunca se borran: la cancelación es un cambio de estado
// vía PUT, así que no hay ruta DELETE.
pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations))
        .route("/", post(create_reservation))
        .route("/export", get(export_csv))
        .route("/:id", get(get_reservation))
        .route("/:id", put(update_reservation))
}

async fn list_reservations(
    State(state): State<AppState>,
    Query(filters): Query<ReservationFilters>,
) -> Result<Json<Page<ReservationDetail>>, AppError> {
    let controller = ReservationController::new(state.pool.clone());
    let page = controller.list(filters).await?;
    Ok(Json(page))
}

async fn create_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    user.require_staff()?;
    let controller = ReservationController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationDetail>, AppError> {
    let controller = ReservationController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReservationRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    user.require_staff()?;
    let controller = ReservationController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn export_csv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;
    let controller = ReservationController::new(state.pool.clone());
    let csv = controller.export_csv().await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reservas.csv\"",
            ),
        ],
        csv,
    ))
}
