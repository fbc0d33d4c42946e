//! Rutas del sitio público
//!
//! Sin autenticación. La búsqueda y el checkout llevan rate limiting por
//! IP con límites separados. El checkout vive bajo `/crm/public`, así que
//! su router se monta dentro del router del CRM, fuera del middleware JWT.

use axum::{
    extract::{Query, State},
    middleware,
    routing::{get, post},
    Json, Router,
};

use crate::config::EnvironmentConfig;
use crate::controllers::public_controller::PublicController;
use crate::dto::common::ApiResponse;
use crate::dto::public_dto::{
    CheckoutContext, CheckoutParams, ContractResponse, PublicReservationRequest,
    PublicReservationResponse, ReservationConfirmation, SearchCar, SearchParams, SearchResponse,
    SuccessParams,
};
use crate::middleware::rate_limit::{rate_limit_middleware, RateLimitState};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Vitrina, búsqueda y contrato.
pub fn create_public_router(config: &EnvironmentConfig) -> Router<AppState> {
    let search_limit = RateLimitState::new(config.search_rate_limit, config.rate_limit_window);

    Router::new()
        .route("/", get(home))
        .route("/contrato", get(contract))
        .merge(
            Router::new()
                .route("/buscar", get(search))
                .route_layer(middleware::from_fn_with_state(
                    search_limit,
                    rate_limit_middleware,
                )),
        )
}

/// Checkout público, montado en `/crm/public` sin autenticación.
pub fn create_public_checkout_router(config: &EnvironmentConfig) -> Router<AppState> {
    let checkout_limit = RateLimitState::new(config.checkout_rate_limit, config.rate_limit_window);

    Router::new()
        .route("/reserve", get(checkout_context))
        .route("/reserve/success", get(reserve_success))
        .merge(
            Router::new()
                .route("/reserve", post(reserve))
                .route_layer(middleware::from_fn_with_state(
                    checkout_limit,
                    rate_limit_middleware,
                )),
        )
}

async fn home(State(state): State<AppState>) -> Result<Json<Vec<SearchCar>>, AppError> {
    let controller = PublicController::new(state.pool.clone());
    let cars = controller.home().await?;
    Ok(Json(cars))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let controller = PublicController::new(state.pool.clone());
    let response = controller.search(params).await?;
    Ok(Json(response))
}

async fn checkout_context(
    State(state): State<AppState>,
    Query(params): Query<CheckoutParams>,
) -> Result<Json<CheckoutContext>, AppError> {
    let controller = PublicController::new(state.pool.clone());
    let response = controller.checkout_context(params).await?;
    Ok(Json(response))
}

async fn reserve(
    State(state): State<AppState>,
    Json(request): Json<PublicReservationRequest>,
) -> Result<Json<ApiResponse<PublicReservationResponse>>, AppError> {
    let controller = PublicController::new(state.pool.clone());
    let response = controller.reserve(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Reserva confirmada. ¡Gracias por elegirnos!".to_string(),
    )))
}

async fn reserve_success(
    State(state): State<AppState>,
    Query(params): Query<SuccessParams>,
) -> Result<Json<ReservationConfirmation>, AppError> {
    let controller = PublicController::new(state.pool.clone());
    let response = controller.reserve_success(params.rid).await?;
    Ok(Json(response))
}

async fn contract() -> Json<ContractResponse> {
    Json(PublicController::contract())
}
