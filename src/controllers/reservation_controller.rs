use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::{page_bounds, ApiResponse, Page};
use crate::dto::reservation_dto::{
    CalendarEvent, CreateReservationRequest, ReservationDetail, ReservationResponse,
    ReservationFilters, UpdateReservationRequest,
};
use crate::models::reservation::ReservationStatus;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::services::booking::{BookingService, CustomerRef};
use crate::services::export;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_iso_date;

pub struct ReservationController {
    repository: ReservationRepository,
    booking: BookingService,
}

impl ReservationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReservationRepository::new(pool.clone()),
            booking: BookingService::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let (reservation, quote) = self
            .booking
            .create_reservation(
                request.car_id,
                CustomerRef::Existing(request.customer_id),
                request.start_date,
                request.end_date,
                request.status.unwrap_or(ReservationStatus::Booked),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            ReservationResponse::from_reservation(reservation, Some(quote)),
            "Reserva registrada correctamente.".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ReservationDetail, AppError> {
        self.repository
            .find_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))
    }

    pub async fn list(
        &self,
        filters: ReservationFilters,
    ) -> Result<Page<ReservationDetail>, AppError> {
        let (page, per_page, offset) = page_bounds(filters.page, filters.per_page);

        // Filtros de fecha malformados se ignoran, el listado no falla
        let start_from = parse_iso_date(filters.start_date.as_deref());
        let end_until = parse_iso_date(filters.end_date.as_deref());

        let (reservations, total) = self
            .repository
            .list(
                filters.q.as_deref(),
                filters.status,
                start_from,
                end_until,
                per_page,
                offset,
            )
            .await?;

        Ok(Page::new(reservations, total, page, per_page))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let (reservation, quote) = self
            .booking
            .update_reservation(
                id,
                request.customer_id,
                request.car_id,
                request.start_date,
                request.end_date,
                request.status,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            ReservationResponse::from_reservation(reservation, Some(quote)),
            "Reserva actualizada correctamente.".to_string(),
        ))
    }

    /// CSV con todas las reservas, para descarga desde el CRM.
    pub async fn export_csv(&self) -> Result<String, AppError> {
        let reservations = self.repository.all_details().await?;
        Ok(export::reservations_to_csv(&reservations))
    }

    /// Feed de eventos del calendario: reservas no canceladas.
    pub async fn calendar_events(&self) -> Result<Vec<CalendarEvent>, AppError> {
        let reservations = self.repository.active_details().await?;
        Ok(export::reservations_to_events(&reservations))
    }
}
