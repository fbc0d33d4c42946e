use uuid::Uuid;
use validator::Validate;

use crate::dto::car_dto::{CarFilters, CarResponse, CreateCarRequest, UpdateCarRequest};
use crate::dto::common::{page_bounds, ApiResponse, Page};
use crate::models::car::CarStatus;
use crate::repositories::car_repository::CarRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;

pub struct CarController {
    repository: CarRepository,
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CarRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateCarRequest,
    ) -> Result<ApiResponse<CarResponse>, AppError> {
        request.validate()?;

        // Verificar que la placa no exista
        if self
            .repository
            .license_plate_exists(&request.license_plate, None)
            .await?
        {
            return Err(AppError::Conflict(
                "La placa ya está registrada".to_string(),
            ));
        }

        let car = self
            .repository
            .create(
                request.make,
                request.model,
                request.year,
                request.license_plate,
                request.status.unwrap_or(CarStatus::Available),
                request.daily_rate,
                request.color,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            car.into(),
            "Vehículo agregado correctamente.".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CarResponse, AppError> {
        let car = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(car.into())
    }

    pub async fn list(&self, filters: CarFilters) -> Result<Page<CarResponse>, AppError> {
        let (page, per_page, offset) = page_bounds(filters.page, filters.per_page);

        let (cars, total) = self
            .repository
            .list(filters.q.as_deref(), filters.status, per_page, offset)
            .await?;

        Ok(Page::new(
            cars.into_iter().map(CarResponse::from).collect(),
            total,
            page,
            per_page,
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCarRequest,
    ) -> Result<ApiResponse<CarResponse>, AppError> {
        request.validate()?;

        if let Some(ref plate) = request.license_plate {
            if self.repository.license_plate_exists(plate, Some(id)).await? {
                return Err(AppError::Conflict(
                    "La placa ya está registrada".to_string(),
                ));
            }
        }

        let car = self
            .repository
            .update(
                id,
                request.make,
                request.model,
                request.year,
                request.license_plate,
                request.status,
                request.daily_rate,
                request.color,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            car.into(),
            "Vehículo actualizado correctamente.".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id).await
    }
}
