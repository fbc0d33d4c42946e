use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{page_bounds, ApiResponse, Page};
use crate::dto::customer_dto::{
    CreateCustomerRequest, CustomerFilters, CustomerResponse, UpdateCustomerRequest,
};
use crate::repositories::customer_repository::CustomerRepository;
use crate::utils::errors::AppError;

pub struct CustomerController {
    repository: CustomerRepository,
}

impl CustomerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CustomerRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<ApiResponse<CustomerResponse>, AppError> {
        request.validate()?;

        // El email identifica al cliente, no se puede repetir
        if self.repository.email_exists(&request.email, None).await? {
            return Err(AppError::Conflict(
                "El email ya está registrado".to_string(),
            ));
        }

        let customer = self
            .repository
            .create(
                request.first_name,
                request.last_name,
                request.email,
                request.phone,
                request.address.unwrap_or_default(),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            customer.into(),
            "Cliente agregado correctamente.".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CustomerResponse, AppError> {
        let customer = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;

        Ok(customer.into())
    }

    pub async fn list(&self, filters: CustomerFilters) -> Result<Page<CustomerResponse>, AppError> {
        let (page, per_page, offset) = page_bounds(filters.page, filters.per_page);

        let (customers, total) = self
            .repository
            .list(filters.q.as_deref(), per_page, offset)
            .await?;

        Ok(Page::new(
            customers.into_iter().map(CustomerResponse::from).collect(),
            total,
            page,
            per_page,
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCustomerRequest,
    ) -> Result<ApiResponse<CustomerResponse>, AppError> {
        request.validate()?;

        if let Some(ref email) = request.email {
            if self.repository.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(
                    "El email ya está registrado".to_string(),
                ));
            }
        }

        let customer = self
            .repository
            .update(
                id,
                request.first_name,
                request.last_name,
                request.email,
                request.phone,
                request.address,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            customer.into(),
            "Cliente actualizado correctamente.".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id).await
    }
}
