use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::{Car, CarStatus};
use crate::utils::errors::AppError;

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        make: String,
        model: String,
        year: i32,
        license_plate: String,
        status: CarStatus,
        daily_rate: Decimal,
        color: String,
    ) -> Result<Car, AppError> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (make, model, year, license_plate, status, daily_rate, color)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(make)
        .bind(model)
        .bind(year)
        .bind(license_plate)
        .bind(status)
        .bind(daily_rate)
        .bind(color)
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    pub async fn license_plate_exists(
        &self,
        license_plate: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM cars
                WHERE license_plate = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(license_plate)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Listado del CRM: búsqueda libre sobre marca/modelo/placa/color y
    /// filtro por estado, paginado.
    pub async fn list(
        &self,
        q: Option<&str>,
        status: Option<CarStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Car>, i64), AppError> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE ($1::text IS NULL
                   OR make ILIKE '%' || $1 || '%'
                   OR model ILIKE '%' || $1 || '%'
                   OR license_plate ILIKE '%' || $1 || '%'
                   OR color ILIKE '%' || $1 || '%')
              AND ($2::car_status IS NULL OR status = $2)
            ORDER BY make, model
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(q)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM cars
            WHERE ($1::text IS NULL
                   OR make ILIKE '%' || $1 || '%'
                   OR model ILIKE '%' || $1 || '%'
                   OR license_plate ILIKE '%' || $1 || '%'
                   OR color ILIKE '%' || $1 || '%')
              AND ($2::car_status IS NULL OR status = $2)
            "#,
        )
        .bind(q)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((cars, total))
    }

    /// Flota completa para el home, ordenada como en el sitio.
    pub async fn all_ordered(&self) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY make, model, year")
            .fetch_all(&self.pool)
            .await?;

        Ok(cars)
    }

    /// Búsqueda pública: fuera los carros en mantenimiento (vitrina) y los
    /// que tengan conflicto de fechas; filtros opcionales de marca y precio.
    pub async fn search_public(
        &self,
        car_id: Option<Uuid>,
        makes: Option<Vec<String>>,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
        excluded_ids: Vec<Uuid>,
    ) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE status <> 'maintenance'
              AND ($1::uuid IS NULL OR id = $1)
              AND ($2::text[] IS NULL OR make = ANY($2))
              AND ($3::numeric IS NULL OR daily_rate >= $3)
              AND ($4::numeric IS NULL OR daily_rate <= $4)
              AND id <> ALL($5::uuid[])
            ORDER BY make, model, year
            "#,
        )
        .bind(car_id)
        .bind(makes)
        .bind(min_price)
        .bind(max_price)
        .bind(excluded_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    pub async fn distinct_makes(&self) -> Result<Vec<String>, AppError> {
        let makes: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT make FROM cars ORDER BY make")
                .fetch_all(&self.pool)
                .await?;

        Ok(makes.into_iter().map(|(m,)| m).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        make: Option<String>,
        model: Option<String>,
        year: Option<i32>,
        license_plate: Option<String>,
        status: Option<CarStatus>,
        daily_rate: Option<Decimal>,
        color: Option<String>,
    ) -> Result<Car, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET make = $2, model = $3, year = $4, license_plate = $5,
                status = $6, daily_rate = $7, color = $8, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(make.unwrap_or(current.make))
        .bind(model.unwrap_or(current.model))
        .bind(year.unwrap_or(current.year))
        .bind(license_plate.unwrap_or(current.license_plate))
        .bind(status.unwrap_or(current.status))
        .bind(daily_rate.unwrap_or(current.daily_rate))
        .bind(color.unwrap_or(current.color))
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        Ok(())
    }
}
