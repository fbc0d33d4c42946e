use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::reservation_dto::ReservationDetail;
use crate::models::reservation::ReservationStatus;
use crate::utils::errors::AppError;

const DETAIL_COLUMNS: &str = r#"
    r.id, r.customer_id, r.car_id, r.start_date, r.end_date, r.status,
    r.total_cost, r.created_at, r.updated_at,
    c.first_name AS customer_first_name, c.last_name AS customer_last_name,
    c.email AS customer_email,
    a.make AS car_make, a.model AS car_model, a.year AS car_year,
    a.color AS car_color, a.license_plate AS car_license_plate
"#;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_detail(&self, id: Uuid) -> Result<Option<ReservationDetail>, AppError> {
        let sql = format!(
            r#"
            SELECT {DETAIL_COLUMNS}
            FROM reservations r
            JOIN customers c ON c.id = r.customer_id
            JOIN cars a ON a.id = r.car_id
            WHERE r.id = $1
            "#
        );

        let detail = sqlx::query_as::<_, ReservationDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(detail)
    }

    /// Listado del CRM: búsqueda libre sobre cliente y carro, filtros de
    /// estado y rango de fechas, paginado, más recientes primero.
    pub async fn list(
        &self,
        q: Option<&str>,
        status: Option<ReservationStatus>,
        start_from: Option<NaiveDate>,
        end_until: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ReservationDetail>, i64), AppError> {
        const FILTER: &str = r#"
            ($1::text IS NULL
             OR c.first_name ILIKE '%' || $1 || '%'
             OR c.last_name ILIKE '%' || $1 || '%'
             OR c.email ILIKE '%' || $1 || '%'
             OR a.make ILIKE '%' || $1 || '%'
             OR a.model ILIKE '%' || $1 || '%'
             OR a.license_plate ILIKE '%' || $1 || '%')
            AND ($2::reservation_status IS NULL OR r.status = $2)
            AND ($3::date IS NULL OR r.start_date >= $3)
            AND ($4::date IS NULL OR r.end_date <= $4)
        "#;

        let sql = format!(
            r#"
            SELECT {DETAIL_COLUMNS}
            FROM reservations r
            JOIN customers c ON c.id = r.customer_id
            JOIN cars a ON a.id = r.car_id
            WHERE {FILTER}
            ORDER BY r.start_date DESC
            LIMIT $5 OFFSET $6
            "#
        );

        let reservations = sqlx::query_as::<_, ReservationDetail>(&sql)
            .bind(q)
            .bind(status)
            .bind(start_from)
            .bind(end_until)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!(
            r#"
            SELECT COUNT(*)
            FROM reservations r
            JOIN customers c ON c.id = r.customer_id
            JOIN cars a ON a.id = r.car_id
            WHERE {FILTER}
            "#
        );

        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(q)
            .bind(status)
            .bind(start_from)
            .bind(end_until)
            .fetch_one(&self.pool)
            .await?;

        Ok((reservations, total))
    }

    /// Todas las reservas, para el exporte CSV.
    pub async fn all_details(&self) -> Result<Vec<ReservationDetail>, AppError> {
        let sql = format!(
            r#"
            SELECT {DETAIL_COLUMNS}
            FROM reservations r
            JOIN customers c ON c.id = r.customer_id
            JOIN cars a ON a.id = r.car_id
            ORDER BY r.start_date DESC
            "#
        );

        let reservations = sqlx::query_as::<_, ReservationDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(reservations)
    }

    /// Reservas no canceladas, para el calendario del CRM.
    pub async fn active_details(&self) -> Result<Vec<ReservationDetail>, AppError> {
        let sql = format!(
            r#"
            SELECT {DETAIL_COLUMNS}
            FROM reservations r
            JOIN customers c ON c.id = r.customer_id
            JOIN cars a ON a.id = r.car_id
            WHERE r.status <> 'cancelled'
            ORDER BY r.start_date
            "#
        );

        let reservations = sqlx::query_as::<_, ReservationDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(reservations)
    }
}
