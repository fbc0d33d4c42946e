//! Servicio de disponibilidad y precios
//!
//! Toda reserva pasa por aquí: validación de fechas, cotización con ITBMS
//! y el alta transaccional que garantiza que dos solicitudes simultáneas
//! para el mismo carro y rango no puedan confirmarse ambas.
//!
//! La regla de disponibilidad mira únicamente las reservas no canceladas
//! del carro cuyo rango [start_date, end_date) se cruce con el solicitado.
//! `Car.status` es una bandera operativa y no participa en la decisión:
//! un carro en mantenimiento sin conflicto de fechas sí se puede reservar.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::Car;
use crate::models::customer::Customer;
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::utils::errors::{AppError, UNAVAILABLE_MSG};

/// ITBMS panameño: 7%
fn tax_rate() -> Decimal {
    Decimal::new(7, 2)
}

/// Desglose de precio de una estadía
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub nights: i64,
    pub daily_rate: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Quote {
    /// Cotizar una estadía [start, end): noches × tarifa, más 7% de ITBMS.
    /// Redondeo a 2 decimales, mitades hacia arriba.
    pub fn for_stay(daily_rate: Decimal, start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        let nights = (end - start).num_days();
        if nights < 1 {
            return Err(AppError::BadRequest(
                "La fecha de fin no puede ser anterior o igual a la de inicio.".to_string(),
            ));
        }

        let round = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let subtotal = round(daily_rate * Decimal::from(nights));
        let tax = round(subtotal * tax_rate());
        let total = round(subtotal + tax);

        Ok(Self {
            nights,
            daily_rate,
            subtotal,
            tax,
            total,
        })
    }
}

/// Validar el rango de fechas de una reserva. Las reservas nuevas no pueden
/// empezar en el pasado; al editar una reserva existente sí se permiten
/// fechas pasadas.
pub fn validate_dates(start: NaiveDate, end: NaiveDate, allow_past: bool) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::BadRequest(
            "La fecha de fin no puede ser anterior o igual a la de inicio.".to_string(),
        ));
    }
    if !allow_past && start < chrono::Utc::now().date_naive() {
        return Err(AppError::BadRequest(
            "La fecha de inicio no puede estar en el pasado.".to_string(),
        ));
    }
    Ok(())
}

/// Cliente de una reserva nueva: uno existente del CRM o los datos del
/// checkout público, que se crean o refrescan por email.
pub enum CustomerRef {
    Existing(Uuid),
    Upsert {
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    },
}

#[derive(Clone)]
pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// IDs de carros con alguna reserva no cancelada que se cruce con el
    /// rango solicitado. Lo usa la búsqueda pública para ocultarlos.
    pub async fn conflicting_car_ids(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT car_id FROM reservations
            WHERE status <> 'cancelled'
              AND start_date < $2 AND end_date > $1
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Crear una reserva dentro de una sola transacción: bloquea la fila del
    /// carro, re-verifica la disponibilidad y recién entonces inserta. La
    /// exclusion constraint de la tabla es el respaldo si otro proceso se
    /// adelanta entre el chequeo y el insert.
    pub async fn create_reservation(
        &self,
        car_id: Uuid,
        customer: CustomerRef,
        start: NaiveDate,
        end: NaiveDate,
        status: ReservationStatus,
    ) -> Result<(Reservation, Quote), AppError> {
        validate_dates(start, end, false)?;

        let mut tx = self.pool.begin().await?;

        let car: Car = sqlx::query_as("SELECT * FROM cars WHERE id = $1 FOR UPDATE")
            .bind(car_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if Self::has_conflict(&mut tx, car_id, start, end, None).await? {
            return Err(AppError::Conflict(UNAVAILABLE_MSG.to_string()));
        }

        let customer_id = match customer {
            CustomerRef::Existing(id) => {
                let exists: (bool,) =
                    sqlx::query_as("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                if !exists.0 {
                    return Err(AppError::NotFound("Cliente no encontrado".to_string()));
                }
                id
            }
            CustomerRef::Upsert {
                first_name,
                last_name,
                email,
                phone,
            } => {
                // get-or-create por email, refrescando nombre y teléfono
                let customer: Customer = sqlx::query_as(
                    r#"
                    INSERT INTO customers (first_name, last_name, email, phone)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (email) DO UPDATE
                        SET first_name = EXCLUDED.first_name,
                            last_name = EXCLUDED.last_name,
                            phone = EXCLUDED.phone,
                            updated_at = now()
                    RETURNING *
                    "#,
                )
                .bind(first_name)
                .bind(last_name)
                .bind(email)
                .bind(phone)
                .fetch_one(&mut *tx)
                .await?;
                customer.id
            }
        };

        let quote = Quote::for_stay(car.daily_rate, start, end)?;

        let reservation: Reservation = sqlx::query_as(
            r#"
            INSERT INTO reservations (customer_id, car_id, start_date, end_date, status, total_cost)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(car_id)
        .bind(start)
        .bind(end)
        .bind(status)
        .bind(quote.total)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((reservation, quote))
    }

    /// Editar una reserva desde el CRM. Re-verifica la disponibilidad
    /// excluyendo la propia fila y recalcula el total con el carro y las
    /// fechas nuevas. Pasar a `cancelled` libera el rango.
    pub async fn update_reservation(
        &self,
        id: Uuid,
        customer_id: Uuid,
        car_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        status: ReservationStatus,
    ) -> Result<(Reservation, Quote), AppError> {
        validate_dates(start, end, true)?;

        let mut tx = self.pool.begin().await?;

        let _current: Reservation =
            sqlx::query_as("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        let car: Car = sqlx::query_as("SELECT * FROM cars WHERE id = $1 FOR UPDATE")
            .bind(car_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let customer_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(customer_id)
                .fetch_one(&mut *tx)
                .await?;
        if !customer_exists.0 {
            return Err(AppError::NotFound("Cliente no encontrado".to_string()));
        }

        // Una reserva cancelada no ocupa el rango, no hay nada que chequear.
        if status != ReservationStatus::Cancelled
            && Self::has_conflict(&mut tx, car_id, start, end, Some(id)).await?
        {
            return Err(AppError::Conflict(UNAVAILABLE_MSG.to_string()));
        }

        let quote = Quote::for_stay(car.daily_rate, start, end)?;

        let reservation: Reservation = sqlx::query_as(
            r#"
            UPDATE reservations
            SET customer_id = $2, car_id = $3, start_date = $4, end_date = $5,
                status = $6, total_cost = $7, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(car_id)
        .bind(start)
        .bind(end)
        .bind(status)
        .bind(quote.total)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((reservation, quote))
    }

    async fn has_conflict(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        car_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let conflict: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE car_id = $1
                  AND status <> 'cancelled'
                  AND start_date < $3 AND end_date > $2
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(car_id)
        .bind(start)
        .bind(end)
        .bind(exclude)
        .fetch_one(&mut **tx)
        .await?;

        Ok(conflict.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn quote_three_nights_at_fifty() {
        let quote = Quote::for_stay(
            Decimal::from_str("50.00").unwrap(),
            date("2026-09-10"),
            date("2026-09-13"),
        )
        .unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.subtotal, Decimal::from_str("150.00").unwrap());
        assert_eq!(quote.tax, Decimal::from_str("10.50").unwrap());
        assert_eq!(quote.total, Decimal::from_str("160.50").unwrap());
    }

    #[test]
    fn quote_rounds_tax_half_up() {
        // 1 noche × 33.35 => impuesto 2.3345, redondea a 2.33
        let quote = Quote::for_stay(
            Decimal::from_str("33.35").unwrap(),
            date("2026-09-10"),
            date("2026-09-11"),
        )
        .unwrap();

        assert_eq!(quote.tax, Decimal::from_str("2.33").unwrap());
        assert_eq!(quote.total, Decimal::from_str("35.68").unwrap());
    }

    #[test]
    fn quote_requires_at_least_one_night() {
        let rate = Decimal::from_str("50.00").unwrap();
        assert!(Quote::for_stay(rate, date("2026-09-10"), date("2026-09-10")).is_err());
        assert!(Quote::for_stay(rate, date("2026-09-10"), date("2026-09-09")).is_err());
    }

    #[test]
    fn new_bookings_cannot_start_in_the_past() {
        let yesterday = chrono::Utc::now().date_naive() - chrono::Duration::days(1);
        let tomorrow = chrono::Utc::now().date_naive() + chrono::Duration::days(1);

        assert!(validate_dates(yesterday, tomorrow, false).is_err());
        // Ediciones del CRM sí pueden conservar fechas pasadas
        assert!(validate_dates(yesterday, tomorrow, true).is_ok());
    }
}
