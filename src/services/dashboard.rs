//! Agregados del dashboard del CRM
//!
//! Ingreso del mes, reservas activas, flota operativa, entregas de hoy,
//! últimas reservas y la serie de 7 días para el gráfico.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::dto::reservation_dto::ReservationDetail;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::utils::errors::AppError;

const CHART_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub today: NaiveDate,
    pub revenue_month: Decimal,
    pub reservations_active: i64,
    pub fleet_available: i64,
    pub deliveries_today: i64,
    pub latest_reservations: Vec<ReservationDetail>,
    pub chart_labels: Vec<String>,
    pub chart_values: Vec<i64>,
}

pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let today = chrono::Utc::now().date_naive();
        let (month_start, month_next) = month_window(today);

        // Ingreso: reservas completadas que inician en el mes corriente
        let revenue_month: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_cost), 0)::numeric(10,2)
            FROM reservations
            WHERE status = 'completed' AND start_date >= $1 AND start_date < $2
            "#,
        )
        .bind(month_start)
        .bind(month_next)
        .fetch_one(&self.pool)
        .await?;

        let reservations_active: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE status = 'in_progress'")
                .fetch_one(&self.pool)
                .await?;

        let fleet_available: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cars WHERE status <> 'maintenance'")
                .fetch_one(&self.pool)
                .await?;

        let deliveries_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE status = 'booked' AND start_date = $1",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        let (latest_reservations, _) = ReservationRepository::new(self.pool.clone())
            .list(None, None, None, None, 5, 0)
            .await?;

        let window_start = today - Duration::days(CHART_DAYS - 1);
        let counts: Vec<(NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT start_date, COUNT(*)
            FROM reservations
            WHERE status <> 'cancelled' AND start_date >= $1 AND start_date <= $2
            GROUP BY start_date
            "#,
        )
        .bind(window_start)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        let (chart_labels, chart_values) = chart_series(window_start, today, &counts);

        Ok(DashboardStats {
            today,
            revenue_month,
            reservations_active,
            fleet_available,
            deliveries_today,
            latest_reservations,
            chart_labels,
            chart_values,
        })
    }
}

/// [primer día del mes, primer día del mes siguiente)
fn month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let next = start
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(start);
    (start, next)
}

/// Serie diaria continua, rellenando con cero los días sin reservas.
fn chart_series(
    from: NaiveDate,
    to: NaiveDate,
    counts: &[(NaiveDate, i64)],
) -> (Vec<String>, Vec<i64>) {
    let mut labels = Vec::new();
    let mut values = Vec::new();

    let mut current = from;
    while current <= to {
        labels.push(current.format("%d/%m").to_string());
        values.push(
            counts
                .iter()
                .find(|(date, _)| *date == current)
                .map(|(_, n)| *n)
                .unwrap_or(0),
        );
        current += Duration::days(1);
    }

    (labels, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn month_window_covers_the_calendar_month() {
        assert_eq!(
            month_window(date("2026-08-31")),
            (date("2026-08-01"), date("2026-09-01"))
        );
        assert_eq!(
            month_window(date("2026-12-15")),
            (date("2026-12-01"), date("2027-01-01"))
        );
    }

    #[test]
    fn chart_series_fills_missing_days_with_zero() {
        let counts = vec![(date("2026-08-26"), 2), (date("2026-08-28"), 1)];
        let (labels, values) = chart_series(date("2026-08-25"), date("2026-08-31"), &counts);

        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0], "25/08");
        assert_eq!(values, vec![0, 2, 0, 1, 0, 0, 0]);
    }
}
