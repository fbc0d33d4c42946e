//! Exportes del CRM
//!
//! Armado del CSV de reservas y del feed de eventos para el calendario.

use crate::dto::reservation_dto::{CalendarEvent, ReservationDetail};
use crate::models::reservation::ReservationStatus;

/// CSV de reservas con cabecera en español, como espera la operación.
pub fn reservations_to_csv(reservations: &[ReservationDetail]) -> String {
    let mut out = String::from("ID,Fecha Inicio,Fecha Fin,Cliente,Auto,Total,Estado\n");

    for r in reservations {
        let row = [
            r.id.to_string(),
            r.start_date.to_string(),
            r.end_date.to_string(),
            r.customer_name(),
            r.car_name(),
            r.total_cost.to_string(),
            r.status.display_es().to_string(),
        ];
        let escaped: Vec<String> = row.iter().map(|field| escape_csv(field)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }

    out
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn status_color(status: ReservationStatus) -> &'static str {
    match status {
        ReservationStatus::Booked => "#3699ff",
        ReservationStatus::InProgress => "#0d6efd",
        ReservationStatus::Completed => "#1bc5bd",
        ReservationStatus::Cancelled => "#f64e60",
    }
}

/// Eventos de calendario a partir de reservas no canceladas. Los rangos ya
/// son [start, end), que es exactamente el formato end-exclusivo del
/// calendario, así que no hay ajuste de fechas.
pub fn reservations_to_events(reservations: &[ReservationDetail]) -> Vec<CalendarEvent> {
    reservations
        .iter()
        .map(|r| {
            let color = status_color(r.status);
            CalendarEvent {
                title: format!("{} {} - {}", r.car_make, r.car_model, r.customer_name()),
                start: r.start_date,
                end: r.end_date,
                background_color: color.to_string(),
                border_color: color.to_string(),
                url: format!("/crm/reservations/{}", r.id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    fn detail(status: ReservationStatus) -> ReservationDetail {
        ReservationDetail {
            id: Uuid::nil(),
            customer_id: Uuid::nil(),
            car_id: Uuid::nil(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 13).unwrap(),
            status,
            total_cost: Decimal::from_str("160.50").unwrap(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            customer_first_name: "Ana".to_string(),
            customer_last_name: "Pérez".to_string(),
            customer_email: "ana@example.com".to_string(),
            car_make: "Toyota".to_string(),
            car_model: "Yaris".to_string(),
            car_year: 2022,
            car_color: "Rojo".to_string(),
            car_license_plate: "ABC-123".to_string(),
        }
    }

    #[test]
    fn csv_has_header_and_spanish_status() {
        let csv = reservations_to_csv(&[detail(ReservationStatus::Booked)]);
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "ID,Fecha Inicio,Fecha Fin,Cliente,Auto,Total,Estado"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("Ana Pérez"));
        assert!(row.contains("160.50"));
        assert!(row.ends_with("Reservado"));
    }

    #[test]
    fn csv_escapes_commas() {
        let mut r = detail(ReservationStatus::Completed);
        r.customer_last_name = "Pérez, de la Cruz".to_string();

        let csv = reservations_to_csv(&[r]);
        assert!(csv.contains("\"Ana Pérez, de la Cruz\""));
    }

    #[test]
    fn events_keep_exclusive_end_and_status_color() {
        let events = reservations_to_events(&[detail(ReservationStatus::InProgress)]);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].end, NaiveDate::from_ymd_opt(2026, 9, 13).unwrap());
        assert_eq!(events[0].background_color, "#0d6efd");
        assert_eq!(events[0].title, "Toyota Yaris - Ana Pérez");
    }
}
