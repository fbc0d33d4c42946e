//! Utilidades de validación
//!
//! Parseo tolerante de filtros que llegan como texto en query strings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parseo tolerante de fecha ISO: valores ausentes o malformados se ignoran.
/// Los filtros de búsqueda del sitio público no deben fallar por un query
/// string sucio.
pub fn parse_iso_date(value: Option<&str>) -> Option<NaiveDate> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

/// Parseo tolerante de un precio en query string.
pub fn parse_price(value: Option<&str>) -> Option<Decimal> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| Decimal::from_str(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dates_parse() {
        assert_eq!(
            parse_iso_date(Some("2026-03-01")),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(parse_iso_date(Some("01/03/2026")), None);
        assert_eq!(parse_iso_date(Some("")), None);
        assert_eq!(parse_iso_date(None), None);
    }

    #[test]
    fn prices_parse_tolerantly() {
        assert_eq!(parse_price(Some("45.50")), Decimal::from_str("45.50").ok());
        assert_eq!(parse_price(Some("gratis")), None);
        assert_eq!(parse_price(Some("  ")), None);
    }
}
