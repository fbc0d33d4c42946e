//! Operaciones del sitio público: vitrina, búsqueda con cotización,
//! checkout y contrato.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::public_dto::{
    CheckoutContext, CheckoutParams, ContractResponse, ContractSection, PublicReservationRequest,
    PublicReservationResponse, ReservationConfirmation, SearchCar, SearchParams, SearchResponse,
};
use crate::models::reservation::ReservationStatus;
use crate::repositories::car_repository::CarRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::services::booking::{BookingService, CustomerRef, Quote};
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_iso_date, parse_price};

pub struct PublicController {
    cars: CarRepository,
    booking: BookingService,
    reservations: ReservationRepository,
}

impl PublicController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cars: CarRepository::new(pool.clone()),
            booking: BookingService::new(pool.clone()),
            reservations: ReservationRepository::new(pool),
        }
    }

    /// Home: la flota completa, ordenada para la vitrina.
    pub async fn home(&self) -> Result<Vec<SearchCar>, AppError> {
        let cars = self.cars.all_ordered().await?;
        Ok(cars
            .into_iter()
            .map(|car| SearchCar::from_car(car, None))
            .collect())
    }

    /// Búsqueda pública. Los filtros llegan como texto y se parsean
    /// tolerantemente: valores malformados se ignoran. Con un rango de
    /// fechas válido se ocultan los carros con conflicto y cada resultado
    /// lleva su cotización.
    pub async fn search(&self, params: SearchParams) -> Result<SearchResponse, AppError> {
        let start_date = parse_iso_date(params.start_date.as_deref());
        let end_date = parse_iso_date(params.end_date.as_deref());
        let min_price = parse_price(params.min_price.as_deref());
        let max_price = parse_price(params.max_price.as_deref());

        let makes: Option<Vec<String>> = params.makes.as_deref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect()
        });
        let makes = makes.filter(|m| !m.is_empty());

        // Solo un rango bien formado filtra por disponibilidad
        let range = match (start_date, end_date) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        };

        let excluded_ids = match range {
            Some((start, end)) => self.booking.conflicting_car_ids(start, end).await?,
            None => Vec::new(),
        };

        let cars = self
            .cars
            .search_public(params.car_id, makes, min_price, max_price, excluded_ids)
            .await?;

        let mut results = Vec::with_capacity(cars.len());
        for car in cars {
            let quote = match range {
                Some((start, end)) => Some(Quote::for_stay(car.daily_rate, start, end)?),
                None => None,
            };
            results.push(SearchCar::from_car(car, quote));
        }

        let all_makes = self.cars.distinct_makes().await?;
        let nights = range.map(|(start, end)| (end - start).num_days());

        Ok(SearchResponse {
            cars: results,
            makes: all_makes,
            pickup: params.pickup,
            start_date: range.map(|(start, _)| start),
            end_date: range.map(|(_, end)| end),
            nights,
        })
    }

    /// Contexto del formulario de checkout: el carro elegido y, si las
    /// fechas ya vienen en el query string, su cotización.
    pub async fn checkout_context(
        &self,
        params: CheckoutParams,
    ) -> Result<CheckoutContext, AppError> {
        let car = self
            .cars
            .find_by_id(params.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let start_date = parse_iso_date(params.start_date.as_deref());
        let end_date = parse_iso_date(params.end_date.as_deref());

        let range = match (start_date, end_date) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        };

        let quote = match range {
            Some((start, end)) => Some(Quote::for_stay(car.daily_rate, start, end)?),
            None => None,
        };

        Ok(CheckoutContext {
            car: SearchCar::from_car(car, quote),
            start_date: range.map(|(start, _)| start),
            end_date: range.map(|(_, end)| end),
        })
    }

    /// Checkout público. El cliente se crea o refresca por email y la
    /// reserva nace `booked` dentro de la misma transacción.
    pub async fn reserve(
        &self,
        request: PublicReservationRequest,
    ) -> Result<PublicReservationResponse, AppError> {
        request.validate()?;

        if !request.accept_terms {
            return Err(AppError::BadRequest(
                "Debe aceptar los términos del contrato de alquiler.".to_string(),
            ));
        }

        let (reservation, quote) = self
            .booking
            .create_reservation(
                request.car_id,
                CustomerRef::Upsert {
                    first_name: request.first_name,
                    last_name: request.last_name,
                    email: request.email,
                    phone: request.phone,
                },
                request.start_date,
                request.end_date,
                ReservationStatus::Booked,
            )
            .await?;

        let detail = self
            .reservations
            .find_detail(reservation.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        Ok(PublicReservationResponse {
            reservation_id: reservation.id,
            car: detail.car_name(),
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            quote,
        })
    }

    /// Confirmación de una reserva ya persistida. Reporta el total guardado
    /// en la fila, no una cotización con la tarifa vigente del carro.
    pub async fn reserve_success(
        &self,
        reservation_id: uuid::Uuid,
    ) -> Result<ReservationConfirmation, AppError> {
        let detail = self
            .reservations
            .find_detail(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        Ok(ReservationConfirmation::from_detail(&detail))
    }

    /// Contrato de alquiler público.
    pub fn contract() -> ContractResponse {
        ContractResponse {
            title: "Contrato de Alquiler de Vehículo",
            company: "Gamboa Rental Cars",
            sections: vec![
                ContractSection {
                    heading: "1. Objeto del contrato",
                    body: "La empresa cede en alquiler al cliente el vehículo \
                           descrito en la reserva, por el período y la tarifa \
                           acordados al momento de la confirmación.",
                },
                ContractSection {
                    heading: "2. Requisitos del conductor",
                    body: "El conductor debe ser mayor de 23 años, presentar \
                           licencia de conducir vigente y un documento de \
                           identidad al momento de la entrega.",
                },
                ContractSection {
                    heading: "3. Tarifa e impuestos",
                    body: "La tarifa se calcula por noche de alquiler. Al \
                           subtotal se aplica el 7% de ITBMS. El total se paga \
                           al retirar el vehículo.",
                },
                ContractSection {
                    heading: "4. Combustible y devolución",
                    body: "El vehículo se entrega con tanque lleno y debe \
                           devolverse en las mismas condiciones, en la fecha \
                           de fin de la reserva.",
                },
                ContractSection {
                    heading: "5. Responsabilidad",
                    body: "El cliente es responsable por multas, daños no \
                           cubiertos por el seguro y el deducible aplicable \
                           en caso de accidente.",
                },
                ContractSection {
                    heading: "6. Cancelaciones",
                    body: "Las cancelaciones se gestionan contactando a la \
                           empresa antes de la fecha de inicio de la reserva.",
                },
            ],
        }
    }
}
