//! Backend de Gamboa Rental Cars
//!
//! API web para la flota, los clientes y las reservas: sitio público
//! (búsqueda y checkout) y panel CRM con roles.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
