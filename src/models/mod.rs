//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod car;
pub mod customer;
pub mod reservation;
pub mod user;
