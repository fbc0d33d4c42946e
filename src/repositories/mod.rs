//! Repositorios de acceso a datos
//!
//! CRUD sobre PostgreSQL con queries en runtime. El alta y edición de
//! reservas NO está aquí: esa ruta es transaccional y vive en
//! `services::booking`.

pub mod car_repository;
pub mod customer_repository;
pub mod reservation_repository;
pub mod user_repository;
