pub mod auth_routes;
pub mod car_routes;
pub mod crm_routes;
pub mod customer_routes;
pub mod public_routes;
pub mod reservation_routes;
