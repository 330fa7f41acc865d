pub mod auth_controller;
pub mod availability_controller;
pub mod booking_controller;
pub mod owner_booking_controller;
pub mod vehicle_controller;
