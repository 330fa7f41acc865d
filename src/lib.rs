//! Backend del marketplace de alquiler de coches entre particulares
//!
//! El núcleo es el ciclo de vida de las reservas y el chequeo de
//! conflictos de fechas del calendario de cada vehículo.

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
