//! Servicios de dominio
//!
//! Lógica de negocio pura, independiente del transporte HTTP y de la
//! base de datos.

pub mod availability;
