//! Middleware del sistema
//!
//! Este módulo contiene el middleware de autenticación por rol y CORS.

pub mod auth;
pub mod cors;
