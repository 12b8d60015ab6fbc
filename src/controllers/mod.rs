//! Controladores
//!
//! Reglas de negocio entre entidades sobre los repositorios.

pub mod auto_controller;
pub mod venta_controller;
