//! API Ventas de Autos
//!
//! Backend CRUD de autos y sus ventas sobre axum + sqlx (PostgreSQL).

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
