//! Repositorios
//!
//! Acceso a datos por entidad. Cada trait tiene una implementación sobre
//! PostgreSQL y otra en memoria (`MemoryStore`).

pub mod auto_repository;
pub mod memory;
pub mod venta_repository;

pub use auto_repository::{AutoRepository, PgAutoRepository};
pub use memory::MemoryStore;
pub use venta_repository::{PgVentaRepository, VentaRepository};

/// Patrón ILIKE de substring literal: escapa `\`, `%` y `_` del texto del usuario
pub fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
