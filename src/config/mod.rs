//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos y variables de entorno.

pub mod database;
pub mod environment;

pub use environment::*;

use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Leer y parsear una variable opcional; si falta se usa `default`
pub(crate) fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} must be a valid value ('{}'): {}", key, raw, e)),
        None => Ok(default),
    }
}
