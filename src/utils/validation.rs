//! Utilidades de validación
//!
//! Este módulo contiene las reglas de validación de autos y ventas
//! y los helpers de conversión de fechas y paginación.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

pub const ANIO_MINIMO: i32 = 1900;
pub const DEFAULT_LIMIT: i64 = 100;

lazy_static! {
    static ref CHASIS_REGEX: Regex = Regex::new(r"^[A-Za-z0-9\-]+$").unwrap();
}

/// Crear un `ValidationError` con código y mensaje legible
pub fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Año en [1900, año actual]
pub fn validate_anio(value: i32, current_year: i32) -> Result<(), ValidationError> {
    if value < ANIO_MINIMO || value > current_year {
        let mut error = field_error("año_valido", "año out of range");
        error.add_param("min".into(), &ANIO_MINIMO);
        error.add_param("max".into(), &current_year);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Número de chasis: solo letras ASCII, dígitos y guiones
pub fn validate_chasis(value: &str) -> Result<(), ValidationError> {
    if !CHASIS_REGEX.is_match(value) {
        let mut error = field_error("chasis_alfanumerico", "invalid chassis format");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que el precio sea estrictamente positivo (NaN también se rechaza)
pub fn validate_precio<T: PartialOrd + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if !(value > T::zero()) {
        let mut error = field_error("precio_positivo", "price must be positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que el nombre del comprador no esté vacío tras recortar espacios
pub fn validate_nombre(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("nombre_no_vacio", "empty buyer name"));
    }
    Ok(())
}

/// Validar que un texto obligatorio no esté vacío
pub fn validate_not_empty(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("not_empty", message));
    }
    Ok(())
}

/// La fecha de venta no puede ser posterior al instante actual
pub fn validate_fecha_no_futura(
    value: &DateTime<Utc>,
    now: &DateTime<Utc>,
) -> Result<(), ValidationError> {
    if value > now {
        let mut error = field_error("fecha_no_futura", "future sale date");
        error.add_param("value".into(), &value.to_rfc3339());
        return Err(error);
    }
    Ok(())
}

/// Año actual según el reloj del servidor (UTC)
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Registra el resultado de una regla en el acumulador de errores
pub fn collect(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<(), ValidationError>,
) {
    if let Err(e) = result {
        errors.add(field, e);
    }
}

/// Error para un campo enviado explícitamente como `null` en un patch
pub fn null_field_error(message: &'static str) -> ValidationError {
    field_error("not_null", message)
}

/// Convertir el acumulador en `Result`
pub fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parsear una fecha en RFC3339, ISO sin zona (se asume UTC) o solo fecha (medianoche UTC)
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    let mut error = field_error("datetime", "invalid datetime");
    error.add_param("value".into(), &value.to_string());
    error.add_param("format".into(), &"RFC3339 | YYYY-MM-DDTHH:MM:SS | YYYY-MM-DD".to_string());
    Err(error)
}

/// Deserializador serde para fechas con los mismos formatos que `parse_datetime`
pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).map_err(|_| serde::de::Error::custom(format!("invalid datetime '{}'", raw)))
}

/// Variante para campos de patch: ausente => `None`, `null` => `Some(None)`
pub fn deserialize_patch_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(Some(None)),
        Some(raw) => parse_datetime(&raw)
            .map(|dt| Some(Some(dt)))
            .map_err(|_| serde::de::Error::custom(format!("invalid datetime '{}'", raw))),
    }
}

/// Distingue un campo ausente de uno enviado como `null`.
/// Se usa con `#[serde(default)]`: si el campo falta nunca se llama.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Resolver skip/limit con sus valores por defecto (ya validados por el DTO)
pub fn pagination(skip: Option<i32>, limit: Option<i32>) -> (i64, i64) {
    (
        skip.map(i64::from).unwrap_or(0),
        limit.map(i64::from).unwrap_or(DEFAULT_LIMIT),
    )
}
