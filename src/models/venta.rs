//! Modelo de Venta
//!
//! Mapea exactamente a la tabla `venta`. `auto_id` referencia a `auto.id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Venta principal - una fila de la tabla `venta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Venta {
    pub id: i64,
    pub nombre_comprador: String,
    pub precio: f64,
    pub fecha_venta: DateTime<Utc>,
    pub auto_id: i64,
}

/// Datos ya validados (y con el nombre recortado) para insertar una venta
#[derive(Debug, Clone, PartialEq)]
pub struct NewVenta {
    pub nombre_comprador: String,
    pub precio: f64,
    pub fecha_venta: DateTime<Utc>,
    pub auto_id: i64,
}

/// Cambios parciales ya validados: `None` deja el campo intacto
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VentaPatch {
    pub nombre_comprador: Option<String>,
    pub precio: Option<f64>,
    pub fecha_venta: Option<DateTime<Utc>>,
    pub auto_id: Option<i64>,
}

impl VentaPatch {
    pub fn apply_to(&self, venta: &Venta) -> Venta {
        Venta {
            id: venta.id,
            nombre_comprador: self
                .nombre_comprador
                .clone()
                .unwrap_or_else(|| venta.nombre_comprador.clone()),
            precio: self.precio.unwrap_or(venta.precio),
            fecha_venta: self.fecha_venta.unwrap_or(venta.fecha_venta),
            auto_id: self.auto_id.unwrap_or(venta.auto_id),
        }
    }
}

/// Filtro de rango de fechas, ambos extremos inclusivos y opcionales
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, value: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| *value >= s) && self.end.map_or(true, |e| *value <= e)
    }
}

/// Filtro de rango de precios, ambos extremos inclusivos y opcionales
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |m| value >= m) && self.max.map_or(true, |m| value <= m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ranges_are_inclusive() {
        let day = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let range = DateRange { start: Some(day), end: Some(day) };
        assert!(range.contains(&day));
        assert!(!range.contains(&(day + chrono::Duration::seconds(1))));
        assert!(DateRange::default().contains(&day));

        let prices = PriceRange { min: Some(100.0), max: Some(200.0) };
        assert!(prices.contains(100.0));
        assert!(prices.contains(200.0));
        assert!(!prices.contains(200.01));
        assert!(PriceRange { min: None, max: Some(50.0) }.contains(1.0));
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let venta = Venta {
            id: 7,
            nombre_comprador: "John".to_string(),
            precio: 15000.0,
            fecha_venta: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            auto_id: 1,
        };
        let patch = VentaPatch {
            precio: Some(14000.0),
            ..Default::default()
        };
        let updated = patch.apply_to(&venta);

        assert_eq!(updated.precio, 14000.0);
        assert_eq!(updated.nombre_comprador, venta.nombre_comprador);
        assert_eq!(updated.fecha_venta, venta.fecha_venta);
        assert_eq!(updated.auto_id, venta.auto_id);
    }
}
