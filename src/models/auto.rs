//! Modelo de Auto
//!
//! Mapea exactamente a la tabla `auto`. La columna del año se llama `anio`
//! en la base de datos y se expone como `año` en la API.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Auto principal - una fila de la tabla `auto`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Auto {
    pub id: i64,
    pub marca: String,
    pub modelo: String,
    #[serde(rename = "año")]
    pub anio: i32,
    pub numero_chasis: String,
}

/// Datos ya validados para insertar un auto
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuto {
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub numero_chasis: String,
}

/// Cambios parciales ya validados: `None` deja el campo intacto
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoPatch {
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub anio: Option<i32>,
    pub numero_chasis: Option<String>,
}

impl AutoPatch {
    pub fn is_empty(&self) -> bool {
        self.marca.is_none()
            && self.modelo.is_none()
            && self.anio.is_none()
            && self.numero_chasis.is_none()
    }

    /// Aplica los campos presentes sobre una copia del auto
    pub fn apply_to(&self, auto: &Auto) -> Auto {
        Auto {
            id: auto.id,
            marca: self.marca.clone().unwrap_or_else(|| auto.marca.clone()),
            modelo: self.modelo.clone().unwrap_or_else(|| auto.modelo.clone()),
            anio: self.anio.unwrap_or(auto.anio),
            numero_chasis: self
                .numero_chasis
                .clone()
                .unwrap_or_else(|| auto.numero_chasis.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corolla() -> Auto {
        Auto {
            id: 1,
            marca: "Toyota".to_string(),
            modelo: "Corolla".to_string(),
            anio: 2020,
            numero_chasis: "ABC123".to_string(),
        }
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let patch = AutoPatch {
            anio: Some(2021),
            ..Default::default()
        };
        let updated = patch.apply_to(&corolla());

        assert_eq!(updated.anio, 2021);
        assert_eq!(updated.marca, "Toyota");
        assert_eq!(updated.numero_chasis, "ABC123");
    }

    #[test]
    fn test_serializes_año_key() {
        let json = serde_json::to_value(corolla()).unwrap();
        assert_eq!(json["año"], 2020);
        assert!(json.get("anio").is_none());
    }
}
