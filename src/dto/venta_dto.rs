use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::dto::auto_dto::AutoResponse;
use crate::models::{NewVenta, Venta, VentaPatch};
use crate::utils::validation::{
    collect, deserialize_datetime, deserialize_patch_datetime, deserialize_some, into_result,
    null_field_error, validate_fecha_no_futura, validate_nombre, validate_precio,
};

// Request para crear una venta
#[derive(Debug, Clone, Deserialize)]
pub struct VentaCreate {
    pub nombre_comprador: String,
    pub precio: f64,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub fecha_venta: DateTime<Utc>,
    pub auto_id: i64,
}

impl Validate for VentaCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let now = Utc::now();
        let mut errors = ValidationErrors::new();
        collect(&mut errors, "nombre_comprador", validate_nombre(&self.nombre_comprador));
        collect(&mut errors, "precio", validate_precio(self.precio));
        collect(&mut errors, "fecha_venta", validate_fecha_no_futura(&self.fecha_venta, &now));
        into_result(errors)
    }
}

impl VentaCreate {
    /// Valida y devuelve los datos a insertar con el nombre ya recortado
    pub fn into_new(self) -> Result<NewVenta, ValidationErrors> {
        self.validate()?;
        Ok(NewVenta {
            nombre_comprador: self.nombre_comprador.trim().to_string(),
            precio: self.precio,
            fecha_venta: self.fecha_venta,
            auto_id: self.auto_id,
        })
    }
}

// Request para actualizar una venta: campo ausente => sin cambios, `null` => error
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VentaUpdate {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub nombre_comprador: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub precio: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_patch_datetime")]
    pub fecha_venta: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub auto_id: Option<Option<i64>>,
}

impl Validate for VentaUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let now = Utc::now();
        let mut errors = ValidationErrors::new();

        match &self.nombre_comprador {
            Some(None) => errors.add(
                "nombre_comprador",
                null_field_error("nombre_comprador cannot be null"),
            ),
            Some(Some(v)) => collect(&mut errors, "nombre_comprador", validate_nombre(v)),
            None => {}
        }
        match self.precio {
            Some(None) => errors.add("precio", null_field_error("precio cannot be null")),
            Some(Some(v)) => collect(&mut errors, "precio", validate_precio(v)),
            None => {}
        }
        match &self.fecha_venta {
            Some(None) => errors.add("fecha_venta", null_field_error("fecha_venta cannot be null")),
            Some(Some(v)) => collect(&mut errors, "fecha_venta", validate_fecha_no_futura(v, &now)),
            None => {}
        }
        if let Some(None) = self.auto_id {
            errors.add("auto_id", null_field_error("auto_id cannot be null"));
        }

        into_result(errors)
    }
}

impl VentaUpdate {
    pub fn into_patch(self) -> Result<VentaPatch, ValidationErrors> {
        self.validate()?;
        Ok(VentaPatch {
            nombre_comprador: self
                .nombre_comprador
                .flatten()
                .map(|nombre| nombre.trim().to_string()),
            precio: self.precio.flatten(),
            fecha_venta: self.fecha_venta.flatten(),
            auto_id: self.auto_id.flatten(),
        })
    }
}

// Response de venta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentaResponse {
    pub id: i64,
    pub nombre_comprador: String,
    pub precio: f64,
    pub fecha_venta: DateTime<Utc>,
    pub auto_id: i64,
}

impl From<Venta> for VentaResponse {
    fn from(venta: Venta) -> Self {
        Self {
            id: venta.id,
            nombre_comprador: venta.nombre_comprador,
            precio: venta.precio,
            fecha_venta: venta.fecha_venta,
            auto_id: venta.auto_id,
        }
    }
}

// Response de venta con su auto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentaWithAutoResponse {
    #[serde(flatten)]
    pub venta: VentaResponse,
    pub auto: Option<AutoResponse>,
}

// Query string de GET /ventas. Las fechas llegan como texto y se parsean en el controlador.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListVentasQuery {
    #[validate(range(min = 0, message = "skip must be >= 0"))]
    pub skip: Option<i32>,
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
