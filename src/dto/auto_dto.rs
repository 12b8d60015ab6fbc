use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::dto::venta_dto::VentaResponse;
use crate::models::{Auto, AutoPatch, NewAuto};
use crate::utils::validation::{
    collect, current_year, deserialize_some, into_result, null_field_error, validate_anio,
    validate_chasis, validate_not_empty,
};

// Request para crear un auto
#[derive(Debug, Clone, Deserialize)]
pub struct AutoCreate {
    pub marca: String,
    pub modelo: String,
    #[serde(rename = "año")]
    pub anio: i32,
    pub numero_chasis: String,
}

impl Validate for AutoCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        collect(&mut errors, "marca", validate_not_empty(&self.marca, "empty marca"));
        collect(&mut errors, "modelo", validate_not_empty(&self.modelo, "empty modelo"));
        collect(&mut errors, "año", validate_anio(self.anio, current_year()));
        collect(&mut errors, "numero_chasis", validate_chasis(&self.numero_chasis));
        into_result(errors)
    }
}

impl AutoCreate {
    /// Valida y convierte la request en datos listos para insertar
    pub fn into_new(self) -> Result<NewAuto, ValidationErrors> {
        self.validate()?;
        Ok(NewAuto {
            marca: self.marca,
            modelo: self.modelo,
            anio: self.anio,
            numero_chasis: self.numero_chasis,
        })
    }
}

// Request para actualizar un auto: campo ausente => sin cambios, `null` => error
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutoUpdate {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub marca: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub modelo: Option<Option<String>>,
    #[serde(default, rename = "año", deserialize_with = "deserialize_some")]
    pub anio: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub numero_chasis: Option<Option<String>>,
}

impl Validate for AutoUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.marca {
            Some(None) => errors.add("marca", null_field_error("marca cannot be null")),
            Some(Some(v)) => collect(&mut errors, "marca", validate_not_empty(v, "empty marca")),
            None => {}
        }
        match &self.modelo {
            Some(None) => errors.add("modelo", null_field_error("modelo cannot be null")),
            Some(Some(v)) => collect(&mut errors, "modelo", validate_not_empty(v, "empty modelo")),
            None => {}
        }
        match self.anio {
            Some(None) => errors.add("año", null_field_error("año cannot be null")),
            Some(Some(v)) => collect(&mut errors, "año", validate_anio(v, current_year())),
            None => {}
        }
        match &self.numero_chasis {
            Some(None) => errors.add(
                "numero_chasis",
                null_field_error("numero_chasis cannot be null"),
            ),
            Some(Some(v)) => collect(&mut errors, "numero_chasis", validate_chasis(v)),
            None => {}
        }

        into_result(errors)
    }
}

impl AutoUpdate {
    pub fn into_patch(self) -> Result<AutoPatch, ValidationErrors> {
        self.validate()?;
        Ok(AutoPatch {
            marca: self.marca.flatten(),
            modelo: self.modelo.flatten(),
            anio: self.anio.flatten(),
            numero_chasis: self.numero_chasis.flatten(),
        })
    }
}

// Response de auto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoResponse {
    pub id: i64,
    pub marca: String,
    pub modelo: String,
    #[serde(rename = "año")]
    pub anio: i32,
    pub numero_chasis: String,
}

impl From<Auto> for AutoResponse {
    fn from(auto: Auto) -> Self {
        Self {
            id: auto.id,
            marca: auto.marca,
            modelo: auto.modelo,
            anio: auto.anio,
            numero_chasis: auto.numero_chasis,
        }
    }
}

// Response de auto con sus ventas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoWithVentasResponse {
    #[serde(flatten)]
    pub auto: AutoResponse,
    #[serde(default)]
    pub ventas: Vec<VentaResponse>,
}

// Query string de GET /autos
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListAutosQuery {
    #[validate(range(min = 0, message = "skip must be >= 0"))]
    pub skip: Option<i32>,
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: Option<i32>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
}
