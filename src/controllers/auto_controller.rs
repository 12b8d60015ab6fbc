use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::dto::auto_dto::{
    AutoCreate, AutoResponse, AutoUpdate, AutoWithVentasResponse, ListAutosQuery,
};
use crate::repositories::{AutoRepository, VentaRepository};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppError};
use crate::utils::validation::pagination;

pub struct AutoController {
    autos: Arc<dyn AutoRepository>,
    ventas: Arc<dyn VentaRepository>,
}

/// Un filtro vacío (`?marca=`) cuenta como ausente
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl AutoController {
    pub fn new(state: &AppState) -> Self {
        Self {
            autos: state.autos.clone(),
            ventas: state.ventas.clone(),
        }
    }

    pub async fn create(&self, request: AutoCreate) -> Result<AutoResponse, AppError> {
        let data = request.into_new()?;

        // Verificar que el chasis no exista antes de insertar
        if self.autos.get_by_chasis(&data.numero_chasis).await?.is_some() {
            return Err(conflict_error("numero_chasis"));
        }

        let auto = self.autos.create(data).await?;
        info!("🚗 Auto {} creado ({} {})", auto.id, auto.marca, auto.modelo);
        Ok(auto.into())
    }

    pub async fn list(&self, query: ListAutosQuery) -> Result<Vec<AutoResponse>, AppError> {
        query.validate()?;
        let (skip, limit) = pagination(query.skip, query.limit);
        let marca = non_empty(&query.marca);
        let modelo = non_empty(&query.modelo);

        let autos = if marca.is_some() || modelo.is_some() {
            self.autos.search(marca, modelo, skip, limit).await?
        } else {
            self.autos.get_all(skip, limit).await?
        };

        Ok(autos.into_iter().map(AutoResponse::from).collect())
    }

    pub async fn get_by_chasis(&self, numero_chasis: &str) -> Result<AutoResponse, AppError> {
        self.autos
            .get_by_chasis(numero_chasis)
            .await?
            .map(AutoResponse::from)
            .ok_or_else(|| not_found_error("Auto"))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<AutoResponse, AppError> {
        self.autos
            .get_by_id(id)
            .await?
            .map(AutoResponse::from)
            .ok_or_else(|| not_found_error("Auto"))
    }

    pub async fn update(&self, id: i64, request: AutoUpdate) -> Result<AutoResponse, AppError> {
        let patch = request.into_patch()?;

        if self.autos.get_by_id(id).await?.is_none() {
            return Err(not_found_error("Auto"));
        }

        // Si cambia el chasis, no puede pertenecer a otro auto
        if let Some(numero_chasis) = &patch.numero_chasis {
            if let Some(existing) = self.autos.get_by_chasis(numero_chasis).await? {
                if existing.id != id {
                    return Err(conflict_error("numero_chasis"));
                }
            }
        }

        let auto = self
            .autos
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found_error("Auto"))?;

        debug!("Auto {} actualizado", auto.id);
        Ok(auto.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.autos.get_by_id(id).await?.is_none() {
            return Err(not_found_error("Auto"));
        }

        // Un auto con ventas registradas no puede desaparecer
        let ventas = self.ventas.count_by_auto_id(id).await?;
        if ventas > 0 {
            return Err(bad_request_error(
                "No se puede borrar un auto con ventas registradas",
            ));
        }

        if !self.autos.delete(id).await? {
            return Err(not_found_error("Auto"));
        }

        info!("🗑️ Auto {} eliminado", id);
        Ok(())
    }

    pub async fn get_with_ventas(&self, id: i64) -> Result<AutoWithVentasResponse, AppError> {
        let auto = self
            .autos
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Auto"))?;

        let ventas = self.ventas.get_by_auto_id(id).await?;

        Ok(AutoWithVentasResponse {
            auto: auto.into(),
            ventas: ventas.into_iter().map(Into::into).collect(),
        })
    }
}
