use std::sync::Arc;
use tracing::{debug, info};
use validator::{Validate, ValidationErrors};

use crate::dto::venta_dto::{
    ListVentasQuery, VentaCreate, VentaResponse, VentaUpdate, VentaWithAutoResponse,
};
use crate::models::{DateRange, PriceRange};
use crate::repositories::{AutoRepository, VentaRepository};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::validation::{parse_datetime, pagination};

const AUTO_INEXISTENTE: &str = "El auto indicado no existe";

/// Modo de filtrado de GET /ventas. El rango de precios tiene prioridad
/// sobre el de fechas: si llegan ambos, el de fechas se ignora.
#[derive(Debug, Clone, PartialEq)]
pub enum VentaFilter {
    Price(PriceRange),
    Date(DateRange),
    All,
}

impl VentaFilter {
    pub fn from_query(query: &ListVentasQuery) -> Result<Self, ValidationErrors> {
        let has_date = query.start_date.is_some() || query.end_date.is_some();

        if query.min_price.is_some() || query.max_price.is_some() {
            if has_date {
                debug!("Filtro de precio presente: se ignora el rango de fechas");
            }
            return Ok(VentaFilter::Price(PriceRange {
                min: query.min_price,
                max: query.max_price,
            }));
        }

        if has_date {
            let mut errors = ValidationErrors::new();
            let mut parse = |field: &'static str, raw: &Option<String>| {
                raw.as_deref().and_then(|raw| match parse_datetime(raw) {
                    Ok(dt) => Some(dt),
                    Err(e) => {
                        errors.add(field, e);
                        None
                    }
                })
            };
            let start = parse("start_date", &query.start_date);
            let end = parse("end_date", &query.end_date);

            if !errors.is_empty() {
                return Err(errors);
            }
            return Ok(VentaFilter::Date(DateRange { start, end }));
        }

        Ok(VentaFilter::All)
    }
}

pub struct VentaController {
    autos: Arc<dyn AutoRepository>,
    ventas: Arc<dyn VentaRepository>,
}

impl VentaController {
    pub fn new(state: &AppState) -> Self {
        Self {
            autos: state.autos.clone(),
            ventas: state.ventas.clone(),
        }
    }

    async fn ensure_auto_exists(&self, auto_id: i64) -> Result<(), AppError> {
        if self.autos.get_by_id(auto_id).await?.is_none() {
            return Err(bad_request_error(AUTO_INEXISTENTE));
        }
        Ok(())
    }

    pub async fn create(&self, request: VentaCreate) -> Result<VentaResponse, AppError> {
        let data = request.into_new()?;
        self.ensure_auto_exists(data.auto_id).await?;

        let venta = self.ventas.create(data).await?;
        info!(
            "💰 Venta {} registrada para auto {} ({:.2})",
            venta.id, venta.auto_id, venta.precio
        );
        Ok(venta.into())
    }

    pub async fn list(&self, query: ListVentasQuery) -> Result<Vec<VentaResponse>, AppError> {
        query.validate()?;
        let (skip, limit) = pagination(query.skip, query.limit);

        let ventas = match VentaFilter::from_query(&query)? {
            VentaFilter::Price(range) => {
                self.ventas.filter_by_price_range(range, skip, limit).await?
            }
            VentaFilter::Date(range) => self.ventas.filter_by_date_range(range, skip, limit).await?,
            VentaFilter::All => self.ventas.get_all(skip, limit).await?,
        };

        Ok(ventas.into_iter().map(VentaResponse::from).collect())
    }

    pub async fn list_by_auto(&self, auto_id: i64) -> Result<Vec<VentaResponse>, AppError> {
        let ventas = self.ventas.get_by_auto_id(auto_id).await?;
        Ok(ventas.into_iter().map(VentaResponse::from).collect())
    }

    pub async fn list_by_comprador(&self, nombre: &str) -> Result<Vec<VentaResponse>, AppError> {
        let ventas = self.ventas.get_by_comprador(nombre).await?;
        Ok(ventas.into_iter().map(VentaResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<VentaResponse, AppError> {
        self.ventas
            .get_by_id(id)
            .await?
            .map(VentaResponse::from)
            .ok_or_else(|| not_found_error("Venta"))
    }

    pub async fn update(&self, id: i64, request: VentaUpdate) -> Result<VentaResponse, AppError> {
        let patch = request.into_patch()?;

        if self.ventas.get_by_id(id).await?.is_none() {
            return Err(not_found_error("Venta"));
        }
        if let Some(auto_id) = patch.auto_id {
            self.ensure_auto_exists(auto_id).await?;
        }

        let venta = self
            .ventas
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found_error("Venta"))?;

        debug!("Venta {} actualizada", venta.id);
        Ok(venta.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.ventas.delete(id).await? {
            return Err(not_found_error("Venta"));
        }
        info!("🗑️ Venta {} eliminada", id);
        Ok(())
    }

    pub async fn get_with_auto(&self, id: i64) -> Result<VentaWithAutoResponse, AppError> {
        let venta = self
            .ventas
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Venta"))?;

        let auto = self.autos.get_by_id(venta.auto_id).await?;

        Ok(VentaWithAutoResponse {
            venta: venta.into(),
            auto: auto.map(Into::into),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_filter_takes_precedence() {
        let query = ListVentasQuery {
            min_price: Some(1000.0),
            start_date: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert_eq!(
            VentaFilter::from_query(&query).unwrap(),
            VentaFilter::Price(PriceRange { min: Some(1000.0), max: None })
        );
    }

    #[test]
    fn test_date_filter_and_unfiltered() {
        let query = ListVentasQuery {
            end_date: Some("2024-01-31T23:59:59Z".to_string()),
            ..Default::default()
        };
        match VentaFilter::from_query(&query).unwrap() {
            VentaFilter::Date(range) => {
                assert!(range.start.is_none());
                assert!(range.end.is_some());
            }
            other => panic!("unexpected filter {:?}", other),
        }

        assert_eq!(
            VentaFilter::from_query(&ListVentasQuery::default()).unwrap(),
            VentaFilter::All
        );
    }

    #[test]
    fn test_invalid_dates_are_reported_per_field() {
        let query = ListVentasQuery {
            start_date: Some("mañana".to_string()),
            end_date: Some("31/01/2024".to_string()),
            ..Default::default()
        };
        let errors = VentaFilter::from_query(&query).unwrap_err();
        assert!(errors.field_errors().contains_key("start_date"));
        assert!(errors.field_errors().contains_key("end_date"));
    }
}
