//! Backend en memoria
//!
//! Implementa `AutoRepository` y `VentaRepository` sobre dos tablas en
//! proceso protegidas por un único `RwLock`. Reproduce las restricciones del
//! schema PostgreSQL (chasis único, foreign key `venta.auto_id` con
//! `ON DELETE RESTRICT`) devolviendo `AppError::Integrity`.
//! Cada operación toma el lock una sola vez, así que es atómica.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{
    Auto, AutoPatch, DateRange, NewAuto, NewVenta, PriceRange, Venta, VentaPatch,
};
use crate::repositories::auto_repository::AutoRepository;
use crate::repositories::venta_repository::VentaRepository;
use crate::utils::errors::AppError;

#[derive(Debug, Default)]
struct Tables {
    autos: BTreeMap<i64, Auto>,
    ventas: BTreeMap<i64, Venta>,
    next_auto_id: i64,
    next_venta_id: i64,
}

impl Tables {
    fn chasis_taken(&self, numero_chasis: &str, except: Option<i64>) -> bool {
        self.autos
            .values()
            .any(|a| a.numero_chasis == numero_chasis && Some(a.id) != except)
    }
}

/// Almacén compartido; clonarlo comparte las mismas tablas
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page<T: Clone>(items: impl Iterator<Item = T>, skip: i64, limit: i64) -> Vec<T> {
    items
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl AutoRepository for MemoryStore {
    async fn create(&self, data: NewAuto) -> Result<Auto, AppError> {
        let mut tables = self.tables.write().await;
        if tables.chasis_taken(&data.numero_chasis, None) {
            return Err(AppError::Integrity(
                "Error creating auto: unique constraint violated".to_string(),
            ));
        }

        tables.next_auto_id += 1;
        let auto = Auto {
            id: tables.next_auto_id,
            marca: data.marca,
            modelo: data.modelo,
            anio: data.anio,
            numero_chasis: data.numero_chasis,
        };
        tables.autos.insert(auto.id, auto.clone());
        Ok(auto)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Auto>, AppError> {
        Ok(self.tables.read().await.autos.get(&id).cloned())
    }

    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Auto>, AppError> {
        let tables = self.tables.read().await;
        Ok(page(tables.autos.values().cloned(), skip, limit))
    }

    async fn update(&self, id: i64, patch: AutoPatch) -> Result<Option<Auto>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.autos.get(&id) else {
            return Ok(None);
        };
        let merged = patch.apply_to(current);

        if tables.chasis_taken(&merged.numero_chasis, Some(id)) {
            return Err(AppError::Integrity(
                "Error updating auto: unique constraint violated".to_string(),
            ));
        }

        tables.autos.insert(id, merged.clone());
        Ok(Some(merged))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.autos.contains_key(&id) {
            return Ok(false);
        }
        if tables.ventas.values().any(|v| v.auto_id == id) {
            return Err(AppError::Integrity(
                "Error deleting auto: foreign key constraint violated".to_string(),
            ));
        }
        tables.autos.remove(&id);
        Ok(true)
    }

    async fn get_by_chasis(&self, numero_chasis: &str) -> Result<Option<Auto>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .autos
            .values()
            .find(|a| a.numero_chasis == numero_chasis)
            .cloned())
    }

    async fn search(
        &self,
        marca: Option<&str>,
        modelo: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Auto>, AppError> {
        let tables = self.tables.read().await;
        let matches = tables.autos.values().filter(|a| {
            marca.map_or(true, |m| contains_ci(&a.marca, m))
                && modelo.map_or(true, |m| contains_ci(&a.modelo, m))
        });
        Ok(page(matches.cloned(), skip, limit))
    }
}

#[async_trait]
impl VentaRepository for MemoryStore {
    async fn create(&self, data: NewVenta) -> Result<Venta, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.autos.contains_key(&data.auto_id) {
            return Err(AppError::Integrity(
                "Error creating venta: foreign key constraint violated".to_string(),
            ));
        }

        tables.next_venta_id += 1;
        let venta = Venta {
            id: tables.next_venta_id,
            nombre_comprador: data.nombre_comprador,
            precio: data.precio,
            fecha_venta: data.fecha_venta,
            auto_id: data.auto_id,
        };
        tables.ventas.insert(venta.id, venta.clone());
        Ok(venta)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Venta>, AppError> {
        Ok(self.tables.read().await.ventas.get(&id).cloned())
    }

    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Venta>, AppError> {
        let tables = self.tables.read().await;
        Ok(page(tables.ventas.values().cloned(), skip, limit))
    }

    async fn update(&self, id: i64, patch: VentaPatch) -> Result<Option<Venta>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.ventas.get(&id) else {
            return Ok(None);
        };
        let merged = patch.apply_to(current);

        if !tables.autos.contains_key(&merged.auto_id) {
            return Err(AppError::Integrity(
                "Error updating venta: foreign key constraint violated".to_string(),
            ));
        }

        tables.ventas.insert(id, merged.clone());
        Ok(Some(merged))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.ventas.remove(&id).is_some())
    }

    async fn get_by_auto_id(&self, auto_id: i64) -> Result<Vec<Venta>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .ventas
            .values()
            .filter(|v| v.auto_id == auto_id)
            .cloned()
            .collect())
    }

    async fn count_by_auto_id(&self, auto_id: i64) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.ventas.values().filter(|v| v.auto_id == auto_id).count() as i64)
    }

    async fn get_by_comprador(&self, nombre: &str) -> Result<Vec<Venta>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .ventas
            .values()
            .filter(|v| contains_ci(&v.nombre_comprador, nombre))
            .cloned()
            .collect())
    }

    async fn filter_by_date_range(
        &self,
        range: DateRange,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Venta>, AppError> {
        let tables = self.tables.read().await;
        let matches = tables.ventas.values().filter(|v| range.contains(&v.fecha_venta));
        Ok(page(matches.cloned(), skip, limit))
    }

    async fn filter_by_price_range(
        &self,
        range: PriceRange,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Venta>, AppError> {
        let tables = self.tables.read().await;
        let matches = tables.ventas.values().filter(|v| range.contains(v.precio));
        Ok(page(matches.cloned(), skip, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_auto(chasis: &str, marca: &str, modelo: &str) -> NewAuto {
        NewAuto {
            marca: marca.to_string(),
            modelo: modelo.to_string(),
            anio: 2020,
            numero_chasis: chasis.to_string(),
        }
    }

    fn new_venta(auto_id: i64, nombre: &str, precio: f64, day: u32) -> NewVenta {
        NewVenta {
            nombre_comprador: nombre.to_string(),
            precio,
            fecha_venta: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            auto_id,
        }
    }

    #[tokio::test]
    async fn test_auto_crud_and_unique_chasis() {
        let store = MemoryStore::new();
        let repo: &dyn AutoRepository = &store;

        let auto = repo.create(new_auto("ABC123", "Toyota", "Corolla")).await.unwrap();
        assert_eq!(auto.id, 1);

        let dup = repo.create(new_auto("ABC123", "Ford", "Focus")).await;
        assert!(matches!(dup, Err(AppError::Integrity(_))));
        assert_eq!(repo.get_all(0, 100).await.unwrap().len(), 1);

        let found = repo.get_by_chasis("ABC123").await.unwrap().unwrap();
        assert_eq!(found, auto);
        assert!(repo.get_by_chasis("abc123").await.unwrap().is_none());

        assert!(repo.delete(auto.id).await.unwrap());
        assert!(!repo.delete(auto.id).await.unwrap());
        assert!(repo.get_by_id(auto.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_auto_update_keeps_state_on_violation() {
        let store = MemoryStore::new();
        let repo: &dyn AutoRepository = &store;
        let a = repo.create(new_auto("AAA1", "Toyota", "Corolla")).await.unwrap();
        repo.create(new_auto("BBB2", "Ford", "Focus")).await.unwrap();

        let patch = AutoPatch {
            numero_chasis: Some("BBB2".to_string()),
            marca: Some("Nissan".to_string()),
            ..Default::default()
        };
        assert!(matches!(repo.update(a.id, patch).await, Err(AppError::Integrity(_))));
        assert_eq!(repo.get_by_id(a.id).await.unwrap().unwrap(), a);

        assert!(repo.update(99, AutoPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_auto_search_is_case_insensitive_and_paged() {
        let store = MemoryStore::new();
        let repo: &dyn AutoRepository = &store;
        repo.create(new_auto("C1", "Toyota", "Corolla")).await.unwrap();
        repo.create(new_auto("C2", "Toyota", "Yaris")).await.unwrap();
        repo.create(new_auto("C3", "Ford", "Corolla Look")).await.unwrap();

        assert_eq!(repo.search(Some("toy"), None, 0, 100).await.unwrap().len(), 2);
        assert_eq!(repo.search(None, Some("COROLLA"), 0, 100).await.unwrap().len(), 2);
        let both = repo.search(Some("toyota"), Some("corolla"), 0, 100).await.unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].numero_chasis, "C1");

        let second_page = repo.search(Some("o"), None, 1, 1).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].numero_chasis, "C2");
    }

    #[tokio::test]
    async fn test_venta_foreign_key_and_filters() {
        let store = MemoryStore::new();
        let auto = AutoRepository::create(&store, new_auto("XYZ9", "Fiat", "Uno"))
            .await
            .unwrap();
        let ventas: &dyn VentaRepository = &store;

        assert!(matches!(
            ventas.create(new_venta(42, "Nadie", 10.0, 1)).await,
            Err(AppError::Integrity(_))
        ));

        ventas.create(new_venta(auto.id, "John Smith", 100.0, 5)).await.unwrap();
        ventas.create(new_venta(auto.id, "Jane Doe", 200.0, 10)).await.unwrap();
        ventas.create(new_venta(auto.id, "Johnny", 300.0, 20)).await.unwrap();

        assert_eq!(ventas.get_by_auto_id(auto.id).await.unwrap().len(), 3);
        assert_eq!(ventas.count_by_auto_id(auto.id).await.unwrap(), 3);
        assert_eq!(ventas.get_by_comprador("JOHN").await.unwrap().len(), 2);

        let prices = PriceRange { min: Some(200.0), max: Some(300.0) };
        assert_eq!(ventas.filter_by_price_range(prices, 0, 100).await.unwrap().len(), 2);

        let dates = DateRange {
            start: Some(Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()),
            end: None,
        };
        assert_eq!(ventas.filter_by_date_range(dates, 0, 100).await.unwrap().len(), 2);

        assert!(matches!(
            AutoRepository::delete(&store, auto.id).await,
            Err(AppError::Integrity(_))
        ));
    }

    #[tokio::test]
    async fn test_venta_update_rejects_missing_auto() {
        let store = MemoryStore::new();
        let auto = AutoRepository::create(&store, new_auto("Q1", "Fiat", "Uno")).await.unwrap();
        let ventas: &dyn VentaRepository = &store;
        let venta = ventas.create(new_venta(auto.id, "Ana", 50.0, 3)).await.unwrap();

        let patch = VentaPatch {
            auto_id: Some(77),
            ..Default::default()
        };
        assert!(matches!(ventas.update(venta.id, patch).await, Err(AppError::Integrity(_))));
        assert_eq!(ventas.get_by_id(venta.id).await.unwrap().unwrap(), venta);
    }
}
