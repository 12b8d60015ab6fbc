use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::models::{DateRange, NewVenta, PriceRange, Venta, VentaPatch};
use crate::repositories::like_pattern;
use crate::utils::errors::AppError;

/// Operaciones de persistencia sobre la tabla `venta`.
///
/// `create` y `update` no verifican que `auto_id` exista; lo hace
/// `VentaController`. La foreign key de la base sigue protegiendo ante carreras.
#[async_trait]
pub trait VentaRepository: Send + Sync {
    async fn create(&self, data: NewVenta) -> Result<Venta, AppError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Venta>, AppError>;
    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Venta>, AppError>;
    async fn update(&self, id: i64, patch: VentaPatch) -> Result<Option<Venta>, AppError>;
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
    async fn get_by_auto_id(&self, auto_id: i64) -> Result<Vec<Venta>, AppError>;
    async fn count_by_auto_id(&self, auto_id: i64) -> Result<i64, AppError>;
    async fn get_by_comprador(&self, nombre: &str) -> Result<Vec<Venta>, AppError>;
    async fn filter_by_date_range(
        &self,
        range: DateRange,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Venta>, AppError>;
    async fn filter_by_price_range(
        &self,
        range: PriceRange,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Venta>, AppError>;
}

const VENTA_COLUMNS: &str = "id, nombre_comprador, precio, fecha_venta, auto_id";

pub struct PgVentaRepository {
    pool: PgPool,
}

impl PgVentaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VentaRepository for PgVentaRepository {
    async fn create(&self, data: NewVenta) -> Result<Venta, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error opening transaction"))?;

        let venta = sqlx::query_as::<_, Venta>(&format!(
            r#"
            INSERT INTO venta (nombre_comprador, precio, fecha_venta, auto_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            VENTA_COLUMNS
        ))
        .bind(&data.nombre_comprador)
        .bind(data.precio)
        .bind(data.fecha_venta)
        .bind(data.auto_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error creating venta"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error committing venta"))?;

        debug!("Venta {} creada para auto {}", venta.id, venta.auto_id);
        Ok(venta)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Venta>, AppError> {
        let venta = sqlx::query_as::<_, Venta>(&format!(
            "SELECT {} FROM venta WHERE id = $1",
            VENTA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error finding venta"))?;

        Ok(venta)
    }

    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Venta>, AppError> {
        let ventas = sqlx::query_as::<_, Venta>(&format!(
            "SELECT {} FROM venta ORDER BY id ASC OFFSET $1 LIMIT $2",
            VENTA_COLUMNS
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error listing ventas"))?;

        Ok(ventas)
    }

    async fn update(&self, id: i64, patch: VentaPatch) -> Result<Option<Venta>, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error opening transaction"))?;

        let current = sqlx::query_as::<_, Venta>(&format!(
            "SELECT {} FROM venta WHERE id = $1 FOR UPDATE",
            VENTA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error finding venta"))?;

        let Some(current) = current else {
            return Ok(None);
        };
        let merged = patch.apply_to(&current);

        let venta = sqlx::query_as::<_, Venta>(&format!(
            r#"
            UPDATE venta
            SET nombre_comprador = $2, precio = $3, fecha_venta = $4, auto_id = $5
            WHERE id = $1
            RETURNING {}
            "#,
            VENTA_COLUMNS
        ))
        .bind(id)
        .bind(&merged.nombre_comprador)
        .bind(merged.precio)
        .bind(merged.fecha_venta)
        .bind(merged.auto_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error updating venta"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error committing venta"))?;

        Ok(Some(venta))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error opening transaction"))?;

        let result = sqlx::query("DELETE FROM venta WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error deleting venta"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error committing venta"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_by_auto_id(&self, auto_id: i64) -> Result<Vec<Venta>, AppError> {
        let ventas = sqlx::query_as::<_, Venta>(&format!(
            "SELECT {} FROM venta WHERE auto_id = $1 ORDER BY id ASC",
            VENTA_COLUMNS
        ))
        .bind(auto_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error listing ventas by auto"))?;

        Ok(ventas)
    }

    async fn count_by_auto_id(&self, auto_id: i64) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM venta WHERE auto_id = $1")
            .bind(auto_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error counting ventas"))?;

        Ok(result.0)
    }

    async fn get_by_comprador(&self, nombre: &str) -> Result<Vec<Venta>, AppError> {
        let ventas = sqlx::query_as::<_, Venta>(&format!(
            "SELECT {} FROM venta WHERE nombre_comprador ILIKE $1 ORDER BY id ASC",
            VENTA_COLUMNS
        ))
        .bind(like_pattern(nombre))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error searching ventas by comprador"))?;

        Ok(ventas)
    }

    async fn filter_by_date_range(
        &self,
        range: DateRange,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Venta>, AppError> {
        let ventas = sqlx::query_as::<_, Venta>(&format!(
            r#"
            SELECT {} FROM venta
            WHERE ($1::TIMESTAMPTZ IS NULL OR fecha_venta >= $1)
              AND ($2::TIMESTAMPTZ IS NULL OR fecha_venta <= $2)
            ORDER BY id ASC
            OFFSET $3 LIMIT $4
            "#,
            VENTA_COLUMNS
        ))
        .bind(range.start)
        .bind(range.end)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error filtering ventas by date"))?;

        Ok(ventas)
    }

    async fn filter_by_price_range(
        &self,
        range: PriceRange,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Venta>, AppError> {
        let ventas = sqlx::query_as::<_, Venta>(&format!(
            r#"
            SELECT {} FROM venta
            WHERE ($1::DOUBLE PRECISION IS NULL OR precio >= $1)
              AND ($2::DOUBLE PRECISION IS NULL OR precio <= $2)
            ORDER BY id ASC
            OFFSET $3 LIMIT $4
            "#,
            VENTA_COLUMNS
        ))
        .bind(range.min)
        .bind(range.max)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error filtering ventas by price"))?;

        Ok(ventas)
    }
}
