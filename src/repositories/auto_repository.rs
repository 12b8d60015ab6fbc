use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::models::{Auto, AutoPatch, NewAuto};
use crate::repositories::like_pattern;
use crate::utils::errors::AppError;

/// Operaciones de persistencia sobre la tabla `auto`.
///
/// `delete` no comprueba si existen ventas asociadas: esa regla la aplica
/// `AutoController` antes de llamarlo.
#[async_trait]
pub trait AutoRepository: Send + Sync {
    async fn create(&self, data: NewAuto) -> Result<Auto, AppError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Auto>, AppError>;
    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Auto>, AppError>;
    /// `Ok(None)` si el auto no existe
    async fn update(&self, id: i64, patch: AutoPatch) -> Result<Option<Auto>, AppError>;
    /// `Ok(false)` si el auto no existe
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
    async fn get_by_chasis(&self, numero_chasis: &str) -> Result<Option<Auto>, AppError>;
    async fn search(
        &self,
        marca: Option<&str>,
        modelo: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Auto>, AppError>;
}

const AUTO_COLUMNS: &str = "id, marca, modelo, anio, numero_chasis";

pub struct PgAutoRepository {
    pool: PgPool,
}

impl PgAutoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AutoRepository for PgAutoRepository {
    async fn create(&self, data: NewAuto) -> Result<Auto, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error opening transaction"))?;

        let auto = sqlx::query_as::<_, Auto>(&format!(
            r#"
            INSERT INTO auto (marca, modelo, anio, numero_chasis)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            AUTO_COLUMNS
        ))
        .bind(&data.marca)
        .bind(&data.modelo)
        .bind(data.anio)
        .bind(&data.numero_chasis)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error creating auto"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error committing auto"))?;

        debug!("Auto {} creado (chasis {})", auto.id, auto.numero_chasis);
        Ok(auto)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Auto>, AppError> {
        let auto = sqlx::query_as::<_, Auto>(&format!(
            "SELECT {} FROM auto WHERE id = $1",
            AUTO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error finding auto"))?;

        Ok(auto)
    }

    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Auto>, AppError> {
        let autos = sqlx::query_as::<_, Auto>(&format!(
            "SELECT {} FROM auto ORDER BY id ASC OFFSET $1 LIMIT $2",
            AUTO_COLUMNS
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error listing autos"))?;

        Ok(autos)
    }

    async fn update(&self, id: i64, patch: AutoPatch) -> Result<Option<Auto>, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error opening transaction"))?;

        // Bloquear la fila para que el merge de campos no pise una escritura concurrente
        let current = sqlx::query_as::<_, Auto>(&format!(
            "SELECT {} FROM auto WHERE id = $1 FOR UPDATE",
            AUTO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error finding auto"))?;

        let Some(current) = current else {
            return Ok(None);
        };
        let merged = patch.apply_to(&current);

        let auto = sqlx::query_as::<_, Auto>(&format!(
            r#"
            UPDATE auto
            SET marca = $2, modelo = $3, anio = $4, numero_chasis = $5
            WHERE id = $1
            RETURNING {}
            "#,
            AUTO_COLUMNS
        ))
        .bind(id)
        .bind(&merged.marca)
        .bind(&merged.modelo)
        .bind(merged.anio)
        .bind(&merged.numero_chasis)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error updating auto"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error committing auto"))?;

        Ok(Some(auto))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error opening transaction"))?;

        let result = sqlx::query("DELETE FROM auto WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error deleting auto"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Error committing auto"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_by_chasis(&self, numero_chasis: &str) -> Result<Option<Auto>, AppError> {
        let auto = sqlx::query_as::<_, Auto>(&format!(
            "SELECT {} FROM auto WHERE numero_chasis = $1",
            AUTO_COLUMNS
        ))
        .bind(numero_chasis)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error finding auto by chasis"))?;

        Ok(auto)
    }

    async fn search(
        &self,
        marca: Option<&str>,
        modelo: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Auto>, AppError> {
        // Un filtro NULL no restringe nada
        let autos = sqlx::query_as::<_, Auto>(&format!(
            r#"
            SELECT {} FROM auto
            WHERE ($1::TEXT IS NULL OR marca ILIKE $1)
              AND ($2::TEXT IS NULL OR modelo ILIKE $2)
            ORDER BY id ASC
            OFFSET $3 LIMIT $4
            "#,
            AUTO_COLUMNS
        ))
        .bind(marca.map(like_pattern))
        .bind(modelo.map(like_pattern))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Error searching autos"))?;

        Ok(autos)
    }
}
