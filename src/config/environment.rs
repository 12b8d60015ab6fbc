//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables son opcionales; un valor mal formado es un error de
//! arranque, nunca un panic.

use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;

use super::database::DatabaseConfig;
use super::parse_var;

/// Backend de persistencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("STORAGE_BACKEND desconocido: '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub database: DatabaseConfig,
    /// `None` => CORS permisivo
    pub cors_origins: Option<Vec<String>>,
    pub log_level: tracing::Level,
    pub max_concurrent_requests: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            storage_backend: StorageBackend::Postgres,
            database: DatabaseConfig::default(),
            cors_origins: None,
            log_level: tracing::Level::INFO,
            max_concurrent_requests: 512,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda de variables
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => defaults.storage_backend,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty() && origins.iter().all(|o| o != "*"));

        let max_concurrent_requests = parse_var(
            &lookup,
            "MAX_CONCURRENT_REQUESTS",
            defaults.max_concurrent_requests,
        )?;
        if max_concurrent_requests == 0 {
            return Err(anyhow!("MAX_CONCURRENT_REQUESTS must be at least 1"));
        }

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            storage_backend,
            database: DatabaseConfig::from_lookup(&lookup)?,
            cors_origins,
            log_level: parse_var(&lookup, "LOG_LEVEL", defaults.log_level)?,
            max_concurrent_requests,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = EnvironmentConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.storage_backend, StorageBackend::Postgres);
        assert!(config.cors_origins.is_none());
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert_eq!(config.server_url(), "0.0.0.0:8000");
        assert!(config.is_development());
    }

    #[test]
    fn test_reads_variables() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("PORT", "9090"),
            ("STORAGE_BACKEND", "memory"),
            ("CORS_ORIGINS", "http://a.com, http://b.com"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(
            config.cors_origins,
            Some(vec!["http://a.com".to_string(), "http://b.com".to_string()])
        );
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_environment_name() {
        let config =
            EnvironmentConfig::from_lookup(lookup_from(&[("ENVIRONMENT", "production")])).unwrap();
        assert_eq!(config.environment, "production");
        assert!(!config.is_development());
    }

    #[test]
    fn test_wildcard_cors_is_permissive() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[("CORS_ORIGINS", "*")])).unwrap();
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(EnvironmentConfig::from_lookup(lookup_from(&[("PORT", "abc")])).is_err());
        assert!(EnvironmentConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "mongo")])).is_err());
        assert!(
            EnvironmentConfig::from_lookup(lookup_from(&[("MAX_CONCURRENT_REQUESTS", "0")])).is_err()
        );
        let config =
            EnvironmentConfig::from_lookup(lookup_from(&[("MAX_CONCURRENT_REQUESTS", "1")])).unwrap();
        assert_eq!(config.max_concurrent_requests, 1);
    }
}
