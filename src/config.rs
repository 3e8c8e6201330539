//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor con soporte para
//! argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./job_board --port 5000 --storage ./jobs.json
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=5000 HTTP_HOST=0.0.0.0 ./job_board
//! ```

use clap::Parser;

/// Configuración del servidor de jobs
#[derive(Debug, Clone, Parser)]
#[command(name = "job_board")]
#[command(about = "Servicio HTTP/1.0 de publicaciones de empleo con persistencia JSON")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "5000", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Ruta del archivo de persistencia de jobs
    #[arg(long = "storage", default_value = "./jobs.json", env = "JOBS_STORAGE")]
    pub storage_path: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use job_board::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:5000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        if self.storage_path.trim().is_empty() {
            return Err("Storage path must not be empty".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════╗");
        println!("║      Job Board Server Configuration      ║");
        println!("╚══════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        println!();
        println!("💾 Storage:");
        println!("   Jobs file:    {}", self.storage_path);
        println!();
        println!("════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto: localhost:5000 y ./jobs.json
    fn default() -> Self {
        Self {
            port: 5000,
            host: "127.0.0.1".to_string(),
            storage_path: "./jobs.json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.storage_path, "./jobs.json");
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "127.0.0.1:5000");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.host = "".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Host"));
    }

    #[test]
    fn test_validate_empty_storage_path() {
        let mut config = Config::default();
        config.storage_path = "  ".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Storage path"));
    }

    #[test]
    fn test_config_custom_storage_path() {
        let mut config = Config::default();
        config.storage_path = "/custom/jobs.json".to_string();
        assert_eq!(config.storage_path, "/custom/jobs.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_print_summary() {
        let config = Config::default();
        // Should not panic
        config.print_summary();
    }
}
