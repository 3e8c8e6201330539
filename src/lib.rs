//! # Job Board Server
//! src/lib.rs
//!
//! Servicio HTTP/1.0 concurrente de publicaciones de empleo (jobs):
//! CRUD sobre una lista de jobs persistida en un archivo JSON plano.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing y manejo del protocolo HTTP/1.0
//! - `server`: Lógica del servidor TCP y manejo de conexiones
//! - `router`: Enrutamiento de peticiones a handlers
//! - `jobs`: Repositorio de jobs, validación y persistencia
//! - `metrics`: Recolección de métricas y observabilidad
//! - `config`: Configuración por CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! use job_board::config::Config;
//! use job_board::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config).expect("Error al inicializar");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod http;
pub mod config;
pub mod server;
pub mod router;
pub mod jobs;
pub mod metrics;
