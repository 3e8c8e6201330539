//! # Sistema de Jobs
//!
//! CRUD de publicaciones de empleo respaldado por un archivo JSON.
//!
//! ## Endpoints
//!
//! - `GET /jobs?page=N&pageSize=M` - Listar jobs paginados
//! - `POST /jobs` - Crear job desde body JSON
//! - `PUT /jobs/{id}` - Reemplazar Title/Description de un job
//! - `DELETE /jobs/{id}` - Eliminar job

pub mod job;
pub mod repository;
pub mod storage;
pub mod handlers;

pub use job::{Job, JobDraft, JobError, MAX_FIELD_CHARS};
pub use repository::JobRepository;
pub use storage::JobStorage;
