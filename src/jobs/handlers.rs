//! # Handlers HTTP para Jobs
//! src/jobs/handlers.rs
//!
//! Implementa los endpoints CRUD del job board:
//! - GET    /jobs
//! - POST   /jobs
//! - PUT    /jobs/{id}
//! - DELETE /jobs/{id}

use crate::http::{Request, Response, StatusCode};
use crate::jobs::job::{JobDraft, JobError};
use crate::jobs::repository::{JobRepository, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

/// Handler para GET /jobs?page=N&pageSize=M
///
/// Retorna una página de jobs ordenados ascendentemente por id.
/// `page` y `pageSize` valen 1 y 10 cuando están ausentes o no son
/// numéricos; ambos se fijan a un mínimo de 1.
///
/// # Ejemplo de response
/// ```json
/// [
///   {
///     "Id": 1,
///     "Title": "Dev",
///     "Description": "Rust backend"
///   }
/// ]
/// ```
pub fn list_handler(req: &Request, repository: &JobRepository) -> Response {
    let page = numeric_param(req, "page", DEFAULT_PAGE);
    let page_size = numeric_param(req, "pageSize", DEFAULT_PAGE_SIZE);

    let jobs = repository.list(page, page_size);

    match serde_json::to_string_pretty(&jobs) {
        Ok(body) => Response::json(&body),
        Err(e) => Response::error(
            StatusCode::InternalServerError,
            &format!("Failed to encode jobs: {}", e),
        ),
    }
}

/// Handler para POST /jobs
///
/// Crea un job desde el body JSON y retorna 201 con el job creado.
/// Body malformado o campos de más de 100 caracteres: 400.
pub fn create_handler(req: &Request, repository: &JobRepository) -> Response {
    let draft = match JobDraft::from_json(req.body()) {
        Ok(d) => d,
        Err(e) => {
            return Response::error(StatusCode::BadRequest, &e.to_string());
        }
    };

    match repository.create(draft.title, draft.description) {
        Ok(job) => match serde_json::to_string_pretty(&job) {
            Ok(body) => Response::json_with_status(StatusCode::Created, &body),
            Err(e) => Response::error(
                StatusCode::InternalServerError,
                &format!("Failed to encode job: {}", e),
            ),
        },
        Err(error) => error_response(error),
    }
}

/// Handler para PUT /jobs/{id}
///
/// Reemplaza Title y Description del job `id` desde el body JSON
/// (cualquier Id en el body se ignora) y retorna 200 con el job
/// actualizado. Id inexistente: 404. Body o campos inválidos: 400.
pub fn update_handler(req: &Request, repository: &JobRepository, id: u64) -> Response {
    let draft = match JobDraft::from_json(req.body()) {
        Ok(d) => d,
        Err(e) => {
            return Response::error(StatusCode::BadRequest, &e.to_string());
        }
    };

    match repository.update(id, draft.title, draft.description) {
        Ok(job) => match serde_json::to_string_pretty(&job) {
            Ok(body) => Response::json(&body),
            Err(e) => Response::error(
                StatusCode::InternalServerError,
                &format!("Failed to encode job: {}", e),
            ),
        },
        Err(error) => error_response(error),
    }
}

/// Handler para DELETE /jobs/{id}
///
/// Elimina el job `id`. Retorna 200 "Job deleted" o 404 si no existe.
pub fn delete_handler(_req: &Request, repository: &JobRepository, id: u64) -> Response {
    match repository.delete(id) {
        Ok(()) => Response::text("Job deleted"),
        Err(error) => error_response(error),
    }
}

/// Lee un query parameter numérico con default y mínimo 1
///
/// Ausente o no numérico: usa el default. Cero: se fija en 1.
fn numeric_param(req: &Request, name: &str, default: usize) -> usize {
    req.query_param(name)
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(default)
        .max(1)
}

/// Mapea un JobError al response HTTP correspondiente
fn error_response(error: JobError) -> Response {
    let status = match &error {
        JobError::Validation(_) => StatusCode::BadRequest,
        JobError::NotFound(_) => StatusCode::NotFound,
        JobError::Storage(_) => StatusCode::InternalServerError,
    };
    Response::error(status, &error.to_string())
}
