//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea (método, path) HTTP a
//! handlers específicos.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! ## Tabla de dispatch
//!
//! | Método | Path         | Acción          |
//! |--------|--------------|-----------------|
//! | GET    | /jobs        | Listar          |
//! | POST   | /jobs        | Crear           |
//! | PUT    | /jobs/{id}   | Actualizar      |
//! | DELETE | /jobs/{id}   | Eliminar        |
//! | otro   | —            | 404 Not Found   |
//!
//! Un id ausente o no numérico en PUT/DELETE responde 400.

use crate::http::{Method, Request, Response, StatusCode};
use crate::jobs::{handlers, JobRepository};
use std::sync::Arc;

/// Router de los endpoints del job board
pub struct Router {
    /// Repositorio compartido entre todas las conexiones
    repository: Arc<JobRepository>,
}

impl Router {
    /// Crea un router sobre el repositorio compartido
    pub fn new(repository: Arc<JobRepository>) -> Self {
        Self { repository }
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Si (método, path) no coincide con la tabla, retorna 404.
    pub fn route(&self, request: &Request) -> Response {
        let mut response = self.dispatch(request);
        // Agregar headers comunes a todas las respuestas
        self.add_common_headers(&mut response);
        response
    }

    /// Clasifica el request según la tabla de dispatch
    fn dispatch(&self, request: &Request) -> Response {
        let path = request.path();

        if path == "/jobs" {
            return match request.method() {
                Method::GET => handlers::list_handler(request, &self.repository),
                Method::POST => handlers::create_handler(request, &self.repository),
                _ => Self::not_found(),
            };
        }

        if let Some(segment) = path.strip_prefix("/jobs/") {
            return match request.method() {
                Method::PUT => match Self::parse_id(segment) {
                    Ok(id) => handlers::update_handler(request, &self.repository, id),
                    Err(response) => response,
                },
                Method::DELETE => match Self::parse_id(segment) {
                    Ok(id) => handlers::delete_handler(request, &self.repository, id),
                    Err(response) => response,
                },
                // GET /jobs/{id} no existe en la tabla: ruta no encontrada
                _ => Self::not_found(),
            };
        }

        Self::not_found()
    }

    /// Parsea el segmento de path después de "/jobs/" como id
    ///
    /// Vacío o no numérico: 400 Bad Request.
    fn parse_id(segment: &str) -> Result<u64, Response> {
        segment.parse::<u64>().map_err(|_| {
            Response::error(
                StatusCode::BadRequest,
                &format!("Invalid job id: '{}'", segment),
            )
        })
    }

    /// Respuesta para rutas no registradas
    fn not_found() -> Response {
        Response::error(StatusCode::NotFound, "Not Found")
    }

    /// Agrega headers comunes a todas las respuestas
    fn add_common_headers(&self, response: &mut Response) {
        response.add_header("Server", "JobBoard-HTTP/1.0");
        response.add_header("Connection", "close");
    }
}
