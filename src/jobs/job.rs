//! # Tipos del Dominio de Jobs
//! src/jobs/job.rs
//!
//! Define el registro `Job`, la validación de campos y los errores
//! del repositorio.

use serde::{Deserialize, Serialize};

/// Longitud máxima (en caracteres) de Title y Description
pub const MAX_FIELD_CHARS: usize = 100;

/// Una publicación de empleo
///
/// El orden de los campos define el orden estable de serialización:
/// Id, Title, Description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// ID único, asignado por el servidor, monotónicamente creciente
    #[serde(rename = "Id", alias = "id", alias = "ID")]
    pub id: u64,

    /// Título del puesto (máximo 100 caracteres)
    #[serde(rename = "Title", alias = "title")]
    pub title: String,

    /// Descripción del puesto (máximo 100 caracteres)
    #[serde(rename = "Description", alias = "description")]
    pub description: String,
}

/// Errores del repositorio de jobs
#[derive(Debug)]
pub enum JobError {
    /// Un campo excede la longitud máxima
    Validation(String),

    /// No existe un job con el id solicitado
    NotFound(u64),

    /// Falla de persistencia (disco lleno, permisos, etc.)
    Storage(std::io::Error),
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobError::Validation(msg) => write!(f, "{}", msg),
            JobError::NotFound(id) => write!(f, "Job not found: {}", id),
            JobError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JobError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// Errores al interpretar el body JSON de un request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    /// Body vacío o ausente
    Empty,

    /// Body no es JSON válido o no es un objeto
    Malformed(String),

    /// Falta un campo requerido (Title o Description)
    MissingField(&'static str),
}

impl std::fmt::Display for BodyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyError::Empty => write!(f, "Request body is empty"),
            BodyError::Malformed(msg) => write!(f, "Malformed JSON body: {}", msg),
            BodyError::MissingField(name) => write!(f, "Missing required field: {}", name),
        }
    }
}

impl std::error::Error for BodyError {}

/// Payload entrante de POST /jobs y PUT /jobs/{id}
///
/// Los nombres de campo se aceptan sin distinguir mayúsculas de
/// minúsculas (`Title`, `title`, `TITLE`, ...). Cualquier campo `Id`
/// presente en el body se ignora: el id lo asigna el servidor (POST)
/// o viene del path (PUT).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
}

impl JobDraft {
    /// Interpreta el body de un request como un draft de job
    ///
    /// # Ejemplo
    /// ```
    /// use job_board::jobs::JobDraft;
    ///
    /// let draft = JobDraft::from_json(br#"{"title": "Dev", "DESCRIPTION": "Rust"}"#).unwrap();
    /// assert_eq!(draft.title, "Dev");
    /// assert_eq!(draft.description, "Rust");
    /// ```
    pub fn from_json(body: &[u8]) -> Result<Self, BodyError> {
        if body.is_empty() {
            return Err(BodyError::Empty);
        }

        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| BodyError::Malformed(e.to_string()))?;

        let object = value.as_object()
            .ok_or_else(|| BodyError::Malformed("expected a JSON object".to_string()))?;

        let title = Self::field(object, "Title")?;
        let description = Self::field(object, "Description")?;

        Ok(Self { title, description })
    }

    /// Busca un campo string por nombre, sin distinguir mayúsculas
    fn field(
        object: &serde_json::Map<String, serde_json::Value>,
        name: &'static str,
    ) -> Result<String, BodyError> {
        let value = object.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
            .ok_or(BodyError::MissingField(name))?;

        value.as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| BodyError::Malformed(format!("field '{}' must be a string", name)))
    }
}

/// Valida las longitudes de Title y Description
///
/// Cuenta caracteres (no bytes): un título de 100 caracteres con
/// acentos es válido aunque ocupe más de 100 bytes.
pub fn validate_fields(title: &str, description: &str) -> Result<(), JobError> {
    if title.chars().count() > MAX_FIELD_CHARS {
        return Err(JobError::Validation(
            format!("Title exceeds {} characters", MAX_FIELD_CHARS)
        ));
    }
    if description.chars().count() > MAX_FIELD_CHARS {
        return Err(JobError::Validation(
            format!("Description exceeds {} characters", MAX_FIELD_CHARS)
        ));
    }
    Ok(())
}
