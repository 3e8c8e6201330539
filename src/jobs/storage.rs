//! # Persistencia de Jobs
//! src/jobs/storage.rs
//!
//! Carga y guarda la colección completa de jobs en un archivo JSON
//! plano. Cada mutación reescribe el archivo entero; no hay
//! persistencia incremental.

use crate::jobs::job::Job;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Storage para persistir la colección de jobs
pub struct JobStorage {
    /// Ruta al archivo de persistencia
    path: String,
}

impl JobStorage {
    /// Crea un storage sobre la ruta indicada
    ///
    /// No toca el disco: el archivo se lee en `load` y se crea en el
    /// primer `save`.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Ruta del archivo de persistencia
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Carga la colección completa desde el archivo
    ///
    /// - Archivo inexistente: retorna una colección vacía.
    /// - Archivo corrupto: avisa por consola y empieza limpio.
    pub fn load(&self) -> std::io::Result<Vec<Job>> {
        if !Path::new(&self.path).exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        match serde_json::from_reader(reader) {
            Ok(jobs) => Ok(jobs),
            Err(e) => {
                // Si el archivo está corrupto, empezar limpio
                eprintln!("   ⚠️  Archivo de jobs corrupto ({}): empezando vacío", e);
                Ok(Vec::new())
            }
        }
    }

    /// Guarda la colección completa al archivo
    ///
    /// Serializa como array JSON pretty-printed (orden de campos:
    /// Id, Title, Description) y reemplaza el archivo por completo.
    pub fn save(&self, jobs: &[Job]) -> std::io::Result<()> {
        // Crear archivo temporal primero (atomic write)
        let temp_path = format!("{}.tmp", self.path);
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, jobs)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        writer.flush()?;

        // Renombrar (atómico en sistemas Unix)
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}
