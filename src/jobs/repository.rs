//! # Repositorio de Jobs
//! src/jobs/repository.rs
//!
//! Colección autoritativa de jobs en memoria más el asignador de ids.
//! Un único `Mutex` protege la lista y el contador: cada mutación y su
//! escritura a disco se ejecutan dentro de la misma sección crítica,
//! de modo que dos requests concurrentes no puedan pisarse el archivo.

use crate::jobs::job::{validate_fields, Job, JobError};
use crate::jobs::storage::JobStorage;
use std::sync::Mutex;

/// Página por defecto cuando el parámetro está ausente o no es numérico
pub const DEFAULT_PAGE: usize = 1;

/// Tamaño de página por defecto
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Estado interno protegido por el mutex
struct RepositoryState {
    /// Jobs ordenados ascendentemente por id
    jobs: Vec<Job>,

    /// Siguiente id a asignar; siempre mayor que todo id ya asignado,
    /// incluso después de borrados (los ids nunca se reutilizan)
    next_id: u64,
}

/// Repositorio de jobs respaldado por un archivo JSON
pub struct JobRepository {
    storage: JobStorage,
    state: Mutex<RepositoryState>,
}

impl JobRepository {
    /// Abre el repositorio cargando la colección persistida
    ///
    /// Recalcula `next_id` como `max(ids) + 1`, o `1` si la colección
    /// está vacía.
    pub fn open(storage: JobStorage) -> std::io::Result<Self> {
        let mut jobs = storage.load()?;
        jobs.sort_by_key(|job| job.id);

        let next_id = jobs.last().map(|job| job.id + 1).unwrap_or(1);

        Ok(Self {
            storage,
            state: Mutex::new(RepositoryState { jobs, next_id }),
        })
    }

    /// Lista una página de jobs, ordenados ascendentemente por id
    ///
    /// `page` y `page_size` se fijan a un mínimo de 1; no hay máximo,
    /// un `page_size` arbitrariamente grande retorna todo lo restante.
    /// Nunca falla.
    pub fn list(&self, page: usize, page_size: usize) -> Vec<Job> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let state = self.state.lock().unwrap();
        state.jobs.iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect()
    }

    /// Crea un job nuevo y lo persiste
    ///
    /// Asigna `id = next_id`, incrementa el contador, agrega al final
    /// de la colección y reescribe el archivo completo.
    pub fn create(&self, title: String, description: String) -> Result<Job, JobError> {
        validate_fields(&title, &description)?;

        let mut state = self.state.lock().unwrap();

        let job = Job {
            id: state.next_id,
            title,
            description,
        };
        state.next_id += 1;
        state.jobs.push(job.clone());

        self.storage.save(&state.jobs).map_err(JobError::Storage)?;

        Ok(job)
    }

    /// Reemplaza Title y Description de un job existente y persiste
    ///
    /// El id no cambia. Retorna `NotFound` si el id no existe.
    pub fn update(&self, id: u64, title: String, description: String) -> Result<Job, JobError> {
        let mut state = self.state.lock().unwrap();

        let index = state.jobs.iter()
            .position(|job| job.id == id)
            .ok_or(JobError::NotFound(id))?;

        validate_fields(&title, &description)?;

        state.jobs[index].title = title;
        state.jobs[index].description = description;
        let updated = state.jobs[index].clone();

        self.storage.save(&state.jobs).map_err(JobError::Storage)?;

        Ok(updated)
    }

    /// Elimina un job y persiste
    ///
    /// Retorna `NotFound` si el id no existe. El id eliminado nunca se
    /// reasigna: `next_id` no retrocede.
    pub fn delete(&self, id: u64) -> Result<(), JobError> {
        let mut state = self.state.lock().unwrap();

        let index = state.jobs.iter()
            .position(|job| job.id == id)
            .ok_or(JobError::NotFound(id))?;

        state.jobs.remove(index);

        self.storage.save(&state.jobs).map_err(JobError::Storage)?;

        Ok(())
    }

    /// Número de jobs en la colección
    pub fn count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.jobs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::thread;

    fn open_repository(temp_file: &str) -> JobRepository {
        let _ = fs::remove_file(temp_file);
        JobRepository::open(JobStorage::new(temp_file)).unwrap()
    }

    // ==================== Create ====================

    #[test]
    fn test_create_assigns_sequential_ids() {
        let temp_file = "/tmp/test_repo_sequential_ids.json";
        let repo = open_repository(temp_file);

        let first = repo.create("a".to_string(), "b".to_string()).unwrap();
        let second = repo.create("c".to_string(), "d".to_string()).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_create_ids_strictly_increasing() {
        let temp_file = "/tmp/test_repo_increasing.json";
        let repo = open_repository(temp_file);

        let mut last_id = 0;
        for i in 0..10 {
            let job = repo.create(format!("t{}", i), format!("d{}", i)).unwrap();
            assert!(job.id > last_id);
            last_id = job.id;
        }

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_create_rejects_long_title() {
        let temp_file = "/tmp/test_repo_long_title.json";
        let repo = open_repository(temp_file);

        let long = "a".repeat(101);
        let result = repo.create(long, "ok".to_string());

        assert!(matches!(result, Err(JobError::Validation(_))));
        assert_eq!(repo.count(), 0);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_create_accepts_exactly_100_chars() {
        let temp_file = "/tmp/test_repo_exact_100.json";
        let repo = open_repository(temp_file);

        let exact = "a".repeat(100);
        let result = repo.create(exact.clone(), exact);

        assert!(result.is_ok());

        let _ = fs::remove_file(temp_file);
    }

    // ==================== List ====================

    #[test]
    fn test_list_sorted_ascending_by_id() {
        let temp_file = "/tmp/test_repo_list_sorted.json";
        let repo = open_repository(temp_file);

        for i in 0..5 {
            repo.create(format!("t{}", i), format!("d{}", i)).unwrap();
        }

        let jobs = repo.list(1, 100);
        let ids: Vec<u64> = jobs.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_list_pagination() {
        let temp_file = "/tmp/test_repo_pagination.json";
        let repo = open_repository(temp_file);

        for i in 0..7 {
            repo.create(format!("t{}", i), format!("d{}", i)).unwrap();
        }

        let page1 = repo.list(1, 3);
        let page2 = repo.list(2, 3);
        let page3 = repo.list(3, 3);

        assert_eq!(page1.iter().map(|j| j.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(page2.iter().map(|j| j.id).collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!(page3.iter().map(|j| j.id).collect::<Vec<_>>(), vec![7]);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_list_pages_reconstruct_collection() {
        let temp_file = "/tmp/test_repo_page_concat.json";
        let repo = open_repository(temp_file);

        for i in 0..10 {
            repo.create(format!("t{}", i), format!("d{}", i)).unwrap();
        }

        // Concatenar todas las páginas reconstituye la colección sin
        // duplicados ni huecos
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let chunk = repo.list(page, 3);
            if chunk.is_empty() {
                break;
            }
            all.extend(chunk);
            page += 1;
        }

        let ids: Vec<u64> = all.iter().map(|j| j.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<u64>>());

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_list_clamps_page_and_size_to_one() {
        let temp_file = "/tmp/test_repo_clamp.json";
        let repo = open_repository(temp_file);

        for i in 0..3 {
            repo.create(format!("t{}", i), format!("d{}", i)).unwrap();
        }

        // page=0 y page_size=0 se tratan como 1
        let jobs = repo.list(0, 0);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, 1);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_list_page_beyond_end_is_empty() {
        let temp_file = "/tmp/test_repo_beyond_end.json";
        let repo = open_repository(temp_file);

        repo.create("a".to_string(), "b".to_string()).unwrap();

        assert!(repo.list(99, 10).is_empty());

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_list_huge_page_size_returns_everything() {
        let temp_file = "/tmp/test_repo_huge_page.json";
        let repo = open_repository(temp_file);

        for i in 0..4 {
            repo.create(format!("t{}", i), format!("d{}", i)).unwrap();
        }

        assert_eq!(repo.list(1, usize::MAX).len(), 4);

        let _ = fs::remove_file(temp_file);
    }

    // ==================== Update ====================

    #[test]
    fn test_update_replaces_fields_keeps_id() {
        let temp_file = "/tmp/test_repo_update.json";
        let repo = open_repository(temp_file);

        let job = repo.create("old".to_string(), "old desc".to_string()).unwrap();
        let updated = repo.update(job.id, "new".to_string(), "new desc".to_string()).unwrap();

        assert_eq!(updated.id, job.id);
        assert_eq!(updated.title, "new");
        assert_eq!(updated.description, "new desc");

        // Sigue habiendo exactamente un job con ese id
        let jobs = repo.list(1, 100);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0], updated);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_update_nonexistent_id() {
        let temp_file = "/tmp/test_repo_update_missing.json";
        let repo = open_repository(temp_file);

        let result = repo.update(42, "a".to_string(), "b".to_string());
        assert!(matches!(result, Err(JobError::NotFound(42))));

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_update_rejects_long_description() {
        let temp_file = "/tmp/test_repo_update_long.json";
        let repo = open_repository(temp_file);

        let job = repo.create("a".to_string(), "b".to_string()).unwrap();
        let long = "x".repeat(101);
        let result = repo.update(job.id, "a".to_string(), long);

        assert!(matches!(result, Err(JobError::Validation(_))));

        // El job original queda intacto
        let jobs = repo.list(1, 10);
        assert_eq!(jobs[0].description, "b");

        let _ = fs::remove_file(temp_file);
    }

    // ==================== Delete ====================

    #[test]
    fn test_delete_removes_job() {
        let temp_file = "/tmp/test_repo_delete.json";
        let repo = open_repository(temp_file);

        let job = repo.create("a".to_string(), "b".to_string()).unwrap();
        repo.delete(job.id).unwrap();

        assert_eq!(repo.count(), 0);
        assert!(repo.list(1, 10).is_empty());

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_delete_nonexistent_id() {
        let temp_file = "/tmp/test_repo_delete_missing.json";
        let repo = open_repository(temp_file);

        let result = repo.delete(7);
        assert!(matches!(result, Err(JobError::NotFound(7))));

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_deleted_id_never_reused() {
        let temp_file = "/tmp/test_repo_no_reuse.json";
        let repo = open_repository(temp_file);

        let first = repo.create("a".to_string(), "b".to_string()).unwrap();
        let second = repo.create("c".to_string(), "d".to_string()).unwrap();
        repo.delete(second.id).unwrap();

        let third = repo.create("e".to_string(), "f".to_string()).unwrap();

        assert!(third.id > second.id);
        assert_ne!(third.id, second.id);

        let ids: Vec<u64> = repo.list(1, 10).iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![first.id, third.id]);

        let _ = fs::remove_file(temp_file);
    }

    // ==================== Persistencia ====================

    #[test]
    fn test_reopen_preserves_collection_and_next_id() {
        let temp_file = "/tmp/test_repo_reopen.json";
        let _ = fs::remove_file(temp_file);

        // Primera instancia: crear y borrar
        {
            let repo = JobRepository::open(JobStorage::new(temp_file)).unwrap();
            repo.create("a".to_string(), "b".to_string()).unwrap();
            let second = repo.create("c".to_string(), "d".to_string()).unwrap();
            repo.delete(second.id).unwrap();
        }

        // Segunda instancia: debe cargar lo guardado y continuar ids
        // desde el máximo persistido (no desde el máximo histórico)
        {
            let repo = JobRepository::open(JobStorage::new(temp_file)).unwrap();
            assert_eq!(repo.count(), 1);

            let job = repo.create("e".to_string(), "f".to_string()).unwrap();
            assert_eq!(job.id, 2);
        }

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_open_sorts_unordered_file() {
        let temp_file = "/tmp/test_repo_unordered.json";
        let _ = fs::remove_file(temp_file);

        std::fs::write(
            temp_file,
            r#"[{"Id": 9, "Title": "c", "Description": "z"},
               {"Id": 2, "Title": "a", "Description": "x"}]"#,
        ).unwrap();

        let repo = JobRepository::open(JobStorage::new(temp_file)).unwrap();
        let ids: Vec<u64> = repo.list(1, 10).iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![2, 9]);

        // next_id continúa desde el máximo
        let job = repo.create("n".to_string(), "m".to_string()).unwrap();
        assert_eq!(job.id, 10);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_open_empty_store_starts_at_one() {
        let temp_file = "/tmp/test_repo_starts_at_one.json";
        let repo = open_repository(temp_file);

        let job = repo.create("a".to_string(), "b".to_string()).unwrap();
        assert_eq!(job.id, 1);

        let _ = fs::remove_file(temp_file);
    }

    // ==================== Concurrencia ====================

    #[test]
    fn test_concurrent_creates_unique_ids() {
        let temp_file = "/tmp/test_repo_concurrent.json";
        let _ = fs::remove_file(temp_file);

        let repo = Arc::new(JobRepository::open(JobStorage::new(temp_file)).unwrap());

        let mut handles = Vec::new();
        for t in 0..4 {
            let repo = Arc::clone(&repo);
            handles.push(thread::spawn(move || {
                for i in 0..5 {
                    repo.create(format!("t{}-{}", t, i), "d".to_string()).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 20 jobs, todos con ids únicos y ascendentes
        let jobs = repo.list(1, 100);
        assert_eq!(jobs.len(), 20);

        let mut ids: Vec<u64> = jobs.iter().map(|j| j.id).collect();
        let original = ids.clone();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert_eq!(original, ids); // ya venían ordenados

        let _ = fs::remove_file(temp_file);
    }
}
