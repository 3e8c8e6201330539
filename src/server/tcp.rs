//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio
//! thread; el repositorio compartido es el único punto de
//! sincronización.

use crate::config::Config;
use crate::http::{Request, Response, StatusCode};
use crate::jobs::{JobRepository, JobStorage};
use crate::metrics::MetricsCollector;
use crate::router::Router;
use serde_json::json;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Límite superior del tamaño de un request (headers + body)
const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Servidor HTTP/1.0 concurrente del job board
pub struct Server {
    config: Config,
    router: Arc<Router>,
    repository: Arc<JobRepository>,
    metrics: Arc<MetricsCollector>,
    listening: Arc<AtomicBool>,
}

impl Server {
    /// Inicializa el servidor: carga la colección persistida y arma
    /// el router sobre el repositorio compartido
    pub fn new(config: Config) -> std::io::Result<Self> {
        let storage = JobStorage::new(&config.storage_path);
        let repository = Arc::new(JobRepository::open(storage)?);
        let router = Arc::new(Router::new(Arc::clone(&repository)));

        Ok(Self {
            config,
            router,
            repository,
            metrics: Arc::new(MetricsCollector::new()),
            listening: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Hace bind en la dirección configurada y atiende conexiones
    /// indefinidamente (bloquea el thread actual)
    pub fn run(&mut self) -> std::io::Result<()> {
        let address = self.config.address();
        println!("[*] Iniciando servidor en {}", address);

        let listener = TcpListener::bind(&address)?;
        println!("[+] Servidor escuchando en {}", address);
        println!("[*] Modo concurrente: un thread por conexion\n");

        self.serve(listener)
    }

    /// Atiende conexiones sobre un listener ya creado
    ///
    /// Separado de `run` para que los tests puedan usar un puerto
    /// efímero. El loop corre mientras el flag `listening` esté
    /// activo; los errores del accept se loguean y el loop continúa.
    pub fn serve(&mut self, listener: TcpListener) -> std::io::Result<()> {
        for stream in listener.incoming() {
            if !self.listening.load(Ordering::SeqCst) {
                break;
            }

            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let metrics = Arc::clone(&self.metrics);
                    let repository = Arc::clone(&self.repository);

                    let peer_addr = stream.peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());

                    println!(" ✅ Nueva conexión desde: {} (spawning thread)", peer_addr);

                    // Incrementar contador de threads activos
                    metrics.increment_active_threads();

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection_static(stream, router, metrics.clone(), repository) {
                            eprintln!("   ❌ Error en thread: {}", e);
                        }
                        // Decrementar al terminar
                        metrics.decrement_active_threads();
                    });
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Apaga el flag de escucha: el accept loop termina en la
    /// siguiente conexión entrante
    pub fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    /// Procesa una conexión completa: lee el request, lo despacha y
    /// escribe la respuesta
    fn handle_connection_static(
        mut stream: TcpStream,
        router: Arc<Router>,
        metrics: Arc<MetricsCollector>,
        repository: Arc<JobRepository>,
    ) -> std::io::Result<()> {
        let start = Instant::now();

        // Generar Request ID único
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        start.elapsed().as_nanos().hash(&mut hasher);
        thread::current().id().hash(&mut hasher);
        let request_id = format!("{:016x}", hasher.finish());
        let thread_id = format!("{:?}", thread::current().id());

        let buffer = Self::read_request(&mut stream)?;

        if buffer.is_empty() {
            println!("   ✅ Conexión cerrada");
            return Ok(());
        }

        println!("   ✅ {} bytes [req_id: {}]", buffer.len(), &request_id[..8]);

        let (response, path) = match Request::parse(&buffer) {
            Ok(request) => {
                let path = request.path().to_string();
                println!("   ✅ {} {}", request.method().as_str(), path);

                // Manejar rutas de observabilidad antes del router
                let response = if path == "/metrics" {
                    Self::metrics_response(&metrics, &repository)
                } else if path == "/status" {
                    Self::status_response(&repository)
                } else {
                    router.route(&request)
                };

                (response, path)
            }
            Err(e) => {
                println!("   ❌ Parse error: {}", e);
                (Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e)), "/error".to_string())
            }
        };

        // Agregar headers de observabilidad
        let mut response = response;
        response.add_header("X-Request-Id", &request_id);
        response.add_header("X-Worker-Thread", &thread_id);

        let process_id = std::process::id();
        response.add_header("X-Worker-Pid", &process_id.to_string());

        let response_bytes = response.to_bytes();
        stream.write_all(&response_bytes)?;
        stream.flush()?;

        let latency = start.elapsed();
        let status_code = response.status().as_u16();

        // Registrar métricas
        metrics.record_request(&path, status_code, latency);

        println!("   ✅ {} ({:.2}ms)\n", response.status(), latency.as_secs_f64() * 1000.0);

        Ok(())
    }

    /// Lee un request completo del socket
    ///
    /// Acumula hasta encontrar el fin de headers (`\r\n\r\n`) y, si el
    /// request declara `Content-Length`, hasta recibir el body
    /// completo. Los bodies de PUT/POST pueden llegar en más de un
    /// segmento TCP, por eso no basta un único `read`.
    fn read_request(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];

        loop {
            let bytes_read = stream.read(&mut chunk)?;
            if bytes_read == 0 {
                break; // EOF
            }
            buffer.extend_from_slice(&chunk[..bytes_read]);

            if let Some(header_end) = Self::find_header_end(&buffer) {
                match Self::declared_content_length(&buffer[..header_end]) {
                    Some(length) => {
                        if buffer.len() >= header_end + 4 + length {
                            break;
                        }
                    }
                    // Sin Content-Length: los headers completos bastan
                    None => break,
                }
            }

            if buffer.len() > MAX_REQUEST_BYTES {
                break;
            }
        }

        Ok(buffer)
    }

    /// Busca el separador de headers y body (`\r\n\r\n`)
    fn find_header_end(buffer: &[u8]) -> Option<usize> {
        buffer.windows(4).position(|window| window == b"\r\n\r\n")
    }

    /// Extrae el valor de Content-Length de la sección de headers
    fn declared_content_length(headers: &[u8]) -> Option<usize> {
        let text = String::from_utf8_lossy(headers);
        for line in text.split("\r\n") {
            if let Some(colon) = line.find(':') {
                let name = line[..colon].trim();
                if name.eq_ignore_ascii_case("Content-Length") {
                    return line[colon + 1..].trim().parse().ok();
                }
            }
        }
        None
    }

    /// Respuesta de GET /status
    fn status_response(repository: &JobRepository) -> Response {
        let body = json!({
            "status": "running",
            "server": "JobBoard-HTTP/1.0",
            "version": "0.1.0",
            "jobs": repository.count(),
        });

        match serde_json::to_string_pretty(&body) {
            Ok(body) => Response::json(&body),
            Err(e) => Response::error(
                StatusCode::InternalServerError,
                &format!("Failed to encode status: {}", e),
            ),
        }
    }

    /// Respuesta de GET /metrics
    ///
    /// Combina las métricas del servidor con el tamaño actual de la
    /// colección de jobs.
    fn metrics_response(metrics: &MetricsCollector, repository: &JobRepository) -> Response {
        let mut combined: serde_json::Value =
            serde_json::from_str(&metrics.get_metrics_json()).unwrap_or_else(|_| json!({}));

        if let Some(object) = combined.as_object_mut() {
            object.insert("jobs".to_string(), json!({ "count": repository.count() }));
        }

        match serde_json::to_string_pretty(&combined) {
            Ok(body) => Response::json(&body),
            Err(e) => Response::error(
                StatusCode::InternalServerError,
                &format!("Failed to encode metrics: {}", e),
            ),
        }
    }
}
