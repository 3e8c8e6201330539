//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta y agrega métricas del servidor en tiempo real.

use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
struct MetricsData {
    /// Contador total de requests
    total_requests: u64,

    /// Requests por código de estado
    status_codes: HashMap<u16, u64>,

    /// Requests por ruta
    requests_per_path: HashMap<String, u64>,

    /// Latencias registradas (en microsegundos)
    latencies: Vec<u64>,

    /// Máximo de latencias a guardar (para calcular percentiles)
    max_latencies: usize,

    /// Threads activos actualmente
    active_threads: u64,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                total_requests: 0,
                status_codes: HashMap::new(),
                requests_per_path: HashMap::new(),
                latencies: Vec::with_capacity(10000),
                max_latencies: 10000, // Guardar últimas 10k latencias
                active_threads: 0,
            })),
            start_time: Instant::now(),
        }
    }

    /// Registra un nuevo request
    pub fn record_request(&self, path: &str, status_code: u16, latency: Duration) {
        let mut data = self.inner.lock().unwrap();

        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;
        *data.requests_per_path.entry(path.to_string()).or_insert(0) += 1;

        // Registrar latencia (en microsegundos); si la ventana está
        // llena, descartar la más antigua
        let latency_us = latency.as_micros() as u64;
        if data.latencies.len() >= data.max_latencies {
            data.latencies.remove(0);
        }
        data.latencies.push(latency_us);
    }

    /// Incrementa el contador de threads activos
    pub fn increment_active_threads(&self) {
        let mut data = self.inner.lock().unwrap();
        data.active_threads += 1;
    }

    /// Decrementa el contador de threads activos
    pub fn decrement_active_threads(&self) {
        let mut data = self.inner.lock().unwrap();
        if data.active_threads > 0 {
            data.active_threads -= 1;
        }
    }

    /// Obtiene el número de threads activos
    pub fn active_threads(&self) -> u64 {
        let data = self.inner.lock().unwrap();
        data.active_threads
    }

    /// Obtiene las métricas actuales como JSON pretty-printed
    pub fn get_metrics_json(&self) -> String {
        let data = self.inner.lock().unwrap();

        let (p50, p95, p99, avg) = Self::calculate_percentiles(&data.latencies);

        // Las claves JSON deben ser strings
        let status_codes: HashMap<String, u64> = data.status_codes.iter()
            .map(|(code, count)| (code.to_string(), *count))
            .collect();

        let metrics = json!({
            "server": {
                "uptime_seconds": self.start_time.elapsed().as_secs(),
            },
            "requests": {
                "total": data.total_requests,
                "active_threads": data.active_threads,
                "status_codes": status_codes,
                "per_path": data.requests_per_path,
            },
            "latency_us": {
                "p50": p50,
                "p95": p95,
                "p99": p99,
                "avg": avg,
                "samples": data.latencies.len(),
            },
        });

        serde_json::to_string_pretty(&metrics)
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Obtiene un snapshot de las métricas
    pub fn get_snapshot(&self) -> MetricsSnapshot {
        let data = self.inner.lock().unwrap();
        let (p50, p95, p99, avg) = Self::calculate_percentiles(&data.latencies);

        MetricsSnapshot {
            total_requests: data.total_requests,
            active_threads: data.active_threads,
            uptime_secs: self.start_time.elapsed().as_secs(),
            latency_p50_us: p50,
            latency_p95_us: p95,
            latency_p99_us: p99,
            latency_avg_us: avg,
        }
    }

    /// Calcula percentiles de latencia
    fn calculate_percentiles(latencies: &[u64]) -> (u64, u64, u64, u64) {
        if latencies.is_empty() {
            return (0, 0, 0, 0);
        }

        let mut sorted = latencies.to_vec();
        sorted.sort_unstable();

        let len = sorted.len();
        let p50 = sorted[len * 50 / 100];
        let p95 = sorted[(len * 95 / 100).min(len - 1)];
        let p99 = sorted[(len * 99 / 100).min(len - 1)];

        let sum: u64 = sorted.iter().sum();
        let avg = sum / len as u64;

        (p50, p95, p99, avg)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub active_threads: u64,
    pub uptime_secs: u64,
    pub latency_p50_us: u64,
    pub latency_p95_us: u64,
    pub latency_avg_us: u64,
    pub latency_p99_us: u64,
}
