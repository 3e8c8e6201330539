//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Este módulo implementa la recolección y agregación de métricas del servidor:
//! - Contadores de requests (total, por status, por ruta)
//! - Latencias (p50, p95, p99)
//! - Threads activos

pub mod collector;

pub use collector::MetricsCollector;
