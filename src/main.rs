//! # Job Board Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servicio de publicaciones de empleo.

use job_board::config::Config;
use job_board::server::Server;

fn main() {
    println!("=================================");
    println!("  Job Board HTTP/1.0 Server");
    println!("=================================\n");

    // Crear configuración desde CLI y variables de entorno
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Crear el servidor (carga la colección persistida)
    let mut server = match Server::new(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("💥 Error al inicializar: {}", e);
            std::process::exit(1);
        }
    };

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
