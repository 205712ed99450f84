//! API server handlers

use crate::api::serve_api;
use crate::AppConfig;
use crate::Result;

pub async fn handle_serve_api(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    no_cors: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let cors = config.server.cors && !no_cors;

    println!("🚀 Starting recipe RAG API Server");
    println!("=================================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!("🌐 CORS: {}", if cors { "Enabled" } else { "Disabled" });
    println!("📚 Dataset: {}", config.dataset_tag());
    println!();

    serve_api(config, host, port, cors).await
}
