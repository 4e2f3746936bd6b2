#[tokio::main]
async fn main() {
    if let Err(e) = catalog_api::start_server().await {
        tracing::error!("Server stopped: {}", e);
        eprintln!("catalog_api: {}", e);
        std::process::exit(1);
    }
}
