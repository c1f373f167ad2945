#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use revision_tool::{RevisionPlan, http_api};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    FmtSubscriber::builder()
        .with_max_level(
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let addr: SocketAddr = std::env::var("REVISION_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    tracing::info!("revision-tool HTTP API listening on http://{addr}");
    let plan = RevisionPlan::new();
    http_api::serve(addr, plan).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
