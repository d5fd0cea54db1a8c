#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cpm_schedule::{ServiceConfig, http_api, logging};

    logging::init_logging(None)?;
    let config = ServiceConfig::from_env()?;
    http_api::serve(config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
