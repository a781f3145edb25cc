use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let work_port = std::env::var("WORK_PORT").unwrap_or_else(|_| "8001".to_string());
    let comms_port = std::env::var("COMMS_PORT").unwrap_or_else(|_| "8002".to_string());
    let work_addr = format!("127.0.0.1:{work_port}");
    let comms_addr = format!("127.0.0.1:{comms_port}");

    let work = TcpListener::bind(&work_addr).await?;
    let comms = TcpListener::bind(&comms_addr).await?;
    info!("work service listening on http://{work_addr}{}", mock_server::API_PREFIX);
    info!("comms service listening on http://{comms_addr}{}", mock_server::API_PREFIX);

    tokio::try_join!(
        mock_server::run(work, mock_server::work_app()),
        mock_server::run(comms, mock_server::comms_app()),
    )?;
    Ok(())
}
