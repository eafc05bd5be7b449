use product_service::{AppState, Config, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    shared::logger::init_logger();

    tracing::info!("📦 Product service starting...");

    let config = Config::from_env();
    let state = AppState::initialize(&config)?;
    let app = routes::build_app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!("Product service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
