use log::info;
use notekeeper_core::db::open_db;
use notekeeper_core::{core_version, init_logging};
use notekeeper_web::config::ServerConfig;
use notekeeper_web::{create_router, AppData, AppSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, &config.log_dir)?;

    let conn = open_db(&config.db_path)?;
    let settings = AppSettings {
        password_cost: config.password_cost,
        max_body_bytes: config.max_body_bytes,
    };
    let app = create_router(AppData::new(conn, settings).into_state());

    info!(
        "event=server_start module=web status=ok version={} bind={} db_path={}",
        core_version(),
        config.bind,
        config.db_path.display()
    );
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
