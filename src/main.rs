use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocab_weaver::{config, db, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vocab_weaver=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = match db::init_db(&db_path) {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!("Failed to initialize database at {}: {}", db_path.display(), e);
      std::process::exit(1);
    }
  };
  tracing::info!("Using database {}", db_path.display());

  let state = AppState::new(pool, config::load_backup_key());
  let app = vocab_weaver::app(state);

  let bind_addr = config::server_bind_addr();
  let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
    Ok(listener) => listener,
    Err(e) => {
      tracing::error!("Failed to bind to {}: {}", bind_addr, e);
      std::process::exit(1);
    }
  };

  tracing::info!("Server running on http://localhost:{}", config::server_port());

  if let Err(e) = axum::serve(listener, app).await {
    tracing::error!("Server error: {}", e);
  }
}
