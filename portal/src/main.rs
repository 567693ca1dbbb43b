// parish-portal/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use parish_portal::{web::configure_app_routes, AppConfig, AppState};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let json = std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();
  init_tracing();
  tracing::info!("Starting parish portal server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);

  let app_state = match AppState::from_config(app_config).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to open the member store.");
      panic!("Storage error: {}", e);
    }
  };

  tracing::info!("Binding server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
