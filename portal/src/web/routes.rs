// parish-portal/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{admin_handlers, checkout_handlers, registration_handlers};
use actix_web::{web, HttpResponse};

// Photos and transfer screenshots travel inline as data URLs.
const JSON_BODY_LIMIT: usize = 12 * 1024 * 1024;

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn json_config() -> web::JsonConfig {
  web::JsonConfig::default()
    .limit(JSON_BODY_LIMIT)
    .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .app_data(json_config())
      .app_data(query_config())
      .route("/health", web::get().to(health_check_handler))
      .route(
        "/registration/options",
        web::get().to(registration_handlers::registration_options_handler),
      )
      .service(
        web::scope("/registrations")
          .route("", web::post().to(registration_handlers::submit_registration_handler))
          .route("/validate", web::post().to(registration_handlers::validate_registration_handler)),
      )
      .route(
        "/checkout/sessions",
        web::post().to(checkout_handlers::create_checkout_session_handler),
      )
      .route("/stats", web::get().to(registration_handlers::stats_handler))
      .service(
        web::scope("/admin/members")
          .route("", web::get().to(admin_handlers::list_members_handler))
          .route("/{id}/printed", web::post().to(admin_handlers::mark_printed_handler))
          .route("/{id}/export", web::get().to(admin_handlers::export_member_handler))
          .route("/{id}/id-card", web::get().to(admin_handlers::id_card_handler)),
      ),
  );
}
