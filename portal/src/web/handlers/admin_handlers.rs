// parish-portal/src/web/handlers/admin_handlers.rs

use actix_web::{http::header, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::pipelines::id_card_flow::run_id_card;
use crate::services::admin::StatusFilter;
use crate::services::export;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MemberQuery {
  #[serde(default)]
  pub search: String,
  #[serde(default)]
  pub status: StatusFilter,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdCardQuery {
  #[serde(default)]
  pub mark_printed: bool,
}

#[instrument(name = "handler::list_members", skip(app_state))]
pub async fn list_members_handler(
  app_state: web::Data<AppState>,
  query: web::Query<MemberQuery>,
) -> Result<HttpResponse, AppError> {
  let dashboard = app_state.admin().dashboard(&query.search, query.status).await?;
  Ok(HttpResponse::Ok().json(dashboard))
}

#[instrument(name = "handler::mark_printed", skip(app_state))]
pub async fn mark_printed_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let record = app_state.admin().mark_printed(&path).await?;
  Ok(HttpResponse::Ok().json(record.summary()))
}

#[instrument(name = "handler::export_member", skip(app_state))]
pub async fn export_member_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let member_id = path.into_inner();
  let document = app_state.admin().export(&member_id).await?;
  Ok(
    HttpResponse::Ok()
      .insert_header((
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", export::filename(&member_id)),
      ))
      .json(document),
  )
}

#[instrument(name = "handler::id_card", skip(app_state))]
pub async fn id_card_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  query: web::Query<IdCardQuery>,
) -> Result<HttpResponse, AppError> {
  let html = run_id_card(&app_state, &path, query.mark_printed, Utc::now().date_naive()).await?;
  Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}
