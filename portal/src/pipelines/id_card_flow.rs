// parish-portal/src/pipelines/id_card_flow.rs

use crate::errors::AppError;
use crate::pipelines::contexts::IdCardCtxData;
use crate::services::id_card;
use crate::state::AppState;
use chrono::NaiveDate;
use parish_flow::{Flow, FlowCtx, FlowOutcome, FlowRegistry, StepControl, StepDef};
use tracing::info;

pub const FLOW_NAME: &str = "id_card";

pub fn register_id_card_flow(registry: &FlowRegistry<AppError>, _app_state: &AppState) {
  registry.register(build_id_card_flow());
  info!("ID card flow registered.");
}

pub fn build_id_card_flow() -> Flow<IdCardCtxData, AppError> {
  let mut flow = Flow::new(
    FLOW_NAME,
    vec![
      StepDef::required("load_member_record"),
      StepDef::required("render_id_card"),
      StepDef::required("mark_printed").skip_when(|ctx: FlowCtx<IdCardCtxData>| !ctx.snapshot(|c| c.mark_printed)),
    ],
  );

  flow.on("load_member_record", |ctx: FlowCtx<IdCardCtxData>| async move {
    let (store, member_id) = ctx.snapshot(|c| (c.app_state.store.clone(), c.member_id.clone()));
    let record = store
      .get(&member_id)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;
    ctx.write().record = Some(record);
    Ok::<_, AppError>(StepControl::Continue)
  });

  flow.on("render_id_card", |ctx: FlowCtx<IdCardCtxData>| async move {
    {
      let mut guard = ctx.write();
      let record = guard
        .record
        .as_ref()
        .ok_or_else(|| AppError::Internal("member record not loaded".to_string()))?;
      let html = id_card::render(record, &guard.app_state.config.organization_name, guard.issued_on);
      guard.html = Some(html);
    }
    Ok::<_, AppError>(StepControl::Continue)
  });

  flow.on("mark_printed", |ctx: FlowCtx<IdCardCtxData>| async move {
    let (store, member_id) = ctx.snapshot(|c| (c.app_state.store.clone(), c.member_id.clone()));
    let updated = store
      .mark_printed(&member_id)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;
    info!(member_id = %updated.id, "ID card printed.");
    ctx.write().record = Some(updated);
    Ok::<_, AppError>(StepControl::Continue)
  });

  flow
}

/// Renders the card for `member_id`, marking it printed when asked.
#[tracing::instrument(name = "id_card::run", skip(app_state))]
pub async fn run_id_card(
  app_state: &AppState,
  member_id: &str,
  mark_printed: bool,
  issued_on: NaiveDate,
) -> Result<String, AppError> {
  let ctx = FlowCtx::new(IdCardCtxData::new(app_state.clone(), member_id, mark_printed, issued_on));
  match app_state.flows.run(ctx.clone()).await? {
    FlowOutcome::Completed => ctx
      .snapshot(|c| c.html.clone())
      .ok_or_else(|| AppError::Internal("ID card flow completed without output".to_string())),
    FlowOutcome::Halted => Err(AppError::FlowHalted),
  }
}
