// parish-portal/src/pipelines/enrolment_flow.rs

//! validate -> allocate member id -> pay -> finalize -> notify admin.

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::member::MemberRecord;
use crate::models::payment::PaymentMethod;
use crate::models::success::SuccessView;
use crate::pipelines::contexts::{ActivePayment, EnrolmentCtxData, PaymentSubCtxData};
use crate::pipelines::factories::{bank_transfer_flow, hosted_checkout_flow_factory, ussd_flow};
use crate::services::member_id;
use crate::state::AppState;
use crate::validation::validate;
use chrono::Utc;
use parish_flow::{Flow, FlowCtx, FlowError, FlowOutcome, FlowRegistry, NoMatch, StepControl, StepDef};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const FLOW_NAME: &str = "enrolment";

pub fn register_enrolment_flow(registry: &FlowRegistry<AppError>, app_state: &AppState) {
  registry.register(build_enrolment_flow(&app_state.config));
  info!("Enrolment flow registered.");
}

pub fn build_enrolment_flow(config: &AppConfig) -> Flow<EnrolmentCtxData, AppError> {
  let mut flow = Flow::new(
    FLOW_NAME,
    vec![
      StepDef::required("validate_registration"),
      StepDef::required("allocate_member_id"),
      StepDef::required("prepare_payment"),
      StepDef::required("process_payment"),
      StepDef::required("finalize_member_record"),
      StepDef::optional("notify_admin"),
    ],
  );

  flow.on("validate_registration", validate_registration);
  flow.on("allocate_member_id", allocate_member_id);
  flow.on("prepare_payment", prepare_payment);

  flow
    .branch("process_payment")
    .arm_with("hosted_checkout", hosted_checkout_flow_factory, |ctx| {
      payment_sub_context(ctx, PaymentMethod::HostedCheckout)
    })
    .when(|ctx| chose(&ctx, PaymentMethod::HostedCheckout))
    .arm_static("bank_transfer", Arc::new(bank_transfer_flow(config.bank_transfer_delay)), |ctx| {
      payment_sub_context(ctx, PaymentMethod::BankTransfer)
    })
    .when(|ctx| chose(&ctx, PaymentMethod::BankTransfer))
    .arm_static("ussd", Arc::new(ussd_flow(config.ussd_delay)), |ctx| {
      payment_sub_context(ctx, PaymentMethod::Ussd)
    })
    .when(|ctx| chose(&ctx, PaymentMethod::Ussd))
    .otherwise(NoMatch::Fail)
    .finish(false);
  flow.after("process_payment", collect_receipt);

  flow.on("finalize_member_record", finalize_member_record);
  flow.on("notify_admin", notify_admin);
  flow
}

fn chose(ctx: &FlowCtx<EnrolmentCtxData>, method: PaymentMethod) -> bool {
  ctx.snapshot(|c| c.payment.method() == method)
}

fn payment_sub_context(
  ctx: FlowCtx<EnrolmentCtxData>,
  method: PaymentMethod,
) -> Result<FlowCtx<PaymentSubCtxData>, FlowError> {
  let sub = ctx.snapshot(|c| match (&c.payment_sub_context, method) {
    (ActivePayment::HostedCheckout(sub), PaymentMethod::HostedCheckout)
    | (ActivePayment::BankTransfer(sub), PaymentMethod::BankTransfer)
    | (ActivePayment::Ussd(sub), PaymentMethod::Ussd) => Some(sub.clone()),
    _ => None,
  });
  sub.ok_or_else(|| FlowError::Internal(format!("{} payment context was not prepared", method.label())))
}

async fn validate_registration(ctx: FlowCtx<EnrolmentCtxData>) -> Result<StepControl, AppError> {
  let checked = ctx.snapshot(|c| validate(&c.input, c.today));
  match checked {
    Ok(registration) => {
      ctx.write().registration = Some(registration);
      Ok(StepControl::Continue)
    }
    Err(errors) => {
      info!(invalid_fields = errors.len(), "Registration failed validation.");
      Err(AppError::Validation(errors))
    }
  }
}

/// Reuses the id carried in a relayed checkout reference when it is still
/// free, so the payment and the member record agree.
async fn allocate_member_id(ctx: FlowCtx<EnrolmentCtxData>) -> Result<StepControl, AppError> {
  let (store, prefix, relayed_tx_ref) = ctx.snapshot(|c| {
    (
      c.app_state.store.clone(),
      c.app_state.config.member_id_prefix.clone(),
      c.payment.relayed_outcome().map(|o| o.tx_ref.clone()),
    )
  });

  let reserved = relayed_tx_ref
    .as_deref()
    .and_then(|r| member_id::member_id_from_tx_ref(&prefix, r))
    .map(str::to_string);
  let reusable = match reserved {
    Some(id) => {
      if store.contains_member_id(&id).await? {
        warn!(%id, "Member id from the checkout session is already taken.");
        None
      } else {
        Some(id)
      }
    }
    None => None,
  };
  let id = match reusable {
    Some(id) => id,
    None => member_id::allocate(store.as_ref(), &prefix).await?,
  };

  debug!(member_id = %id, "Member id assigned to registration.");
  ctx.write().member_id = Some(id);
  Ok(StepControl::Continue)
}

async fn prepare_payment(ctx: FlowCtx<EnrolmentCtxData>) -> Result<StepControl, AppError> {
  let (config, checkout, member_id, registration, method, relayed_tx_ref) = ctx.snapshot(|c| {
    (
      c.app_state.config.clone(),
      c.checkout.clone(),
      c.member_id.clone(),
      c.registration.clone(),
      c.payment.method(),
      c.payment.relayed_outcome().map(|o| o.tx_ref.clone()),
    )
  });
  let (Some(member_id), Some(registration)) = (member_id, registration) else {
    return Err(AppError::Internal(
      "payment prepared before validation and id allocation".to_string(),
    ));
  };

  let sub = FlowCtx::new(PaymentSubCtxData::new(config, checkout, member_id, registration, relayed_tx_ref));
  let active = match method {
    PaymentMethod::HostedCheckout => ActivePayment::HostedCheckout(sub),
    PaymentMethod::BankTransfer => ActivePayment::BankTransfer(sub),
    PaymentMethod::Ussd => ActivePayment::Ussd(sub),
  };
  info!(payment_method = method.label(), "Payment path chosen.");
  ctx.write().payment_sub_context = active;
  Ok(StepControl::Continue)
}

async fn collect_receipt(ctx: FlowCtx<EnrolmentCtxData>) -> Result<StepControl, AppError> {
  let receipt = ctx.snapshot(|c| c.payment_sub_context.receipt());
  match receipt {
    Some(receipt) => {
      info!(payment_method = receipt.method.label(), reference = %receipt.reference, "Payment confirmed.");
      ctx.write().receipt = Some(receipt);
      Ok(StepControl::Continue)
    }
    None => {
      warn!("Payment sub-flow finished without a receipt; stopping before finalization.");
      Ok(StepControl::Halt)
    }
  }
}

async fn finalize_member_record(ctx: FlowCtx<EnrolmentCtxData>) -> Result<StepControl, AppError> {
  let (store, member_id, registration, receipt) = ctx.snapshot(|c| {
    (
      c.app_state.store.clone(),
      c.member_id.clone(),
      c.registration.clone(),
      c.receipt.clone(),
    )
  });
  let (Some(member_id), Some(registration), Some(receipt)) = (member_id, registration, receipt) else {
    return Err(AppError::Internal("finalize reached without a paid registration".to_string()));
  };

  let record = MemberRecord::new(member_id, &registration, receipt, Utc::now());
  store.finalize(&record).await?;
  info!(member_id = %record.id, payment_method = record.payment_method.label(), "Member record finalized.");

  ctx.write().record = Some(record);
  Ok(StepControl::Continue)
}

async fn notify_admin(ctx: FlowCtx<EnrolmentCtxData>) -> Result<StepControl, AppError> {
  let notice = ctx.snapshot(|c| c.record.as_ref().map(|r| (r.id.clone(), r.name.clone(), r.payment_method)));
  let Some((id, name, method)) = notice else {
    return Ok(StepControl::Continue);
  };
  info!(
    target: "admin_notifications",
    member_id = %id,
    %name,
    payment_method = method.label(),
    needs_id_card = true,
    "New member registered and awaiting an ID card."
  );
  ctx.write().admin_notified = true;
  Ok(StepControl::Continue)
}

/// Runs the enrolment flow and turns a finished run into the confirmation view.
#[tracing::instrument(name = "enrolment::run", skip_all)]
pub async fn run_enrolment(app_state: &AppState, ctx: FlowCtx<EnrolmentCtxData>) -> Result<SuccessView, AppError> {
  match app_state.flows.run(ctx.clone()).await? {
    FlowOutcome::Completed => {
      let record = ctx
        .snapshot(|c| c.record.clone())
        .ok_or_else(|| AppError::Internal("enrolment completed without a member record".to_string()))?;
      Ok(SuccessView::new(&record, &app_state.config.organization_name))
    }
    FlowOutcome::Halted => {
      warn!("Enrolment flow halted before a member record was created.");
      Err(AppError::FlowHalted)
    }
  }
}
