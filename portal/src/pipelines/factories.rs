// parish-portal/src/pipelines/factories.rs

//! Payment sub-flows, one per payment path.

use crate::errors::AppError;
use crate::models::payment::{PaymentMethod, PaymentReceipt};
use crate::pipelines::contexts::{EnrolmentCtxData, PaymentSubCtxData};
use crate::services::checkout::{self, PAYMENT_NOT_COMPLETED};
use crate::services::{member_id, payment_sim};
use chrono::Utc;
use parish_flow::{Flow, FlowCtx, FlowError, StepControl, StepDef};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Builds the hosted checkout sub-flow for one enrolment run.
///
/// Built per run so the steps see the configuration the parent context carries.
#[instrument(name = "factory::hosted_checkout", skip(main_ctx), fields(member_id = ?main_ctx.read().member_id))]
pub fn hosted_checkout_flow_factory(
  main_ctx: FlowCtx<EnrolmentCtxData>,
) -> impl Future<Output = Result<Arc<Flow<PaymentSubCtxData, AppError>>, FlowError>> + Send {
  let prefix = main_ctx.snapshot(|c| c.app_state.config.member_id_prefix.clone());

  async move {
    if prefix.is_empty() {
      return Err(FlowError::Configuration {
        step_name: "process_payment".to_string(),
        message: "member id prefix is empty".to_string(),
      });
    }

    let mut flow = Flow::<PaymentSubCtxData, AppError>::new(
      "hosted_checkout",
      vec![
        StepDef::required("open_checkout"),
        StepDef::required("await_callback"),
        StepDef::required("confirm_outcome"),
      ],
    );

    flow.on("open_checkout", move |sub: FlowCtx<PaymentSubCtxData>| {
      let prefix = prefix.clone();
      async move {
        {
          let mut guard = sub.write();
          let reuse = guard
            .relayed_tx_ref
            .as_deref()
            .filter(|r| member_id::member_id_from_tx_ref(&prefix, r) == Some(guard.member_id.as_str()))
            .map(str::to_string);
          let tx_ref = reuse.unwrap_or_else(|| member_id::tx_ref(&prefix, &guard.member_id, Utc::now()));
          let request = checkout::build_request(&guard.config, &guard.registration, tx_ref);
          info!(tx_ref = %request.tx_ref, amount = request.amount, currency = %request.currency, "Checkout opened.");
          guard.checkout_request = Some(request);
        }
        Ok::<_, AppError>(StepControl::Continue)
      }
    });

    flow.on("await_callback", |sub: FlowCtx<PaymentSubCtxData>| async move {
      let (port, request) = sub.snapshot(|s| (s.checkout.clone(), s.checkout_request.clone()));
      let request = request.ok_or_else(|| AppError::Internal("checkout request was not built".to_string()))?;
      let outcome = port.complete(&request).await?;
      sub.write().outcome = Some(outcome);
      Ok::<_, AppError>(StepControl::Continue)
    });

    flow.on("confirm_outcome", |sub: FlowCtx<PaymentSubCtxData>| async move {
      let outcome = sub.snapshot(|s| s.outcome.clone());
      match outcome {
        Some(outcome) if outcome.is_successful() => {
          let reference = outcome.payment_reference().to_string();
          info!(%reference, "Hosted checkout payment successful.");
          sub.write().receipt = Some(PaymentReceipt {
            method: PaymentMethod::HostedCheckout,
            reference,
          });
          Ok(StepControl::Continue)
        }
        other => {
          warn!(status = ?other.map(|o| o.status), "Hosted checkout did not succeed.");
          Err(AppError::Payment(PAYMENT_NOT_COMPLETED.to_string()))
        }
      }
    });

    Ok(Arc::new(flow))
  }
}

/// Manual bank transfer: needs proof of transfer, then a simulated wait.
pub fn bank_transfer_flow(delay: Duration) -> Flow<PaymentSubCtxData, AppError> {
  let mut flow = Flow::new(
    "bank_transfer",
    vec![StepDef::required("require_transfer_proof"), StepDef::required("confirm_transfer")],
  );

  flow.on("require_transfer_proof", |sub: FlowCtx<PaymentSubCtxData>| async move {
    let has_proof = sub.snapshot(|s| s.registration.payment_proof().is_some());
    if !has_proof {
      warn!("Bank transfer submitted without proof of payment.");
      return Err(AppError::Payment(payment_sim::MISSING_TRANSFER_PROOF.to_string()));
    }
    Ok(StepControl::Continue)
  });

  flow.on("confirm_transfer", move |sub: FlowCtx<PaymentSubCtxData>| async move {
    let receipt = payment_sim::confirm(PaymentMethod::BankTransfer, delay).await;
    sub.write().receipt = Some(receipt);
    Ok::<_, AppError>(StepControl::Continue)
  });

  flow
}

/// USSD: nothing to check, confirmed after a simulated wait.
pub fn ussd_flow(delay: Duration) -> Flow<PaymentSubCtxData, AppError> {
  let mut flow = Flow::new("ussd", vec![StepDef::required("confirm_ussd")]);

  flow.on("confirm_ussd", move |sub: FlowCtx<PaymentSubCtxData>| async move {
    let receipt = payment_sim::confirm(PaymentMethod::Ussd, delay).await;
    sub.write().receipt = Some(receipt);
    Ok::<_, AppError>(StepControl::Continue)
  });

  flow
}
