//! Form submissions and the payer registry endpoint
//!
//! - do_income / do_expense: validate a posted form and store it
//! - api_payers: registry as JSON

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledgerweb_core::{EntryKind, PayerCode, Submission};
use serde::Serialize;

use crate::form::FormFields;
use crate::{found, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct PayerResponse {
    pub code: PayerCode,
    pub name: String,
    pub summary_eligible: bool,
}

pub async fn do_income(state: State<AppState>, body: String) -> ApiResult<Response> {
    submit(&state, EntryKind::Income, &body).await
}

pub async fn do_expense(state: State<AppState>, body: String) -> ApiResult<Response> {
    submit(&state, EntryKind::Expense, &body).await
}

async fn submit(state: &AppState, kind: EntryKind, body: &str) -> ApiResult<Response> {
    let rows = FormFields::parse(body).rows(kind);
    match state.ledger.submit(kind, &rows).await? {
        Submission::Accepted { inserted } => {
            log::info!("Stored {} {} entries", inserted.len(), kind);
            Ok(found(super::page::form_path(kind)))
        }
        Submission::Rejected(form) => Ok(super::page::render_input_page(state, &form).into_response()),
    }
}

pub async fn api_payers(state: State<AppState>) -> Json<Vec<PayerResponse>> {
    let payers = state
        .ledger
        .payers()
        .iter()
        .map(|(code, payer)| PayerResponse {
            code,
            name: payer.name.clone(),
            summary_eligible: payer.summary_eligible,
        })
        .collect();
    Json(payers)
}
