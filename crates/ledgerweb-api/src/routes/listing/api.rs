//! Monthly listing JSON and the delete action

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use ledgerweb_core::{EntryId, MonthlyListing};

use crate::form::FormFields;
use crate::{found, ApiError, ApiResult, AppState};

pub async fn api_entries(
    state: State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Json<MonthlyListing>> {
    Ok(Json(state.ledger.list_month(year, month).await?))
}

/// Delete one entry, then return to the month it was listed under
pub async fn do_delete(state: State<AppState>, body: String) -> ApiResult<Response> {
    let form = FormFields::parse(&body);
    let id: EntryId = required(&form, "id")?;
    let year: i32 = required(&form, "year")?;
    let month: u32 = required(&form, "month")?;

    state.ledger.delete(id, year, month).await?;
    log::info!("Deleted entry {} from {}-{:02}", id, year, month);
    Ok(found(&format!("/user/list?year={}&month={}", year, month)))
}

fn required<T: std::str::FromStr>(form: &FormFields, name: &str) -> ApiResult<T> {
    let text = form.first(name).unwrap_or("");
    text.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid {}: {:?}", name, text)))
}

#[cfg(test)]
mod tests {
    use crate::create_router;
    use crate::test_support::*;
    use axum::http::StatusCode;
    use ledgerweb_core::{EntryKind, RawRow, Submission};

    #[tokio::test]
    async fn test_delete_redirects_to_month() {
        let state = state();
        let inserted = match state
            .ledger
            .submit(EntryKind::Expense, &[RawRow::expense("2024-01-15", "food", "2000")])
            .await
            .unwrap()
        {
            Submission::Accepted { inserted } => inserted,
            other => panic!("expected acceptance, got {:?}", other),
        };

        let body = format!("id={}&year=2024&month=01", inserted[0]);
        let (status, location, _) = send(create_router(state.clone()), post_form("/user/dodelete", &body)).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location.as_deref(), Some("/user/list?year=2024&month=1"));
        assert!(state.ledger.list_month(2024, 1).await.unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn test_delete_rejects_bad_fields() {
        let (status, _, body) = send(create_router(state()), post_form("/user/dodelete", "id=x&year=2024&month=1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("invalid id"));

        let (status, _, _) = send(create_router(state()), post_form("/user/dodelete", "id=1&month=1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_entries_json() {
        let state = state();
        state
            .ledger
            .submit(EntryKind::Expense, &[RawRow::expense("2024-03-10", "rent", "80000")])
            .await
            .unwrap();

        let (status, _, body) = send(create_router(state.clone()), get("/api/entries/2024/3")).await;
        assert_eq!(status, StatusCode::OK);
        let listing: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(listing["month"], "03");
        assert_eq!(listing["entries"][0]["day_of_week"], "(日)");
        assert_eq!(listing["entries"][0]["price"], "80000");

        let (status, _, _) = send(create_router(state), get("/api/entries/2024/march")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
