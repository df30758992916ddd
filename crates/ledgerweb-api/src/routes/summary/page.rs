//! Yearly summary page

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::Html;
use ledgerweb_core::YearlySummary;
use ledgerweb_utils::{escape_html, format_number};

use super::super::parse_param;
use crate::{page_response, ApiResult, AppState};

pub async fn page_summary(
    state: State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Html<String>> {
    let year = parse_param(&params, "year")?.unwrap_or_else(|| state.ledger.clock().current_year());
    let summary = state.ledger.summarize(year).await?;
    Ok(page_response(&state, "集計", "/user/summary", &render_summary(&summary)))
}

pub fn render_summary(summary: &YearlySummary) -> String {
    let balance_class = if summary.total_budget < 0 { "text-red-600" } else { "text-green-600" };
    let mut html = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>{}年 集計</h2></div>
        <div class='grid grid-cols-1 md:grid-cols-3 gap-4 mb-6'>
            <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>収入合計</p><p class='text-2xl font-bold text-green-700'>{}</p></div>
            <div class='bg-red-50 p-4 rounded-lg border border-red-200'><p class='text-sm text-red-600'>支出合計</p><p class='text-2xl font-bold text-red-700'>{}</p></div>
            <div class='bg-white p-4 rounded-lg border'><p class='text-sm text-gray-600'>収支</p><p class='text-2xl font-bold {}' id='total-budget'>{}</p></div>
        </div>"#,
        summary.year,
        format_number(summary.total_income),
        format_number(summary.total_expense),
        balance_class,
        format_number(summary.total_budget)
    );

    html.push_str("<form method='get' action='/user/summary' class='flex gap-2 mb-4'><select name='year' class='border rounded px-2 py-1'>");
    for year in &summary.year_list {
        let selected = if *year == summary.year { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{}"{}>{}年</option>"#, year, selected, year));
    }
    html.push_str("</select><button type='submit' class='px-3 py-1 bg-indigo-600 text-white rounded-lg'>表示</button></form>");

    html.push_str("<div class='bg-white rounded-xl shadow-sm overflow-x-auto'><table class='w-full text-sm'><thead class='bg-gray-50'><tr><th class='px-3 py-2 text-left'></th>");
    for month in 1..=12 {
        html.push_str(&format!("<th class='px-3 py-2 text-right'>{}月</th>", month));
    }
    html.push_str("<th class='px-3 py-2 text-right'>合計</th></tr></thead><tbody>");

    html.push_str(&month_row("収入", &summary.sum_of_month, "font-medium text-green-600"));
    html.push_str(&month_row("支出", &summary.expense_of_month, "font-medium text-red-600"));
    for payer in summary.payer_summary.values() {
        html.push_str(&month_row(&escape_html(&payer.name), &payer.months, "text-gray-700"));
    }
    html.push_str("</tbody></table></div>");
    html
}

fn month_row(label: &str, months: &[i64; 12], class: &str) -> String {
    let mut row = format!("<tr class='border-b'><td class='px-3 py-2 {}'>{}</td>", class, label);
    for value in months {
        row.push_str(&format!("<td class='px-3 py-2 text-right'>{}</td>", format_number(*value)));
    }
    row.push_str(&format!(
        "<td class='px-3 py-2 text-right font-bold'>{}</td></tr>",
        format_number(months.iter().sum())
    ));
    row
}

#[cfg(test)]
mod tests {
    use crate::create_router;
    use crate::test_support::*;
    use axum::http::StatusCode;
    use ledgerweb_core::{EntryKind, RawRow};

    #[tokio::test]
    async fn test_summary_page() {
        let state = state();
        state
            .ledger
            .submit(
                EntryKind::Income,
                &[
                    RawRow::income("2024-01-10", "1", "", "5000"),
                    RawRow::income("2024-02-10", "99", "", "1000"),
                ],
            )
            .await
            .unwrap();
        state
            .ledger
            .submit(EntryKind::Expense, &[RawRow::expense("2024-01-15", "", "9000")])
            .await
            .unwrap();

        let (status, _, html) = send(create_router(state), get("/user/summary")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("2024年 集計"));
        assert!(html.contains("id='total-budget'>-3,000</p>"));
        assert!(html.contains("text-red-600' id='total-budget'"));
        assert!(html.contains(">江添</td>"));
        assert!(!html.contains(">その他</td>"));
        assert!(html.contains("<option value=\"2017\">2017年</option>"));
    }

    #[tokio::test]
    async fn test_summary_for_past_year() {
        let (status, _, html) = send(create_router(state()), get("/user/summary?year=2019")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<option value=\"2019\" selected>2019年</option>"));
        assert!(html.contains("id='total-budget'>0</p>"));
    }
}
