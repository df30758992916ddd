//! Monthly listing page

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::Html;
use chrono::Datelike;
use ledgerweb_core::{EntryView, MonthlyListing};
use ledgerweb_utils::{escape_html, format_number};

use super::super::parse_param;
use crate::{page_response, ApiResult, AppState};

pub async fn page_list(
    state: State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Html<String>> {
    let today = state.ledger.clock().today();
    let year = parse_param(&params, "year")?.unwrap_or_else(|| today.year());
    let month = parse_param(&params, "month")?.unwrap_or_else(|| today.month());

    let listing = state.ledger.list_month(year, month).await?;
    let years = state.ledger.clock().year_list(state.ledger.start_year());
    Ok(page_response(&state, "一覧", "/user/list", &render_listing(&listing, &years)))
}

pub fn render_listing(listing: &MonthlyListing, years: &[i32]) -> String {
    let mut html = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>{}年{}月</h2></div>"#,
        listing.year, listing.month
    );
    html.push_str(&month_selector(listing, years));

    if listing.entries.is_empty() {
        html.push_str("<div class='bg-white rounded-xl shadow-sm p-6 text-gray-500'>この月の記録はありません</div>");
        return html;
    }

    html.push_str(r#"<div class='bg-white rounded-xl shadow-sm overflow-x-auto'><table class='w-full'><thead class='bg-gray-50'><tr><th class='px-4 py-2 text-left'>日付</th><th class='px-4 py-2 text-left'>区分</th><th class='px-4 py-2 text-left'>費目</th><th class='px-4 py-2 text-left'>内容</th><th class='px-4 py-2 text-right'>金額</th><th class='px-4 py-2'></th></tr></thead><tbody>"#);
    for entry in &listing.entries {
        html.push_str(&render_row(entry));
    }
    html.push_str("</tbody></table></div>");
    html
}

fn render_row(entry: &EntryView) -> String {
    let price = entry
        .price
        .parse::<i64>()
        .map(format_number)
        .unwrap_or_else(|_| entry.price.clone());
    let price_class = if entry.kind == ledgerweb_core::EntryKind::Income.label() {
        "text-green-600"
    } else {
        "text-red-600"
    };
    format!(
        r#"<tr class='border-b'><td class='px-4 py-2'>{}/{}/{}{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2 text-right font-medium {}'>{}</td><td class='px-4 py-2 text-right'><form method='post' action='/user/dodelete'><input type='hidden' name='id' value='{}'><input type='hidden' name='year' value='{}'><input type='hidden' name='month' value='{}'><button type='submit' class='text-sm text-gray-500 hover:text-red-600'>削除</button></form></td></tr>"#,
        entry.year,
        entry.month,
        entry.day,
        entry.day_of_week,
        entry.kind,
        escape_html(&entry.payer),
        escape_html(&entry.detail),
        price_class,
        price,
        entry.id,
        entry.year,
        entry.month
    )
}

fn month_selector(listing: &MonthlyListing, years: &[i32]) -> String {
    let mut html = String::from("<form method='get' action='/user/list' class='flex gap-2 mb-4'><select name='year' class='border rounded px-2 py-1'>");
    for year in years {
        let selected = if year.to_string() == listing.year { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{}"{}>{}年</option>"#, year, selected, year));
    }
    html.push_str("</select><select name='month' class='border rounded px-2 py-1'>");
    for month in 1..=12u32 {
        let value = ledgerweb_utils::pad2(month);
        let selected = if value == listing.month { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{}"{}>{}月</option>"#, month, selected, month));
    }
    html.push_str("</select><button type='submit' class='px-3 py-1 bg-indigo-600 text-white rounded-lg'>表示</button></form>");
    html
}
