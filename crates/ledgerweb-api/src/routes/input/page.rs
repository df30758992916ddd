//! Input form rendering

use axum::extract::State;
use axum::response::Html;
use ledgerweb_core::{EntryKind, InputForm, InputLine, PayerChoice};
use ledgerweb_utils::escape_html;

use crate::{page_response, AppState};

pub async fn page_income(state: State<AppState>) -> Html<String> {
    let form = state.ledger.blank_form(EntryKind::Income);
    render_input_page(&state, &form)
}

pub async fn page_expense(state: State<AppState>) -> Html<String> {
    let form = state.ledger.blank_form(EntryKind::Expense);
    render_input_page(&state, &form)
}

/// Path of the input page for `kind`
pub fn form_path(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Income => "/user/income",
        EntryKind::Expense => "/user/expense",
    }
}

fn submit_path(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Income => "/user/doincome",
        EntryKind::Expense => "/user/doexpense",
    }
}

pub fn render_input_page(state: &AppState, form: &InputForm) -> Html<String> {
    let title = match form.kind {
        EntryKind::Income => "収入入力",
        EntryKind::Expense => "支出入力",
    };
    page_response(state, title, form_path(form.kind), &render_input_form(title, form))
}

pub fn render_input_form(title: &str, form: &InputForm) -> String {
    let is_income = form.kind == EntryKind::Income;

    let mut html = format!(r#"<div class='mb-6'><h2 class='text-2xl font-bold'>{}</h2></div>"#, title);
    if form.has_any_error {
        html.push_str(r#"<div class='bg-red-50 border border-red-200 text-red-700 p-3 rounded-lg mb-4'>入力内容にエラーがあります。赤い行を確認してください。</div>"#);
    }

    html.push_str(&format!(
        r#"<form method='post' action='{}' class='bg-white rounded-xl shadow-sm p-6'><table class='w-full'><thead class='bg-gray-50'><tr><th class='px-2 py-2'>#</th><th class='px-2 py-2 text-left'>日付</th>"#,
        submit_path(form.kind)
    ));
    if is_income {
        html.push_str("<th class='px-2 py-2 text-left'>費目</th>");
    }
    html.push_str("<th class='px-2 py-2 text-left'>内容</th><th class='px-2 py-2 text-right'>金額</th></tr></thead><tbody>");

    for line in &form.lines {
        html.push_str(&render_line(line, is_income, &form.payer_list));
    }

    html.push_str(r#"</tbody></table><div class='mt-4 text-right'><button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg'>入力実行</button></div></form>"#);
    html
}

fn render_line(line: &InputLine, is_income: bool, payers: &[PayerChoice]) -> String {
    let row_class = if line.has_error { "bg-red-50" } else { "border-b" };
    let mut html = format!(
        r#"<tr class='{}' data-error="{}"><td class='px-2 py-1 text-gray-500'>{}</td><td class='px-2 py-1'><input type='text' name='Date[]' placeholder='YYYY-MM-DD' value="{}" class='border rounded px-2 py-1'></td>"#,
        row_class,
        line.has_error,
        line.number,
        escape_html(&line.date)
    );

    if is_income {
        html.push_str("<td class='px-2 py-1'><select name='Payer[]' class='border rounded px-2 py-1'>");
        for payer in payers {
            let selected = if payer.code == line.payer { " selected" } else { "" };
            html.push_str(&format!(
                r#"<option value="{}"{}>{}</option>"#,
                payer.code,
                selected,
                escape_html(&payer.name)
            ));
        }
        html.push_str("</select></td>");
    }

    html.push_str(&format!(
        r#"<td class='px-2 py-1'><input type='text' name='Detail[]' value="{}" class='border rounded px-2 py-1 w-full'></td><td class='px-2 py-1'><input type='text' name='Price[]' value="{}" class='border rounded px-2 py-1 text-right'></td></tr>"#,
        escape_html(&line.detail),
        escape_html(&line.price)
    ));
    html
}
