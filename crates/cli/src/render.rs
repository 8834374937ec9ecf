//! Plain-text rendering of one page of a result table.

use tally_recon::export::render_value;
use tally_recon::model::{MatchedEntry, TransactionRecord};
use tally_recon::page::{Page, Paginator};
use tally_recon::{ReconResult, ResultTable};

use crate::util::{display_width, pad_right};

const MAX_COL_WIDTH: usize = 32;
const COL_GAP: &str = "  ";
/// Appended to a cell whose value disagrees with the other side.
const MISMATCH_MARK: &str = "*";

pub(crate) fn icon(table: ResultTable) -> &'static str {
    match table {
        ResultTable::Matched => "✔",
        ResultTable::OnlyInternal => "⚠",
        ResultTable::OnlyProvider => "✘",
    }
}

/// Title line, grid for the requested page, and a pager line when the table
/// spans more than one page, e.g. `page 2/3, rows 11-20 (prev 1, next 3)`.
pub(crate) fn render_table(
    table: ResultTable,
    result: &ReconResult,
    pager: &Paginator,
    page_number: usize,
) -> String {
    let (headers, rows, pager_text) = match table {
        ResultTable::Matched => {
            let page = pager.page(&result.matched, page_number);
            let headers = vec![
                "Transaction Reference",
                "Amount (Internal)",
                "Amount (Provider)",
                "Status (Internal)",
                "Status (Provider)",
            ];
            let rows: Vec<Vec<String>> = page.items.iter().map(matched_row).collect();
            (headers, rows, pager_line(&page))
        }
        ResultTable::OnlyInternal | ResultTable::OnlyProvider => {
            let items = if table == ResultTable::OnlyInternal {
                &result.only_internal
            } else {
                &result.only_provider
            };
            let page = pager.page(items, page_number);
            let headers = vec!["Transaction Reference", "Amount", "Status"];
            let rows: Vec<Vec<String>> = page.items.iter().map(record_row).collect();
            (headers, rows, pager_line(&page))
        }
    };

    let mut out = format!(
        "{} {} ({})\n",
        icon(table),
        table.title(),
        table.len(result)
    );
    out.push_str(&format_grid(&headers, &rows));

    if let Some(line) = pager_text {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn pager_line<T>(page: &Page<'_, T>) -> Option<String> {
    if !page.needs_controls() {
        return None;
    }
    let first = page.first_index + 1;
    let last = page.first_index + page.items.len();
    let mut line = if first == last {
        format!("page {}/{}, row {first}", page.number, page.total_pages)
    } else {
        format!("page {}/{}, rows {first}-{last}", page.number, page.total_pages)
    };

    let mut nav = Vec::new();
    if page.has_prev() {
        nav.push(format!("prev {}", page.prev_number()));
    }
    if page.has_next() {
        nav.push(format!("next {}", page.next_number()));
    }
    line.push_str(&format!(" ({})", nav.join(", ")));
    Some(line)
}

fn cell(value: Option<&serde_json::Value>) -> String {
    value.map(render_value).unwrap_or_default()
}

fn marked(value: String, agrees: bool) -> String {
    if agrees {
        value
    } else {
        format!("{value}{MISMATCH_MARK}")
    }
}

fn matched_row(entry: &MatchedEntry) -> Vec<String> {
    vec![
        entry.reference().to_string(),
        marked(cell(entry.internal.amount()), entry.is_amount_match),
        marked(cell(entry.provider_amount.as_ref()), entry.is_amount_match),
        marked(cell(entry.internal.status()), entry.is_status_match),
        marked(cell(entry.provider_status.as_ref()), entry.is_status_match),
    ]
}

fn record_row(record: &TransactionRecord) -> Vec<String> {
    vec![
        record.reference().to_string(),
        cell(record.amount()),
        cell(record.status()),
    ]
}

fn format_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (w, c) in widths.iter_mut().zip(row) {
            *w = (*w).max(display_width(c));
        }
    }
    for w in &mut widths {
        *w = (*w).min(MAX_COL_WIDTH);
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad_right(c, *w))
            .collect();
        format!("{}\n", padded.join(COL_GAP).trim_end())
    };

    let mut out = line(headers.to_vec());
    if rows.is_empty() {
        out.push_str("(none)\n");
    }
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}
