// Terminal and JSON rendering of book rows

use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use booklist_engine::table::{Row, COLUMN_TITLES, PAGES_COLUMN};

/// Cells wider than this are cut with "..".
const MAX_CELL_WIDTH: usize = 40;
const GAP: &str = "  ";

/// Aligned table with a row-number column. Pages are right-aligned.
pub fn render_table(rows: &[Row]) -> String {
    if rows.is_empty() {
        return "(no books)\n".to_string();
    }

    let index_width = display_width(&(rows.len() - 1).to_string()).max(1);
    let mut widths = COLUMN_TITLES.map(display_width);
    for row in rows {
        for (width, field) in widths.iter_mut().zip(row.fields()) {
            *width = (*width).max(display_width(field).min(MAX_CELL_WIDTH));
        }
    }

    let mut out = String::new();
    let header: Vec<&str> = COLUMN_TITLES.to_vec();
    push_line(&mut out, &pad_left("#", index_width), &header, &widths);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_refs: Vec<&str> = rule.iter().map(String::as_str).collect();
    push_line(&mut out, &"-".repeat(index_width), &rule_refs, &widths);

    for (i, row) in rows.iter().enumerate() {
        let fields: Vec<&str> = row.fields().iter().map(String::as_str).collect();
        push_line(&mut out, &pad_left(&i.to_string(), index_width), &fields, &widths);
    }
    out
}

fn push_line(out: &mut String, index: &str, cells: &[&str], widths: &[usize]) {
    let mut line = index.to_string();
    for (col, (cell, width)) in cells.iter().zip(widths).enumerate() {
        line.push_str(GAP);
        if col == PAGES_COLUMN {
            line.push_str(&pad_left(cell, *width));
        } else {
            line.push_str(&pad_right(cell, *width));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[derive(Serialize)]
struct BookRecord<'a> {
    row: usize,
    name: &'a str,
    author: &'a str,
    pages: &'a str,
}

/// Pretty JSON array of `{row, name, author, pages}` objects.
pub fn render_json(rows: &[Row]) -> Result<String, serde_json::Error> {
    let records: Vec<BookRecord> = rows
        .iter()
        .enumerate()
        .map(|(row, book)| BookRecord {
            row,
            name: book.name(),
            author: book.author(),
            pages: book.pages(),
        })
        .collect();
    serde_json::to_string_pretty(&records)
}

fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to `width` display columns, ending in ".." when something was dropped.
fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .next()
            .filter(|ch| ch.width().unwrap_or(0) <= width)
            .map(String::from)
            .unwrap_or_default();
    }

    let budget = width - 2;
    let mut used = 0;
    let mut kept = String::new();
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        kept.push(ch);
    }
    kept.push_str("..");
    kept
}

fn pad_right(s: &str, width: usize) -> String {
    let s = truncate_display(s, width);
    let fill = width.saturating_sub(display_width(&s));
    format!("{}{}", s, " ".repeat(fill))
}

fn pad_left(s: &str, width: usize) -> String {
    let s = truncate_display(s, width);
    let fill = width.saturating_sub(display_width(&s));
    format!("{}{}", " ".repeat(fill), s)
}
