// src/table/html.rs

//! `<table>` element → [`RawTable`].
//!
//! Header rows come from `<thead>`, or failing that from the leading rows made
//! only of `<th>` cells. Body rows are every `<tbody>` row (plus bare `<tr>`
//! children), followed by `<tfoot>` rows. `colspan`/`rowspan` are expanded by
//! repeating the cell text, separately per section.

use scraper::{ElementRef, Node};
use std::collections::VecDeque;

use super::{Header, RawTable};
use crate::error::ParseError;

/// Largest span honoured; bigger values are clamped.
const MAX_SPAN: usize = 1000;

struct Cell {
    text: String,
    is_header: bool,
    colspan: usize,
    rowspan: usize,
}

type CellRow = Vec<Cell>;

/// Parse a `<table>` element into header and body grids.
pub fn parse_table(table: ElementRef<'_>) -> Result<RawTable, ParseError> {
    if table.value().name() != "table" {
        return Err(ParseError::NotATable);
    }

    let mut head = Vec::new();
    let mut body = Vec::new();
    let mut foot = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "thead" => head.extend(section_rows(child)),
            "tbody" => body.extend(section_rows(child)),
            "tfoot" => foot.extend(section_rows(child)),
            "tr" => body.push(read_row(child)),
            _ => {}
        }
    }

    if head.is_empty() {
        while body
            .first()
            .map_or(false, |r| !r.is_empty() && r.iter().all(|c| c.is_header))
        {
            head.push(body.remove(0));
        }
    }

    if head.is_empty() && body.is_empty() && foot.is_empty() {
        return Err(ParseError::NoRows);
    }

    let head = expand_spans(&head);
    let mut rows = expand_spans(&body);
    rows.extend(expand_spans(&foot));

    let width = head
        .iter()
        .chain(rows.iter())
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    for r in &mut rows {
        r.resize(width, String::new());
    }

    let header = match head.len() {
        0 => Header::Single((0..width).map(|i| i.to_string()).collect()),
        1 => {
            let mut names = head.into_iter().next().unwrap_or_default();
            names.resize(width, String::new());
            Header::Single(names)
        }
        _ => Header::Multi(
            (0..width)
                .map(|col| {
                    head.iter()
                        .map(|layer| layer.get(col).cloned().unwrap_or_default())
                        .collect()
                })
                .collect(),
        ),
    };

    Ok(RawTable { header, rows })
}

fn section_rows(section: ElementRef<'_>) -> Vec<CellRow> {
    section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
        .map(read_row)
        .collect()
}

fn read_row(tr: ElementRef<'_>) -> CellRow {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "th" | "td"))
        .map(|cell| Cell {
            text: cell_text(cell),
            is_header: cell.value().name() == "th",
            colspan: span(cell, "colspan"),
            rowspan: span(cell, "rowspan"),
        })
        .collect()
}

fn span(cell: ElementRef<'_>, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(MAX_SPAN))
}

/// Descendant text with whitespace runs collapsed. Text of nested tables and
/// comments is not part of the cell.
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut buf = String::new();
    collect_text(cell, &mut buf);
    buf.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(el: ElementRef<'_>, buf: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => buf.push_str(t),
            Node::Element(e) if e.name() == "table" => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, buf);
                }
            }
            _ => {}
        }
    }
}

/// Spread `colspan`/`rowspan` cells over the grid they cover.
fn expand_spans(rows: &[CellRow]) -> Vec<Vec<String>> {
    let mut out = Vec::with_capacity(rows.len());
    // (column index, text, rows still to cover)
    let mut remainder: VecDeque<(usize, String, usize)> = VecDeque::new();

    for row in rows {
        let mut texts = Vec::new();
        let mut next = VecDeque::new();
        let mut index = 0;

        for cell in row {
            while remainder.front().map_or(false, |(i, _, _)| *i <= index) {
                if let Some((i, text, left)) = remainder.pop_front() {
                    texts.push(text.clone());
                    if left > 1 {
                        next.push_back((i, text, left - 1));
                    }
                    index += 1;
                }
            }
            for _ in 0..cell.colspan {
                texts.push(cell.text.clone());
                if cell.rowspan > 1 {
                    next.push_back((index, cell.text.clone(), cell.rowspan - 1));
                }
                index += 1;
            }
        }
        for (i, text, left) in remainder.drain(..) {
            texts.push(text.clone());
            if left > 1 {
                next.push_back((i, text, left - 1));
            }
        }
        out.push(texts);
        remainder = next;
    }

    // rows that exist only because a rowspan ran past the last <tr>
    while !remainder.is_empty() {
        let mut texts = Vec::new();
        let mut next = VecDeque::new();
        for (i, text, left) in remainder.drain(..) {
            texts.push(text.clone());
            if left > 1 {
                next.push_back((i, text, left - 1));
            }
        }
        out.push(texts);
        remainder = next;
    }

    out
}
