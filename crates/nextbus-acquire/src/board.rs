use crate::error::AcquireError;
use crate::normalize;
use ego_tree::NodeRef;
use nextbus_model::{ArrivalEstimate, StopId};
use scraper::{ElementRef, Html, Node, Selector};
use std::ops::Deref;

/// Cells a row needs to be read as line / direction / time.
const MIN_CELLS: usize = 3;

/// A data row that was dropped because it had too few `<td>` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Row index within the table, counting the header as 0.
    pub row: usize,
    pub cells: usize,
}

/// Everything read from one stop board, in source row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBoard {
    pub estimates: Vec<ArrivalEstimate>,
    pub skipped: Vec<SkippedRow>,
}

/// Parse a PMV visor page into arrival estimates.
///
/// Reads the first `<table>` in the document, skips its first row (the
/// header) and takes the first three `<td>` cells of every other row as
/// line, direction and time. Rows with fewer cells are logged and
/// recorded in `skipped`; parsing carries on with the next row.
///
/// Returns `MissingTable` when the page has no table at all, which is what
/// the visor serves for unknown stops.
pub fn parse_board(html: &str, stop: StopId) -> Result<ParsedBoard, AcquireError> {
    let document = Html::parse_document(html);

    let table_sel = Selector::parse("table").expect("valid selector");
    let tr_sel = Selector::parse("tr").expect("valid selector");
    let td_sel = Selector::parse("td").expect("valid selector");

    let table = document
        .select(&table_sel)
        .next()
        .ok_or(AcquireError::MissingTable { stop })?;

    let mut board = ParsedBoard::default();

    for (index, tr) in table.select(&tr_sel).enumerate().skip(1) {
        let tds: Vec<ElementRef> = tr.select(&td_sel).collect();

        if tds.len() < MIN_CELLS {
            tracing::warn!(
                stop = %stop,
                row = index,
                cells = tds.len(),
                "Row has insufficient columns for stop {stop}"
            );
            board.skipped.push(SkippedRow {
                row: index,
                cells: tds.len(),
            });
            continue;
        }

        board.estimates.push(ArrivalEstimate::new(
            cell_text(tds[0]),
            cell_text(tds[1]),
            cell_text(tds[2]),
        ));
    }

    tracing::debug!(
        stop = %stop,
        estimates = board.estimates.len(),
        skipped = board.skipped.len(),
        "Parsed stop board"
    );

    Ok(board)
}

fn cell_text(td: ElementRef) -> String {
    let mut raw = String::new();
    collect_text(*td, &mut raw);
    normalize::clean_cell_text(&raw)
}

/// Concatenate every text node under `node`, in document order.
fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t.deref()),
            Node::Element(_) => collect_text(child, out),
            _ => {}
        }
    }
}
