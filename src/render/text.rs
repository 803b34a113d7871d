//! Plain text rendering for block sequences.

use super::{DividerSpacing, ParagraphMargin, RenderedBlock, RenderedDocument, RenderedRow, RenderedRun};

const RULE_WIDTH: usize = 40;

/// Convert a rendered document to plain text.
///
/// Tables that would scroll show their visible rows followed by a
/// `... N more rows` line.
pub fn to_text(doc: &RenderedDocument) -> String {
    let mut output = String::new();
    let mut prev: Option<&RenderedBlock> = None;

    for block in doc {
        if let Some(prev) = prev {
            if needs_blank_line(prev, block) {
                output.push('\n');
            }
        }
        write_block(&mut output, block);
        prev = Some(block);
    }

    output.trim().to_string()
}

fn needs_blank_line(prev: &RenderedBlock, next: &RenderedBlock) -> bool {
    use RenderedBlock::*;
    match (prev, next) {
        (LineBreak { .. }, _) | (_, LineBreak { .. }) => false,
        (Paragraph { margin: ParagraphMargin::Tight, .. }, _) => false,
        (NumberedItem { .. } | BulletedItem { .. }, NumberedItem { .. } | BulletedItem { .. }) => false,
        _ => true,
    }
}

fn write_block(output: &mut String, block: &RenderedBlock) {
    match block {
        RenderedBlock::LineBreak { .. } => output.push('\n'),
        RenderedBlock::Paragraph { runs, .. } => {
            output.push_str(&runs_text(runs));
            output.push('\n');
        }
        RenderedBlock::Heading { level, runs, .. } => {
            let text = runs_text(runs);
            output.push_str(&text);
            output.push('\n');
            let underline = match level.number() {
                1 => Some('='),
                2 => Some('-'),
                _ => None,
            };
            if let Some(c) = underline {
                output.push_str(&c.to_string().repeat(text.chars().count().max(1)));
                output.push('\n');
            }
        }
        RenderedBlock::NumberedItem { .. } | RenderedBlock::BulletedItem { .. } => {
            output.push_str("  ");
            output.push_str(&block.marker().unwrap_or_default());
            output.push_str(&runs_text(block.runs()));
            output.push('\n');
        }
        RenderedBlock::Divider { spacing, .. } => {
            let padding = if *spacing == DividerSpacing::News { "\n" } else { "" };
            output.push_str(padding);
            output.push_str(&"-".repeat(RULE_WIDTH));
            output.push('\n');
            output.push_str(padding);
        }
        RenderedBlock::Table {
            rows,
            visible_rows,
            scrollable,
            ..
        } => write_table(output, rows, *visible_rows, *scrollable),
    }
}

fn write_table(output: &mut String, rows: &[RenderedRow], visible_rows: usize, scrollable: bool) {
    let shown = if scrollable {
        &rows[..visible_rows.min(rows.len())]
    } else {
        rows
    };

    let label_width = shown
        .iter()
        .filter_map(|row| row.cells.first())
        .map(|cell| runs_text(&cell.runs).chars().count())
        .max()
        .unwrap_or(0);

    for row in shown {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| {
                let text = runs_text(&cell.runs);
                if cell.is_label {
                    format!("{:<width$}", text, width = label_width)
                } else {
                    text
                }
            })
            .collect();
        output.push_str(cells.join(" | ").trim_end());
        output.push('\n');
    }

    let hidden = rows.len() - shown.len();
    if hidden > 0 {
        output.push_str(&format!("... {} more rows\n", hidden));
    }
}

fn runs_text(runs: &[RenderedRun]) -> String {
    let mut text = String::new();
    for run in runs {
        text.push_str(&run.text);
        if let Some(link) = &run.link {
            if link.href != run.text && !run.text.is_empty() {
                text.push_str(&format!(" <{}>", link.href));
            }
        }
    }
    text
}
