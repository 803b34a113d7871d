//! HTML rendering for block sequences.
//!
//! Output is a fragment styled with the site's utility classes. Text
//! and attribute values are escaped with `html-escape`.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::HeadingLevel;

use super::{
    DividerSpacing, ParagraphMargin, RenderedBlock, RenderedDocument, RenderedRow, RenderedRun,
};

/// Convert a rendered document to an HTML fragment.
pub fn to_html(doc: &RenderedDocument) -> String {
    let mut output = String::new();
    for block in doc {
        write_block(&mut output, block);
    }
    output
}

/// Write one rendered unit as HTML.
pub fn write_block(output: &mut String, block: &RenderedBlock) {
    match block {
        RenderedBlock::LineBreak { .. } => output.push_str("<br />\n"),
        RenderedBlock::Paragraph { margin, runs, .. } => {
            let class = match margin {
                ParagraphMargin::Tight => "mb-2",
                ParagraphMargin::Standard => "mb-3",
            };
            output.push_str(&format!("<div class=\"{}\">", class));
            write_runs(output, runs);
            output.push_str("</div>\n");
        }
        RenderedBlock::Heading {
            level,
            top_margin,
            runs,
            ..
        } => {
            let tag = level.to_string();
            let mut class = heading_class(*level).to_string();
            if *top_margin > 0 {
                class.push_str(&format!(" mt-{}", top_margin));
            }
            output.push_str(&format!("<{} class=\"{}\">", tag, class));
            write_runs(output, runs);
            output.push_str(&format!("</{}>\n", tag));
        }
        RenderedBlock::NumberedItem { number, runs, .. } => {
            output.push_str(&format!("<div class=\"mb-2 ml-4\">{}. ", number));
            write_runs(output, runs);
            output.push_str("</div>\n");
        }
        RenderedBlock::BulletedItem { bullet, runs, .. } => {
            output.push_str("<div class=\"flex ml-4\"><span class=\"mr-2\">");
            output.push_str(&encode_text(&bullet.to_string()));
            output.push_str("</span><div>");
            write_runs(output, runs);
            output.push_str("</div></div>\n");
        }
        RenderedBlock::Divider { spacing, .. } => {
            output.push_str(&format!(
                "<div class=\"flex justify-center {}\"><hr class=\"border-t border-gray-300 w-3/4\" /></div>\n",
                divider_class(*spacing)
            ));
        }
        RenderedBlock::Table {
            rows,
            scrollable,
            max_height,
            ..
        } => write_table(output, rows, *scrollable, *max_height),
    }
}

fn heading_class(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "text-4xl font-bold mb-4",
        HeadingLevel::H2 => "text-3xl font-semibold mb-3",
        HeadingLevel::H3 => "text-2xl font-medium mb-2",
        HeadingLevel::H4 => "text-xl font-medium mb-2",
    }
}

fn divider_class(spacing: DividerSpacing) -> &'static str {
    match spacing {
        DividerSpacing::News => "my-48",
        DividerSpacing::Section => "my-6",
        DividerSpacing::Default => "my-8",
    }
}

fn write_table(output: &mut String, rows: &[RenderedRow], scrollable: bool, max_height: Option<f32>) {
    output.push_str("<div class=\"mt-4\">");
    if scrollable {
        output.push_str("<div class=\"overflow-y-auto no-scrollbar\"");
        if let Some(height) = max_height {
            output.push_str(&format!(" style=\"max-height: {}px\"", height));
        }
        output.push('>');
    } else {
        output.push_str("<div class=\"no-scrollbar\">");
    }

    output.push_str("<table class=\"w-full\"><tbody>\n");
    for row in rows {
        output.push_str("<tr class=\"border-b border-gray-700\">");
        for cell in &row.cells {
            if cell.is_label {
                output.push_str("<td class=\"py-4 w-24 text-gray-500 dark:text-white\">");
            } else {
                output.push_str("<td class=\"py-4\">");
            }
            write_runs(output, &cell.runs);
            output.push_str("</td>");
        }
        output.push_str("</tr>\n");
    }
    output.push_str("</tbody></table></div></div>\n");
}

fn write_runs(output: &mut String, runs: &[RenderedRun]) {
    for run in runs {
        write_run(output, run);
    }
}

/// Write one run as an anchor (links) or span.
pub fn write_run(output: &mut String, run: &RenderedRun) {
    let mut classes: Vec<&str> = Vec::new();
    if run.style.bold {
        classes.push("font-semibold");
    }
    if run.style.italic {
        classes.push("italic");
    }
    if run.style.underline {
        classes.push("underline");
    }
    if run.style.strikethrough {
        classes.push("line-through");
    }
    if run.style.code {
        classes.push("font-mono");
    }

    let text = encode_text(&run.text);

    match &run.link {
        Some(link) => {
            if !classes.contains(&"underline") {
                classes.push("underline");
            }
            classes.push("cursor-pointer");
            output.push_str(&format!(
                "<a aria-label=\"{}\" class=\"{}\" href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>",
                encode_double_quoted_attribute(&link.aria_label),
                classes.join(" "),
                encode_double_quoted_attribute(&link.href),
                text
            ));
        }
        None if classes.is_empty() => {
            output.push_str(&format!("<span>{}</span>", text));
        }
        None => {
            output.push_str(&format!("<span class=\"{}\">{}</span>", classes.join(" "), text));
        }
    }
}
