//! HTML rendering of parsed content blocks.
//!
//! Text is always escaped; links open in a new browsing context without
//! leaking the referrer or handing the opener to the target page.

use std::fmt::Write;

use crate::content::{ContentBlock, Segment};

const LINK_ATTRIBUTES: &str = r#"target="_blank" rel="noopener noreferrer""#;

/// Renders blocks as an HTML fragment, one element per block.
pub fn render_html(blocks: &[ContentBlock]) -> String {
    let mut html = String::new();
    for block in blocks {
        render_block(&mut html, block);
        html.push('\n');
    }
    html
}

fn render_block(out: &mut String, block: &ContentBlock) {
    match block {
        ContentBlock::Paragraph {
            text,
        } => {
            let _ = write!(out, r#"<p class="content-paragraph">{}</p>"#, escape_html(text));
        },
        ContentBlock::OrderedItem {
            index,
            text,
        } => {
            let _ = write!(
                out,
                r#"<div class="content-ordered"><span class="content-marker">{}. </span><span>{}</span></div>"#,
                escape_html(index),
                escape_html(text)
            );
        },
        ContentBlock::BulletItem {
            text,
        } => {
            let _ = write!(
                out,
                r#"<div class="content-bullet"><span class="content-marker">•</span><span>{}</span></div>"#,
                escape_html(text)
            );
        },
        ContentBlock::LinkRun {
            segments,
        } => {
            out.push_str(r#"<div class="content-links">"#);
            for segment in segments {
                match segment {
                    Segment::Text {
                        text,
                    } => {
                        let _ = write!(out, "<span>{}</span>", escape_html(text));
                    },
                    Segment::Link {
                        url,
                    } => {
                        let escaped = escape_html(url);
                        let _ = write!(out, r#"<a href="{escaped}" {LINK_ATTRIBUTES}>{escaped}</a>"#);
                    },
                }
            }
            out.push_str("</div>");
        },
        ContentBlock::Blank => out.push_str("<br>"),
    }
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
