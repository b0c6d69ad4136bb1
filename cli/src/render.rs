//! Terminal rendering of content blocks.

use blog_shared::{ContentBlock, Segment};

/// Plain-text rendering: one line per block.
///
/// Ordered items keep their number, bullets are indented, link runs print
/// URLs verbatim and blank blocks stay blank lines.
pub fn render_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Paragraph {
            text,
        } => text.clone(),
        ContentBlock::OrderedItem {
            index,
            text,
        } => format!("{index}. {text}"),
        ContentBlock::BulletItem {
            text,
        } => format!("  • {text}"),
        ContentBlock::LinkRun {
            segments,
        } => segments
            .iter()
            .map(|segment| match segment {
                Segment::Text {
                    text,
                } => text.as_str(),
                Segment::Link {
                    url,
                } => url.as_str(),
            })
            .collect(),
        ContentBlock::Blank => String::new(),
    }
}
