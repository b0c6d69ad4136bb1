//! Line-oriented content parser.
//!
//! Article bodies are plain text written by hand. Every input line maps to
//! exactly one [`ContentBlock`]; nothing is merged, reordered or dropped, so
//! the block sequence reproduces the author's vertical layout. Each line is
//! classified on its own by an ordered rule table where the first match wins:
//!
//! 1. whitespace-only lines become [`ContentBlock::Blank`];
//! 2. `<digits>.` followed by a tab and text becomes an ordered item;
//! 3. `•` followed by a tab and text becomes a bullet item;
//! 4. lines containing `http://` or `https://` URLs become link runs;
//! 5. anything else is a paragraph.
//!
//! List markers must be followed by a literal tab character. Lines using a
//! space after the marker are not list items.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const URL_PATTERN: &str = r"https?://\S+";
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| Regex::new(URL_PATTERN).unwrap())
}

const BULLET_MARKER: char = '•';

/// One renderable unit derived from a single input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text line.
    Paragraph {
        /// Line text, unmodified.
        text: String,
    },
    /// Numbered list entry such as `3.<TAB>Pack the order`.
    OrderedItem {
        /// Literal digit run from the source line, never renumbered.
        index: String,
        /// Text after the tab separator.
        text: String,
    },
    /// Bullet list entry such as `•<TAB>Check inventory`.
    BulletItem {
        /// Text after the tab separator.
        text: String,
    },
    /// Line mixing plain text with one or more URLs.
    LinkRun {
        /// Text and link pieces in source order.
        segments: Vec<Segment>,
    },
    /// Empty or whitespace-only line.
    Blank,
}

/// A piece of a [`ContentBlock::LinkRun`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Inert text between links; never empty.
    Text {
        /// Exact source characters.
        text: String,
    },
    /// Autolinked URL.
    Link {
        /// URL as written, used for both target and label.
        url: String,
    },
}

/// A named line classifier. Rules are tried in table order.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Short identifier, used in tests and diagnostics.
    pub name: &'static str,
    /// Returns a block when the line matches this rule.
    pub classify: fn(&str) -> Option<ContentBlock>,
}

/// Classification precedence. List rules sit above the URL rule so a list
/// item containing a link stays a list item.
pub const RULES: &[Rule] = &[
    Rule {
        name: "blank",
        classify: classify_blank,
    },
    Rule {
        name: "ordered_item",
        classify: classify_ordered_item,
    },
    Rule {
        name: "bullet_item",
        classify: classify_bullet_item,
    },
    Rule {
        name: "link_run",
        classify: classify_link_run,
    },
];

/// Parses a raw article body into one block per line.
///
/// Lines are split on `\n`; a trailing `\r` on a line is ignored so CRLF
/// text parses the same as LF text. The empty string is a single blank line.
pub fn parse(text: &str) -> Vec<ContentBlock> {
    text.split('\n')
        .map(|line| classify_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Classifies a single line, falling back to a paragraph.
pub fn classify_line(line: &str) -> ContentBlock {
    RULES
        .iter()
        .find_map(|rule| (rule.classify)(line))
        .unwrap_or_else(|| ContentBlock::Paragraph {
            text: line.to_string(),
        })
}

fn classify_blank(line: &str) -> Option<ContentBlock> {
    line.chars().all(is_blank_char).then_some(ContentBlock::Blank)
}

/// Whitespace as browsers trim it: Unicode white space plus the byte order
/// mark, but not NEL (U+0085).
fn is_blank_char(ch: char) -> bool {
    ch == '\u{FEFF}' || (ch.is_whitespace() && ch != '\u{85}')
}

fn classify_ordered_item(line: &str) -> Option<ContentBlock> {
    let digits_end = line
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(line.len());
    if digits_end == 0 {
        return None;
    }
    let (index, remainder) = line.split_at(digits_end);
    let text = remainder.strip_prefix(".\t")?;
    if text.is_empty() {
        return None;
    }
    Some(ContentBlock::OrderedItem {
        index: index.to_string(),
        text: text.to_string(),
    })
}

fn classify_bullet_item(line: &str) -> Option<ContentBlock> {
    let text = line.strip_prefix(BULLET_MARKER)?.strip_prefix('\t')?;
    if text.is_empty() {
        return None;
    }
    Some(ContentBlock::BulletItem {
        text: text.to_string(),
    })
}

fn classify_link_run(line: &str) -> Option<ContentBlock> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for found in url_regex().find_iter(line) {
        if found.start() > cursor {
            segments.push(Segment::Text {
                text: line[cursor..found.start()].to_string(),
            });
        }
        segments.push(Segment::Link {
            url: found.as_str().to_string(),
        });
        cursor = found.end();
    }

    if segments.is_empty() {
        return None;
    }
    if cursor < line.len() {
        segments.push(Segment::Text {
            text: line[cursor..].to_string(),
        });
    }

    Some(ContentBlock::LinkRun {
        segments,
    })
}
