//! Line classification for Dropbox Paper exports
//!
//! Every source line is inspected on its own text only and falls into one of
//! the [`LineKind`] variants. The converter dispatches on this classification.
//!
//! ## Patterns
//!
//! | Kind | Shape | Example |
//! |------|-------|---------|
//! | `ListCheckbox` | `- [x] text` (optionally indented) | `    - [ ] todo` |
//! | `PaperCheckbox` | `[x] text` (optionally indented) | `  [X] done` |
//! | `Quote` | `> text` (optionally indented) | `>no space` |
//! | `Blank` | exactly empty | `` |
//! | `Plain` | anything else | `# Heading` |

use regex::Regex;
use std::sync::LazyLock;

/// Paper-style checkbox: indentation, checkbox state, task text
static PAPER_CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\[\s*([xX ])\s*\]\s+(.*)$").unwrap());

/// Notion-style list checkbox, already in the target form
static LIST_CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)-\s*\[\s*[xX ]\s*\]\s+.*$").unwrap());

/// Quote line, with optional indentation and optional space after `>`
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\s*)>\s?.*$").unwrap());

/// Classification of a single source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Already a list checkbox (`- [ ] task`), never rewritten
    ListCheckbox,
    /// Paper checkbox (`[ ] task`) that needs a list marker
    PaperCheckbox,
    /// Blockquote line
    Quote,
    /// Exactly empty line
    Blank,
    /// Any other line
    Plain,
}

impl LineKind {
    /// Classify a line (without its terminator)
    ///
    /// Checkbox shapes are tested before quotes, matching the order in which
    /// the converter applies its rules.
    pub fn of(line: &str) -> Self {
        if LIST_CHECKBOX.is_match(line) {
            LineKind::ListCheckbox
        } else if PAPER_CHECKBOX.is_match(line) {
            LineKind::PaperCheckbox
        } else if QUOTE.is_match(line) {
            LineKind::Quote
        } else if line.is_empty() {
            LineKind::Blank
        } else {
            LineKind::Plain
        }
    }
}

/// A Paper-style checkbox split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperCheckbox<'a> {
    /// Leading whitespace, kept verbatim
    pub indent: &'a str,
    /// Whether the box was ticked (`x` or `X`)
    pub checked: bool,
    /// Task text after the closing bracket and its whitespace
    pub text: &'a str,
}

impl<'a> PaperCheckbox<'a> {
    /// Match a Paper checkbox line
    ///
    /// Returns `None` for lines that are already list checkboxes, so a
    /// converted document is never converted twice.
    pub fn parse(line: &'a str) -> Option<Self> {
        if LIST_CHECKBOX.is_match(line) {
            return None;
        }

        let caps = PAPER_CHECKBOX.captures(line)?;
        let indent = caps.get(1).map_or("", |m| m.as_str());
        let checked = caps
            .get(2)
            .is_some_and(|m| m.as_str().eq_ignore_ascii_case("x"));
        let text = caps.get(3).map_or("", |m| m.as_str());

        Some(Self {
            indent,
            checked,
            text,
        })
    }

    /// Render as a Notion list checkbox (`- [x]  text`, two spaces after `]`)
    pub fn to_list_item(&self) -> String {
        let mark = if self.checked { 'x' } else { ' ' };
        format!("{}- [{}]  {}", self.indent, mark, self.text)
    }
}

/// Whether the line is a blockquote line
pub fn is_quote(line: &str) -> bool {
    QUOTE.is_match(line)
}

/// Whether the line has no content once surrounding whitespace is removed
pub fn is_blank_or_whitespace(line: &str) -> bool {
    line.trim().is_empty()
}

/// Number of leading whitespace characters
pub fn leading_whitespace_len(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
