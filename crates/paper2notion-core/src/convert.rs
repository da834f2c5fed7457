//! Dropbox Paper to Notion line conversion
//!
//! A single forward pass over the raw source lines. Each line is classified
//! and handled by the first matching rule:
//!
//! 1. Paper checkboxes (`[x] task`) become list checkboxes (`- [x]  task`).
//! 2. Quote lines are separated from surrounding non-quote text by blank lines.
//! 3. With the line-break trick enabled, a marker line is inserted before
//!    blank lines that sit between two content lines, so Notion keeps them.
//! 4. Everything else passes through unchanged.
//!
//! Neighbor lookups always read the raw input, never the lines produced so far.

use crate::line::{
    LineKind, PaperCheckbox, is_blank_or_whitespace, is_quote, leading_whitespace_len,
};
use log::debug;

/// Marker glyph written on an otherwise blank line (U+2423 OPEN BOX, `␣`)
///
/// Notion collapses runs of blank lines on import; a line holding only this
/// character survives and keeps the vertical spacing of the Paper document.
pub const LINE_BREAK_MARKER: char = '\u{2423}';

/// Options for the line conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Insert [`LINE_BREAK_MARKER`] lines before blank lines between content
    pub line_break_trick: bool,
}

/// Counters collected during a conversion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Number of source lines
    pub input_lines: usize,
    /// Paper checkboxes rewritten as list checkboxes
    pub checkboxes_converted: usize,
    /// Blank lines inserted before or after quote lines
    pub quote_padding_inserted: usize,
    /// Marker lines inserted before blank lines
    pub markers_inserted: usize,
}

impl ConversionStats {
    /// Lines added on top of the source lines
    pub fn inserted_lines(&self) -> usize {
        self.quote_padding_inserted + self.markers_inserted
    }

    /// Accumulate the counters of another pass
    pub fn merge(&mut self, other: &ConversionStats) {
        self.input_lines += other.input_lines;
        self.checkboxes_converted += other.checkboxes_converted;
        self.quote_padding_inserted += other.quote_padding_inserted;
        self.markers_inserted += other.markers_inserted;
    }
}

/// Result of a conversion pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    /// Output lines, without terminators
    pub lines: Vec<String>,
    pub stats: ConversionStats,
}

impl Conversion {
    /// Join the output lines, terminating every line with `\n`
    pub fn to_text(&self) -> String {
        let capacity = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut text = String::with_capacity(capacity);
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// Convert Paper lines to Notion lines
pub fn transform<S: AsRef<str>>(lines: &[S], options: &ConvertOptions) -> Vec<String> {
    transform_with_stats(lines, options).lines
}

/// Convert Paper lines to Notion lines, reporting what was changed
pub fn transform_with_stats<S: AsRef<str>>(
    lines: &[S],
    options: &ConvertOptions,
) -> Conversion {
    Converter::new(lines, options).run()
}

/// Convert a whole Paper document
///
/// Both `\n` and `\r\n` terminators are accepted; every output line is
/// terminated with `\n`.
pub fn convert_text(text: &str, options: &ConvertOptions) -> String {
    let lines: Vec<&str> = text.lines().collect();
    transform_with_stats(&lines, options).to_text()
}

/// Converter state
struct Converter<'a, S> {
    lines: &'a [S],
    options: &'a ConvertOptions,
    output: Vec<String>,
    stats: ConversionStats,
}

impl<'a, S: AsRef<str>> Converter<'a, S> {
    fn new(lines: &'a [S], options: &'a ConvertOptions) -> Self {
        Self {
            lines,
            options,
            output: Vec::with_capacity(lines.len()),
            stats: ConversionStats {
                input_lines: lines.len(),
                ..Default::default()
            },
        }
    }

    fn run(mut self) -> Conversion {
        for index in 0..self.lines.len() {
            self.convert_line(index);
        }

        Conversion {
            lines: self.output,
            stats: self.stats,
        }
    }

    fn line(&self, index: usize) -> &'a str {
        let lines: &'a [S] = self.lines;
        lines[index].as_ref()
    }

    fn previous(&self, index: usize) -> Option<&'a str> {
        index.checked_sub(1).map(|i| self.line(i))
    }

    fn next(&self, index: usize) -> Option<&'a str> {
        (index + 1 < self.lines.len()).then(|| self.line(index + 1))
    }

    fn convert_line(&mut self, index: usize) {
        let line = self.line(index);

        match LineKind::of(line) {
            LineKind::PaperCheckbox => {
                if let Some(checkbox) = PaperCheckbox::parse(line) {
                    debug!("line {}: converted checkbox", index + 1);
                    self.stats.checkboxes_converted += 1;
                    self.output.push(checkbox.to_list_item());
                    return;
                }
            }
            LineKind::Quote => {
                self.convert_quote(index);
                return;
            }
            LineKind::Blank if self.options.line_break_trick => self.mark_blank_line(index),
            _ => {}
        }

        self.output.push(line.to_string());
    }

    /// Emit a quote line, padded with blank lines where it touches plain text
    fn convert_quote(&mut self, index: usize) {
        let need_empty_before = self.previous(index).is_some_and(needs_quote_separation);
        let need_empty_after = self.next(index).is_some_and(needs_quote_separation);

        if need_empty_before {
            self.push_padding(index, "before");
        }

        let line = self.line(index);
        self.output.push(line.to_string());

        if need_empty_after {
            self.push_padding(index, "after");
        }
    }

    fn push_padding(&mut self, index: usize, side: &str) {
        debug!("line {}: blank line inserted {} quote", index + 1, side);
        self.stats.quote_padding_inserted += 1;
        self.output.push(String::new());
    }

    /// Insert a marker line ahead of a blank line, if its neighbors call for it
    ///
    /// Blank lines at the start or end of the document never get a marker.
    fn mark_blank_line(&mut self, index: usize) {
        let (Some(prev), Some(next)) = (self.previous(index), self.next(index)) else {
            return;
        };

        let indent = leading_whitespace_len(prev).max(leading_whitespace_len(next));
        let mut need_marker = true;

        // A quote already gets its own padding
        if is_quote(prev) || is_quote(next) {
            need_marker = false;
        }

        if is_separator(prev) && is_separator(next) {
            need_marker = false;
        }

        if need_marker {
            debug!("line {}: marker inserted with indent {}", index + 1, indent);
            self.stats.markers_inserted += 1;
            self.output.push(format!("{}{}", " ".repeat(indent), LINE_BREAK_MARKER));
        }
    }
}

/// A neighbor that is neither blank nor a quote must be split from a quote
fn needs_quote_separation(neighbor: &str) -> bool {
    !is_blank_or_whitespace(neighbor) && !is_quote(neighbor)
}

fn is_separator(line: &str) -> bool {
    is_blank_or_whitespace(line) || is_quote(line)
}
