//! paper2notion-core: Core library for converting Dropbox Paper Markdown to Notion
//!
//! This crate provides:
//! - Line classification (Paper checkboxes, list checkboxes, quotes, blank lines)
//! - The line-oriented rewriting pass producing Notion-friendly Markdown
//! - File and directory conversion helpers
//!
//! ## Example
//!
//! ```rust
//! use paper2notion_core::{ConvertOptions, convert_text};
//!
//! let md = convert_text("[x] buy milk\n", &ConvertOptions::default());
//! assert_eq!(md, "- [x]  buy milk\n");
//! ```

pub mod convert;
pub mod file;
pub mod line;

pub use convert::{
    Conversion, ConversionStats, ConvertOptions, LINE_BREAK_MARKER, convert_text, transform,
    transform_with_stats,
};
pub use file::{
    ConvertError, DirectoryConversion, FileConversion, Result, collect_markdown_files,
    convert_directory, convert_file, output_file_name,
};
pub use line::{LineKind, PaperCheckbox};
