//! File and directory conversion
//!
//! Reads Paper exports from disk, runs the line conversion and writes the
//! Notion-friendly result into an output directory. Output files are always
//! written with `\n` line terminators.

use crate::convert::{ConversionStats, ConvertOptions, transform_with_stats};
use log::info;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while converting files
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Input directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Input path has no valid file name: {0}")]
    InvalidFileName(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to read directory {path}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Result type for file operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// A converted file
#[derive(Debug, Clone)]
pub struct FileConversion {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: ConversionStats,
}

/// Result of a directory conversion
#[derive(Debug, Default)]
pub struct DirectoryConversion {
    /// Successfully converted files, in input order
    pub converted: Vec<FileConversion>,
    /// Files that failed to convert, with their errors
    pub failed: Vec<(PathBuf, ConvertError)>,
    /// Counters summed over all converted files
    pub stats: ConversionStats,
}

/// Derive the output file name from an input path
///
/// Paper exports use underscores where the note title had spaces, so every
/// `_` in the file name becomes a space. Only the file name is changed.
pub fn output_file_name(input: &Path) -> Result<String> {
    input
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.replace('_', " "))
        .ok_or_else(|| ConvertError::InvalidFileName(input.to_path_buf()))
}

/// Convert a single Paper export into `output_dir`
///
/// The output directory is created if it does not exist.
pub fn convert_file(
    input: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<FileConversion> {
    if !input.is_file() {
        return Err(ConvertError::InputNotFound(input.to_path_buf()));
    }

    let output = output_dir.join(output_file_name(input)?);

    let content = fs::read_to_string(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let lines: Vec<&str> = content.lines().collect();
    let conversion = transform_with_stats(&lines, options);

    fs::create_dir_all(output_dir).map_err(|source| ConvertError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    fs::write(&output, conversion.to_text()).map_err(|source| ConvertError::Write {
        path: output.clone(),
        source,
    })?;

    let stats = conversion.stats;
    info!(
        "{} -> {}: {} lines, {} checkboxes, {} quote paddings, {} markers",
        input.display(),
        output.display(),
        stats.input_lines,
        stats.checkboxes_converted,
        stats.quote_padding_inserted,
        stats.markers_inserted
    );

    Ok(FileConversion {
        input: input.to_path_buf(),
        output,
        stats,
    })
}

/// Convert every Markdown file of a directory into `output_dir`
///
/// Files are converted in parallel. Subdirectories (with `recursive`) are
/// mirrored under `output_dir`; only file names get the underscore rename.
/// A failing file does not stop the others.
pub fn convert_directory(
    input_dir: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
    recursive: bool,
) -> Result<DirectoryConversion> {
    if !input_dir.is_dir() {
        return Err(ConvertError::DirectoryNotFound(input_dir.to_path_buf()));
    }

    let files = collect_markdown_files(input_dir, recursive)?;

    fs::create_dir_all(output_dir).map_err(|source| ConvertError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let results: Vec<_> = files
        .par_iter()
        .map(|file| {
            let target_dir = match file.strip_prefix(input_dir).ok().and_then(Path::parent) {
                Some(relative) => output_dir.join(relative),
                None => output_dir.to_path_buf(),
            };
            convert_file(file, &target_dir, options).map_err(|e| (file.clone(), e))
        })
        .collect();

    let mut conversion = DirectoryConversion::default();
    for result in results {
        match result {
            Ok(file) => {
                conversion.stats.merge(&file.stats);
                conversion.converted.push(file);
            }
            Err(failure) => conversion.failed.push(failure),
        }
    }

    Ok(conversion)
}

/// Collect all `.md` files in a directory, sorted by path
pub fn collect_markdown_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_into(dir, recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_into(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    let read_dir_error = |source: io::Error| ConvertError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();

        if path.is_file() {
            if let Some(ext) = path.extension()
                && ext.eq_ignore_ascii_case("md")
            {
                files.push(path);
            }
        } else if path.is_dir() && recursive {
            collect_into(&path, recursive, files)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name(Path::new("My_Notes_Export.md")).unwrap(),
            "My Notes Export.md"
        );
        assert_eq!(
            output_file_name(Path::new("/some_dir/a__b.md")).unwrap(),
            "a  b.md"
        );
        assert_eq!(output_file_name(Path::new("plain.md")).unwrap(), "plain.md");
    }

    #[test]
    fn test_output_file_name_without_name() {
        let err = output_file_name(Path::new("/")).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidFileName(_)));
    }

    #[test]
    fn test_convert_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Weekly_Plan.md");
        fs::write(&input, "# Plan\r\n[ ] write\r\n[x] read\r\nnote\r\n> quote\r\n").unwrap();

        let output_dir = dir.path().join("out").join("nested");
        let result = convert_file(&input, &output_dir, &ConvertOptions::default()).unwrap();

        assert_eq!(result.output, output_dir.join("Weekly Plan.md"));
        assert_eq!(result.stats.checkboxes_converted, 2);
        assert_eq!(result.stats.quote_padding_inserted, 1);

        let written = fs::read_to_string(&result.output).unwrap();
        assert_eq!(
            written,
            "# Plan\n- [ ]  write\n- [x]  read\nnote\n\n> quote\n"
        );
    }

    #[test]
    fn test_convert_file_missing_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("missing.md");
        let output_dir = dir.path().join("out");

        let err = convert_file(&input, &output_dir, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound(ref p) if p == &input));
        assert!(err.to_string().starts_with("Input file not found: "));
        // Nothing is created when the input is missing
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_convert_file_rejects_directory_input() {
        let dir = tempdir().unwrap();
        let err = convert_file(dir.path(), dir.path(), &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound(_)));
    }

    #[test]
    fn test_collect_markdown_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::write(dir.path().join("a.MD"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.md"), "").unwrap();

        let files = collect_markdown_files(dir.path(), false).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.MD"), dir.path().join("b.md")]
        );

        let files = collect_markdown_files(dir.path(), true).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.contains(&dir.path().join("sub").join("c.md")));
    }

    #[test]
    fn test_convert_directory() {
        let dir = tempdir().unwrap();
        let input_dir = dir.path().join("export");
        fs::create_dir_all(input_dir.join("Team_Notes")).unwrap();
        fs::write(input_dir.join("Daily_Log.md"), "[x] standup\n").unwrap();
        fs::write(
            input_dir.join("Team_Notes").join("Retro_2024.md"),
            "a\n\nb\n",
        )
        .unwrap();

        let output_dir = dir.path().join("notion");
        let options = ConvertOptions {
            line_break_trick: true,
        };
        let result = convert_directory(&input_dir, &output_dir, &options, true).unwrap();

        assert!(result.failed.is_empty());
        assert_eq!(result.converted.len(), 2);
        assert_eq!(result.stats.checkboxes_converted, 1);
        assert_eq!(result.stats.markers_inserted, 1);

        assert_eq!(
            fs::read_to_string(output_dir.join("Daily Log.md")).unwrap(),
            "- [x]  standup\n"
        );
        assert_eq!(
            fs::read_to_string(output_dir.join("Team_Notes").join("Retro 2024.md")).unwrap(),
            "a\n\u{2423}\n\nb\n"
        );
    }

    #[test]
    fn test_convert_directory_not_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("x.md"), "x\n").unwrap();

        let output_dir = dir.path().join("out");
        let result =
            convert_directory(dir.path(), &output_dir, &ConvertOptions::default(), false).unwrap();

        assert!(result.converted.is_empty());
        assert!(result.failed.is_empty());
    }

    #[test]
    fn test_convert_directory_missing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = convert_directory(&missing, dir.path(), &ConvertOptions::default(), false)
            .unwrap_err();
        assert!(matches!(err, ConvertError::DirectoryNotFound(_)));
    }
}
