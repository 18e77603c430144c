//! Record sources and chunk sinks backed by JSON Lines files.
//!
//! Input tables are loaded completely before any chunking starts, so an
//! unreadable file or malformed row aborts the run with `AppError::Input`
//! and no partial output.

use narrative_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::preprocess::RawComplaint;
use crate::types::{Chunk, SourceRecord};

const TABLE_EXTENSION: &str = "jsonl";

/// Read processed source records from a file or directory.
pub fn read_records(path: &Path) -> AppResult<Vec<SourceRecord>> {
    read_jsonl(path)
}

/// Read raw complaint rows from a file or directory.
pub fn read_raw_complaints(path: &Path) -> AppResult<Vec<RawComplaint>> {
    read_jsonl(path)
}

/// Read a chunk table written by `write_jsonl`.
pub fn read_chunks(path: &Path) -> AppResult<Vec<Chunk>> {
    read_jsonl(path)
}

/// Read every row of a JSON Lines table. Blank lines are ignored.
///
/// A directory is walked for `*.jsonl` files, read in path order.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let files = table_files(path)?;
    let mut rows = Vec::new();

    for file in &files {
        let content = fs::read_to_string(file)
            .map_err(|e| AppError::Input(format!("Failed to read {:?}: {}", file, e)))?;

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = serde_json::from_str(line).map_err(|e| {
                AppError::Input(format!("{}:{}: {}", file.display(), line_no + 1, e))
            })?;
            rows.push(row);
        }
    }

    tracing::info!("Loaded {} rows from {} file(s) at {:?}", rows.len(), files.len(), path);
    Ok(rows)
}

/// Write rows as JSON Lines, creating parent directories as needed.
///
/// Returns the number of rows written.
pub fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(fs::File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::info!("Saved {} rows to {:?}", rows.len(), path);
    Ok(rows.len())
}

fn table_files(path: &Path) -> AppResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        return Err(AppError::Input(format!("Input not found: {:?}", path)));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
        let entry =
            entry.map_err(|e| AppError::Input(format!("Failed to walk {:?}: {}", path, e)))?;
        let entry_path = entry.path();
        if entry_path.is_file()
            && entry_path.extension().and_then(|ext| ext.to_str()) == Some(TABLE_EXTENSION)
        {
            files.push(entry_path.to_path_buf());
        }
    }

    if files.is_empty() {
        return Err(AppError::Input(format!(
            "No .{} files found under {:?}",
            TABLE_EXTENSION, path
        )));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_records_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.jsonl");
        fs::write(
            &path,
            "{\"id\": 1, \"category\": \"BNPL\", \"narrative\": \"charged twice\"}\n\n{\"complaint_id\": \"2\", \"product\": \"BNPL\", \"narrative\": null}\n",
        )
        .unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[1].narrative, None);
    }

    #[test]
    fn test_read_directory_in_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.jsonl"), "{\"id\": \"b\", \"narrative\": \"second\"}\n").unwrap();
        fs::write(temp.path().join("a.jsonl"), "{\"id\": \"a\", \"narrative\": \"first\"}\n").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let records = read_records(temp.path()).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_row_is_input_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.jsonl");
        fs::write(&path, "{\"id\": \"1\", \"narrative\": \"ok\"}\n{not json}\n").unwrap();

        let err = read_records(&path).unwrap_err();
        assert!(matches!(err, AppError::Input(_)));
        assert!(err.to_string().contains(":2:"));
    }

    #[test]
    fn test_missing_input_is_input_error() {
        let temp = TempDir::new().unwrap();
        let result = read_records(&temp.path().join("absent.jsonl"));
        assert!(matches!(result, Err(AppError::Input(_))));
    }

    #[test]
    fn test_write_and_read_chunks() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out").join("chunks.jsonl");
        let chunks = vec![
            Chunk::new("first part".into(), "9", "BNPL", 0, 0),
            Chunk::new("second part".into(), "9", "BNPL", 1, 448),
        ];

        assert_eq!(write_jsonl(&path, &chunks).unwrap(), 2);
        assert_eq!(read_chunks(&path).unwrap(), chunks);
    }
}
