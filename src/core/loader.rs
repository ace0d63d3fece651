use crate::domain::model::{Catalog, WordEntry};
use crate::utils::error::{BingoError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Separates song and artist in a word-list line.
pub const ENTRY_DELIMITER: char = '-';

/// Reads and parses a word list. Missing files map to `SourceNotFound`.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BingoError::SourceNotFound {
                path: path.display().to_string(),
            }
        } else {
            BingoError::IoError(e)
        }
    })?;

    let catalog = parse_catalog(&content)?;
    tracing::debug!(
        "Loaded {} entries from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

/// Async wrapper used by the pipeline; file reading happens on the blocking pool.
pub async fn load_catalog_async(path: String) -> Result<Catalog> {
    tokio::task::spawn_blocking(move || load_catalog(&path))
        .await
        .map_err(|e| BingoError::TaskError(e.to_string()))?
}

/// Deduplicates raw lines (first occurrence wins), then parses each one.
/// The first malformed line aborts the whole catalog.
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    // 記事本存的檔案常帶 BOM
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if !seen.insert(line) {
            tracing::debug!("Skipping duplicate line {}: {:?}", index + 1, line);
            continue;
        }
        entries.push(parse_entry(index + 1, line)?);
    }

    Ok(Catalog::new(entries))
}

/// Parses `SongTitle-ArtistName` into `WordEntry { artist, song }`.
///
/// Empty segments are dropped before counting, so `"Song--Artist"` is valid.
/// Segments past the second are ignored.
pub fn parse_entry(line_number: usize, line: &str) -> Result<WordEntry> {
    let parts: Vec<&str> = line
        .split(ENTRY_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    match parts.as_slice() {
        [song, artist, rest @ ..] => {
            if !rest.is_empty() {
                tracing::warn!(
                    "Line {} has {} extra '{}' segments, ignoring {:?}",
                    line_number,
                    rest.len(),
                    ENTRY_DELIMITER,
                    rest
                );
            }
            Ok(WordEntry::new(*artist, *song))
        }
        _ => Err(BingoError::MalformedEntry {
            line: line_number,
            content: line.to_string(),
        }),
    }
}
