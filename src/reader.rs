use crate::error::{AnalyzerError, Result};
use std::path::Path;

/// Load the whole log into memory, one `String` per line.
///
/// Both `\n` and `\r\n` terminators are accepted. A file that is not UTF-8
/// is rejected rather than decoded lossily.
pub fn try_read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|source| AnalyzerError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let text = String::from_utf8(bytes).map_err(|_| AnalyzerError::Encoding {
        path: path.to_path_buf(),
    })?;

    Ok(text.lines().map(str::to_owned).collect())
}

/// Like [`try_read_lines`], but a missing or unreadable file is logged and
/// treated as an empty log so the rest of the report still gets produced.
pub fn read_lines(path: &Path) -> Vec<String> {
    match try_read_lines(path) {
        Ok(lines) => {
            log::debug!("read {} line(s) from '{}'", lines.len(), path.display());
            lines
        }
        Err(e) => {
            log::error!("{}", e);
            Vec::new()
        }
    }
}
