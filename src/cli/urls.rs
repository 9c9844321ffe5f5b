//! URL list import
//!
//! URLs arrive one per line from a text file, from manual entry, or from the
//! clipboard. Blank lines are ignored; there is no comment syntax.

use crate::cli::prompt::Prompt;
use crate::core::error::{OrganizerError, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Line that ends manual entry
pub const END_OF_INPUT: &str = "done";

/// Split text into URLs: one per line, trimmed, blank lines dropped
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a URL file
pub fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| OrganizerError::io_at("read", path, e))?;
    let urls = parse_url_list(&text);
    info!("Loaded {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}

/// Whether `line` looks like an http(s) URL
pub fn is_http_url(line: &str) -> bool {
    line.starts_with("http://") || line.starts_with("https://")
}

/// Collect URLs typed one per line until `done`
///
/// Lines that are not http(s) URLs are ignored.
pub fn read_manual_urls<P: Prompt + ?Sized>(prompt: &mut P) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    loop {
        let line = prompt.input("URL (or 'done')", None)?;
        let line = line.trim();
        if line.eq_ignore_ascii_case(END_OF_INPUT) {
            break;
        }
        if is_http_url(line) {
            urls.push(line.to_string());
        }
    }
    Ok(urls)
}

/// Read URLs from the system clipboard
pub fn read_clipboard_urls() -> Result<Vec<String>> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| OrganizerError::Clipboard(e.to_string()))?;
    let text = clipboard
        .get_text()
        .map_err(|e| OrganizerError::Clipboard(e.to_string()))?;
    Ok(parse_url_list(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::ScriptedPrompt;
    use tempfile::TempDir;

    #[test]
    fn test_parse_url_list_skips_blank_lines() {
        let text = "https://a.test/1.jpg\n\n   \n  https://a.test/2.jpg  \r\n# not a comment\n";
        assert_eq!(
            parse_url_list(text),
            vec!["https://a.test/1.jpg", "https://a.test/2.jpg", "# not a comment"]
        );
    }

    #[test]
    fn test_read_url_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "https://a.test/1.jpg\nhttps://a.test/2.jpg\n").unwrap();
        assert_eq!(read_url_file(&path).unwrap().len(), 2);
        assert!(read_url_file(&dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_manual_entry_keeps_only_http_urls() {
        let mut prompt = ScriptedPrompt::new([
            "https://a.test/1.jpg",
            "ftp://a.test/2.jpg",
            "",
            "http://a.test/3.jpg",
            "DONE",
        ]);
        let urls = read_manual_urls(&mut prompt).unwrap();
        assert_eq!(urls, vec!["https://a.test/1.jpg", "http://a.test/3.jpg"]);
        assert_eq!(prompt.remaining(), 0);
    }
}
