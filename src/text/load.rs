use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

pub const DEFAULT_TEXT_LABEL: &str = "Pride and Prejudice (bundled excerpt)";
pub const DEFAULT_TEXT: &str = include_str!("../../assets/pride-and-prejudice.txt");

pub fn read_text_file(path: &Path) -> Result<String> {
    if path.as_os_str().is_empty() {
        return Err(anyhow!("no file was selected"));
    }

    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8 text", path.display()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::text::tokenize::tokenize;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("word-bubbles-{}-{name}", std::process::id()))
    }

    #[test]
    fn reads_utf8_file() {
        let path = scratch_path("plain.txt");
        fs::write(&path, "Elizabeth and Jane").expect("write scratch file");

        let text = read_text_file(&path).expect("file loads");
        assert_eq!(text, "Elizabeth and Jane");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = scratch_path("does-not-exist.txt");
        let error = read_text_file(&path).expect_err("missing file fails");
        assert!(format!("{error:#}").contains("does-not-exist.txt"));
    }

    #[test]
    fn empty_selection_is_an_error() {
        assert!(read_text_file(Path::new("")).is_err());
    }

    #[test]
    fn rejects_binary_content() {
        let path = scratch_path("binary.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).expect("write scratch file");

        let error = read_text_file(&path).expect_err("invalid utf-8 fails");
        assert!(format!("{error:#}").contains("UTF-8"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn bundled_text_has_words() {
        assert!(tokenize(DEFAULT_TEXT).len() > 500);
    }
}
