//! Persist the best score to disk (XDG config or ~/.config/whackatui).

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const FILENAME: &str = "highscores";

/// Returns the path to the high scores file (config dir / whackatui / highscores).
pub fn config_path() -> PathBuf {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join("whackatui").join(FILENAME)
}

/// Best score stored at `path`; None when missing or unreadable.
pub fn load_best(path: &Path) -> Option<i64> {
    let content = fs::read_to_string(path).ok()?;
    content.lines().next()?.trim().parse().ok()
}

/// Save the best score. Creates the config directory if needed.
pub fn save_best(path: &Path, best: i64) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::File::create(path)?;
    writeln!(f, "{}", best)?;
    Ok(())
}

/// Best of a stored record and a finished session's score.
pub fn merge_best(stored: Option<i64>, score: i64) -> (i64, bool) {
    match stored {
        Some(best) if best >= score => (best, false),
        _ => (score, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("whackatui-test-{}-{}", std::process::id(), name))
            .join(FILENAME)
    }

    #[test]
    fn test_round_trip_negative_best() {
        let path = temp_file("neg");
        save_best(&path, -150).unwrap();
        assert_eq!(load_best(&path), Some(-150));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_has_no_best() {
        assert_eq!(load_best(&temp_file("missing")), None);
    }

    #[test]
    fn test_merge_best() {
        assert_eq!(merge_best(None, -50), (-50, true));
        assert_eq!(merge_best(Some(300), 200), (300, false));
        assert_eq!(merge_best(Some(300), 400), (400, true));
        assert_eq!(merge_best(Some(300), 300), (300, false));
    }
}
