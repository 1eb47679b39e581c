//! Renderable assets: the figure and scoreboard sprites, loaded off the UI thread.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use thiserror::Error;

const BUILTIN_FIGURE: &str = " .--. \n( oo )\n/|__|\\";
const BUILTIN_SCOREBOARD: &str = "WHACK-A-TUI";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Figure,
    Scoreboard,
}

impl AssetKind {
    /// Largest sprite (columns, lines) that fits where this asset is drawn.
    pub fn max_size(self) -> (usize, usize) {
        match self {
            Self::Figure => (8, 3),
            Self::Scoreboard => (20, 2),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Figure => f.write_str("figure"),
            Self::Scoreboard => f.write_str("scoreboard"),
        }
    }
}

/// Where an asset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    Builtin,
    File(PathBuf),
}

impl AssetRef {
    pub fn from_option(path: Option<&Path>) -> Self {
        path.map(|p| Self::File(p.to_path_buf()))
            .unwrap_or(Self::Builtin)
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot read {kind} sprite {path}: {source}")]
    Io {
        kind: AssetKind,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0} sprite is empty")]
    Empty(AssetKind),
    #[error("{kind} sprite is {width}x{height}, at most {max_width}x{max_height} fits")]
    TooLarge {
        kind: AssetKind,
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },
}

/// Plain-text picture, one string per terminal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub lines: Vec<String>,
}

impl Sprite {
    pub fn width(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn parse(kind: AssetKind, text: &str) -> Result<Self, AssetError> {
        let mut lines: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        while lines.first().is_some_and(|l| l.is_empty()) {
            lines.remove(0);
        }
        let sprite = Self { lines };
        if sprite.height() == 0 || sprite.width() == 0 {
            return Err(AssetError::Empty(kind));
        }
        let (max_width, max_height) = kind.max_size();
        if sprite.width() > max_width || sprite.height() > max_height {
            return Err(AssetError::TooLarge {
                kind,
                width: sprite.width(),
                height: sprite.height(),
                max_width,
                max_height,
            });
        }
        Ok(sprite)
    }
}

/// Build one renderable. Blocking; call through [`spawn_loader`] from the UI.
pub fn load_renderable(kind: AssetKind, source: &AssetRef) -> Result<Sprite, AssetError> {
    match source {
        AssetRef::Builtin => {
            let text = match kind {
                AssetKind::Figure => BUILTIN_FIGURE,
                AssetKind::Scoreboard => BUILTIN_SCOREBOARD,
            };
            Sprite::parse(kind, text)
        }
        AssetRef::File(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
                kind,
                path: path.clone(),
                source,
            })?;
            Sprite::parse(kind, &text)
        }
    }
}

/// Result of one asynchronous load.
#[derive(Debug)]
pub struct Loaded {
    pub kind: AssetKind,
    pub result: Result<Sprite, AssetError>,
}

/// Load every request on a background thread; results arrive on the returned channel in order.
pub fn spawn_loader(requests: Vec<(AssetKind, AssetRef)>) -> Receiver<Loaded> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for (kind, source) in requests {
            let result = load_renderable(kind, &source);
            if tx.send(Loaded { kind, result }).is_err() {
                break;
            }
        }
    });
    rx
}
