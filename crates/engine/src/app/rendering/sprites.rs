use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::warn;

use super::canvas::Image;

#[derive(Debug, Error)]
pub enum SpriteLoadError {
    #[error("sprite key {key:?} rejected: {reason}")]
    InvalidKey { key: String, reason: &'static str },
    #[error("no asset root configured")]
    NoAssetRoot,
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Keys are `/`-separated segments of `[a-z0-9_-]`, so they can only name
/// files below the sprite directory.
fn key_problem(key: &str) -> Option<&'static str> {
    if key.is_empty() {
        return Some("empty key");
    }
    for segment in key.split('/') {
        if segment.is_empty() {
            return Some("empty path segment");
        }
        let allowed =
            |ch: char| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-');
        if !segment.chars().all(allowed) {
            return Some("segments may only use a-z, 0-9, '_' and '-'");
        }
    }
    None
}

/// `<asset_root>/sprites/<key>.png`
pub fn sprite_path(asset_root: &Path, key: &str) -> Result<PathBuf, SpriteLoadError> {
    if let Some(reason) = key_problem(key) {
        return Err(SpriteLoadError::InvalidKey {
            key: key.to_string(),
            reason,
        });
    }
    Ok(asset_root.join("sprites").join(format!("{key}.png")))
}

pub fn load_sprite(path: &Path) -> Result<Image, SpriteLoadError> {
    let reader = ImageReader::open(path).map_err(|source| SpriteLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| SpriteLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    // `to_rgba8` always yields exactly width * height * 4 bytes.
    Ok(Image::from_rgba(width, height, rgba.into_raw()).unwrap_or_else(|| Image::new(width, height)))
}

/// Lazily loaded sprites keyed by sprite key. Failed loads are cached as
/// `None` and warned about once.
#[derive(Debug, Default)]
pub struct SpriteCache {
    asset_root: Option<PathBuf>,
    sprites: HashMap<String, Option<Image>>,
    warned_keys: HashSet<String>,
}

impl SpriteCache {
    pub fn new(asset_root: Option<PathBuf>) -> Self {
        Self {
            asset_root,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, key: &str, image: Image) {
        self.sprites.insert(key.to_string(), Some(image));
    }

    pub fn get(&mut self, key: &str) -> Option<&Image> {
        if !self.sprites.contains_key(key) {
            let loaded = self.load(key);
            self.sprites.insert(key.to_string(), loaded);
        }
        self.sprites.get(key).and_then(Option::as_ref)
    }

    fn load(&mut self, key: &str) -> Option<Image> {
        let result = match &self.asset_root {
            Some(root) => sprite_path(root, key).and_then(|path| load_sprite(&path)),
            None => Err(SpriteLoadError::NoAssetRoot),
        };
        match result {
            Ok(image) => Some(image),
            Err(error) => {
                self.warn_once(key, &error);
                None
            }
        }
    }

    fn warn_once(&mut self, key: &str, error: &SpriteLoadError) {
        if !self.warned_keys.insert(key.to_string()) {
            return;
        }
        warn!(
            sprite_key = key,
            error = %error,
            "renderer_sprite_load_failed_using_placeholder"
        );
    }

    #[cfg(test)]
    fn warned_count(&self) -> usize {
        self.warned_keys.len()
    }
}
