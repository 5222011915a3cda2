//! Static art assets and asset configuration
//!
//! The compositor depends on three fixed art files (dialog box background,
//! nametag mid and end segments) plus the UI typeface. Where those live is
//! configuration, not engine logic: a small TOML file names the paths.

use crate::error::DialogError;
use crate::text::Typeface;
use image::RgbaImage;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths to the fixed assets, loaded from a TOML config file.
///
/// ```toml
/// dialog_box = "images/dialog_box.png"
/// nametag_mid = "images/dialog_box_name_mid.png"
/// nametag_end = "images/dialog_box_name_end.png"
/// font = "fonts/skip-std-b.otf"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetConfig {
    pub dialog_box: PathBuf,
    pub nametag_mid: PathBuf,
    pub nametag_end: PathBuf,
    pub font: PathBuf,
}

impl AssetConfig {
    /// Load from a TOML file. Relative asset paths resolve against the
    /// config file's directory.
    pub fn load(path: &Path) -> Result<Self, DialogError> {
        let raw = fs::read_to_string(path)?;
        let mut config: AssetConfig = toml::from_str(&raw)?;
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    fn resolve_relative(&mut self, base: &Path) {
        for field in [
            &mut self.dialog_box,
            &mut self.nametag_mid,
            &mut self.nametag_end,
            &mut self.font,
        ] {
            if field.is_relative() {
                let joined = base.join(field.as_path());
                *field = joined;
            }
        }
    }
}

/// The three chrome images the compositor layers over the body.
pub struct DialogArt {
    pub dialog_box: RgbaImage,
    pub nametag_mid: RgbaImage,
    pub nametag_end: RgbaImage,
}

impl DialogArt {
    /// A missing or corrupt art file is fatal to every composition, so
    /// loading fails eagerly.
    pub fn load(config: &AssetConfig) -> Result<Self, DialogError> {
        Ok(Self {
            dialog_box: load_image(&config.dialog_box)?,
            nametag_mid: load_image(&config.nametag_mid)?,
            nametag_end: load_image(&config.nametag_end)?,
        })
    }
}

/// Everything the engine needs besides the request itself.
pub struct DialogAssets {
    pub art: DialogArt,
    pub typeface: Typeface,
}

impl DialogAssets {
    pub fn load(config: &AssetConfig) -> Result<Self, DialogError> {
        Ok(Self {
            art: DialogArt::load(config)?,
            typeface: Typeface::from_path(&config.font)?,
        })
    }
}

/// Decode any supported image file into an RGBA buffer.
/// Used for sheets and static art alike; failures surface unmodified.
pub fn load_image(path: &Path) -> Result<RgbaImage, DialogError> {
    Ok(image::open(path)?.to_rgba8())
}
