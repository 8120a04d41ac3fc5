//! Overlay logos for stat cards.
//!
//! Logos live in the configured assets directory. Each one is decoded,
//! shrunk to fit its slot, re-encoded as PNG and embedded in the card as a
//! base64 data URI so the card is a single self-contained file.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};

use treasury_common::error::AppError;

/// Known company logos keyed by lower-cased ticker.
const TICKER_LOGOS: &[(&str, &str)] = &[
    ("gns", "gns.png"),
    ("kulr", "kulr.png"),
    ("mooninc", "mooninc.jpg"),
    ("smlr", "smlr.png"),
    ("jetking", "jetking.png"),
    ("metaplanet", "metaplanet.jpg"),
    ("mstr", "mstr.png"),
];

/// Look up the logo file for a ticker, case-insensitively.
pub fn logo_for_ticker(ticker: &str) -> Option<&'static str> {
    let key = ticker.trim().to_lowercase();
    TICKER_LOGOS
        .iter()
        .find(|(t, _)| *t == key)
        .map(|(_, file)| *file)
}

/// A decoded logo ready to be placed on a card.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub width: u32,
    pub height: u32,
    /// `data:image/png;base64,...`
    pub data_uri: String,
}

/// Resolves and loads brand and ticker logos from an assets directory.
#[derive(Debug, Clone)]
pub struct LogoCatalog {
    assets_dir: PathBuf,
    brand_logo: Option<String>,
}

impl LogoCatalog {
    pub fn new(assets_dir: impl Into<PathBuf>, brand_logo: Option<String>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            brand_logo,
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Brand logo shown on every card, if one is configured.
    pub fn brand(&self, max_side: u32) -> Option<Result<Overlay, AppError>> {
        let file = self.brand_logo.as_deref()?;
        Some(load_overlay(&self.assets_dir.join(file), max_side))
    }

    /// Company logo for `ticker`, if the ticker is in the known mapping.
    pub fn ticker(&self, ticker: &str, max_side: u32) -> Option<Result<Overlay, AppError>> {
        let file = logo_for_ticker(ticker)?;
        Some(load_overlay(&self.assets_dir.join(file), max_side))
    }
}

/// Decode an image file and shrink it to fit a `max_side` square.
///
/// Images already inside the bounds keep their size.
pub fn load_overlay(path: &Path, max_side: u32) -> Result<Overlay, AppError> {
    let img = image::open(path)
        .map_err(|e| AppError::AssetNotFound(format!("{}: {}", path.display(), e)))?;

    let img = if img.width() > max_side || img.height() > max_side {
        img.thumbnail(max_side, max_side)
    } else {
        img
    };
    let img = DynamicImage::ImageRgba8(img.to_rgba8());

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::Render(format!("encode {}: {}", path.display(), e)))?;

    Ok(Overlay {
        width: img.width(),
        height: img.height(),
        data_uri: format!("data:image/png;base64,{}", STANDARD.encode(&png)),
    })
}
