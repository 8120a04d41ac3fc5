//! Shareable stat card: a fixed 1000×1000 PNG snapshot of a company's
//! risk-adjusted coverage.
//!
//! The card is laid out as an SVG document and rasterized with `resvg`.
//! Text is drawn with system fonts plus any font files placed in
//! `<assets_dir>/fonts`.
//!
//! Layout (top-left anchored, pixels):
//! - title, date, company label at y = 50 / 100 / 140
//! - divider from (50, 200) to (950, 200)
//! - risk-adjusted days, months and projected date blocks
//! - footer handle and site at y = 860 / 920
//! - brand logo top-right, ticker logo bottom-right (both optional)

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use image::{ImageFormat, RgbaImage};
use resvg::usvg::fontdb;
use resvg::{tiny_skia, usvg};

use treasury_common::config::AppConfig;
use treasury_common::error::AppError;
use treasury_common::types::CompanyReport;
use treasury_engine::schedule::{DATE_FORMAT, format_projected, projected_coverage_date};

use crate::format;
use crate::logos::{LogoCatalog, Overlay};
use crate::{OutputFormat, ReportRenderer};

pub const CARD_SIZE: u32 = 1000;

const BRAND_LOGO_MAX: u32 = 150;
const TICKER_LOGO_MAX: u32 = 120;
const LOGO_MARGIN: u32 = 30;

const TEXT_COLOR: &str = "black";
const ACCENT_COLOR: &str = "#f2a900";
const DIVIDER_COLOR: &str = "#e0e0e0";

/// Family the card asks for first; any installed sans-serif face stands in.
const PREFERRED_FAMILY: &str = "Arial";

/// Subdirectory of the assets dir searched for extra font files.
const FONT_DIR: &str = "fonts";

/// Shown in place of a date when coverage is never reached.
pub const NO_DATE: &str = "Not reachable";

/// Footer text printed on every card.
#[derive(Debug, Clone)]
pub struct CardBranding {
    pub handle: String,
    pub site: String,
}

#[derive(Debug, Clone, Copy)]
enum Font {
    Title,
    Italic,
    Bold,
}

impl Font {
    fn attrs(self) -> &'static str {
        match self {
            Font::Title => r#"font-size="50" font-weight="bold""#,
            Font::Italic => r#"font-size="44" font-style="italic""#,
            Font::Bold => r#"font-size="48" font-weight="bold""#,
        }
    }
}

/// Renders reports as PNG stat cards.
#[derive(Clone)]
pub struct CardRenderer {
    branding: CardBranding,
    logos: LogoCatalog,
    fonts: Arc<fontdb::Database>,
}

impl CardRenderer {
    pub fn new(branding: CardBranding, logos: LogoCatalog) -> Self {
        let fonts = Arc::new(load_fonts(logos.assets_dir()));
        Self {
            branding,
            logos,
            fonts,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            CardBranding {
                handle: config.card_handle.clone(),
                site: config.card_site.clone(),
            },
            LogoCatalog::new(config.assets_dir.clone(), config.brand_logo.clone()),
        )
    }

    /// Download file name for a company's card.
    ///
    /// Only ASCII letters, digits, `_` and `-` from the ticker are kept, so
    /// the name is safe as a path component and inside a header.
    pub fn file_name(ticker: &str) -> String {
        let stem: String = ticker
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if stem.is_empty() {
            "company_stat_card.png".to_string()
        } else {
            format!("{stem}_stat_card.png")
        }
    }

    /// Render the card for `report` as of `today` as PNG bytes.
    pub fn render_card(
        &self,
        report: &CompanyReport,
        today: NaiveDate,
    ) -> Result<Vec<u8>, AppError> {
        let svg = self.render_svg(report, today);
        self.rasterize(&svg)
    }

    /// Build the SVG layout for `report` as of `today`.
    pub fn render_svg(&self, report: &CompanyReport, today: NaiveDate) -> String {
        let result = &report.result;
        let projected = projected_coverage_date(today, result.risk_adjusted_days);

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CARD_SIZE}" height="{CARD_SIZE}" viewBox="0 0 {CARD_SIZE} {CARD_SIZE}" font-family="{PREFERRED_FAMILY}, Helvetica, sans-serif">"#
        );
        svg.push('\n');
        svg.push_str(&format!(
            "  <rect width=\"{CARD_SIZE}\" height=\"{CARD_SIZE}\" fill=\"white\"/>\n"
        ));

        let lines = [
            (50, 50, Font::Title, TEXT_COLOR, "BTC Treasury Snapshot".to_string()),
            (50, 100, Font::Italic, TEXT_COLOR, today.format(DATE_FORMAT).to_string()),
            (50, 140, Font::Bold, TEXT_COLOR, report.company.to_string()),
            (50, 240, Font::Bold, TEXT_COLOR, "Risk-Adjusted Days to Full Coverage:".to_string()),
            (
                60,
                300,
                Font::Bold,
                ACCENT_COLOR,
                format!("{} days", format::coverage(result.risk_adjusted_days, 0)),
            ),
            (50, 360, Font::Bold, TEXT_COLOR, "Risk-Adjusted Months to Full Coverage:".to_string()),
            (
                60,
                420,
                Font::Bold,
                ACCENT_COLOR,
                format!("{} months", format::coverage(result.risk_adjusted_months, 2)),
            ),
            (50, 540, Font::Bold, TEXT_COLOR, "Projected Date to Full Coverage:".to_string()),
            (60, 590, Font::Bold, ACCENT_COLOR, format_projected(projected, NO_DATE)),
            (50, 860, Font::Italic, TEXT_COLOR, self.branding.handle.clone()),
            (50, 920, Font::Bold, TEXT_COLOR, self.branding.site.clone()),
        ];

        for (x, y, font, fill, content) in &lines {
            text(&mut svg, *x, *y, *font, fill, content);
        }
        svg.push_str(&format!(
            "  <line x1=\"50\" y1=\"200\" x2=\"950\" y2=\"200\" stroke=\"{DIVIDER_COLOR}\" stroke-width=\"2\"/>\n"
        ));

        match self.logos.brand(BRAND_LOGO_MAX) {
            Some(Ok(logo)) => {
                let x = CARD_SIZE.saturating_sub(logo.width + LOGO_MARGIN);
                embed_image(&mut svg, x, LOGO_MARGIN, &logo);
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Failed to overlay brand logo, skipping");
            }
            None => {}
        }

        match self.logos.ticker(&report.company.ticker, TICKER_LOGO_MAX) {
            Some(Ok(logo)) => {
                let x = CARD_SIZE.saturating_sub(logo.width + LOGO_MARGIN);
                let y = CARD_SIZE.saturating_sub(logo.height + LOGO_MARGIN);
                embed_image(&mut svg, x, y, &logo);
            }
            Some(Err(e)) => {
                tracing::warn!(
                    ticker = %report.company.ticker,
                    error = %e,
                    "Error loading company logo, skipping"
                );
            }
            None => {}
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Rasterize a card layout onto a white 1000×1000 canvas and encode it
    /// as PNG.
    fn rasterize(&self, svg: &str) -> Result<Vec<u8>, AppError> {
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fonts),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| AppError::Render(format!("invalid card layout: {e}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(CARD_SIZE, CARD_SIZE)
            .ok_or_else(|| AppError::Render("could not allocate card canvas".into()))?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        // The background is opaque, so premultiplied and straight RGBA agree.
        let canvas = RgbaImage::from_raw(CARD_SIZE, CARD_SIZE, pixmap.take())
            .ok_or_else(|| AppError::Render("card canvas has the wrong size".into()))?;

        let mut png = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| AppError::Render(format!("failed to encode card: {e}")))?;
        Ok(png)
    }
}

/// System fonts plus anything under `<assets_dir>/fonts`. When the preferred
/// family is missing, the first installed family becomes the sans-serif
/// fallback.
fn load_fonts(assets_dir: &Path) -> fontdb::Database {
    let mut fonts = fontdb::Database::new();
    fonts.load_system_fonts();
    let font_dir = assets_dir.join(FONT_DIR);
    if font_dir.is_dir() {
        fonts.load_fonts_dir(&font_dir);
    }

    let has_preferred = fonts
        .faces()
        .any(|face| face.families.iter().any(|(family, _)| family == PREFERRED_FAMILY));
    if !has_preferred {
        let fallback = fonts
            .faces()
            .find_map(|face| face.families.first().map(|(family, _)| family.clone()));
        match fallback {
            Some(family) => fonts.set_sans_serif_family(family),
            None => tracing::warn!("No fonts available, stat card text will be blank"),
        }
    }

    tracing::debug!(faces = fonts.faces().count(), "Loaded stat card fonts");
    fonts
}

impl ReportRenderer for CardRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Card
    }

    fn name(&self) -> &'static str {
        "stat card"
    }

    fn render(&self, report: &CompanyReport, today: NaiveDate) -> Result<Vec<u8>, AppError> {
        self.render_card(report, today)
    }
}

fn text(svg: &mut String, x: u32, y: u32, font: Font, fill: &str, content: &str) {
    svg.push_str(&format!(
        "  <text x=\"{x}\" y=\"{y}\" dominant-baseline=\"hanging\" {} fill=\"{fill}\">{}</text>\n",
        font.attrs(),
        escape_xml(content)
    ));
}

fn embed_image(svg: &mut String, x: u32, y: u32, logo: &Overlay) {
    svg.push_str(&format!(
        "  <image x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{}\" href=\"{}\"/>\n",
        logo.width, logo.height, logo.data_uri
    ));
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
