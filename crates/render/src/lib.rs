pub mod card;
pub mod format;
pub mod logos;
pub mod table;

use chrono::NaiveDate;

use treasury_common::config::AppConfig;
use treasury_common::error::AppError;
use treasury_common::types::CompanyReport;

/// Output formats a report can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Card,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Table => "text/plain; charset=utf-8",
            OutputFormat::Card => "image/png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Card => write!(f, "card"),
        }
    }
}

/// Trait that every presentation of a [`CompanyReport`] implements.
pub trait ReportRenderer: Send + Sync {
    /// The format this renderer produces.
    fn format(&self) -> OutputFormat;

    /// Human-readable name for this renderer (e.g., "stat card").
    fn name(&self) -> &'static str;

    /// Render `report` as of `today` (used for dated output). Text formats
    /// return UTF-8 bytes.
    fn render(&self, report: &CompanyReport, today: NaiveDate) -> Result<Vec<u8>, AppError>;
}

/// Registry of the available renderers, looked up by output format.
pub struct RendererRegistry {
    renderers: Vec<Box<dyn ReportRenderer>>,
}

impl RendererRegistry {
    /// Create a registry with the table and card renderers.
    ///
    /// `ansi` controls bold highlighting in the text table.
    pub fn new(config: &AppConfig, ansi: bool) -> Self {
        Self {
            renderers: vec![
                Box::new(table::TableRenderer::new(ansi)),
                Box::new(card::CardRenderer::from_config(config)),
            ],
        }
    }

    pub fn get(&self, format: OutputFormat) -> Option<&dyn ReportRenderer> {
        self.renderers
            .iter()
            .find(|r| r.format() == format)
            .map(|r| r.as_ref())
    }

    /// Render `report` in the requested format.
    pub fn render(
        &self,
        format: OutputFormat,
        report: &CompanyReport,
        today: NaiveDate,
    ) -> Result<Vec<u8>, AppError> {
        let renderer = self
            .get(format)
            .ok_or_else(|| AppError::Render(format!("no renderer registered for {format}")))?;

        let rendered = renderer.render(report, today)?;
        tracing::debug!(
            renderer = renderer.name(),
            company = %report.company,
            bytes = rendered.len(),
            "Rendered report"
        );
        Ok(rendered)
    }
}
