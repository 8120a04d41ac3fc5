//! Subcommand implementations, written against generic I/O so they can be
//! driven from tests.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use treasury_common::error::AppError;
use treasury_common::types::CompanyReport;
use treasury_engine::batch::{CompanySheet, analyze_companies};
use treasury_engine::coverage::CoverageCalculator;
use treasury_render::card::CardRenderer;
use treasury_render::{OutputFormat, RendererRegistry};

use crate::prompt::Prompter;

/// Prompt for one company, print its table and optionally save its card.
pub fn analyze<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    registry: &RendererRegistry,
    today: NaiveDate,
    card_path: Option<&Path>,
    out: &mut impl Write,
) -> Result<CompanyReport, AppError> {
    let (company, params) = prompter.collect()?;
    let input = params.resolve();
    let result = CoverageCalculator::compute(&input)?;
    let report = CompanyReport {
        company,
        input,
        result,
    };

    out.write_all(&registry.render(OutputFormat::Table, &report, today)?)?;

    if let Some(path) = card_path {
        let card = registry.render(OutputFormat::Card, &report, today)?;
        std::fs::write(path, card)?;
        tracing::info!(path = %path.display(), "Stat card written");
    }

    Ok(report)
}

/// Counts reported at the end of a batch run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub analyzed: usize,
    pub failed: usize,
    pub cards_written: Vec<PathBuf>,
}

/// Print a table for every company in the sheet and optionally write one
/// card per company into `cards_dir`.
pub fn batch(
    sheet: CompanySheet,
    registry: &RendererRegistry,
    today: NaiveDate,
    cards_dir: Option<&Path>,
    out: &mut impl Write,
) -> Result<BatchSummary, AppError> {
    let outcome = analyze_companies(sheet);
    let mut summary = BatchSummary {
        analyzed: outcome.reports.len(),
        failed: outcome.failures.len(),
        cards_written: Vec::new(),
    };

    if let Some(dir) = cards_dir {
        std::fs::create_dir_all(dir)?;
    }

    for report in &outcome.reports {
        out.write_all(&registry.render(OutputFormat::Table, report, today)?)?;

        if let Some(dir) = cards_dir {
            let path = dir.join(CardRenderer::file_name(&report.company.ticker));
            let card = registry.render(OutputFormat::Card, report, today)?;
            std::fs::write(&path, card)?;
            summary.cards_written.push(path);
        }
    }

    for failure in &outcome.failures {
        writeln!(
            out,
            "\nRow {} ({}) skipped: {}",
            failure.row + 1,
            failure.ticker,
            failure.error
        )?;
    }

    tracing::info!(
        analyzed = summary.analyzed,
        failed = summary.failed,
        cards = summary.cards_written.len(),
        "Batch complete"
    );

    Ok(summary)
}
