//! Two-column `Metric | Value` text table.

use chrono::NaiveDate;
use owo_colors::OwoColorize;

use treasury_common::error::AppError;
use treasury_common::types::CompanyReport;

use crate::format;
use crate::{OutputFormat, ReportRenderer};

/// One table row. Highlighted rows are printed in bold.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: &'static str,
    pub value: String,
    pub highlight: bool,
}

impl TableRow {
    fn plain(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            highlight: false,
        }
    }

    fn bold(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            highlight: true,
        }
    }
}

/// Renders a report as a box-drawn grid table.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    /// Emit ANSI bold for highlighted rows
    ansi: bool,
}

impl TableRenderer {
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }

    /// The metric rows shown for a company, in display order.
    pub fn rows(report: &CompanyReport) -> Vec<TableRow> {
        let input = &report.input;
        let result = &report.result;

        vec![
            TableRow::plain("Market Cap", format::usd(result.market_cap)),
            TableRow::plain("Enterprise Value", format::usd(result.enterprise_value)),
            TableRow::plain("BTC NAV", format::usd(input.btc_nav)),
            TableRow::plain(
                "Fiat Debt",
                format!(
                    "{} ({})",
                    format::usd(input.fiat_debt),
                    format::percent(result.fiat_debt_pct, 1)
                ),
            ),
            TableRow::plain("BTC Yield YTD", format::percent(input.btc_yield_ytd, 2)),
            TableRow::plain(
                "Projected BTC Yield",
                format::percent(input.projected_yield, 2),
            ),
            TableRow::plain(
                "BTC Yield Multiple",
                format::fixed(result.btc_yield_multiple, 2),
            ),
            TableRow::plain(
                "BTC Yield 1Y Annualized",
                format::fixed(result.btc_yield_1y, 2),
            ),
            TableRow::plain("Current mNAV", format::fixed(input.current_mnav, 2)),
            TableRow::plain(
                "Days to Cover mNAV",
                format!("{} days", format::coverage(result.days_to_cover, 0)),
            ),
            TableRow::plain(
                "Months to Cover mNAV",
                format::coverage(result.months_to_cover, 2),
            ),
            TableRow::bold(
                "Risk-Adjusted Days to Cover",
                format!("{} days", format::coverage(result.risk_adjusted_days, 0)),
            ),
            TableRow::bold(
                "Risk-Adjusted Months to Cover",
                format::coverage(result.risk_adjusted_months, 2),
            ),
        ]
    }

    /// Heading line followed by the grid.
    pub fn render_table(&self, report: &CompanyReport) -> String {
        let rows = Self::rows(report);

        let label_width = rows
            .iter()
            .map(|r| r.label.chars().count())
            .chain(std::iter::once("Metric".len()))
            .max()
            .unwrap_or(0);
        let value_width = rows
            .iter()
            .map(|r| r.value.chars().count())
            .chain(std::iter::once("Value".len()))
            .max()
            .unwrap_or(0);

        let rule = |left: char, fill: char, mid: char, right: char| {
            format!(
                "{left}{}{mid}{}{right}\n",
                fill.to_string().repeat(label_width + 2),
                fill.to_string().repeat(value_width + 2),
            )
        };

        let mut out = format!("\n--- Results for {} ---\n\n", report.company);
        out.push_str(&rule('╒', '═', '╤', '╕'));
        out.push_str(&self.line("Metric", "Value", false, label_width, value_width));
        out.push_str(&rule('╞', '═', '╪', '╡'));

        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                out.push_str(&rule('├', '─', '┼', '┤'));
            }
            out.push_str(&self.line(
                row.label,
                &row.value,
                row.highlight,
                label_width,
                value_width,
            ));
        }
        out.push_str(&rule('╘', '═', '╧', '╛'));
        out
    }

    fn line(
        &self,
        label: &str,
        value: &str,
        highlight: bool,
        label_width: usize,
        value_width: usize,
    ) -> String {
        // Pad before styling so escape codes don't skew the column widths.
        let label = format!("{label:<label_width$}");
        let value = format!("{value:<value_width$}");
        if highlight && self.ansi {
            format!("│ {} │ {} │\n", label.bold(), value.bold())
        } else {
            format!("│ {label} │ {value} │\n")
        }
    }
}

impl ReportRenderer for TableRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Table
    }

    fn name(&self) -> &'static str {
        "text table"
    }

    fn render(&self, report: &CompanyReport, _today: NaiveDate) -> Result<Vec<u8>, AppError> {
        Ok(self.render_table(report).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treasury_common::types::{Company, TreasuryParams};
    use treasury_engine::coverage::CoverageCalculator;

    fn report(current_mnav: f64) -> CompanyReport {
        let input = TreasuryParams {
            shares_outstanding: 1000.0,
            share_price: 10.0,
            btc_nav: 5000.0,
            fiat_debt: 1000.0,
            btc_yield_ytd: 20.0,
            months_since_start: 6.0,
            current_mnav,
            projected_yield: None,
            risk_score: None,
        }
        .resolve();
        CompanyReport {
            company: Company {
                name: "Acme".into(),
                ticker: "ACME".into(),
            },
            input,
            result: CoverageCalculator::compute(&input).unwrap(),
        }
    }

    fn value_of<'a>(rows: &'a [TableRow], label: &str) -> &'a str {
        &rows.iter().find(|r| r.label == label).unwrap().value
    }

    #[test]
    fn test_row_values() {
        let rows = TableRenderer::rows(&report(2.0));
        assert_eq!(rows.len(), 13);
        assert_eq!(value_of(&rows, "Market Cap"), "$10,000");
        assert_eq!(value_of(&rows, "Enterprise Value"), "$11,000");
        assert_eq!(value_of(&rows, "BTC NAV"), "$5,000");
        assert_eq!(value_of(&rows, "Fiat Debt"), "$1,000 (20.0%)");
        assert_eq!(value_of(&rows, "BTC Yield YTD"), "20.00%");
        assert_eq!(value_of(&rows, "Projected BTC Yield"), "20.00%");
        assert_eq!(value_of(&rows, "BTC Yield Multiple"), "1.20");
        assert_eq!(value_of(&rows, "BTC Yield 1Y Annualized"), "1.44");
        assert_eq!(value_of(&rows, "Days to Cover mNAV"), "694 days");
        assert_eq!(value_of(&rows, "Months to Cover mNAV"), "22.81");
        assert_eq!(value_of(&rows, "Risk-Adjusted Months to Cover"), "22.81");
    }

    #[test]
    fn test_only_risk_adjusted_rows_highlighted() {
        let rows = TableRenderer::rows(&report(2.0));
        let highlighted: Vec<_> = rows.iter().filter(|r| r.highlight).map(|r| r.label).collect();
        assert_eq!(
            highlighted,
            vec!["Risk-Adjusted Days to Cover", "Risk-Adjusted Months to Cover"]
        );
    }

    #[test]
    fn test_uncoverable_prints_inf() {
        let rows = TableRenderer::rows(&report(0.5));
        assert_eq!(value_of(&rows, "Days to Cover mNAV"), "inf days");
        assert_eq!(value_of(&rows, "Risk-Adjusted Months to Cover"), "inf");
    }

    #[test]
    fn test_plain_table_layout() {
        let text = TableRenderer::new(false).render_table(&report(2.0));
        assert!(text.contains("--- Results for Acme (ACME) ---"));
        assert!(text.contains("│ Market Cap "));
        assert!(!text.contains('\u{1b}'));

        // Every grid line has the same visible width.
        let widths: Vec<usize> = text
            .lines()
            .filter(|l| l.starts_with(['│', '╒', '╞', '├', '╘']))
            .map(|l| l.chars().count())
            .collect();
        assert_eq!(widths.len(), 1 + 3 + 13 + 12);
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_ansi_bold_on_highlighted_rows() {
        let text = TableRenderer::new(true).render_table(&report(2.0));
        let bold_lines = text.lines().filter(|l| l.contains("\u{1b}[1m")).count();
        assert_eq!(bold_lines, 2);
    }
}
