//! Coverage routes: the web-form front end.
//!
//! Every numeric field arrives as free text, the way a user typed it into a
//! form. Text that does not parse falls back to the field's default instead
//! of rejecting the request; only a non-positive `months_since_start` is an
//! error.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use treasury_common::error::AppError;
use treasury_common::types::{Company, CompanyReport, TreasuryInput, TreasuryParams, TreasuryResult};
use treasury_engine::coverage::CoverageCalculator;
use treasury_engine::input::{parse_optional, parse_or_default};
use treasury_engine::schedule::projected_coverage_date;
use treasury_render::OutputFormat;
use treasury_render::card::CardRenderer;

use crate::state::AppState;

/// Default for `months_since_start` when the field is blank.
const DEFAULT_MONTHS: f64 = 1.0;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/coverage", post(compute_coverage))
        .route("/api/coverage/card", post(coverage_card))
}

/// Form submission. Fields accept JSON strings or numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoverageForm {
    pub name: String,
    pub ticker: String,
    #[serde(deserialize_with = "text_or_number")]
    pub shares_outstanding: String,
    #[serde(deserialize_with = "text_or_number")]
    pub share_price: String,
    #[serde(deserialize_with = "text_or_number")]
    pub btc_nav: String,
    #[serde(deserialize_with = "text_or_number")]
    pub fiat_debt: String,
    #[serde(deserialize_with = "text_or_number")]
    pub btc_yield_ytd: String,
    #[serde(deserialize_with = "text_or_number")]
    pub months_since_start: String,
    #[serde(deserialize_with = "text_or_number")]
    pub current_mnav: String,
    #[serde(deserialize_with = "text_or_number")]
    pub projected_yield: String,
    #[serde(deserialize_with = "text_or_number")]
    pub risk_score: String,
}

impl CoverageForm {
    pub fn company(&self) -> Company {
        Company {
            name: self.name.trim().to_string(),
            ticker: self.ticker.trim().to_string(),
        }
    }

    /// Parse the form leniently. Blank optional fields stay unset so the
    /// usual defaults apply on resolve.
    pub fn params(&self) -> TreasuryParams {
        TreasuryParams {
            shares_outstanding: parse_or_default("shares_outstanding", &self.shares_outstanding, 0.0),
            share_price: parse_or_default("share_price", &self.share_price, 0.0),
            btc_nav: parse_or_default("btc_nav", &self.btc_nav, 0.0),
            fiat_debt: parse_or_default("fiat_debt", &self.fiat_debt, 0.0),
            btc_yield_ytd: parse_or_default("btc_yield_ytd", &self.btc_yield_ytd, 0.0),
            months_since_start: parse_or_default(
                "months_since_start",
                &self.months_since_start,
                DEFAULT_MONTHS,
            ),
            current_mnav: parse_or_default("current_mnav", &self.current_mnav, 0.0),
            projected_yield: optional_field("projected_yield", &self.projected_yield),
            risk_score: optional_field("risk_score", &self.risk_score),
        }
    }

    fn report(&self) -> Result<CompanyReport, AppError> {
        let input = self.params().resolve();
        let result = CoverageCalculator::compute(&input)?;
        Ok(CompanyReport {
            company: self.company(),
            input,
            result,
        })
    }
}

/// Metrics returned by `POST /api/coverage`.
#[derive(Debug, Serialize)]
pub struct CoverageResponse {
    pub company: Company,
    pub input: TreasuryInput,
    pub result: TreasuryResult,
    /// Absent when coverage is never reached
    pub projected_coverage_date: Option<NaiveDate>,
}

/// POST /api/coverage: Compute coverage metrics for one company.
async fn compute_coverage(
    Json(form): Json<CoverageForm>,
) -> Result<Json<CoverageResponse>, AppError> {
    let report = form.report()?;
    let today = chrono::Local::now().date_naive();

    tracing::info!(company = %report.company, "Coverage computed");

    Ok(Json(CoverageResponse {
        projected_coverage_date: projected_coverage_date(today, report.result.risk_adjusted_days),
        company: report.company,
        input: report.input,
        result: report.result,
    }))
}

/// POST /api/coverage/card: Render the stat card as a downloadable PNG.
async fn coverage_card(
    State(state): State<AppState>,
    Json(form): Json<CoverageForm>,
) -> Result<impl IntoResponse, AppError> {
    let report = form.report()?;
    let today = chrono::Local::now().date_naive();
    let png = state.renderers.render(OutputFormat::Card, &report, today)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        CardRenderer::file_name(&report.company.ticker)
    );

    Ok((
        [
            (header::CONTENT_TYPE, OutputFormat::Card.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    ))
}

/// Blank means unset; malformed text is treated the same, with a warning.
fn optional_field(field: &str, raw: &str) -> Option<f64> {
    match parse_optional(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(field, error = %e, "Ignoring malformed optional field");
            None
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
