use serde::{Deserialize, Serialize};

/// Default risk multiplier (neutral).
pub const NEUTRAL_RISK_SCORE: f64 = 1.0;

/// A company's display identity, carried alongside its metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub ticker: String,
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.ticker)
    }
}

/// Treasury inputs as collected, before optional fields are defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreasuryParams {
    pub shares_outstanding: f64,
    /// USD
    pub share_price: f64,
    /// USD value of BTC holdings
    pub btc_nav: f64,
    /// USD
    pub fiat_debt: f64,
    /// Percent, year-to-date
    pub btc_yield_ytd: f64,
    /// Length of the YTD measurement window in months
    pub months_since_start: f64,
    pub current_mnav: f64,
    /// Percent; falls back to `btc_yield_ytd`
    #[serde(default)]
    pub projected_yield: Option<f64>,
    /// Falls back to [`NEUTRAL_RISK_SCORE`]
    #[serde(default)]
    pub risk_score: Option<f64>,
}

impl TreasuryParams {
    /// Resolve optional fields into a complete [`TreasuryInput`].
    pub fn resolve(&self) -> TreasuryInput {
        TreasuryInput {
            shares_outstanding: self.shares_outstanding,
            share_price: self.share_price,
            btc_nav: self.btc_nav,
            fiat_debt: self.fiat_debt,
            btc_yield_ytd: self.btc_yield_ytd,
            months_since_start: self.months_since_start,
            current_mnav: self.current_mnav,
            projected_yield: self.projected_yield.unwrap_or(self.btc_yield_ytd),
            risk_score: self.risk_score.unwrap_or(NEUTRAL_RISK_SCORE),
        }
    }
}

/// Fully resolved calculator input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreasuryInput {
    pub shares_outstanding: f64,
    pub share_price: f64,
    pub btc_nav: f64,
    pub fiat_debt: f64,
    pub btc_yield_ytd: f64,
    pub months_since_start: f64,
    pub current_mnav: f64,
    pub projected_yield: f64,
    pub risk_score: f64,
}

/// A coverage duration that may never be reached.
///
/// JSON has no representation for infinity, so the unreachable case is
/// an explicit variant rather than `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Coverage {
    Finite(f64),
    Uncoverable,
}

impl Coverage {
    /// Numeric view; `Uncoverable` maps to positive infinity.
    pub fn as_f64(self) -> f64 {
        match self {
            Coverage::Finite(value) => value,
            Coverage::Uncoverable => f64::INFINITY,
        }
    }

    /// Multiply by a scalar. An unreachable duration stays unreachable.
    pub fn scale(self, factor: f64) -> Self {
        match self {
            Coverage::Finite(value) => Coverage::Finite(value * factor),
            Coverage::Uncoverable => Coverage::Uncoverable,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, Coverage::Finite(_))
    }

    pub fn finite(self) -> Option<f64> {
        match self {
            Coverage::Finite(value) => Some(value),
            Coverage::Uncoverable => None,
        }
    }
}

/// Derived treasury metrics for one company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreasuryResult {
    pub market_cap: f64,
    pub enterprise_value: f64,
    pub fiat_debt_pct: f64,
    pub btc_yield_multiple: f64,
    pub btc_yield_1y: f64,
    pub months_to_cover: Coverage,
    pub days_to_cover: Coverage,
    pub risk_adjusted_days: Coverage,
    pub risk_adjusted_months: Coverage,
}

/// Everything a renderer needs to present one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyReport {
    pub company: Company,
    pub input: TreasuryInput,
    pub result: TreasuryResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TreasuryParams {
        TreasuryParams {
            shares_outstanding: 1000.0,
            share_price: 10.0,
            btc_nav: 5000.0,
            fiat_debt: 1000.0,
            btc_yield_ytd: 20.0,
            months_since_start: 6.0,
            current_mnav: 2.0,
            projected_yield: None,
            risk_score: None,
        }
    }

    #[test]
    fn test_projected_yield_defaults_to_ytd() {
        let input = params().resolve();
        assert_eq!(input.projected_yield, 20.0);
    }

    #[test]
    fn test_risk_score_defaults_to_neutral() {
        let input = params().resolve();
        assert_eq!(input.risk_score, NEUTRAL_RISK_SCORE);
    }

    #[test]
    fn test_explicit_optionals_win() {
        let input = TreasuryParams {
            projected_yield: Some(35.0),
            risk_score: Some(1.5),
            ..params()
        }
        .resolve();
        assert_eq!(input.projected_yield, 35.0);
        assert_eq!(input.risk_score, 1.5);
    }

    #[test]
    fn test_uncoverable_survives_scaling() {
        assert_eq!(Coverage::Uncoverable.scale(0.0), Coverage::Uncoverable);
        assert_eq!(Coverage::Uncoverable.as_f64(), f64::INFINITY);
        assert_eq!(Coverage::Finite(10.0).scale(1.5), Coverage::Finite(15.0));
    }

    #[test]
    fn test_coverage_json_shape() {
        let finite = serde_json::to_value(Coverage::Finite(2.5)).unwrap();
        assert_eq!(finite, serde_json::json!({"status": "finite", "value": 2.5}));

        let never = serde_json::to_value(Coverage::Uncoverable).unwrap();
        assert_eq!(never, serde_json::json!({"status": "uncoverable"}));
    }

    #[test]
    fn test_company_display() {
        let company = Company {
            name: "Strategy".into(),
            ticker: "MSTR".into(),
        };
        assert_eq!(company.to_string(), "Strategy (MSTR)");
    }
}
