//! Coverage calculator: how long compounding BTC yield takes to cover the mNAV premium.
//!
//! The YTD yield is assumed to compound at a constant monthly rate. It is
//! annualized, then coverage time solves:
//!
//! `btc_yield_1y ^ (months / 12) = current_mnav`
//!
//! When there is no growth (`btc_yield_1y <= 1`) or no premium to cover
//! (`current_mnav <= 1`) the equation has no finite positive solution and the
//! result is [`Coverage::Uncoverable`].

use treasury_common::error::AppError;
use treasury_common::types::{Coverage, TreasuryInput, TreasuryResult};

/// Average days per month used to convert coverage months into days.
pub const DAYS_PER_MONTH: f64 = 30.44;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Stateless treasury-coverage calculator.
pub struct CoverageCalculator;

impl CoverageCalculator {
    /// Compute every derived metric for one company.
    ///
    /// Fails with [`AppError::InvalidInput`] when `months_since_start` is not a
    /// positive finite number, since it is the denominator of the annualizing
    /// exponent.
    pub fn compute(input: &TreasuryInput) -> Result<TreasuryResult, AppError> {
        if !(input.months_since_start.is_finite() && input.months_since_start > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "months_since_start must be greater than zero, got {}",
                input.months_since_start
            )));
        }

        let market_cap = input.shares_outstanding * input.share_price;
        let enterprise_value = market_cap + input.fiat_debt;
        let fiat_debt_pct = Self::debt_ratio_pct(input.fiat_debt, input.btc_nav);

        let btc_yield_multiple = 1.0 + input.projected_yield / 100.0;
        let btc_yield_1y = Self::annualize(btc_yield_multiple, input.months_since_start);

        let months_to_cover = Self::months_to_cover(btc_yield_1y, input.current_mnav);
        let days_to_cover = months_to_cover.scale(DAYS_PER_MONTH);

        let result = TreasuryResult {
            market_cap,
            enterprise_value,
            fiat_debt_pct,
            btc_yield_multiple,
            btc_yield_1y,
            months_to_cover,
            days_to_cover,
            risk_adjusted_days: days_to_cover.scale(input.risk_score),
            risk_adjusted_months: months_to_cover.scale(input.risk_score),
        };

        tracing::debug!(
            btc_yield_1y,
            current_mnav = input.current_mnav,
            months_to_cover = months_to_cover.as_f64(),
            risk_score = input.risk_score,
            "Computed treasury coverage"
        );

        Ok(result)
    }

    /// Extrapolate a YTD growth multiple to a one-year horizon.
    ///
    /// A non-positive multiple (a loss of 100% or more) annualizes to zero.
    pub fn annualize(multiple: f64, months_since_start: f64) -> f64 {
        if multiple <= 0.0 {
            return 0.0;
        }
        multiple.powf(MONTHS_PER_YEAR / months_since_start)
    }

    /// Months of compounding at `btc_yield_1y` needed to reach `current_mnav`.
    pub fn months_to_cover(btc_yield_1y: f64, current_mnav: f64) -> Coverage {
        if btc_yield_1y.is_nan() || current_mnav.is_nan() {
            return Coverage::Uncoverable;
        }
        if btc_yield_1y <= 1.0 || current_mnav <= 1.0 {
            return Coverage::Uncoverable;
        }
        Coverage::Finite(current_mnav.ln() / btc_yield_1y.ln() * MONTHS_PER_YEAR)
    }

    /// Fiat debt as a percentage of BTC NAV; zero when there is no NAV.
    fn debt_ratio_pct(fiat_debt: f64, btc_nav: f64) -> f64 {
        if btc_nav > 0.0 {
            fiat_debt / btc_nav * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treasury_common::types::TreasuryParams;

    const EPS: f64 = 1e-9;

    fn sample() -> TreasuryParams {
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

    fn compute(params: TreasuryParams) -> TreasuryResult {
        CoverageCalculator::compute(&params.resolve()).unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let result = compute(sample());

        assert_eq!(result.market_cap, 10_000.0);
        assert_eq!(result.enterprise_value, 11_000.0);
        assert!((result.fiat_debt_pct - 20.0).abs() < EPS);
        assert!((result.btc_yield_multiple - 1.2).abs() < EPS);
        assert!((result.btc_yield_1y - 1.44).abs() < EPS);

        let months = result.months_to_cover.finite().unwrap();
        let expected = 2f64.ln() / 1.44f64.ln() * 12.0;
        assert!((months - expected).abs() < EPS);
        assert!((months - 22.81).abs() < 0.01);

        let days = result.days_to_cover.finite().unwrap();
        assert!((days - 694.4).abs() < 0.1);
    }

    #[test]
    fn test_days_are_months_times_days_per_month() {
        let result = compute(TreasuryParams {
            current_mnav: 3.7,
            projected_yield: Some(41.0),
            ..sample()
        });
        let months = result.months_to_cover.finite().unwrap();
        let days = result.days_to_cover.finite().unwrap();
        assert!((days - months * DAYS_PER_MONTH).abs() < EPS);
    }

    #[test]
    fn test_neutral_risk_matches_unadjusted() {
        let result = compute(sample());
        assert_eq!(result.risk_adjusted_days, result.days_to_cover);
        assert_eq!(result.risk_adjusted_months, result.months_to_cover);
    }

    #[test]
    fn test_risk_score_scales_linearly() {
        for risk in [0.5, 1.0, 1.25, 3.0] {
            let result = compute(TreasuryParams {
                risk_score: Some(risk),
                ..sample()
            });
            let days = result.days_to_cover.finite().unwrap();
            let months = result.months_to_cover.finite().unwrap();
            assert!((result.risk_adjusted_days.finite().unwrap() - days * risk).abs() < EPS);
            assert!((result.risk_adjusted_months.finite().unwrap() - months * risk).abs() < EPS);
        }
    }

    #[test]
    fn test_projected_yield_overrides_ytd() {
        let result = compute(TreasuryParams {
            projected_yield: Some(50.0),
            ..sample()
        });
        assert!((result.btc_yield_multiple - 1.5).abs() < EPS);
        assert!((result.btc_yield_1y - 2.25).abs() < EPS);
    }

    #[test]
    fn test_mnav_at_or_below_one_is_uncoverable() {
        for mnav in [0.5, 1.0] {
            let result = compute(TreasuryParams {
                current_mnav: mnav,
                ..sample()
            });
            assert_eq!(result.months_to_cover, Coverage::Uncoverable);
            assert_eq!(result.days_to_cover, Coverage::Uncoverable);
            assert_eq!(result.days_to_cover.as_f64(), f64::INFINITY);
        }
    }

    #[test]
    fn test_zero_yield_is_uncoverable() {
        let result = compute(TreasuryParams {
            projected_yield: Some(0.0),
            current_mnav: 5.0,
            ..sample()
        });
        assert_eq!(result.btc_yield_multiple, 1.0);
        assert_eq!(result.btc_yield_1y, 1.0);
        assert_eq!(result.months_to_cover, Coverage::Uncoverable);
    }

    #[test]
    fn test_negative_yield_is_uncoverable() {
        let result = compute(TreasuryParams {
            btc_yield_ytd: -10.0,
            current_mnav: 5.0,
            ..sample()
        });
        assert!(result.btc_yield_1y < 1.0);
        assert_eq!(result.months_to_cover, Coverage::Uncoverable);
        assert_eq!(result.risk_adjusted_months, Coverage::Uncoverable);
    }

    #[test]
    fn test_total_loss_yield_is_uncoverable() {
        for ytd in [-100.0, -150.0] {
            let result = compute(TreasuryParams {
                btc_yield_ytd: ytd,
                months_since_start: 5.0,
                current_mnav: 2.0,
                ..sample()
            });
            assert_eq!(result.btc_yield_1y, 0.0);
            assert_eq!(result.months_to_cover, Coverage::Uncoverable);
            assert_eq!(result.days_to_cover, Coverage::Uncoverable);
            assert_eq!(result.risk_adjusted_days, Coverage::Uncoverable);
        }
    }

    #[test]
    fn test_nan_inputs_are_uncoverable() {
        assert_eq!(
            CoverageCalculator::months_to_cover(f64::NAN, 2.0),
            Coverage::Uncoverable
        );
        assert_eq!(
            CoverageCalculator::months_to_cover(1.44, f64::NAN),
            Coverage::Uncoverable
        );
    }

    #[test]
    fn test_zero_nav_gives_zero_debt_ratio() {
        let result = compute(TreasuryParams {
            btc_nav: 0.0,
            fiat_debt: 1_000_000.0,
            ..sample()
        });
        assert_eq!(result.fiat_debt_pct, 0.0);
    }

    #[test]
    fn test_non_positive_months_rejected() {
        for months in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let input = TreasuryParams {
                months_since_start: months,
                ..sample()
            }
            .resolve();
            let err = CoverageCalculator::compute(&input).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_annualize_full_year_is_identity() {
        assert!((CoverageCalculator::annualize(1.3, 12.0) - 1.3).abs() < EPS);
    }
}
