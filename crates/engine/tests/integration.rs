//! End-to-end tests for the engine: CSV sheet on disk → reports → projected dates.

use std::io::Write;

use chrono::NaiveDate;

use treasury_common::types::Coverage;
use treasury_engine::batch::{analyze_companies, load_companies};
use treasury_engine::coverage::DAYS_PER_MONTH;
use treasury_engine::schedule::projected_coverage_date;

const SHEET: &str = "\
name,ticker,shares_outstanding,share_price,btc_nav,fiat_debt,btc_yield_ytd,months_since_start,current_mnav,projected_yield,risk_score
Acme Holdings,ACME,1000,10,5000,1000,20,6,2,,
Discount Corp,DISC,1000,10,5000,0,15,6,0.5,,
Risky Inc,RSKY,1000,10,5000,1000,20,6,2,,2
";

fn write_sheet() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SHEET.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_sheet_to_reports() {
    let file = write_sheet();
    let sheet = load_companies(file.path()).unwrap();
    assert_eq!(sheet.len(), 3);
    assert!(sheet.rejected.is_empty());

    let outcome = analyze_companies(sheet);
    assert!(outcome.is_clean());
    assert_eq!(outcome.reports.len(), 3);

    let acme = &outcome.reports[0];
    assert_eq!(acme.company.name, "Acme Holdings");
    assert_eq!(acme.result.market_cap, 10_000.0);
    let months = acme.result.months_to_cover.finite().unwrap();
    let days = acme.result.days_to_cover.finite().unwrap();
    assert!((days - months * DAYS_PER_MONTH).abs() < 1e-9);

    let discount = &outcome.reports[1];
    assert_eq!(discount.result.months_to_cover, Coverage::Uncoverable);
    assert_eq!(discount.result.risk_adjusted_days, Coverage::Uncoverable);

    let risky = &outcome.reports[2];
    let risky_days = risky.result.risk_adjusted_days.finite().unwrap();
    assert!((risky_days - days * 2.0).abs() < 1e-9);
}

#[test]
fn test_unreadable_row_is_reported_in_place() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}Quoted Corp,QTD,\"1,000\",10,\"5,000\",\"1,000\",20,6,2,,\n\
         Broken Corp,BRKN,\"1,0x0\",10,5000,1000,20,6,2,,\n",
        SHEET
    )
    .unwrap();
    file.flush().unwrap();

    let outcome = analyze_companies(load_companies(file.path()).unwrap());

    assert_eq!(outcome.reports.len(), 4);
    assert_eq!(outcome.reports[3].company.ticker, "QTD");
    assert_eq!(outcome.reports[3].result.market_cap, 10_000.0);

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].row, 4);
    assert_eq!(outcome.failures[0].ticker, "BRKN");
}

#[test]
fn test_projected_dates_follow_risk() {
    let file = write_sheet();
    let outcome = analyze_companies(load_companies(file.path()).unwrap());
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let acme = projected_coverage_date(today, outcome.reports[0].result.risk_adjusted_days);
    let risky = projected_coverage_date(today, outcome.reports[2].result.risk_adjusted_days);
    let discount = projected_coverage_date(today, outcome.reports[1].result.risk_adjusted_days);

    assert!(acme.unwrap() < risky.unwrap());
    assert_eq!(discount, None);
}
