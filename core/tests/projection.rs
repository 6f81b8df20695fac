//! Growth projector tests — compounding cohorts, guards, validation.

use growthlens_core::{project, EngineError, FinancialParams, YearMonth};

fn base_params() -> FinancialParams {
    FinancialParams {
        cac: 100.0,
        cpv: 10.0,
        monthly_investment: 1000.0,
        margin: 0.3,
        monetization_investment: 0.0,
        projection_months: 1,
    }
}

fn anchor() -> YearMonth {
    YearMonth::new(2024, 1)
}

/// First simulated month: 10 new customers, nothing retained yet, and
/// the concrete financial arithmetic.
#[test]
fn first_month_financials() {
    let records = project(&base_params(), &[0.5], 200.0, anchor()).unwrap();
    assert_eq!(records.len(), 1);

    let m0 = &records[0];
    assert_eq!(m0.month.to_string(), "2024-02");
    assert_eq!(m0.new_customers, 10);
    assert_eq!(m0.retained_customers, 0);
    assert_eq!(m0.total_customers, 10);
    assert_eq!(m0.revenue, 2000.0);
    assert_eq!(m0.acquisition_cost, 1000.0);
    assert_eq!(m0.monetization_cost, 100.0);
    assert_eq!(m0.total_cost, 1100.0);
    assert_eq!(m0.profit, 2000.0 * 0.3 - 1100.0);
    assert!((m0.roi_pct - (-500.0 / 1100.0 * 100.0)).abs() < 1e-9);
    assert!((m0.roas - 2000.0 / 1100.0).abs() < 1e-9);
    assert!((m0.operational_margin_pct - (-25.0)).abs() < 1e-9);
    // LTV(200, 0.3, 0.5) = 200 × 0.3 / 0.5
    assert!((m0.ltv - 120.0).abs() < 1e-9);
}

/// Second month retains floor(10 × 0.5) = 5 from the month-0 cohort.
#[test]
fn second_month_compounds_prior_cohort() {
    let mut params = base_params();
    params.projection_months = 2;

    let records = project(&params, &[0.5], 200.0, anchor()).unwrap();
    let m1 = &records[1];
    assert_eq!(m1.month.to_string(), "2024-03");
    assert_eq!(m1.new_customers, 10);
    assert_eq!(m1.retained_customers, 5);
    assert_eq!(m1.total_customers, 15);
    assert_eq!(m1.revenue, 3000.0);
    // All retained customers come from prior cohorts, so the reported
    // retention is 5 / (15 - 10) = 100%.
    assert_eq!(m1.retention_rate_pct, 100.0);
}

/// Cohorts older than the curve contribute nothing.
#[test]
fn cohorts_beyond_curve_are_fully_churned() {
    let mut params = base_params();
    params.projection_months = 4;

    let records = project(&params, &[0.5], 200.0, anchor()).unwrap();
    // Month 3: cohorts aged 1, 2, 3; only age 1 is inside the curve.
    let m3 = &records[3];
    assert_eq!(m3.retained_customers, 5);
}

/// Longer curves keep contributing per cohort age.
#[test]
fn retained_sums_over_all_cohort_ages() {
    let mut params = base_params();
    params.projection_months = 3;

    let records = project(&params, &[0.5, 0.2], 200.0, anchor()).unwrap();
    // Month 2: age-1 cohort retains floor(10×0.5)=5, age-2 floor(10×0.2)=2.
    let m2 = &records[2];
    assert_eq!(m2.retained_customers, 7);
    assert_eq!(m2.total_customers, 17);
}

/// A zero-month horizon produces an empty sequence, not an error.
#[test]
fn zero_horizon_is_empty() {
    let mut params = base_params();
    params.projection_months = 0;

    let records = project(&params, &[0.5], 200.0, anchor()).unwrap();
    assert!(records.is_empty());
}

/// Non-positive CAC fails fast before simulation starts.
#[test]
fn non_positive_cac_fails_fast() {
    for cac in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let mut params = base_params();
        params.cac = cac;
        let err = project(&params, &[0.5], 200.0, anchor()).unwrap_err();
        assert!(
            matches!(err, EngineError::InvalidParameter { field: "cac", .. }),
            "cac {cac} should be rejected"
        );
    }
}

/// Margin is a fraction, not a percentage.
#[test]
fn margin_outside_unit_interval_rejected() {
    for margin in [-0.1, 1.5, f64::NAN] {
        let mut params = base_params();
        params.margin = margin;
        let err = project(&params, &[0.5], 200.0, anchor()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParameter { field: "margin", .. }
        ));
    }
}

/// The horizon is capped at 60 months.
#[test]
fn horizon_capped_at_sixty() {
    let mut params = base_params();
    params.projection_months = 61;
    let err = project(&params, &[0.5], 200.0, anchor()).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidParameter { field: "projection_months", .. }
    ));

    params.projection_months = 60;
    assert_eq!(project(&params, &[0.5], 200.0, anchor()).unwrap().len(), 60);
}

/// Every reported ratio stays finite, including with zero investment,
/// zero cpv, and an empty retention curve.
#[test]
fn ratios_always_finite() {
    let scenarios = [
        FinancialParams {
            monthly_investment: 0.0,
            cpv: 0.0,
            projection_months: 6,
            ..base_params()
        },
        FinancialParams {
            cpv: 0.0,
            projection_months: 6,
            ..base_params()
        },
    ];

    for params in &scenarios {
        for curve in [&[][..], &[0.5][..]] {
            let records = project(params, curve, 200.0, anchor()).unwrap();
            for r in &records {
                assert!(r.roi_pct.is_finite(), "roi not finite: {r:?}");
                assert!(r.roas.is_finite(), "roas not finite: {r:?}");
                assert!(r.operational_margin_pct.is_finite(), "margin not finite: {r:?}");
                assert!(r.retention_rate_pct.is_finite(), "retention not finite: {r:?}");
                assert!(r.ltv.is_finite(), "ltv not finite: {r:?}");
            }
        }
    }
}

/// With an empty curve, LTV falls back to the documented 0.30 retention.
#[test]
fn empty_curve_uses_ltv_fallback() {
    let records = project(&base_params(), &[], 200.0, anchor()).unwrap();
    let expected = 200.0 * 0.3 / (1.0 - 0.3);
    assert!((records[0].ltv - expected).abs() < 1e-9);
}

/// Month labels form a contiguous sequence starting the month after the
/// anchor, crossing year boundaries.
#[test]
fn month_labels_contiguous_from_anchor() {
    let mut params = base_params();
    params.projection_months = 3;

    let records = project(&params, &[0.5], 200.0, YearMonth::new(2024, 11)).unwrap();
    let labels: Vec<String> = records.iter().map(|r| r.month.to_string()).collect();
    assert_eq!(labels, vec!["2024-12", "2025-01", "2025-02"]);
}

/// Fractional acquisition floors toward zero.
#[test]
fn new_customers_floor_division() {
    let mut params = base_params();
    params.monthly_investment = 999.0;

    let records = project(&params, &[0.5], 200.0, anchor()).unwrap();
    assert_eq!(records[0].new_customers, 9);
}
