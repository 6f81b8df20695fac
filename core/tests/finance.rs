//! Numeric helper tests — LTV clamps and guarded ratios.

use growthlens_core::finance::{
    ltv, ratio, ratio_pct, LTV_RETENTION_CEILING, LTV_RETENTION_FALLBACK,
};

/// LTV = ticket × margin / (1 − retention).
#[test]
fn ltv_formula() {
    assert!((ltv(200.0, 0.3, 0.5) - 120.0).abs() < 1e-12);
    assert!((ltv(100.0, 1.0, 0.2) - 125.0).abs() < 1e-12);
}

/// Retention at or above 1 is capped so the denominator never hits zero.
#[test]
fn ltv_caps_full_retention() {
    let expected = 100.0 * 0.5 / (1.0 - LTV_RETENTION_CEILING);
    assert!((ltv(100.0, 0.5, 1.0) - expected).abs() < 1e-9);
    assert!((ltv(100.0, 0.5, 3.0) - expected).abs() < 1e-9);
}

/// Zero, negative, and NaN retention use the documented 0.30 fallback.
#[test]
fn ltv_falls_back_on_degenerate_retention() {
    let expected = 100.0 * 0.5 / (1.0 - LTV_RETENTION_FALLBACK);
    assert!((ltv(100.0, 0.5, 0.0) - expected).abs() < 1e-9);
    assert!((ltv(100.0, 0.5, -0.4) - expected).abs() < 1e-9);
    assert!((ltv(100.0, 0.5, f64::NAN) - expected).abs() < 1e-9);
}

/// LTV never returns a non-finite value for finite ticket and margin.
#[test]
fn ltv_is_total() {
    for retention in [-1.0, 0.0, 0.5, 0.99, 1.0, 100.0, f64::NAN] {
        assert!(ltv(200.0, 0.3, retention).is_finite());
    }
}

/// Zero denominators resolve to zero instead of propagating infinity.
#[test]
fn ratios_guard_zero_denominators() {
    assert_eq!(ratio(100.0, 0.0), 0.0);
    assert_eq!(ratio_pct(100.0, 0.0), 0.0);
    assert_eq!(ratio(0.0, 0.0), 0.0);
}

/// Regular quotients pass through untouched.
#[test]
fn ratios_pass_finite_quotients() {
    assert!((ratio(2000.0, 1100.0) - 1.8181818181818181).abs() < 1e-12);
    assert!((ratio_pct(-500.0, 1100.0) - (-45.45454545454545)).abs() < 1e-9);
}

/// Quotients that overflow to infinity are suppressed to zero.
#[test]
fn ratios_suppress_overflow() {
    assert_eq!(ratio(1e308, 1e-308), 0.0);
}
