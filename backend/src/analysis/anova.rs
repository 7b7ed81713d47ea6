//! One-way analysis of variance.
//!
//! ```text
//! SSB = Σ nᵢ (x̄ᵢ - x̄)²        df_between = k - 1
//! SSW = Σ Σ (xᵢⱼ - x̄ᵢ)²       df_within  = N - k
//! F   = (SSB / df_between) / (SSW / df_within)
//! p   = P(F(df_between, df_within) > F)
//! ```
//!
//! The F survival function is evaluated through the regularized incomplete
//! beta function:
//! `P(F > f) = I_x(d2/2, d1/2)` with `x = d2 / (d2 + d1·f)`.

use std::f64::consts::PI;

use super::stats::{mean, round_to};
use crate::config::SIGNIFICANCE_LEVEL;
use crate::models::AnovaResult;

/// Unrounded one-way ANOVA statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneWayAnova {
    pub f_statistic: f64,
    pub p_value: f64,
    pub df_between: f64,
    pub df_within: f64,
    pub ss_between: f64,
    pub ss_within: f64,
}

/// Run a one-way ANOVA over `groups`.
///
/// Returns `None` with fewer than two groups. Degenerate inputs follow the
/// usual conventions: no within-group degrees of freedom, or no variance at
/// all, give NaN for both F and p; zero within-group variance with distinct
/// group means gives `F = +inf`, `p = 0`.
pub fn one_way(groups: &[&[f64]]) -> Option<OneWayAnova> {
    if groups.len() < 2 {
        return None;
    }

    let all: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let grand_mean = mean(&all);
    let n = all.len() as f64;
    let k = groups.len() as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let group_mean = mean(group);
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1.0;
    let df_within = n - k;

    let (f_statistic, p_value) = if df_within <= 0.0 || (ss_between == 0.0 && ss_within == 0.0) {
        (f64::NAN, f64::NAN)
    } else if ss_within == 0.0 {
        (f64::INFINITY, 0.0)
    } else {
        let f = (ss_between / df_between) / (ss_within / df_within);
        (f, f_survival(f, df_between, df_within))
    };

    Some(OneWayAnova {
        f_statistic,
        p_value,
        df_between,
        df_within,
        ss_between,
        ss_within,
    })
}

/// ANOVA across month groups, rounded for reporting.
///
/// Fewer than two groups yields [`AnovaResult::neutral`].
pub fn test_groups(groups: &[&[f64]]) -> AnovaResult {
    match one_way(groups) {
        None => AnovaResult::neutral(),
        Some(anova) => AnovaResult {
            f_statistic: round_to(anova.f_statistic, 3),
            p_value: round_to(anova.p_value, 4),
            // NaN compares false
            significant: anova.p_value < SIGNIFICANCE_LEVEL,
        },
    }
}

/// Survival function `P(X > f)` of the F distribution with `d1`, `d2` degrees of freedom.
pub fn f_survival(f: f64, d1: f64, d2: f64) -> f64 {
    if f.is_nan() || d1 <= 0.0 || d2 <= 0.0 {
        return f64::NAN;
    }
    if f <= 0.0 {
        return 1.0;
    }
    if f.is_infinite() {
        return 0.0;
    }
    regularized_incomplete_beta(d2 / 2.0, d1 / 2.0, d2 / (d2 + d1 * f))
}

/// Regularized incomplete beta function `I_x(a, b)`.
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges quickly only below the mean of the
    // beta distribution; use the symmetry relation above it.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERATIONS: usize = 500;
    const EPSILON: f64 = 1e-15;
    const TINY: f64 = 1e-300;

    let clamp = |v: f64| if v.abs() < TINY { TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 / clamp(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        // even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / clamp(1.0 + aa * d);
        c = clamp(1.0 + aa / c);
        h *= d * c;

        // odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / clamp(1.0 + aa * d);
        c = clamp(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }

    h
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function (Lanczos approximation, g = 7).
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // reflection formula
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let sum = LANCZOS_COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, c)| acc + c / (x + i as f64));
    let t = x + LANCZOS_G + 0.5;

    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}
