//! Single-predictor logistic regression with a Wald test on the slope
//!
//! The model `logit P(class = 1) = b0 + b1 * x` is fitted by Newton-Raphson
//! (iteratively reweighted least squares) from a zero start.

use statrs::distribution::{ContinuousCDF, Normal};

use super::NotScoreable;

/// Convergence tolerance on the largest parameter step
const TOLERANCE: f64 = 1e-8;

/// Determinant below which the information matrix is treated as singular
const SINGULAR_EPS: f64 = 1e-12;

/// Fitted coefficients with their standard errors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticFit {
    pub intercept: f64,
    pub slope: f64,
    pub slope_std_error: f64,
    pub iterations: usize,
}

/// Fit `class ~ 1 + x` and return the two-sided Wald p-value of the slope.
///
/// Rows with a missing predictor are excluded. The subset is unscoreable when the
/// predictor has fewer than two distinct values, when it separates the classes
/// (completely or quasi-completely), or when the fit does not converge.
pub fn logistic_wald_test(
    values: &[Option<f64>],
    class: &[u32],
    max_iterations: usize,
) -> Result<f64, NotScoreable> {
    let fit = fit_logistic(values, class, max_iterations)?;

    let z = fit.slope / fit.slope_std_error;
    if !z.is_finite() {
        return Err(NotScoreable::UndefinedStatistic);
    }

    let normal = Normal::new(0.0, 1.0).map_err(|_| NotScoreable::UndefinedStatistic)?;
    Ok((2.0 * normal.sf(z.abs())).clamp(0.0, 1.0))
}

/// Fit the single-predictor logistic model
pub fn fit_logistic(
    values: &[Option<f64>],
    class: &[u32],
    max_iterations: usize,
) -> Result<LogisticFit, NotScoreable> {
    let rows: Vec<(f64, f64)> = values
        .iter()
        .zip(class.iter())
        .filter_map(|(v, &c)| v.map(|x| (x, c as f64)))
        .collect();

    if !has_two_distinct(&rows) {
        return Err(NotScoreable::ConstantPredictor);
    }
    if is_separated(&rows) {
        return Err(NotScoreable::PerfectSeparation);
    }

    let mut beta = [0.0f64; 2];

    for iteration in 1..=max_iterations {
        let (gradient, info) = score_and_information(&rows, &beta);
        let inverse = invert_2x2(&info).ok_or(NotScoreable::SingularFit)?;

        let step = [
            inverse[0][0] * gradient[0] + inverse[0][1] * gradient[1],
            inverse[1][0] * gradient[0] + inverse[1][1] * gradient[1],
        ];
        beta[0] += step[0];
        beta[1] += step[1];

        if !beta[0].is_finite() || !beta[1].is_finite() {
            return Err(NotScoreable::NoConvergence { iterations: iteration });
        }

        if step[0].abs().max(step[1].abs()) < TOLERANCE {
            let (_, info) = score_and_information(&rows, &beta);
            let inverse = invert_2x2(&info).ok_or(NotScoreable::SingularFit)?;
            let variance = inverse[1][1];
            if variance <= 0.0 {
                return Err(NotScoreable::SingularFit);
            }

            return Ok(LogisticFit {
                intercept: beta[0],
                slope: beta[1],
                slope_std_error: variance.sqrt(),
                iterations: iteration,
            });
        }
    }

    Err(NotScoreable::NoConvergence {
        iterations: max_iterations,
    })
}

fn has_two_distinct(rows: &[(f64, f64)]) -> bool {
    match rows.first() {
        Some(&(first, _)) => rows.iter().any(|&(x, _)| x != first),
        None => false,
    }
}

/// True when one class lies entirely on one side of the other (ties allowed),
/// or when only one class is present. The maximum likelihood estimate does not
/// exist in either case.
fn is_separated(rows: &[(f64, f64)]) -> bool {
    let range = |label: f64| {
        rows.iter()
            .filter(|(_, y)| *y == label)
            .fold(None, |acc: Option<(f64, f64)>, &(x, _)| match acc {
                None => Some((x, x)),
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            })
    };

    match (range(0.0), range(1.0)) {
        (Some((min0, max0)), Some((min1, max1))) => max0 <= min1 || max1 <= min0,
        _ => true,
    }
}

/// Gradient of the log-likelihood and the Fisher information at `beta`
fn score_and_information(rows: &[(f64, f64)], beta: &[f64; 2]) -> ([f64; 2], [[f64; 2]; 2]) {
    let mut gradient = [0.0; 2];
    let mut info = [[0.0; 2]; 2];

    for &(x, y) in rows {
        let p = sigmoid(beta[0] + beta[1] * x);
        let w = p * (1.0 - p);
        let residual = y - p;

        gradient[0] += residual;
        gradient[1] += residual * x;
        info[0][0] += w;
        info[0][1] += w * x;
        info[1][1] += w * x * x;
    }
    info[1][0] = info[0][1];

    (gradient, info)
}

fn invert_2x2(m: &[[f64; 2]; 2]) -> Option<[[f64; 2]; 2]> {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    if !det.is_finite() || det.abs() < SINGULAR_EPS {
        return None;
    }
    Some([
        [m[1][1] / det, -m[0][1] / det],
        [-m[1][0] / det, m[0][0] / det],
    ])
}

fn sigmoid(eta: f64) -> f64 {
    if eta >= 0.0 {
        1.0 / (1.0 + (-eta).exp())
    } else {
        let e = eta.exp();
        e / (1.0 + e)
    }
}
