//! Lagrange interpolation over the integers with exact rational accumulation.
//!
//! Every Lagrange term `y_i * Π(x - x_j) / Π(x_i - x_j)` is kept as an integer
//! fraction. Terms are summed over a common denominator and only the final sum
//! is required to be an integer.

use std::{collections::HashSet, fmt, ops::Add};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use thiserror::Error;

use crate::point::Point;

/// Number of selected points from which the per-point terms are computed in parallel.
pub const PARALLEL_TERMS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolationError {
    #[error("threshold must be at least 1")]
    ZeroThreshold,
    #[error("threshold {k} exceeds the declared share count {n}")]
    ThresholdExceedsCount { k: usize, n: usize },
    #[error("insufficient points: required {required}, provided {provided}")]
    InsufficientPoints { required: usize, provided: usize },
    #[error("two points share the abscissa x = {0}")]
    DuplicateAbscissa(BigInt),
    #[error("interpolated value {numerator}/{denominator} is not an integer; the points do not lie on one polynomial")]
    NonIntegralResult {
        numerator: BigInt,
        denominator: BigInt,
    },
}

/// An exact rational number in lowest terms with a positive denominator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fraction {
    numer: BigInt,
    denom: BigInt,
}

impl Fraction {
    /// `denom` must be non-zero.
    fn new(numer: BigInt, denom: BigInt) -> Self {
        debug_assert!(!denom.is_zero());
        let g = numer.gcd(&denom);
        let (mut numer, mut denom) = (numer / &g, denom / &g);
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        Fraction { numer, denom }
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    pub fn to_integer(&self) -> Option<BigInt> {
        self.is_integer().then(|| self.numer.clone())
    }
}

impl Zero for Fraction {
    fn zero() -> Self {
        Fraction {
            numer: BigInt::zero(),
            denom: BigInt::one(),
        }
    }

    fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Fraction {
            numer: value,
            denom: BigInt::one(),
        }
    }
}

impl Add for Fraction {
    type Output = Fraction;

    // a/b + c/d = (ad + cb) / bd
    fn add(self, rhs: Fraction) -> Fraction {
        if self.denom == rhs.denom {
            return Fraction::new(self.numer + rhs.numer, self.denom);
        }
        Fraction::new(
            &self.numer * &rhs.denom + &rhs.numer * &self.denom,
            self.denom * rhs.denom,
        )
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

pub(crate) fn ensure_distinct(points: &[Point]) -> Result<(), InterpolationError> {
    let mut seen = HashSet::with_capacity(points.len());
    for point in points {
        if !seen.insert(point.x()) {
            return Err(InterpolationError::DuplicateAbscissa(point.x().clone()));
        }
    }
    Ok(())
}

/// Picks the `k` points used for reconstruction: the first `k` after a stable
/// sort by ascending x.
pub fn select(points: &[Point], k: usize) -> Result<Vec<Point>, InterpolationError> {
    if k == 0 {
        return Err(InterpolationError::ZeroThreshold);
    }
    if points.len() < k {
        return Err(InterpolationError::InsufficientPoints {
            required: k,
            provided: points.len(),
        });
    }
    let mut ordered = points.to_vec();
    ordered.sort_by(|a, b| a.x().cmp(b.x()));
    ordered.truncate(k);
    ensure_distinct(&ordered)?;
    Ok(ordered)
}

fn lagrange_term(points: &[Point], i: usize, at: &BigInt) -> Fraction {
    let xi = points[i].x();
    let mut num = points[i].y().clone();
    let mut den = BigInt::one();

    for (j, pj) in points.iter().enumerate() {
        if i != j {
            num *= at - pj.x();
            den *= xi - pj.x();
        }
    }
    Fraction::new(num, den)
}

/// Sums the Lagrange terms of distinct `points` evaluated at `at`.
fn lagrange_sum(points: &[Point], at: &BigInt) -> Fraction {
    let terms: Vec<Fraction> = if points.len() >= PARALLEL_TERMS {
        (0..points.len())
            .into_par_iter()
            .map(|i| lagrange_term(points, i, at))
            .collect()
    } else {
        (0..points.len())
            .map(|i| lagrange_term(points, i, at))
            .collect()
    };

    terms.into_iter().fold(Fraction::zero(), |acc, term| acc + term)
}

/// Reconstructs `f(0)` from the `k` points chosen by [`select`], where `f` has
/// degree at most `k - 1`.
pub fn interpolate(points: &[Point], k: usize) -> Result<BigInt, InterpolationError> {
    let selected = select(points, k)?;
    integral(lagrange_sum(&selected, &BigInt::zero()))
}

fn integral(value: Fraction) -> Result<BigInt, InterpolationError> {
    if value.is_integer() {
        Ok(value.numer)
    } else {
        Err(InterpolationError::NonIntegralResult {
            numerator: value.numer,
            denominator: value.denom,
        })
    }
}

/// Evaluates the unique polynomial through all of `points` at `x`.
pub fn interpolate_at(points: &[Point], x: &BigInt) -> Result<Fraction, InterpolationError> {
    if points.is_empty() {
        return Err(InterpolationError::InsufficientPoints {
            required: 1,
            provided: 0,
        });
    }
    ensure_distinct(points)?;
    Ok(lagrange_sum(points, x))
}

/// A point left out of the selection that the interpolated polynomial misses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outlier {
    pub point: Point,
    pub interpolated: Fraction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consistency {
    pub secret: BigInt,
    pub selected: Vec<Point>,
    pub outliers: Vec<Outlier>,
}

impl Consistency {
    pub fn is_consistent(&self) -> bool {
        self.outliers.is_empty()
    }
}

/// Reconstructs the secret from the selected `k` points and checks every
/// remaining point against the same polynomial.
pub fn check_consistency(points: &[Point], k: usize) -> Result<Consistency, InterpolationError> {
    let selected = select(points, k)?;
    let secret = integral(lagrange_sum(&selected, &BigInt::zero()))?;

    let mut rest = points.to_vec();
    rest.sort_by(|a, b| a.x().cmp(b.x()));
    let outliers = rest
        .into_iter()
        .skip(k)
        .filter_map(|point| {
            let interpolated = lagrange_sum(&selected, point.x());
            if interpolated == Fraction::from(point.y().clone()) {
                None
            } else {
                Some(Outlier {
                    point,
                    interpolated,
                })
            }
        })
        .collect();

    Ok(Consistency {
        secret,
        selected,
        outliers,
    })
}
