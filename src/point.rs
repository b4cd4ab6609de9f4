use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    decode::{decode, decode_abscissa, parse_base, DecodeError},
    interpolate::{
        check_consistency, ensure_distinct, interpolate, select, Consistency, InterpolationError,
    },
};

/// A share exactly as it arrives from the outside: a decimal x, the decimal
/// base of the y digits, and the y digits themselves.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RawShare {
    pub x: String,
    pub base: String,
    pub value: String,
}

impl RawShare {
    pub fn new(x: impl Into<String>, base: impl Into<String>, value: impl Into<String>) -> Self {
        RawShare {
            x: x.into(),
            base: base.into(),
            value: value.into(),
        }
    }
}

/// A decoded evaluation point `(x, f(x))`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Point {
    x: BigInt,
    y: BigInt,
}

impl Point {
    pub fn new(x: BigInt, y: BigInt) -> Self {
        Point { x, y }
    }

    pub fn decode(raw: &RawShare) -> Result<Self, DecodeError> {
        let x = decode_abscissa(&raw.x)?;
        let base = parse_base(&raw.base)?;
        let y = decode(&raw.value, base)?;
        Ok(Point { x, y })
    }

    pub fn x(&self) -> &BigInt {
        &self.x
    }

    pub fn y(&self) -> &BigInt {
        &self.y
    }
}

impl<X: Into<BigInt>, Y: Into<BigInt>> From<(X, Y)> for Point {
    fn from((x, y): (X, Y)) -> Self {
        Point::new(x.into(), y.into())
    }
}

#[derive(Debug, Error)]
pub enum PointSetError {
    #[error("share {index} (x = {x:?}) could not be decoded: {source}")]
    Decode {
        index: usize,
        x: String,
        #[source]
        source: DecodeError,
    },
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

/// The points available for reconstruction together with the declared share
/// count `n` and threshold `k`.
///
/// Reconstruction always uses the `k` points with the smallest x.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PointSet {
    points: Vec<Point>,
    n: usize,
    k: usize,
}

impl PointSet {
    pub fn new(points: Vec<Point>, n: usize, k: usize) -> Result<Self, InterpolationError> {
        if k == 0 {
            return Err(InterpolationError::ZeroThreshold);
        }
        if k > n {
            return Err(InterpolationError::ThresholdExceedsCount { k, n });
        }
        ensure_distinct(&points)?;
        Ok(PointSet { points, n, k })
    }

    pub fn from_raw(raw: &[RawShare], n: usize, k: usize) -> Result<Self, PointSetError> {
        let points = raw
            .iter()
            .enumerate()
            .map(|(index, share)| {
                Point::decode(share).map_err(|source| PointSetError::Decode {
                    index,
                    x: share.x.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PointSet::new(points, n, k)?)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn share_count(&self) -> usize {
        self.n
    }

    pub fn threshold(&self) -> usize {
        self.k
    }

    pub fn select(&self) -> Result<Vec<Point>, InterpolationError> {
        select(&self.points, self.k)
    }

    pub fn secret(&self) -> Result<BigInt, InterpolationError> {
        interpolate(&self.points, self.k)
    }

    pub fn check_consistency(&self) -> Result<Consistency, InterpolationError> {
        check_consistency(&self.points, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_fixture() -> Vec<RawShare> {
        vec![
            RawShare::new("1", "10", "4"),
            RawShare::new("2", "2", "111"),
            RawShare::new("3", "10", "12"),
            RawShare::new("6", "4", "213"),
        ]
    }

    #[test]
    fn decodes_raw_shares() {
        let set = PointSet::from_raw(&raw_fixture(), 4, 3).unwrap();
        let decoded: Vec<Point> = vec![(1, 4).into(), (2, 7).into(), (3, 12).into(), (6, 39).into()];
        assert_eq!(set.points(), decoded.as_slice());
        assert_eq!(set.share_count(), 4);
        assert_eq!(set.threshold(), 3);
        assert_eq!(set.secret().unwrap(), BigInt::from(3));
    }

    #[test]
    fn reports_which_share_failed_to_decode() {
        let mut raw = raw_fixture();
        raw[2] = RawShare::new("3", "2", "12");
        match PointSet::from_raw(&raw, 4, 3) {
            Err(PointSetError::Decode { index, x, source }) => {
                assert_eq!(index, 2);
                assert_eq!(x, "3");
                assert!(matches!(source, DecodeError::InvalidDigit { digit: '2', .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn threshold_bounds() {
        let points: Vec<Point> = vec![(1, 1).into(), (2, 2).into()];
        assert_eq!(
            PointSet::new(points.clone(), 2, 0),
            Err(InterpolationError::ZeroThreshold)
        );
        assert_eq!(
            PointSet::new(points.clone(), 2, 3),
            Err(InterpolationError::ThresholdExceedsCount { k: 3, n: 2 })
        );
        assert!(PointSet::new(points, 2, 2).is_ok());
    }

    #[test]
    fn rejects_repeated_abscissa() {
        let points: Vec<Point> = vec![(5, 1).into(), (2, 2).into(), (5, 3).into()];
        assert_eq!(
            PointSet::new(points, 3, 2),
            Err(InterpolationError::DuplicateAbscissa(BigInt::from(5)))
        );
    }

    #[test]
    fn declared_count_above_available_points() {
        let points: Vec<Point> = vec![(1, 4).into(), (2, 7).into()];
        let set = PointSet::new(points, 5, 3).unwrap();
        assert_eq!(
            set.secret(),
            Err(InterpolationError::InsufficientPoints {
                required: 3,
                provided: 2
            })
        );
    }
}
