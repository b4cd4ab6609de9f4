//! JSON test-case documents.
//!
//! A document carries a `keys` object with the share count `n` and threshold
//! `k`; every other top-level entry is keyed by a decimal x-coordinate and maps
//! to `{ "base": ..., "value": ... }`.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::point::{PointSet, PointSetError, RawShare};

#[derive(Debug, Error)]
pub enum TestCaseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed test case: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    PointSet(#[from] PointSetError),
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Keys {
    pub n: usize,
    pub k: usize,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EncodedRoot {
    #[serde(deserialize_with = "base_from_text_or_number")]
    pub base: String,
    pub value: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TestCase {
    pub keys: Keys,
    #[serde(flatten)]
    pub roots: BTreeMap<String, EncodedRoot>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(u64),
}

fn base_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}

impl TestCase {
    #[instrument(level = "debug")]
    pub fn from_path(path: &Path) -> Result<Self, TestCaseError> {
        let data = fs::read_to_string(path).map_err(|source| TestCaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        data.parse()
    }

    pub fn raw_shares(&self) -> Vec<RawShare> {
        self.roots
            .iter()
            .map(|(x, root)| RawShare::new(x, &root.base, &root.value))
            .collect()
    }

    pub fn to_point_set(&self) -> Result<PointSet, TestCaseError> {
        if self.roots.len() != self.keys.n {
            warn!(
                declared = self.keys.n,
                found = self.roots.len(),
                "number of roots differs from the declared share count"
            );
        }
        let set = PointSet::from_raw(&self.raw_shares(), self.keys.n, self.keys.k)?;
        for point in set.points() {
            debug!(x = %point.x(), y = %point.y(), "decoded point");
        }
        Ok(set)
    }
}

impl FromStr for TestCase {
    type Err = TestCaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::*;
    use crate::{decode::DecodeError, interpolate::InterpolationError};

    const SAMPLE: &str = r#"{
        "keys": { "n": 4, "k": 3 },
        "1": { "base": "10", "value": "4" },
        "2": { "base": "2", "value": "111" },
        "3": { "base": "10", "value": "12" },
        "6": { "base": "4", "value": "213" }
    }"#;

    #[test]
    fn parses_dynamic_root_keys() {
        let case: TestCase = SAMPLE.parse().unwrap();
        assert_eq!(case.keys, Keys { n: 4, k: 3 });
        assert_eq!(case.roots.len(), 4);
        assert_eq!(
            case.roots["2"],
            EncodedRoot {
                base: "2".to_string(),
                value: "111".to_string()
            }
        );
        let set = case.to_point_set().unwrap();
        assert_eq!(set.secret().unwrap(), BigInt::from(3));
    }

    #[test]
    fn numeric_base_is_accepted() {
        let case: TestCase =
            r#"{ "keys": { "n": 1, "k": 1 }, "5": { "base": 16, "value": "ff" } }"#
                .parse()
                .unwrap();
        assert_eq!(case.roots["5"].base, "16");
        assert_eq!(case.to_point_set().unwrap().secret().unwrap(), BigInt::from(255));
    }

    #[test]
    fn digit_strings_keep_leading_zeros() {
        let case: TestCase =
            r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "8", "value": "0017" } }"#
                .parse()
                .unwrap();
        assert_eq!(case.roots["1"].value, "0017");
        assert_eq!(case.to_point_set().unwrap().secret().unwrap(), BigInt::from(15));
    }

    #[test]
    fn missing_keys_is_malformed() {
        let err = r#"{ "1": { "base": "10", "value": "4" } }"#
            .parse::<TestCase>()
            .unwrap_err();
        assert!(matches!(err, TestCaseError::Json(_)));
    }

    #[test]
    fn malformed_root_entry() {
        let err = r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "10" } }"#
            .parse::<TestCase>()
            .unwrap_err();
        assert!(matches!(err, TestCaseError::Json(_)));
    }

    #[test]
    fn non_decimal_root_key() {
        let case: TestCase =
            r#"{ "keys": { "n": 1, "k": 1 }, "one": { "base": "10", "value": "4" } }"#
                .parse()
                .unwrap();
        let err = case.to_point_set().unwrap_err();
        assert!(matches!(
            err,
            TestCaseError::PointSet(PointSetError::Decode {
                source: DecodeError::InvalidDigit { digit: 'o', .. },
                ..
            })
        ));
    }

    #[test]
    fn threshold_above_share_count() {
        let case: TestCase =
            r#"{ "keys": { "n": 1, "k": 2 }, "1": { "base": "10", "value": "4" } }"#
                .parse()
                .unwrap();
        assert!(matches!(
            case.to_point_set(),
            Err(TestCaseError::PointSet(PointSetError::Interpolation(
                InterpolationError::ThresholdExceedsCount { k: 2, n: 1 }
            )))
        ));
    }

    #[test]
    fn missing_file() {
        let err = TestCase::from_path(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, TestCaseError::Io { .. }));
    }
}
