//! Named numeric hyperparameters scoped to one model kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ModelKind;
use crate::error::{Result, TsError};

/// Mapping from parameter name to numeric value.
///
/// Produced by the hyperparameter search and consumed by the model factory.
/// Integer-valued parameters (ARIMA orders, seasonality toggles) are stored
/// as whole `f64` values and read back with [`HyperparameterSet::get_usize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterSet {
    kind: ModelKind,
    values: BTreeMap<String, f64>,
}

impl HyperparameterSet {
    /// Create an empty set (model defaults apply).
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value or a default when absent.
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    /// Read a non-negative whole-number parameter.
    pub fn get_usize(&self, name: &str) -> Result<Option<usize>> {
        match self.get(name) {
            None => Ok(None),
            Some(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as usize)),
            Some(v) => Err(TsError::InvalidParameter {
                name: name.to_string(),
                reason: format!("expected a non-negative integer, got {}", v),
            }),
        }
    }

    /// Read an on/off toggle (`0` off, anything else on).
    pub fn get_flag(&self, name: &str) -> Option<bool> {
        self.get(name).map(|v| v != 0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Values rendered as strings, for parameter logging.
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_uses_defaults() {
        let set = HyperparameterSet::new(ModelKind::Prophet);
        assert!(set.is_empty());
        assert_eq!(set.get_or("changepoint_prior_scale", 0.05), 0.05);
    }

    #[test]
    fn test_with_and_get() {
        let set = HyperparameterSet::new(ModelKind::Prophet)
            .with("changepoint_prior_scale", 0.1)
            .with("interval_width", 0.9);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("interval_width"), Some(0.9));
        assert_eq!(set.kind(), ModelKind::Prophet);
    }

    #[test]
    fn test_get_usize() {
        let set = HyperparameterSet::new(ModelKind::Arima)
            .with("p", 2.0)
            .with("d", 1.5)
            .with("q", -1.0);
        assert_eq!(set.get_usize("p").unwrap(), Some(2));
        assert!(set.get_usize("d").is_err());
        assert!(set.get_usize("q").is_err());
        assert_eq!(set.get_usize("missing").unwrap(), None);
    }

    #[test]
    fn test_get_flag() {
        let set = HyperparameterSet::new(ModelKind::Prophet)
            .with("yearly_seasonality", 1.0)
            .with("weekly_seasonality", 0.0);
        assert_eq!(set.get_flag("yearly_seasonality"), Some(true));
        assert_eq!(set.get_flag("weekly_seasonality"), Some(false));
        assert_eq!(set.get_flag("daily_seasonality"), None);
    }

    #[test]
    fn test_string_map_is_sorted() {
        let set = HyperparameterSet::new(ModelKind::Arima)
            .with("q", 1.0)
            .with("p", 2.0);
        let keys: Vec<_> = set.to_string_map().into_keys().collect();
        assert_eq!(keys, vec!["p".to_string(), "q".to_string()]);
    }
}
