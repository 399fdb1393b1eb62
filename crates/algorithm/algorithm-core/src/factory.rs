//! Model factory
//!
//! Builds an untrained [`ForecastModel`] from a [`ModelKind`] and a
//! [`HyperparameterSet`]. Data compatibility is only checked at fit time.

use std::collections::BTreeMap;

use algorithm_spi::{
    Forecaster, HyperparameterSet, ModelKind, Predictor, Result, Timestamp, TsError,
};
use serde::{Deserialize, Serialize};

use crate::additive::{Prophet, ProphetParams};
use crate::regression::{Arima, AutoArima};

/// Any model the factory can build
///
/// Serialized with a `model` tag so a persisted file records its variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ForecastModel {
    Prophet(Prophet),
    Arima(Arima),
    AutoArima(AutoArima),
}

impl ForecastModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            ForecastModel::Prophet(_) => ModelKind::Prophet,
            ForecastModel::Arima(_) | ForecastModel::AutoArima(_) => ModelKind::Arima,
        }
    }

    /// Encode the model as JSON for persistence.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TsError::Serialization(e.to_string()))
    }

    /// Decode a model persisted with [`ForecastModel::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TsError::Serialization(e.to_string()))
    }
}

fn format_order(order: (usize, usize, usize)) -> String {
    format!("({}, {}, {})", order.0, order.1, order.2)
}

impl Forecaster for ForecastModel {
    fn fit_series(&mut self, ds: &[Timestamp], y: &[f64]) -> Result<()> {
        if ds.len() != y.len() {
            return Err(TsError::LengthMismatch {
                expected: ds.len(),
                actual: y.len(),
            });
        }
        match self {
            ForecastModel::Prophet(m) => m.fit_series(ds, y),
            // Autoregressive models only see the value sequence
            ForecastModel::Arima(m) => m.fit(y),
            ForecastModel::AutoArima(m) => m.fit(y),
        }
    }

    /// For autoregressive models the timestamps are treated as the next
    /// `ds.len()` steps after the history.
    fn predict_at(&self, ds: &[Timestamp]) -> Result<Vec<f64>> {
        match self {
            ForecastModel::Prophet(m) => m.predict_at(ds),
            ForecastModel::Arima(m) => m.predict(ds.len()),
            ForecastModel::AutoArima(m) => m.predict(ds.len()),
        }
    }

    fn predict_in_sample(&self) -> Result<Vec<f64>> {
        match self {
            ForecastModel::Prophet(m) => m.predict_in_sample(),
            ForecastModel::Arima(m) => m.fitted_values(),
            ForecastModel::AutoArima(m) => m.fitted_values(),
        }
    }

    fn is_fitted(&self) -> bool {
        match self {
            ForecastModel::Prophet(m) => Forecaster::is_fitted(m),
            ForecastModel::Arima(m) => Predictor::is_fitted(m),
            ForecastModel::AutoArima(m) => Predictor::is_fitted(m),
        }
    }

    fn describe(&self) -> BTreeMap<String, String> {
        match self {
            ForecastModel::Prophet(m) => m.describe(),
            ForecastModel::Arima(m) => BTreeMap::from([
                ("order".to_string(), format_order(m.order())),
                ("seasonal_order".to_string(), "(0, 0, 0, 0)".to_string()),
            ]),
            ForecastModel::AutoArima(m) => {
                let (sp, sd, sq, period) = m.seasonal_order();
                BTreeMap::from([
                    (
                        "order".to_string(),
                        m.order().map(format_order).unwrap_or_else(|| "auto".to_string()),
                    ),
                    (
                        "seasonal_order".to_string(),
                        format!("({}, {}, {}, {})", sp, sd, sq, period),
                    ),
                ])
            }
        }
    }
}

/// Constructs untrained models
pub struct ModelFactory;

impl ModelFactory {
    /// Build a model of `kind` configured from `params`.
    ///
    /// For ARIMA, a set carrying `p`, `d` and `q` yields a fixed-order model;
    /// otherwise the order is selected automatically at fit time.
    pub fn build(kind: ModelKind, params: &HyperparameterSet) -> Result<ForecastModel> {
        if params.kind() != kind {
            return Err(TsError::InvalidParameter {
                name: "kind".to_string(),
                reason: format!(
                    "parameters for {} cannot configure a {} model",
                    params.kind(),
                    kind
                ),
            });
        }

        match kind {
            ModelKind::Prophet => Ok(ForecastModel::Prophet(Prophet::new(
                ProphetParams::from_hyperparameters(params)?,
            )?)),
            ModelKind::Arima => {
                let order = (
                    params.get_usize("p")?,
                    params.get_usize("d")?,
                    params.get_usize("q")?,
                );
                match order {
                    (Some(p), Some(d), Some(q)) => Ok(ForecastModel::Arima(Arima::new(p, d, q)?)),
                    (None, None, None) => Ok(ForecastModel::AutoArima(AutoArima::new())),
                    _ => Err(TsError::InvalidParameter {
                        name: "order".to_string(),
                        reason: "p, d and q must be given together".to_string(),
                    }),
                }
            }
        }
    }

    /// Build a model with default parameters.
    pub fn default_for(kind: ModelKind) -> Result<ForecastModel> {
        Self::build(kind, &HyperparameterSet::new(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monthly(n: i32) -> Vec<Timestamp> {
        (0..n)
            .map(|m| {
                NaiveDate::from_ymd_opt(1960 + m / 12, (m % 12) as u32 + 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_default_models() {
        let prophet = ModelFactory::default_for(ModelKind::Prophet).unwrap();
        assert!(matches!(prophet, ForecastModel::Prophet(_)));
        assert_eq!(prophet.kind(), ModelKind::Prophet);

        let arima = ModelFactory::default_for(ModelKind::Arima).unwrap();
        assert!(matches!(arima, ForecastModel::AutoArima(_)));
        assert!(!arima.is_fitted());
    }

    #[test]
    fn test_fixed_order_arima() {
        let params = HyperparameterSet::new(ModelKind::Arima)
            .with("p", 2.0)
            .with("d", 1.0)
            .with("q", 0.0);
        let model = ModelFactory::build(ModelKind::Arima, &params).unwrap();
        assert_eq!(model.describe()["order"], "(2, 1, 0)");
    }

    #[test]
    fn test_partial_order_rejected() {
        let params = HyperparameterSet::new(ModelKind::Arima).with("p", 2.0);
        assert!(ModelFactory::build(ModelKind::Arima, &params).is_err());
    }

    #[test]
    fn test_kind_mismatch() {
        let params = HyperparameterSet::new(ModelKind::Prophet);
        assert!(matches!(
            ModelFactory::build(ModelKind::Arima, &params),
            Err(TsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_construction_does_not_validate_data() {
        // An order too large for any short series still constructs
        let params = HyperparameterSet::new(ModelKind::Arima)
            .with("p", 10.0)
            .with("d", 2.0)
            .with("q", 10.0);
        let mut model = ModelFactory::build(ModelKind::Arima, &params).unwrap();
        let ds = monthly(12);
        let y = vec![1.0; 12];
        assert!(matches!(
            model.fit_series(&ds, &y),
            Err(TsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_auto_arima_through_forecaster() {
        let ds = monthly(24);
        let y: Vec<f64> = (0..24).map(|i| 10.0 + i as f64).collect();
        let mut model = ModelFactory::default_for(ModelKind::Arima).unwrap();
        model.fit_series(&ds, &y).unwrap();

        assert_eq!(model.predict_in_sample().unwrap().len(), 24);
        assert_eq!(model.predict_at(&ds[..3]).unwrap().len(), 3);
        let description = model.describe();
        assert!(description["order"].starts_with('('));
        assert_eq!(description["seasonal_order"], "(0, 0, 0, 0)");
    }

    #[test]
    fn test_json_roundtrip_preserves_predictions() {
        let ds = monthly(36);
        let y: Vec<f64> = (0..36).map(|i| 100.0 + 2.0 * i as f64 + (i % 12) as f64).collect();
        let mut model = ModelFactory::default_for(ModelKind::Prophet).unwrap();
        model.fit_series(&ds, &y).unwrap();

        let json = model.to_json().unwrap();
        assert!(json.contains("\"model\": \"prophet\""));
        let restored = ForecastModel::from_json(&json).unwrap();
        let before = model.predict_in_sample().unwrap();
        let after = restored.predict_in_sample().unwrap();
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a - b).abs() < 1e-9 * a.abs().max(1.0));
        }
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ForecastModel::from_json("{not json"),
            Err(TsError::Serialization(_))
        ));
    }

    #[test]
    fn test_unfitted_prediction() {
        let fixed = HyperparameterSet::new(ModelKind::Arima)
            .with("p", 1.0)
            .with("d", 0.0)
            .with("q", 0.0);
        let models = [
            ModelFactory::default_for(ModelKind::Arima).unwrap(),
            ModelFactory::default_for(ModelKind::Prophet).unwrap(),
            ModelFactory::build(ModelKind::Arima, &fixed).unwrap(),
        ];
        let ds = monthly(2);
        for model in models {
            assert_eq!(model.predict_in_sample().unwrap_err(), TsError::NotFitted);
            assert_eq!(model.predict_at(&ds).unwrap_err(), TsError::NotFitted);
        }
    }
}
