//! Supported model kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TsError;

/// Forecasting model family selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// Additive trend + seasonality forecaster.
    Prophet,
    /// Autoregressive integrated moving average.
    Arima,
}

impl ModelKind {
    /// Display name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Prophet => "Prophet",
            ModelKind::Arima => "ARIMA",
        }
    }

    /// Lowercase name used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ModelKind::Prophet => "prophet",
            ModelKind::Arima => "arima",
        }
    }

    /// All supported kinds.
    pub fn all() -> [ModelKind; 2] {
        [ModelKind::Prophet, ModelKind::Arima]
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = TsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prophet" => Ok(ModelKind::Prophet),
            "arima" => Ok(ModelKind::Arima),
            _ => Err(TsError::UnsupportedModel(s.to_string())),
        }
    }
}
