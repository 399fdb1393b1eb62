//! Enumerated dataset identifiers and their fixed source metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// How the timestamp and value columns are located in the remote CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceColumns {
    /// First two columns, renamed
    Positional,
    /// Columns selected by header name
    Named { time: &'static str, value: &'static str },
}

/// A supported public dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetId {
    AirPassengers,
    Sunspots,
    CovidUs,
}

impl DatasetId {
    pub fn all() -> [DatasetId; 3] {
        [DatasetId::AirPassengers, DatasetId::Sunspots, DatasetId::CovidUs]
    }

    /// Identifier as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            DatasetId::AirPassengers => "air_passengers",
            DatasetId::Sunspots => "sunspots",
            DatasetId::CovidUs => "covid_us",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            DatasetId::AirPassengers => {
                "https://raw.githubusercontent.com/jbrownlee/Datasets/master/airline-passengers.csv"
            }
            DatasetId::Sunspots => {
                "https://raw.githubusercontent.com/jbrownlee/Datasets/master/monthly-sunspots.csv"
            }
            DatasetId::CovidUs => {
                "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us.csv"
            }
        }
    }

    /// File name of the local cache under the processed-data directory.
    pub fn cache_file(&self) -> &'static str {
        match self {
            DatasetId::AirPassengers => "air_passengers.csv",
            DatasetId::Sunspots => "sunspots.csv",
            DatasetId::CovidUs => "us_covid_daily.csv",
        }
    }

    /// Normalized timestamp column name.
    pub fn time_column(&self) -> &'static str {
        match self {
            DatasetId::AirPassengers | DatasetId::Sunspots => "Month",
            DatasetId::CovidUs => "Date",
        }
    }

    /// Normalized target column name.
    pub fn value_column(&self) -> &'static str {
        match self {
            DatasetId::AirPassengers => "Passengers",
            DatasetId::Sunspots => "Sunspots",
            DatasetId::CovidUs => "Cases",
        }
    }

    pub fn source_columns(&self) -> SourceColumns {
        match self {
            DatasetId::AirPassengers | DatasetId::Sunspots => SourceColumns::Positional,
            DatasetId::CovidUs => SourceColumns::Named {
                time: "date",
                value: "cases",
            },
        }
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetId {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DatasetId::all()
            .into_iter()
            .find(|id| id.name() == normalized)
            .ok_or_else(|| DatasetError::UnsupportedDataset(s.to_string()))
    }
}
