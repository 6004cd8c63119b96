use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

/// Top-level error type for everything that can go wrong once a network has
/// been built: reference resolution that only becomes checkable against the
/// concrete graph, cycle detection, and runtime component failures.
///
/// Errors that can only be detected while parsing a model document (unknown
/// component type, missing field, malformed YAML) live in
/// `basinflow-schema`'s `SchemaError` and wrap this type via `#[from]`.
#[derive(Error, Debug)]
pub enum BasinflowError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("reference error: component `{component}` has no output named `{output}`")]
    UndefinedReference { component: String, output: String },

    #[error("reference error: no component named `{0}`")]
    UndefinedComponent(String),

    #[error("cycle error: the network contains one or more cycles that cannot be broken by a lagged-value component: {cycles:?}")]
    Cycle { cycles: Vec<Vec<String>> },

    #[error("simulation error: component `{component}` failed on {date}: {source}")]
    Simulation {
        component: String,
        date: NaiveDate,
        inputs: HashMap<String, f64>,
        #[source]
        source: Box<BasinflowError>,
    },

    #[error("data error: no value for `{series}` on {date}")]
    MissingDataPoint { series: String, date: NaiveDate },

    #[error("data error: {0}")]
    Data(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, BasinflowError>;
