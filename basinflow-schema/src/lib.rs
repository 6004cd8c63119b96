//! Parses a model YAML document and builds the `basinflow-core` runtime
//! types it describes: a `Network`, a `ClimateRegistry`, and a
//! `Timestepper`.

pub mod build;
pub mod error;
pub mod model;

use std::path::Path;

pub use build::BuiltModel;
pub use error::{Result, SchemaError};
pub use model::ModelSchema;

/// Parses `yaml` and builds its runtime model. `yaml_dir` is the directory
/// the document was loaded from, used to resolve relative CSV paths
/// (time-series columns, EAV tables).
pub fn load(yaml: &str, yaml_dir: &Path) -> Result<BuiltModel> {
    let model: ModelSchema = serde_yaml::from_str(yaml)?;
    build::build(&model, yaml_dir)
}
