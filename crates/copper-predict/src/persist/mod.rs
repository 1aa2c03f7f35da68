//! Native JSON model format.
//!
//! A native resource is a versioned envelope around one model body:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "model_type": "gbdt",
//!   "model": {
//!     "meta": {"task": "regression", "num_features": 18},
//!     "forest": {"trees": [...], "base_score": 0.0},
//!     "output_transform": "identity"
//!   }
//! }
//! ```
//!
//! Reading validates array lengths, tree structure, and that every split or
//! weight fits within `num_features`, so a returned [`ScoringModel`] is always
//! safe to score.

mod convert;
mod error;
pub mod schema;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use error::{ReadError, WriteError};

use crate::model::ScoringModel;
use schema::{GBDTModelSchema, GBLinearModelSchema, ModelEnvelope, SCHEMA_VERSION};

/// Convert an already-parsed JSON document into a model.
pub fn from_json_value(value: serde_json::Value) -> Result<ScoringModel, ReadError> {
    let envelope: ModelEnvelope = serde_json::from_value(value)?;

    if envelope.schema_version != SCHEMA_VERSION {
        return Err(ReadError::UnsupportedVersion {
            found: envelope.schema_version,
            supported: SCHEMA_VERSION,
        });
    }

    match envelope.model_type.as_str() {
        GBDTModelSchema::MODEL_TYPE => {
            let schema: GBDTModelSchema = serde_json::from_value(envelope.model)?;
            ScoringModel::try_from(schema)
        }
        GBLinearModelSchema::MODEL_TYPE => {
            let schema: GBLinearModelSchema = serde_json::from_value(envelope.model)?;
            ScoringModel::try_from(schema)
        }
        other => Err(ReadError::UnknownModelType(other.to_string())),
    }
}

/// Parse a model from a JSON string.
pub fn from_json_str(json: &str) -> Result<ScoringModel, ReadError> {
    from_json_value(serde_json::from_str(json)?)
}

/// Read a model from any reader.
pub fn read_json<R: Read>(reader: R) -> Result<ScoringModel, ReadError> {
    from_json_value(serde_json::from_reader(reader)?)
}

/// Load a model from a file.
pub fn load_json(path: impl AsRef<Path>) -> Result<ScoringModel, ReadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_json(BufReader::new(file))
}

/// Serialize a model into its envelope.
pub fn to_json_value(model: &ScoringModel) -> Result<serde_json::Value, WriteError> {
    let (model_type, body) = convert::model_to_parts(model)?;
    let envelope = ModelEnvelope {
        schema_version: SCHEMA_VERSION,
        model_type: model_type.to_string(),
        model: body,
    };
    Ok(serde_json::to_value(envelope)?)
}

/// Write a model as pretty-printed JSON.
pub fn write_json<W: Write>(model: &ScoringModel, writer: W) -> Result<(), WriteError> {
    serde_json::to_writer_pretty(writer, &to_json_value(model)?)?;
    Ok(())
}

/// Save a model to a file, replacing any existing content.
pub fn save_json(model: &ScoringModel, path: impl AsRef<Path>) -> Result<(), WriteError> {
    let path = path.as_ref();
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    write_json(model, &mut writer)?;
    writer.flush().map_err(io_err)
}
