use thiserror::Error;
use crate::Float;

pub type Result<T> = std::result::Result<T, DiodemError>;

#[derive(Error, Debug)]
pub enum DiodemError {
    #[error("`exp_id`={0} was not found in repo")]
    UnknownExperiment(u32),
    #[error("motion `{motion}` not in {known:?}")]
    UnknownMotion { motion: String, known: Vec<String> },
    #[error("Empty sequence, stop < start ({start} > {stop})")]
    EmptyRange { start: String, stop: String },
    #[error("`vecinterp_method` must be one of ['linear', 'cubic'], got `{0}`")]
    UnsupportedInterpolationMethod(String),
    #[error("invalid signal shape {shape:?}: {reason}")]
    InvalidSignalShape { shape: Vec<usize>, reason: String },
    #[error("No clean crop possible: shortest_length={shortest_length}; hz={hz}")]
    NonCleanCrop { shortest_length: Float, hz: Float },
    #[error("404: file ({0}) not found")]
    NotFound(String),
    #[error("trees do not share the same structure at `{path}`")]
    TreeStructureMismatch { path: String },
    #[error("{what} declare different rates: {expected} Hz vs {found} Hz")]
    InconsistentRates { what: String, expected: Float, found: Float },
    #[error("missing `label: rate` header in {path}")]
    MalformedHeader { path: String },
    #[error("column `{column}` missing in {path}")]
    MissingColumn { path: String, column: String },
    #[error("cannot parse `{value}` in column `{column}` of {path}")]
    MalformedValue { path: String, column: String, value: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
