//! Evaluation errors

use crate::model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed corpus: {0}")]
    Csv(#[from] csv::Error),

    #[error("corpus is missing required column '{0}'")]
    MissingColumn(String),

    #[error("corpus has no usable rows")]
    EmptyCorpus,

    #[error(transparent)]
    Model(#[from] ModelError),
}
