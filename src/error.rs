use thiserror::Error;

use crate::template::TemplateError;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(
        "Invalid response. (Probably an error)\nCheck the URL and try again.\n\
         For a list of available APIs, see https://developers.google.com/apis-explorer\n\
         To find the discovery document URL, go to the API's documentation page \
         and look for the 'Discovery document' link."
    )]
    InvalidDescriptor,

    #[error("Required parameter '{parameter}' not found in parameter definition of '{method}'.")]
    MissingRequiredParameter { method: String, parameter: String },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("fetch descriptor: {0}")]
    Http(#[from] reqwest::Error),

    #[error("decode descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type GenerateResult<T> = Result<T, GenerateError>;
