use crate::selection::Role;
use thiserror::Error;

/// Failure to turn the text of one file into a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no header line")]
    EmptyFile,
    #[error("attribute \"{0}\" appears more than once in the header")]
    DuplicateAttribute(String),
}

/// Per-file failure during a load batch. None of these abort the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Unsupported file type: {file}. Please select TSV files only.")]
    UnsupportedFileType { file: String },
    #[error("File \"{file}\" is empty.")]
    EmptyFile { file: String },
    #[error("File \"{file}\" has a duplicated attribute \"{attribute}\". Skipping.")]
    DuplicateAttribute { file: String, attribute: String },
    #[error("File \"{file}\" has inconsistent headers. Skipping.")]
    SchemaMismatch {
        file: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("Error reading file: {file}")]
    Read { file: String, reason: String },
}

impl LoadError {
    pub fn parse(file: &str, e: ParseError) -> Self {
        match e {
            ParseError::EmptyFile => LoadError::EmptyFile { file: file.into() },
            ParseError::DuplicateAttribute(attribute) => LoadError::DuplicateAttribute {
                file: file.into(),
                attribute,
            },
        }
    }

    pub fn file(&self) -> &str {
        match self {
            LoadError::UnsupportedFileType { file }
            | LoadError::EmptyFile { file }
            | LoadError::DuplicateAttribute { file, .. }
            | LoadError::SchemaMismatch { file, .. }
            | LoadError::Read { file, .. } => file,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Attribute \"{attribute}\" is not available for {role}.")]
pub struct InvalidAttributeError {
    pub role: Role,
    pub attribute: String,
}

/// Failure of a user action on the explorer.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    InvalidAttribute(#[from] InvalidAttributeError),
    #[error(transparent)]
    Chart(#[from] anyhow::Error),
}
