use std::path::PathBuf;

use crate::layout::Split;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid value: {0}")]
    Type(#[from] nnraw_types::TypeError),
    #[error("source directory does not exist: {}", .0.display())]
    SourceDirMissing(PathBuf),
    #[error("failed to read source directory {}: {source}", path.display())]
    SourceDirRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create destination directory {}: {source}", path.display())]
    DestinationDirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("case '{case}' appears more than once in the {split} split ({} and {})", first.display(), second.display())]
    DuplicateCase {
        split: Split,
        case: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("masks {} and {} both belong to image '{image}'", first.display(), second.display())]
    DuplicateMask {
        image: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("invalid filename pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("failed to serialize dataset descriptor: {0}")]
    DescriptorSerialization(serde_json::Error),
    #[error("failed to write dataset descriptor {}: {source}", path.display())]
    DescriptorWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
