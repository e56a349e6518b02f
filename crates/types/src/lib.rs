//! Validated value types shared across the nnraw crates.
//!
//! Each type checks its input once at construction so that downstream code can use the
//! value to build paths and descriptor entries without re-validating.

use std::fmt;

/// Errors that can occur when creating validated types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// A case identifier would escape its destination folder
    #[error("Case id must not contain path separators or be '.'/'..': '{0}'")]
    UnsafeCaseId(String),

    /// Dataset ids are rendered as three digits in the dataset folder name
    #[error("Dataset id must be between 0 and 999, got {0}")]
    DatasetIdOutOfRange(u32),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// The name a single imaging case takes in the output tree.
///
/// Unlike [`NonEmptyText`], a `CaseId` is kept exactly as extracted from the source filename
/// (no trimming, no numeric normalisation), so `"007"` and `"7"` stay distinct. It is used
/// directly as a file name component, so it never contains a path separator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseId(String);

impl CaseId {
    /// Validates an extracted case identifier.
    ///
    /// # Errors
    ///
    /// - [`TypeError::Empty`] if `input` is empty
    /// - [`TypeError::UnsafeCaseId`] if `input` contains `/` or `\`, or is `.`/`..`
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        if input.is_empty() {
            return Err(TypeError::Empty);
        }
        if input.contains(['/', '\\']) || input == "." || input == ".." {
            return Err(TypeError::UnsafeCaseId(input.to_owned()));
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name for channel `channel` of this case: `<case>_<NNNN><ext>`.
    pub fn image_file_name(&self, channel: u32, file_ending: &str) -> String {
        format!("{}_{:04}{}", self.0, channel, file_ending)
    }

    /// File name for the segmentation of this case: `<case><ext>`.
    pub fn label_file_name(&self, file_ending: &str) -> String {
        format!("{}{}", self.0, file_ending)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric dataset identifier embedded in `Dataset<NNN>_<TaskName>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatasetId(u16);

impl DatasetId {
    pub const MAX: u32 = 999;

    /// # Errors
    ///
    /// Returns [`TypeError::DatasetIdOutOfRange`] for values above 999.
    pub fn new(value: u32) -> Result<Self, TypeError> {
        if value > Self::MAX {
            return Err(TypeError::DatasetIdOutOfRange(value));
        }
        Ok(Self(value as u16))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Folder name for this id and `task_name`, e.g. `Dataset066_ImageCAS`.
    pub fn folder_name(self, task_name: &NonEmptyText) -> String {
        format!("Dataset{:03}_{}", self.0, task_name)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl TryFrom<u32> for DatasetId {
    type Error = TypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
