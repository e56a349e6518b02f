//! Dataset descriptor (`dataset.json`) construction and writing.
//!
//! The descriptor tells the training framework how many channels each case has, what each
//! label value means, which file ending the volumes use and how many training cases exist.
//!
//! Example output:
//!
//! ```json
//! {
//!   "channel_names": { "0": "CT" },
//!   "labels": { "background": 0, "CA": 1 },
//!   "numTraining": 800,
//!   "file_ending": ".nii.gz",
//!   "licence": "...",
//!   "converted_by": "..."
//! }
//! ```

use crate::constants::{
    BACKGROUND_LABEL, DATASET_JSON_FILENAME, DEFAULT_CONVERTED_BY, DEFAULT_LICENCE,
};
use crate::{ConvertError, ConvertResult};
use nnraw_types::NonEmptyText;
use serde::ser::SerializeMap;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Channel index to modality name, serialised with string keys in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelNames(Vec<(u32, NonEmptyText)>);

impl ChannelNames {
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidInput`] if `channels` is empty or repeats an index.
    pub fn new(channels: Vec<(u32, NonEmptyText)>) -> ConvertResult<Self> {
        if channels.is_empty() {
            return Err(ConvertError::InvalidInput(
                "at least one channel is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for (index, _) in &channels {
            if !seen.insert(*index) {
                return Err(ConvertError::InvalidInput(format!(
                    "channel {} is declared more than once",
                    index
                )));
            }
        }
        Ok(Self(channels))
    }

    /// A single-channel mapping `{0: modality}`.
    pub fn single(modality: &str) -> ConvertResult<Self> {
        Self::new(vec![(0, NonEmptyText::new(modality)?)])
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: u32) -> Option<&NonEmptyText> {
        self.0.iter().find(|(i, _)| *i == index).map(|(_, name)| name)
    }
}

impl serde::Serialize for ChannelNames {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, name) in &self.0 {
            map.serialize_entry(&index.to_string(), name)?;
        }
        map.end()
    }
}

/// Label name to integer value, in declared order.
///
/// Always contains `background -> 0`. Names and values are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap(Vec<(NonEmptyText, u32)>);

impl LabelMap {
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidInput`] if:
    /// - `background` is missing or not mapped to 0
    /// - a name or a value appears twice
    pub fn new(labels: Vec<(NonEmptyText, u32)>) -> ConvertResult<Self> {
        check_unique_labels(&labels)?;

        let background = labels
            .iter()
            .find(|(name, _)| name.as_str() == BACKGROUND_LABEL)
            .map(|(_, value)| *value);
        match background {
            Some(0) => Ok(Self(labels)),
            Some(other) => Err(ConvertError::InvalidInput(format!(
                "'{}' must map to 0, got {}",
                BACKGROUND_LABEL, other
            ))),
            None => Err(ConvertError::InvalidInput(format!(
                "label map must contain '{}'",
                BACKGROUND_LABEL
            ))),
        }
    }

    /// Build from foreground names, numbered 1.. in order after `background -> 0`.
    pub fn from_foreground<I, S>(names: I) -> ConvertResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels = vec![(NonEmptyText::new(BACKGROUND_LABEL)?, 0)];
        for (value, name) in (1u32..).zip(names) {
            labels.push((NonEmptyText::new(name)?, value));
        }
        Self::new(labels)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn value_of(&self, name: &str) -> Option<u32> {
        self.0
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| *v)
    }
}

fn check_unique_labels(labels: &[(NonEmptyText, u32)]) -> ConvertResult<()> {
    let mut names = HashSet::new();
    let mut values = HashSet::new();
    for (name, value) in labels {
        if !names.insert(name.as_str()) {
            return Err(ConvertError::InvalidInput(format!(
                "label '{}' is declared more than once",
                name
            )));
        }
        if !values.insert(*value) {
            return Err(ConvertError::InvalidInput(format!(
                "label value {} is used more than once",
                value
            )));
        }
    }
    Ok(())
}

impl serde::Serialize for LabelMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Contents of `dataset.json`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatasetDescriptor {
    pub channel_names: ChannelNames,
    pub labels: LabelMap,
    #[serde(rename = "numTraining")]
    pub num_training: usize,
    pub file_ending: String,
    pub licence: String,
    pub converted_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite_image_reader_writer: Option<String>,
}

impl DatasetDescriptor {
    /// Descriptor with the required fields set and every optional field empty.
    pub fn new(
        channel_names: ChannelNames,
        labels: LabelMap,
        file_ending: impl Into<String>,
        num_training: usize,
    ) -> Self {
        Self {
            channel_names,
            labels,
            num_training,
            file_ending: file_ending.into(),
            licence: DEFAULT_LICENCE.into(),
            converted_by: DEFAULT_CONVERTED_BY.into(),
            name: None,
            description: None,
            reference: None,
            release: None,
            citation: None,
            overwrite_image_reader_writer: None,
        }
    }
}

/// Write `descriptor` as `<output_dir>/dataset.json`, replacing any existing file.
///
/// # Returns
///
/// The path of the written descriptor.
///
/// # Errors
///
/// - [`ConvertError::DescriptorSerialization`] if the descriptor cannot be encoded
/// - [`ConvertError::DescriptorWrite`] if the file cannot be written
pub fn write_dataset_json(
    output_dir: &Path,
    descriptor: &DatasetDescriptor,
) -> ConvertResult<PathBuf> {
    let json = serde_json::to_string_pretty(descriptor)
        .map_err(ConvertError::DescriptorSerialization)?;
    let path = output_dir.join(DATASET_JSON_FILENAME);
    fs::write(&path, json).map_err(|source| ConvertError::DescriptorWrite {
        path: path.clone(),
        source,
    })?;
    tracing::info!(
        "wrote {} ({} training cases)",
        path.display(),
        descriptor.num_training
    );
    Ok(path)
}
