//! # nnraw core
//!
//! Reorganises downloaded medical-imaging datasets into the nnU-Net raw layout:
//! - destination layout creation ([`layout`])
//! - filename classification and renamed copies ([`convention`])
//! - `dataset.json` emission ([`descriptor`])
//! - built-in dataset presets ([`presets`]) and the end-to-end [`convert_dataset`]
//!
//! **No CLI concerns**: argument parsing and logging setup belong in `nnraw-cli`.

pub mod config;
pub mod constants;
pub mod convention;
pub mod convert;
pub mod descriptor;
mod error;
pub mod layout;
pub mod presets;

pub use config::{resolve_raw_root, ConvertConfig};
pub use convention::{CopyReport, SourceConvention};
pub use convert::{convert_dataset, ConversionSummary};
pub use descriptor::{write_dataset_json, ChannelNames, DatasetDescriptor, LabelMap};
pub use error::{ConvertError, ConvertResult};
pub use layout::{DatasetLayout, Role, Split};
pub use presets::DatasetPreset;

pub use nnraw_types::{CaseId, DatasetId, NonEmptyText};
