//! Constants used throughout the nnraw core crate.
//!
//! Folder and file names follow the layout the nnU-Net raw data loader expects.

/// Training images folder inside a dataset root.
pub const IMAGES_TR_DIR_NAME: &str = "imagesTr";

/// Training labels folder inside a dataset root.
pub const LABELS_TR_DIR_NAME: &str = "labelsTr";

/// Test images folder inside a dataset root.
pub const IMAGES_TS_DIR_NAME: &str = "imagesTs";

/// Test labels folder inside a dataset root.
pub const LABELS_TS_DIR_NAME: &str = "labelsTs";

/// Filename of the dataset descriptor.
pub const DATASET_JSON_FILENAME: &str = "dataset.json";

/// Environment variable naming the raw data root.
pub const RAW_ROOT_ENV_VAR: &str = "nnUNet_raw";

/// Raw data root used when neither the CLI nor the environment provide one.
pub const DEFAULT_RAW_ROOT: &str = "nnUNet_raw";

/// Channel index every single-modality image is written as.
pub const SINGLE_CHANNEL: u32 = 0;

/// Label name that must always map to 0.
pub const BACKGROUND_LABEL: &str = "background";

/// Descriptor licence used when a preset does not set one.
pub const DEFAULT_LICENCE: &str = "Whoever converted this dataset was lazy and didn't look it up!";

/// Descriptor `converted_by` used when a preset does not set one.
pub const DEFAULT_CONVERTED_BY: &str =
    "Please enter your name, especially when sharing datasets with others in a common infrastructure!";
