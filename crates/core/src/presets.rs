//! Built-in dataset conversions.
//!
//! A preset bundles everything a conversion needs besides the source path: the task name,
//! default dataset id, descriptor contents and the source naming convention.

use crate::convention::{NumberedConvention, PairedConvention, SourceConvention, SubjectRange};
use crate::descriptor::{ChannelNames, DatasetDescriptor, LabelMap};
use crate::ConvertResult;
use nnraw_types::{DatasetId, NonEmptyText};

/// AortaSeg24 foreground classes in label-value order, starting at 1.
const AORTASEG24_LABELS: [&str; 23] = [
    "Zone0",
    "Innominate",
    "Zone1",
    "Left_Common_Carotid",
    "Zone2",
    "Left_Subclavian_Artery",
    "Zone3",
    "Zone4",
    "Zone5",
    "Zone6",
    "Celiac_Artery",
    "Zone7",
    "SMA",
    "Zone8",
    "Right_Renal_Artery",
    "Left_Renal_Artery",
    "Zone9",
    "Zone10R",
    "Zone10L",
    "Right_Internal_Iliac_Artery",
    "Left_Internal_Iliac_Artery",
    "Zone11R",
    "Zone11L",
];

#[derive(Debug, Clone)]
pub struct DatasetPreset {
    /// Subcommand name, e.g. `imagecas`.
    pub key: &'static str,
    pub task_name: NonEmptyText,
    pub default_dataset_id: DatasetId,
    pub channel_names: ChannelNames,
    pub labels: LabelMap,
    pub file_ending: &'static str,
    pub convention: SourceConvention,
}

impl DatasetPreset {
    /// Descriptor for a conversion that copied `num_training` training cases.
    pub fn descriptor(&self, num_training: usize) -> DatasetDescriptor {
        let mut descriptor = DatasetDescriptor::new(
            self.channel_names.clone(),
            self.labels.clone(),
            self.file_ending,
            num_training,
        );
        descriptor.name = Some(self.task_name.to_string());
        descriptor
    }
}

/// Coronary artery segmentation in CT angiography, 66 by default.
pub fn image_cas() -> ConvertResult<DatasetPreset> {
    Ok(DatasetPreset {
        key: "imagecas",
        task_name: NonEmptyText::new("ImageCAS")?,
        default_dataset_id: DatasetId::new(66)?,
        channel_names: ChannelNames::single("CT")?,
        labels: LabelMap::from_foreground(["CA"])?,
        file_ending: ".nii.gz",
        convention: SourceConvention::Numbered(NumberedConvention::new(
            ".img.nii.gz",
            ".label.nii.gz",
        )),
    })
}

/// Aortic branch and zone segmentation, 123 by default.
///
/// Subjects 41 to 43 fall in both the train and the test range of the source release and
/// are copied into both splits.
pub fn aorta_seg24() -> ConvertResult<DatasetPreset> {
    Ok(DatasetPreset {
        key: "aortaseg24",
        task_name: NonEmptyText::new("AortaSeg24")?,
        default_dataset_id: DatasetId::new(123)?,
        channel_names: ChannelNames::single("CTA")?,
        labels: LabelMap::from_foreground(AORTASEG24_LABELS)?,
        file_ending: ".mha",
        convention: SourceConvention::Paired(PairedConvention {
            images_dir: "images".into(),
            labels_dir: "masks".into(),
            image_token: "_CTA".into(),
            label_token: "_label".into(),
            subject_prefix: "subject".into(),
            train: SubjectRange::up_to(43),
            test: SubjectRange::new(41, 53),
        }),
    })
}

/// Every built-in preset.
pub fn all() -> ConvertResult<Vec<DatasetPreset>> {
    Ok(vec![image_cas()?, aorta_seg24()?])
}
