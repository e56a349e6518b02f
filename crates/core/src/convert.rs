//! End-to-end conversion of one raw dataset.

use crate::config::ConvertConfig;
use crate::convention::CopyReport;
use crate::descriptor::write_dataset_json;
use crate::layout::DatasetLayout;
use crate::presets::DatasetPreset;
use crate::{ConvertError, ConvertResult};
use nnraw_types::DatasetId;
use std::path::{Path, PathBuf};

/// Outcome of [`convert_dataset`].
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub layout: DatasetLayout,
    pub report: CopyReport,
    pub descriptor_path: PathBuf,
}

/// Convert the raw dataset at `source_root` using `preset`.
///
/// Creates `Dataset<NNN>_<TaskName>` under the configured raw root, copies every
/// recognised case into it and writes `dataset.json` last. Rerunning over an existing
/// output overwrites it in place. Nothing is rolled back on failure.
///
/// # Errors
///
/// Returns [`ConvertError::SourceDirMissing`] if `source_root` is not a directory, and
/// propagates layout, copy and descriptor errors.
pub fn convert_dataset(
    preset: &DatasetPreset,
    source_root: &Path,
    dataset_id: DatasetId,
    config: &ConvertConfig,
) -> ConvertResult<ConversionSummary> {
    if !source_root.is_dir() {
        return Err(ConvertError::SourceDirMissing(source_root.to_path_buf()));
    }

    tracing::info!(
        "converting {} from {} as dataset {}",
        preset.task_name,
        source_root.display(),
        dataset_id
    );

    let layout = DatasetLayout::create(config.raw_root(), dataset_id, &preset.task_name)?;
    let report = preset
        .convention
        .copy_files(source_root, &layout, preset.file_ending)?;
    let descriptor_path = write_dataset_json(layout.root(), &preset.descriptor(report.training_cases))?;

    tracing::info!(
        "copied {} training and {} test cases ({} files skipped)",
        report.training_cases,
        report.test_cases,
        report.skipped
    );

    Ok(ConversionSummary {
        layout,
        report,
        descriptor_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::{aorta_seg24, image_cas};
    use std::fs;
    use tempfile::TempDir;

    fn write_all(dir: &Path, names: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for name in names {
            fs::write(dir.join(name), format!("contents of {}", name)).unwrap();
        }
    }

    fn read_tree(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut out = Vec::new();
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                out.extend(read_tree(&path));
            } else {
                let bytes = fs::read(&path).unwrap();
                out.push((path, bytes));
            }
        }
        out.sort();
        out
    }

    #[test]
    fn test_convert_image_cas() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("ImageCAS");
        write_all(
            &source.join("training"),
            &["1.img.nii.gz", "1.label.nii.gz", "2.img.nii.gz", "2.label.nii.gz"],
        );
        write_all(&source.join("testing"), &["900.img.nii.gz", "900.label.nii.gz"]);
        let config = ConvertConfig::new(temp.path().join("raw")).unwrap();
        let preset = image_cas().unwrap();

        let summary =
            convert_dataset(&preset, &source, preset.default_dataset_id, &config).unwrap();

        assert!(summary.layout.root().ends_with("Dataset066_ImageCAS"));
        assert_eq!(summary.report.training_cases, 2);
        assert!(summary.layout.images_ts().join("900_0000.nii.gz").exists());
        assert!(summary.layout.labels_ts().join("900.nii.gz").exists());

        let descriptor: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary.descriptor_path).unwrap()).unwrap();
        assert_eq!(descriptor["numTraining"], 2);
        assert_eq!(descriptor["channel_names"]["0"], "CT");
        assert_eq!(descriptor["labels"]["CA"], 1);
        assert_eq!(descriptor["file_ending"], ".nii.gz");
    }

    #[test]
    fn test_convert_aorta_seg24_custom_id() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("AortaSeg24");
        write_all(
            &source.join("images"),
            &["subject001_CTA.mha", "subject042_CTA.mha"],
        );
        write_all(&source.join("masks"), &["subject001_label.mha"]);
        let config = ConvertConfig::new(temp.path().join("raw")).unwrap();
        let preset = aorta_seg24().unwrap();

        let summary =
            convert_dataset(&preset, &source, DatasetId::new(5).unwrap(), &config).unwrap();

        assert!(summary.layout.root().ends_with("Dataset005_AortaSeg24"));
        assert_eq!(summary.report.training_cases, 2);
        assert_eq!(summary.report.test_cases, 1);
        assert!(summary.layout.labels_tr().join("subject001_CTA.mha").exists());
        assert!(!summary.layout.labels_tr().join("subject042_CTA.mha").exists());

        let descriptor: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary.descriptor_path).unwrap()).unwrap();
        assert_eq!(descriptor["numTraining"], 2);
        assert_eq!(descriptor["labels"]["Zone11L"], 23);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        write_all(&source.join("training"), &["3.img.nii.gz", "3.label.nii.gz"]);
        write_all(&source.join("testing"), &["4.img.nii.gz"]);
        let config = ConvertConfig::new(temp.path().join("raw")).unwrap();
        let preset = image_cas().unwrap();

        let first = convert_dataset(&preset, &source, preset.default_dataset_id, &config).unwrap();
        let before = read_tree(first.layout.root());
        let second =
            convert_dataset(&preset, &source, preset.default_dataset_id, &config).unwrap();
        let after = read_tree(second.layout.root());

        assert_eq!(before, after);
        assert_eq!(first.report, second.report);
    }

    #[test]
    fn test_rerun_aorta_seg24_overwrites_both_splits() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("AortaSeg24");
        write_all(
            &source.join("images"),
            &["subject010_CTA.mha", "subject042_CTA.mha", "subject050_CTA.mha"],
        );
        write_all(
            &source.join("masks"),
            &["subject010_label.mha", "subject042_label.mha"],
        );
        let config = ConvertConfig::new(temp.path().join("raw")).unwrap();
        let preset = aorta_seg24().unwrap();

        let first = convert_dataset(&preset, &source, preset.default_dataset_id, &config).unwrap();
        let before = read_tree(first.layout.root());

        // stale output from an earlier run must be replaced
        fs::write(
            first.layout.images_ts().join("subject042_CTA_0000.mha"),
            "stale",
        )
        .unwrap();
        fs::write(first.layout.labels_tr().join("subject042_CTA.mha"), "stale").unwrap();

        let second =
            convert_dataset(&preset, &source, preset.default_dataset_id, &config).unwrap();
        let after = read_tree(second.layout.root());

        assert_eq!(before, after);
        assert_eq!(first.report, second.report);
        assert_eq!(second.report.training_cases, 2);
        assert_eq!(second.report.test_cases, 2);
        for dir in [second.layout.labels_tr(), second.layout.labels_ts()] {
            assert_eq!(
                fs::read(dir.join("subject042_CTA.mha")).unwrap(),
                b"contents of subject042_label.mha"
            );
        }
        assert_eq!(
            fs::read(second.layout.images_ts().join("subject042_CTA_0000.mha")).unwrap(),
            b"contents of subject042_CTA.mha"
        );
    }

    #[test]
    fn test_missing_source_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let config = ConvertConfig::new(temp.path().join("raw")).unwrap();
        let preset = image_cas().unwrap();

        let result = convert_dataset(
            &preset,
            &temp.path().join("missing"),
            preset.default_dataset_id,
            &config,
        );

        assert!(matches!(result, Err(ConvertError::SourceDirMissing(_))));
        assert!(!temp.path().join("raw").exists());
    }
}
