//! Flat `images/` and `masks/` folders, split into train and test by subject number.
//!
//! Images are named like `subject001_CTA.mha` and their masks `subject001_label.mha`. The
//! mask for an image is found by swapping the label token for the image token in the mask's
//! file name. The case id is the image file stem (`subject001_CTA`).
//!
//! The train and test ranges are inclusive and may overlap; a subject inside both ranges is
//! copied into both splits.

use super::{copy_split, file_name_str, list_files, CopyReport, SplitFiles};
use crate::layout::{DatasetLayout, Role, Split};
use crate::{ConvertError, ConvertResult};
use nnraw_types::CaseId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Inclusive range of subject numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRange(RangeInclusive<u32>);

impl SubjectRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self(start..=end)
    }

    /// Every subject number up to and including `end`.
    pub fn up_to(end: u32) -> Self {
        Self(0..=end)
    }

    pub fn contains(&self, subject: u32) -> bool {
        self.0.contains(&subject)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedConvention {
    pub images_dir: String,
    pub labels_dir: String,
    /// Role token in image file names, e.g. `_CTA`.
    pub image_token: String,
    /// Role token in mask file names, e.g. `_label`.
    pub label_token: String,
    /// Text preceding the subject number in a file stem, e.g. `subject`.
    pub subject_prefix: String,
    pub train: SubjectRange,
    pub test: SubjectRange,
}

impl PairedConvention {
    /// Copy `images/` and their matching `masks/` under `source_root` into `layout`.
    ///
    /// Only files ending in `file_ending` are considered. Images without a parseable
    /// subject number, or whose number lies in neither range, are skipped. Images without a
    /// mask are copied alone.
    pub fn copy_files(
        &self,
        source_root: &Path,
        layout: &DatasetLayout,
        file_ending: &str,
    ) -> ConvertResult<CopyReport> {
        let mut report = CopyReport::default();
        let images = files_with_ending(&source_root.join(&self.images_dir), file_ending)?;
        let masks = files_with_ending(&source_root.join(&self.labels_dir), file_ending)?;
        let mut masks_by_image = self.index_masks(masks)?;

        let mut train = SplitFiles::new(Split::Train);
        let mut test = SplitFiles::new(Split::Test);

        for image in images {
            let Some((case, subject)) = self.parse_image(&image, file_ending) else {
                tracing::debug!("skipping unrecognised image {}", image.display());
                report.skipped += 1;
                continue;
            };

            let mask = file_name_str(&image).and_then(|name| masks_by_image.remove(name));
            let mut placed = false;
            for (range, files) in [(&self.train, &mut train), (&self.test, &mut test)] {
                if range.contains(subject) {
                    files.insert(case.clone(), Role::Image, image.clone())?;
                    if let Some(mask) = &mask {
                        files.insert(case.clone(), Role::Label, mask.clone())?;
                    }
                    placed = true;
                }
            }

            if !placed {
                tracing::debug!(
                    "skipping {}: subject {} is outside both ranges",
                    image.display(),
                    subject
                );
                report.skipped += 1;
            }
        }

        for mask in masks_by_image.values() {
            tracing::debug!("skipping mask {}: no matching image", mask.display());
            report.skipped += 1;
        }

        for files in [train, test] {
            tracing::info!(
                "{}: {} images, {} labels",
                files.split(),
                files.image_count(),
                files.label_count()
            );
            copy_split(files, layout, file_ending, &mut report)?;
        }

        Ok(report)
    }

    /// Map each mask to the image file name it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::DuplicateMask`] if two masks map to the same image.
    fn index_masks(&self, masks: Vec<PathBuf>) -> ConvertResult<HashMap<String, PathBuf>> {
        let mut masks_by_image: HashMap<String, PathBuf> = HashMap::new();
        for mask in masks {
            let Some(name) = file_name_str(&mask) else {
                continue;
            };
            let image = name.replace(&self.label_token, &self.image_token);
            match masks_by_image.entry(image) {
                Entry::Occupied(existing) => {
                    return Err(ConvertError::DuplicateMask {
                        image: existing.key().clone(),
                        first: existing.get().clone(),
                        second: mask,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(mask);
                }
            }
        }
        Ok(masks_by_image)
    }

    /// Case id and subject number of an image, if its name follows the convention.
    fn parse_image(&self, image: &Path, file_ending: &str) -> Option<(CaseId, u32)> {
        let stem = file_name_str(image)?.strip_suffix(file_ending)?;
        let subject = self.subject_number(stem)?;
        let case = CaseId::parse(stem).ok()?;
        Some((case, subject))
    }

    /// Digits between the subject prefix and the next `_`, e.g. `subject042_CTA` gives 42.
    fn subject_number(&self, stem: &str) -> Option<u32> {
        let (_, after) = stem.split_once(&self.subject_prefix)?;
        let digits = after.split('_').next()?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

/// Non-hidden files in `dir` whose name ends with `file_ending`, sorted.
fn files_with_ending(dir: &Path, file_ending: &str) -> ConvertResult<Vec<PathBuf>> {
    Ok(list_files(dir)?
        .into_iter()
        .filter(|path| {
            file_name_str(path)
                .is_some_and(|name| !name.starts_with('.') && name.ends_with(file_ending))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nnraw_types::{DatasetId, NonEmptyText};
    use std::fs;
    use tempfile::TempDir;

    fn convention() -> PairedConvention {
        PairedConvention {
            images_dir: "images".into(),
            labels_dir: "masks".into(),
            image_token: "_CTA".into(),
            label_token: "_label".into(),
            subject_prefix: "subject".into(),
            train: SubjectRange::up_to(43),
            test: SubjectRange::new(41, 53),
        }
    }

    fn setup(root: &Path, images: &[&str], masks: &[&str]) -> DatasetLayout {
        let src = root.join("src");
        for (dir, names) in [("images", images), ("masks", masks)] {
            fs::create_dir_all(src.join(dir)).unwrap();
            for name in names {
                fs::write(src.join(dir).join(name), name.as_bytes()).unwrap();
            }
        }
        DatasetLayout::create(
            &root.join("raw"),
            DatasetId::new(123).unwrap(),
            &NonEmptyText::new("AortaSeg24").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_subject_number() {
        let c = convention();
        assert_eq!(c.subject_number("subject001_CTA"), Some(1));
        assert_eq!(c.subject_number("subject42_CTA"), Some(42));
        assert_eq!(c.subject_number("subject42"), Some(42));
        assert_eq!(c.subject_number("patient42_CTA"), None);
        assert_eq!(c.subject_number("subject_CTA"), None);
        assert_eq!(c.subject_number("subjectX1_CTA"), None);
    }

    #[test]
    fn test_subject_ranges_are_inclusive() {
        let c = convention();
        assert!(c.train.contains(0));
        assert!(c.train.contains(43));
        assert!(!c.train.contains(44));
        assert!(c.test.contains(41));
        assert!(c.test.contains(53));
        assert!(!c.test.contains(40));
        assert!(!c.test.contains(54));
    }

    #[test]
    fn test_training_pair_is_renamed_by_stem() {
        let temp = TempDir::new().unwrap();
        let layout = setup(temp.path(), &["subject001_CTA.mha"], &["subject001_label.mha"]);

        let report = convention()
            .copy_files(&temp.path().join("src"), &layout, ".mha")
            .unwrap();

        assert_eq!(report.training_cases, 1);
        assert_eq!(
            fs::read(layout.images_tr().join("subject001_CTA_0000.mha")).unwrap(),
            b"subject001_CTA.mha"
        );
        assert_eq!(
            fs::read(layout.labels_tr().join("subject001_CTA.mha")).unwrap(),
            b"subject001_label.mha"
        );
    }

    #[test]
    fn test_image_only_case() {
        let temp = TempDir::new().unwrap();
        let layout = setup(temp.path(), &["subject42_CTA.mha"], &[]);

        let report = convention()
            .copy_files(&temp.path().join("src"), &layout, ".mha")
            .unwrap();

        assert!(layout.images_tr().join("subject42_CTA_0000.mha").exists());
        assert_eq!(fs::read_dir(layout.labels_tr()).unwrap().count(), 0);
        assert_eq!(report.training_cases, 1);
        assert_eq!(report.training_labels, 0);
    }

    #[test]
    fn test_overlapping_subjects_land_in_both_splits() {
        let temp = TempDir::new().unwrap();
        let layout = setup(
            temp.path(),
            &["subject040_CTA.mha", "subject042_CTA.mha", "subject050_CTA.mha"],
            &["subject042_label.mha"],
        );

        let report = convention()
            .copy_files(&temp.path().join("src"), &layout, ".mha")
            .unwrap();

        assert_eq!(report.training_cases, 2);
        assert_eq!(report.test_cases, 2);
        assert!(layout.images_tr().join("subject042_CTA_0000.mha").exists());
        assert!(layout.images_ts().join("subject042_CTA_0000.mha").exists());
        assert!(layout.labels_tr().join("subject042_CTA.mha").exists());
        assert!(layout.labels_ts().join("subject042_CTA.mha").exists());
        assert!(!layout.images_ts().join("subject040_CTA_0000.mha").exists());
        assert!(!layout.images_tr().join("subject050_CTA_0000.mha").exists());
    }

    #[test]
    fn test_unmatched_names_are_skipped() {
        let temp = TempDir::new().unwrap();
        let layout = setup(
            temp.path(),
            &[
                "subject001_CTA.mha",
                "scan_CTA.mha",
                "subject060_CTA.mha",
                "subject002_CTA.nii.gz",
                ".subject003_CTA.mha",
            ],
            &["subject099_label.mha"],
        );

        let report = convention()
            .copy_files(&temp.path().join("src"), &layout, ".mha")
            .unwrap();

        assert_eq!(report.training_cases, 1);
        assert_eq!(report.test_cases, 0);
        // scan_CTA, subject060 and the orphan mask
        assert_eq!(report.skipped, 3);
        assert_eq!(fs::read_dir(layout.images_tr()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_masks_folder_is_fatal() {
        let temp = TempDir::new().unwrap();
        let layout = setup(temp.path(), &["subject001_CTA.mha"], &[]);
        fs::remove_dir(temp.path().join("src/masks")).unwrap();

        let result = convention().copy_files(&temp.path().join("src"), &layout, ".mha");

        assert!(matches!(
            result,
            Err(crate::ConvertError::SourceDirMissing(_))
        ));
    }

    #[test]
    fn test_two_masks_for_one_image_is_an_error() {
        let temp = TempDir::new().unwrap();
        let layout = setup(
            temp.path(),
            &["subject001_CTA.mha"],
            &["subject001_CTA.mha", "subject001_label.mha"],
        );

        let result = convention().copy_files(&temp.path().join("src"), &layout, ".mha");

        match result {
            Err(ConvertError::DuplicateMask { image, .. }) => {
                assert_eq!(image, "subject001_CTA.mha");
            }
            other => panic!("expected DuplicateMask, got {:?}", other),
        }
        assert_eq!(fs::read_dir(layout.images_tr()).unwrap().count(), 0);
        assert_eq!(fs::read_dir(layout.labels_tr()).unwrap().count(), 0);
    }
}
