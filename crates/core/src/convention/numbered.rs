//! `training/` and `testing/` folders of numbered files.
//!
//! Each file is `<digits><role suffix>`, for example `3.img.nii.gz` and `3.label.nii.gz`.
//! The leading digit run is the case id, kept verbatim.

use super::{copy_split, file_name_str, list_files, CopyReport, SplitFiles};
use crate::layout::{DatasetLayout, Role, Split};
use crate::ConvertResult;
use nnraw_types::CaseId;
use regex::Regex;
use std::path::Path;

const SUBJECT_PATTERN: &str = r"^(\d+)(.*)$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedConvention {
    pub train_dir: String,
    pub test_dir: String,
    pub image_suffix: String,
    pub label_suffix: String,
}

impl NumberedConvention {
    pub fn new(image_suffix: impl Into<String>, label_suffix: impl Into<String>) -> Self {
        Self {
            train_dir: "training".into(),
            test_dir: "testing".into(),
            image_suffix: image_suffix.into(),
            label_suffix: label_suffix.into(),
        }
    }

    /// Copy `training/` and `testing/` under `source_root` into `layout`.
    ///
    /// Both folders are listed and classified before anything is copied.
    /// Files whose name does not start with digits, or whose remainder is neither the image
    /// nor the label suffix, are skipped.
    pub fn copy_files(
        &self,
        source_root: &Path,
        layout: &DatasetLayout,
        file_ending: &str,
    ) -> ConvertResult<CopyReport> {
        let pattern = Regex::new(SUBJECT_PATTERN)?;
        let mut report = CopyReport::default();

        let train = self.scan(
            &pattern,
            &source_root.join(&self.train_dir),
            Split::Train,
            &mut report,
        )?;
        let test = self.scan(
            &pattern,
            &source_root.join(&self.test_dir),
            Split::Test,
            &mut report,
        )?;

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

    fn scan(
        &self,
        pattern: &Regex,
        dir: &Path,
        split: Split,
        report: &mut CopyReport,
    ) -> ConvertResult<SplitFiles> {
        let mut files = SplitFiles::new(split);
        for path in list_files(dir)? {
            match file_name_str(&path).and_then(|name| self.classify(pattern, name)) {
                Some((case, role)) => files.insert(case, role, path)?,
                None => {
                    tracing::debug!("skipping unrecognised file {}", path.display());
                    report.skipped += 1;
                }
            }
        }
        Ok(files)
    }

    fn classify(&self, pattern: &Regex, name: &str) -> Option<(CaseId, Role)> {
        let captures = pattern.captures(name)?;
        let rest = captures.get(2)?.as_str();
        let role = if rest == self.image_suffix {
            Role::Image
        } else if rest == self.label_suffix {
            Role::Label
        } else {
            return None;
        };
        let case = CaseId::parse(captures.get(1)?.as_str()).ok()?;
        Some((case, role))
    }
}
