//! Source naming conventions and the copy step they share.
//!
//! A convention only decides which source file is which case and role. Each one produces a
//! [`SplitFiles`] per split, and [`copy_split`] turns those into renamed copies in the
//! [`DatasetLayout`].

pub mod numbered;
pub mod paired;

pub use numbered::NumberedConvention;
pub use paired::{PairedConvention, SubjectRange};

use crate::constants::SINGLE_CHANNEL;
use crate::layout::{DatasetLayout, Role, Split};
use crate::{ConvertError, ConvertResult};
use nnraw_types::CaseId;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How a raw dataset names and arranges its files.
#[derive(Debug, Clone)]
pub enum SourceConvention {
    /// `training/`/`testing/` folders of `<digits><role suffix>` files.
    Numbered(NumberedConvention),
    /// Flat `images/` and `masks/` folders split by subject-number ranges.
    Paired(PairedConvention),
}

impl SourceConvention {
    /// Classify every file under `source_root` and copy it into `layout`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required source folder is missing or unreadable, if two
    /// files map to the same case within a split, or if a copy fails.
    pub fn copy_files(
        &self,
        source_root: &Path,
        layout: &DatasetLayout,
        file_ending: &str,
    ) -> ConvertResult<CopyReport> {
        match self {
            SourceConvention::Numbered(convention) => {
                convention.copy_files(source_root, layout, file_ending)
            }
            SourceConvention::Paired(convention) => {
                convention.copy_files(source_root, layout, file_ending)
            }
        }
    }
}

/// Counts of what a copy run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Training images copied. This is the `numTraining` of the descriptor.
    pub training_cases: usize,
    pub training_labels: usize,
    pub test_cases: usize,
    pub test_labels: usize,
    /// Source files that matched no pattern, or labels with no image.
    pub skipped: usize,
}

impl CopyReport {
    fn record(&mut self, split: Split, role: Role) {
        let counter = match (split, role) {
            (Split::Train, Role::Image) => &mut self.training_cases,
            (Split::Train, Role::Label) => &mut self.training_labels,
            (Split::Test, Role::Image) => &mut self.test_cases,
            (Split::Test, Role::Label) => &mut self.test_labels,
        };
        *counter += 1;
    }
}

/// Cases of one split, keyed and ordered by case id.
#[derive(Debug)]
pub struct SplitFiles {
    split: Split,
    images: BTreeMap<CaseId, PathBuf>,
    labels: BTreeMap<CaseId, PathBuf>,
}

impl SplitFiles {
    pub fn new(split: Split) -> Self {
        Self {
            split,
            images: BTreeMap::new(),
            labels: BTreeMap::new(),
        }
    }

    pub fn split(&self) -> Split {
        self.split
    }

    /// Register `path` as the `role` file of `case`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::DuplicateCase`] if `case` already has a file for `role`.
    pub fn insert(&mut self, case: CaseId, role: Role, path: PathBuf) -> ConvertResult<()> {
        let files = match role {
            Role::Image => &mut self.images,
            Role::Label => &mut self.labels,
        };
        if let Some(first) = files.get(&case) {
            return Err(ConvertError::DuplicateCase {
                split: self.split,
                case: case.to_string(),
                first: first.clone(),
                second: path,
            });
        }
        files.insert(case, path);
        Ok(())
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

/// Copy one split into `layout`, renaming images to `<case>_0000<ext>` and labels to
/// `<case><ext>`.
///
/// Labels without an image in the same split are not copied and count as skipped.
/// Existing destination files are overwritten.
pub fn copy_split(
    files: SplitFiles,
    layout: &DatasetLayout,
    file_ending: &str,
    report: &mut CopyReport,
) -> ConvertResult<()> {
    let SplitFiles {
        split,
        images,
        mut labels,
    } = files;

    for (case, image) in images {
        let target = layout
            .dir(split, Role::Image)
            .join(case.image_file_name(SINGLE_CHANNEL, file_ending));
        copy_file(&image, &target)?;
        report.record(split, Role::Image);

        match labels.remove(&case) {
            Some(label) => {
                let target = layout
                    .dir(split, Role::Label)
                    .join(case.label_file_name(file_ending));
                copy_file(&label, &target)?;
                report.record(split, Role::Label);
            }
            None => tracing::debug!("{} case {} has no label", split, case),
        }
    }

    for (case, label) in labels {
        tracing::debug!(
            "skipping {} label {} for case {}: no matching image",
            split,
            label.display(),
            case
        );
        report.skipped += 1;
    }

    Ok(())
}

fn copy_file(from: &Path, to: &Path) -> ConvertResult<()> {
    fs::copy(from, to).map_err(|source| ConvertError::FileCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Regular files directly inside `dir`, sorted by file name.
///
/// # Errors
///
/// - [`ConvertError::SourceDirMissing`] if `dir` is not a directory
/// - [`ConvertError::SourceDirRead`] if it cannot be listed
pub fn list_files(dir: &Path) -> ConvertResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConvertError::SourceDirMissing(dir.to_path_buf()));
    }

    let read_err = |source| ConvertError::SourceDirRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// File name of `path` as UTF-8, or `None` for names that are not valid UTF-8.
pub(crate) fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
