//! Destination layout of a converted dataset.
//!
//! ```text
//! <raw_root>/
//! └── Dataset<NNN>_<TaskName>/
//!     ├── dataset.json
//!     ├── imagesTr/   <case>_0000<ext>
//!     ├── labelsTr/   <case><ext>
//!     ├── imagesTs/   <case>_0000<ext>
//!     └── labelsTs/   <case><ext>
//! ```

use crate::constants::{
    IMAGES_TR_DIR_NAME, IMAGES_TS_DIR_NAME, LABELS_TR_DIR_NAME, LABELS_TS_DIR_NAME,
};
use crate::{ConvertError, ConvertResult};
use nnraw_types::{DatasetId, NonEmptyText};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Which half of the dataset a case belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Test,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => f.write_str("training"),
            Split::Test => f.write_str("testing"),
        }
    }
}

/// Whether a file is an input volume or its segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Image,
    Label,
}

/// The five directories of one converted dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
    images_tr: PathBuf,
    labels_tr: PathBuf,
    images_ts: PathBuf,
    labels_ts: PathBuf,
}

impl DatasetLayout {
    /// Compute the layout for `dataset_id` and `task_name` under `raw_root`.
    ///
    /// Pure path construction; see [`DatasetLayout::create`] for the variant that also
    /// creates the directories.
    pub fn new(raw_root: &Path, dataset_id: DatasetId, task_name: &NonEmptyText) -> Self {
        let root = raw_root.join(dataset_id.folder_name(task_name));
        Self {
            images_tr: root.join(IMAGES_TR_DIR_NAME),
            labels_tr: root.join(LABELS_TR_DIR_NAME),
            images_ts: root.join(IMAGES_TS_DIR_NAME),
            labels_ts: root.join(LABELS_TS_DIR_NAME),
            root,
        }
    }

    /// Compute the layout and create every directory in it.
    ///
    /// Directories that already exist are left alone, so this is safe to rerun over a
    /// populated dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::DestinationDirCreation`] if any directory cannot be created.
    pub fn create(
        raw_root: &Path,
        dataset_id: DatasetId,
        task_name: &NonEmptyText,
    ) -> ConvertResult<Self> {
        let layout = Self::new(raw_root, dataset_id, task_name);
        for dir in [
            &layout.root,
            &layout.images_tr,
            &layout.labels_tr,
            &layout.images_ts,
            &layout.labels_ts,
        ] {
            fs::create_dir_all(dir).map_err(|source| ConvertError::DestinationDirCreation {
                path: dir.clone(),
                source,
            })?;
        }
        tracing::debug!("dataset layout ready at {}", layout.root.display());
        Ok(layout)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_tr(&self) -> &Path {
        &self.images_tr
    }

    pub fn labels_tr(&self) -> &Path {
        &self.labels_tr
    }

    pub fn images_ts(&self) -> &Path {
        &self.images_ts
    }

    pub fn labels_ts(&self) -> &Path {
        &self.labels_ts
    }

    /// Destination folder for files of `role` in `split`.
    pub fn dir(&self, split: Split, role: Role) -> &Path {
        match (split, role) {
            (Split::Train, Role::Image) => &self.images_tr,
            (Split::Train, Role::Label) => &self.labels_tr,
            (Split::Test, Role::Image) => &self.images_ts,
            (Split::Test, Role::Label) => &self.labels_ts,
        }
    }
}
