//! Capability-scoped spool directory for rendered prescriptions.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PrescriptionDeliveryError, PrescriptionSpool, SpooledPrescription};

/// Spool rooted at one directory; file names never escape it.
#[derive(Clone)]
pub struct DirPrescriptionSpool {
    dir: Arc<Dir>,
    root: PathBuf,
}

impl DirPrescriptionSpool {
    /// Open `root`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from creating or opening the directory.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, PrescriptionDeliveryError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || op(&dir))
            .await
            .map_err(|error| PrescriptionDeliveryError::spool(error.to_string()))?
            .map_err(|error| PrescriptionDeliveryError::spool(error.to_string()))
    }
}

#[async_trait]
impl PrescriptionSpool for DirPrescriptionSpool {
    async fn store(&self, document: &[u8]) -> Result<SpooledPrescription, PrescriptionDeliveryError> {
        let file_name = format!("prescription-{}.pdf", Uuid::new_v4().simple());
        let name = file_name.clone();
        let bytes = document.to_vec();
        self.blocking(move |dir| dir.write(&name, bytes)).await?;
        debug!(%file_name, root = %self.root.display(), "prescription spooled");
        Ok(SpooledPrescription { file_name })
    }

    async fn load(&self, file: &SpooledPrescription) -> Result<Vec<u8>, PrescriptionDeliveryError> {
        let name = file.file_name.clone();
        self.blocking(move |dir| dir.read(&name)).await
    }

    async fn remove(&self, file: &SpooledPrescription) -> Result<(), PrescriptionDeliveryError> {
        let name = file.file_name.clone();
        self.blocking(move |dir| dir.remove_file(&name)).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn stores_loads_and_removes_under_unique_names() {
        let temp = tempfile::tempdir().expect("tempdir");
        let spool = DirPrescriptionSpool::open(temp.path().join("prescriptions")).expect("spool");

        let first = spool.store(b"%PDF-first").await.expect("store");
        let second = spool.store(b"%PDF-second").await.expect("store");
        assert_ne!(first, second);
        assert!(first.file_name.starts_with("prescription-"));
        assert!(first.file_name.ends_with(".pdf"));

        assert_eq!(spool.load(&first).await.expect("load"), b"%PDF-first");
        spool.remove(&first).await.expect("remove");
        assert!(!spool.root().join(&first.file_name).exists());
        assert!(spool.root().join(&second.file_name).exists());
    }

    #[tokio::test]
    async fn escaping_names_are_refused() {
        let temp = tempfile::tempdir().expect("tempdir");
        let spool = DirPrescriptionSpool::open(temp.path()).expect("spool");
        let outside = SpooledPrescription {
            file_name: "../outside.pdf".to_owned(),
        };
        let err = spool.load(&outside).await.expect_err("sandboxed");
        assert_eq!(err.kind(), "spool");
    }
}
