//! Filesystem blob store writing into one flat upload directory.

use super::{BlobError, BlobResult, BlobStore, StoredBlob};
use crate::config::UploadConfig;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Stores uploads as `<dir>/<file_name>` and publishes them under
/// `<public_base_url>/<file_name>`. Same-named uploads overwrite each other.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.dir.clone(), config.public_base_url.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), file_name)
    }
}

impl BlobStore for FsBlobStore {
    fn store(&self, file_name: &str, content: &mut dyn Read) -> BlobResult<StoredBlob> {
        let file_name = sanitize_file_name(file_name)?;
        std::fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(&file_name);
        let mut writer = BufWriter::new(File::create(&path)?);
        let bytes = std::io::copy(content, &mut writer)?;
        writer.flush()?;
        writer.into_inner().map_err(|err| err.into_error())?.sync_all()?;

        info!("event=blob_store module=storage status=ok bytes={bytes}");
        Ok(StoredBlob {
            url: self.public_url(&file_name),
            file_name,
        })
    }
}

/// Keeps only the final path component so uploads cannot escape the
/// upload directory.
fn sanitize_file_name(raw: &str) -> BlobResult<String> {
    let normalized = raw.replace('\\', "/");
    Path::new(&normalized)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BlobError::InvalidFileName(raw.to_string()))
}
