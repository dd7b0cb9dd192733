//! File system sink: one file per link inside a target directory.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};

use super::{SaveError, Saver};
use crate::download::BodyReader;

const PART_PREFIX: &str = ".dwl-";
const PART_SUFFIX: &str = ".part";

/// Writes each body to `dir/name`, replacing any existing file.
///
/// The body is streamed into a hidden `.part` file in `dir`, synced, and then
/// renamed over `dir/name`. Until that rename the previous file is left
/// untouched. The `.part` file is removed when the write fails or when the
/// `save` future is dropped (deadline, cancellation).
#[derive(Debug, Clone)]
pub struct FileSaver {
    dir: PathBuf,
}

impl FileSaver {
    /// Creates a saver writing into `dir`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn target_path(&self, name: &str) -> Result<PathBuf, SaveError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if part == name && !name.contains('\0') => {
                Ok(self.dir.join(name))
            }
            _ => Err(SaveError::invalid_name(name)),
        }
    }

    /// Creates the `.part` file next to the target.
    ///
    /// The returned [`TempPath`] deletes the file when dropped.
    async fn create_part_file(&self) -> Result<(File, TempPath), SaveError> {
        let dir = self.dir.clone();
        let created = tokio::task::spawn_blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix(PART_PREFIX).suffix(PART_SUFFIX);
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                builder.permissions(std::fs::Permissions::from_mode(0o666));
            }
            builder.tempfile_in(&dir)
        })
        .await
        .map_err(io::Error::other)
        .and_then(|result| result)
        .map_err(|e| SaveError::io(&self.dir, e))?;

        let (file, part_path) = created.into_parts();
        Ok((File::from_std(file), part_path))
    }
}

#[async_trait]
impl Saver for FileSaver {
    #[instrument(skip(self, body), fields(dir = %self.dir.display()))]
    async fn save(&self, name: &str, body: &mut BodyReader) -> Result<u64, SaveError> {
        let path = self.target_path(name)?;
        let (file, part_path) = self.create_part_file().await?;
        debug!(part = %part_path.display(), "writing body");

        // Dropping `part_path` on any early return removes the partial file.
        let bytes = write_body(file, body, &part_path).await?;
        persist(part_path, &path).await?;

        debug!(path = %path.display(), bytes, "file saved");
        Ok(bytes)
    }
}

async fn write_body(file: File, body: &mut BodyReader, path: &Path) -> Result<u64, SaveError> {
    let mut writer = BufWriter::new(file);
    let bytes = tokio::io::copy(body, &mut writer)
        .await
        .map_err(|e| SaveError::io(path, e))?;
    writer.flush().await.map_err(|e| SaveError::io(path, e))?;
    writer
        .get_ref()
        .sync_all()
        .await
        .map_err(|e| SaveError::io(path, e))?;
    Ok(bytes)
}

/// Renames the finished `.part` file over `path`.
async fn persist(part_path: TempPath, path: &Path) -> Result<(), SaveError> {
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || part_path.persist(&target).map_err(|e| e.error))
        .await
        .map_err(io::Error::other)
        .and_then(|result| result)
        .map_err(|e| SaveError::io(path, e))
}
