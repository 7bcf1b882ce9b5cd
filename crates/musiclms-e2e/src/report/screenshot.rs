//! Failure screenshots on disk.

use crate::driver::Driver;
use crate::result::{E2eError, E2eResult};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Writes PNG captures to one directory
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    /// Store rooted at `dir`; the directory is created on first capture
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<test>_<yyyyMMdd_HHmmss>.png`, with path-hostile characters replaced
    #[must_use]
    pub fn file_name(test_name: &str, at: DateTime<Local>) -> String {
        let stem: String = test_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{stem}_{}.png", at.format("%Y%m%d_%H%M%S"))
    }

    /// Capture the current page of `driver` and save it.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Screenshot` if the driver cannot capture or the file
    /// cannot be written.
    pub async fn capture(&self, driver: &dyn Driver, test_name: &str) -> E2eResult<PathBuf> {
        let png = driver
            .screenshot_png()
            .await
            .map_err(|e| E2eError::Screenshot {
                message: e.to_string(),
            })?;

        let path = self.dir.join(Self::file_name(test_name, Local::now()));
        let write = async {
            tokio::fs::create_dir_all(&self.dir).await?;
            tokio::fs::write(&path, &png).await
        };
        write.await.map_err(|e| E2eError::Screenshot {
            message: format!("{}: {e}", path.display()),
        })?;

        tracing::debug!(path = %path.display(), bytes = png.len(), "screenshot saved");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, PNG_SIGNATURE};
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            ScreenshotStore::file_name("TC_Auth_002 valid_login", at),
            "TC_Auth_002_valid_login_20240309_140507.png"
        );
        assert_eq!(
            ScreenshotStore::file_name("DDT_001[2]/x", at),
            "DDT_001_2__x_20240309_140507.png"
        );
    }

    #[tokio::test]
    async fn test_capture_writes_png() {
        let dir = TempDir::new().unwrap();
        let store = ScreenshotStore::new(dir.path().join("shots"));
        let path = store
            .capture(&MockDriver::new(), "TC_Auth_001")
            .await
            .unwrap();
        assert!(path.starts_with(dir.path().join("shots")));
        assert_eq!(std::fs::read(&path).unwrap(), PNG_SIGNATURE.to_vec());
    }

    #[tokio::test]
    async fn test_capture_failure() {
        let dir = TempDir::new().unwrap();
        let store = ScreenshotStore::new(dir.path());
        let err = store
            .capture(&MockDriver::new().without_screenshots(), "t")
            .await
            .unwrap_err();
        assert!(matches!(err, E2eError::Screenshot { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
