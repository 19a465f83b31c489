// Startup asset check
//
// The CRT frame image is optional. When configured but unreadable, desktop
// layout halts with a fatal notice; compact layout logs a warning and runs.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{Config, Layout};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("MISSING ASSET: {name}")]
    Missing {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    /// Static halt notice shown instead of the terminal
    pub fn fatal_notice(&self) -> String {
        format!("FATAL ERROR\n{}\nSYSTEM HALTED", self)
    }
}

fn asset_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Verify configured assets can be loaded
pub fn check_assets(config: &Config) -> Result<(), AssetError> {
    let Some(path) = &config.crt_image else {
        return Ok(());
    };

    match std::fs::metadata(path).and_then(|meta| {
        if meta.is_file() {
            Ok(())
        } else {
            Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file"))
        }
    }) {
        Ok(()) => Ok(()),
        Err(source) => {
            let err = AssetError::Missing {
                name: asset_name(path),
                path: path.clone(),
                source,
            };
            match config.layout {
                Layout::Desktop => Err(err),
                Layout::Compact => {
                    tracing::warn!("{} ({}), continuing without it", err, path.display());
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_no_asset_configured() {
        assert!(check_assets(&Config::default()).is_ok());
    }

    #[test]
    fn test_present_asset() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            crt_image: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        assert!(check_assets(&config).is_ok());
    }

    #[test]
    fn test_missing_asset_fatal_on_desktop() {
        let config = Config {
            crt_image: Some(PathBuf::from("/nonexistent/CRT.png")),
            layout: Layout::Desktop,
            ..Config::default()
        };
        let err = check_assets(&config).unwrap_err();
        assert_eq!(err.fatal_notice(), "FATAL ERROR\nMISSING ASSET: CRT.png\nSYSTEM HALTED");
    }

    #[test]
    fn test_missing_asset_tolerated_on_compact() {
        let config = Config {
            crt_image: Some(PathBuf::from("/nonexistent/CRT.png")),
            layout: Layout::Compact,
            ..Config::default()
        };
        assert!(check_assets(&config).is_ok());
    }
}
