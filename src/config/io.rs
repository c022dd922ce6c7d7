use std::env::{current_exe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::{Mutex, PoisonError};
use directories_next::{ProjectDirs};
use tokio::fs::{File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use serde_json;
use fd_lock::{RwLock, RwLockWriteGuard};
use log::{info, warn};
use std::fs::OpenOptions;
use std::io::SeekFrom;
use std::str;

use crate::config::types::Config;
use crate::error::ConfigError;

// creates a path to <exe name>.json in the same directory as the executable
// this could be useful for usb sticks
fn get_portable_config_path() -> Option<PathBuf> {
    match current_exe() {
        Ok(mut path) => {
            // F:\airsense.exe => F:\airsense.json
            if !path.set_extension("json") {
                warn!("current exe has no filename: {}", path.to_string_lossy());
                return None
            }

            Some(path)
        },
        Err(err) => {
            warn!("failed to get current exe path: {:?}", err);
            None
        },
    }
}

// creates a path to airsense.json in an os dependent standard directory, such as %AppData% on
// windows.
fn get_local_config_path() -> Option<PathBuf> {
    ProjectDirs::from("my", "airsense", "airsense").map(|dirs| {
        dirs.config_dir().join("airsense.json")
    })
}

fn get_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = get_portable_config_path() {
        match std::fs::metadata(&path) {
            Ok(attr) => {
                if attr.is_file() {
                    return Ok(path);
                }
            }
            Err(err) => {
                info!("No portable config at {}; Using local path instead. ({})", path.to_string_lossy(), err);
            },
        }
    }

    match get_local_config_path() {
        None => Err(ConfigError::NoConfigPath),
        Some(path) => Ok(path),
    }
}

pub struct ConfigIOLocker {
    rw_lock: RwLock<std::fs::File>,
}

impl ConfigIOLocker {
    /// Only one session may use a config file at a time, the guard must be held for as long
    /// as the session runs.
    pub fn lock(&mut self) -> Result<RwLockWriteGuard<std::fs::File>, ConfigError> {
        match self.rw_lock.try_write() {
            Ok(guard) => Ok(guard),
            Err(source) => Err(ConfigError::CanNotLock { source }),
        }
    }
}

struct ConfigIOInner {
    path: PathBuf,
    file: std::fs::File,
}

/// Read access to the config file. Nothing about the session is ever written back.
#[derive(Clone)]
pub struct ConfigIO {
    inner: Arc<Mutex<ConfigIOInner>>,
}

impl ConfigIO {
    /// Opens `path`, or the portable / per-user config file if no path is given. The file is
    /// created if it does not exist yet, an empty file means "all defaults".
    pub fn new_sync(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => get_config_path()?,
        };
        info!("Using config file {}", path.to_string_lossy());

        if let Some(directory) = path.parent() {
            if !directory.as_os_str().is_empty() {
                std::fs::create_dir_all(directory)?;
            }
        }

        // write access is needed for the exclusive lock, the content is never written
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(false)
            .append(false)
            .create(true)
            .open(&path)?;

        let inner = ConfigIOInner {
            path,
            file,
        };
        Ok(ConfigIO { inner: Arc::new(Mutex::new(inner)) })
    }

    pub fn path(&self) -> PathBuf {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).path.clone()
    }

    pub fn locker(&self) -> Result<ConfigIOLocker, ConfigError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(ConfigIOLocker {
            rw_lock: RwLock::new(inner.file.try_clone()?),
        })
    }

    // The File returned from here should never be closed!
    fn get_file(&self) -> Result<File, ConfigError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let file = inner.file.try_clone()?; // std File
        Ok(File::from_std(file)) // tokio File
    }

    pub async fn read(&self) -> Result<Config, ConfigError> {
        let mut file = self.get_file()?;
        info!("Reading config file");

        let mut content = vec![];
        file.seek(SeekFrom::Start(0)).await?;
        file.read_to_end(&mut content).await?;

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Config::default());
        }

        let content = str::from_utf8(&content)?;

        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn empty_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("airsense.json");

        let config_io = ConfigIO::new_sync(Some(path.as_path())).unwrap();
        assert!(path.is_file());
        assert_eq!(config_io.path(), path);
        assert_eq!(config_io.read().await.unwrap(), Config::default());
    }

    #[tokio::test]
    async fn reads_overrides_and_can_read_twice() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("airsense.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{ "device": {{ "connected": false, "batteryLevel": 12 }} }}"#).unwrap();
        drop(file);

        let config_io = ConfigIO::new_sync(Some(path.as_path())).unwrap();
        for _ in 0..2 {
            let config = config_io.read().await.unwrap();
            assert!(!config.device.connected);
            assert_eq!(config.device.battery_level, 12);
        }
    }

    #[tokio::test]
    async fn invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("airsense.json");
        std::fs::write(&path, r#"{ "device": { "batteryLevel": 140 } }"#).unwrap();

        let config_io = ConfigIO::new_sync(Some(path.as_path())).unwrap();
        let err = config_io.read().await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("airsense.json");
        std::fs::write(&path, "{ device: ").unwrap();

        let config_io = ConfigIO::new_sync(Some(path.as_path())).unwrap();
        let err = config_io.read().await.unwrap_err();
        assert!(matches!(err, ConfigError::JsonError { .. }));
        assert!(!err.is_file_not_found_error());
    }

    #[test]
    fn lock_is_exclusive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("airsense.json");

        let first = ConfigIO::new_sync(Some(path.as_path())).unwrap();
        let mut first_locker = first.locker().unwrap();
        let _guard = first_locker.lock().unwrap();

        let second = ConfigIO::new_sync(Some(path.as_path())).unwrap();
        let mut second_locker = second.locker().unwrap();
        assert!(matches!(second_locker.lock(), Err(ConfigError::CanNotLock { .. })));
    }
}
