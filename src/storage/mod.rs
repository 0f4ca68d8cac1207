use anyhow::{Context, Result};
use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, Mutex},
};

/// Durable storage for one opaque payload, the stand-in for the
/// single local-storage key the history lives under. Injected into the
/// history store so the core never touches a platform API directly.
pub trait Storage {
    /// Read the payload, or `None` when nothing has been persisted yet.
    fn read(&self) -> Result<Option<String>>;
    /// Overwrite the payload wholesale.
    fn write(&self, payload: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn read(&self) -> Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, payload: &str) -> Result<()> {
        (**self).write(payload)
    }
}

/// File-backed storage: one JSON file, replaced atomically on every
/// write via a `.tmp` sibling and a rename.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("reading `{}`", self.path.display()))
            }
        }
    }

    fn write(&self, payload: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating `{}`", parent.display()))?;
            }
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, payload)
            .with_context(|| format!("writing `{}`", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!("renaming `{}` to `{}`", tmp.display(), self.path.display())
        })?;
        Ok(())
    }
}

/// In-memory storage for tests and embedders.
#[derive(Default)]
pub struct MemoryStorage {
    payload: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last payload written, if any.
    pub fn payload(&self) -> Option<String> {
        self.payload.lock().unwrap().clone()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.payload.lock().unwrap().clone())
    }

    fn write(&self, payload: &str) -> Result<()> {
        *self.payload.lock().unwrap() = Some(payload.to_string());
        Ok(())
    }
}
