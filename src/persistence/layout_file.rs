use super::{LayoutStore, StoreError, StoreValue};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "touch-overlay";
const LAYOUT_FILE: &str = "layout.toml";

/// On-disk shape of the layout file.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct LayoutDocument {
    /// Time of the last successful commit
    pub saved_at: Option<DateTime<Local>>,
    /// Settings and positions, keyed like `buttonToggle3` or `13-Portrait-X`
    #[serde(default)]
    pub values: BTreeMap<String, StoreValue>,
}

/// Layout store backed by a TOML file.
///
/// The file is read once when opening. Writes stay in memory until
/// [`LayoutStore::commit`], which rewrites the file before returning so the
/// next rebuild sees the committed layout.
#[derive(Debug)]
pub struct TomlLayoutStore {
    path: PathBuf,
    document: LayoutDocument,
    dirty: bool,
}

impl TomlLayoutStore {
    /// Opens the store at its default location.
    pub async fn open_default() -> Result<Self, StoreError> {
        Self::open(Self::default_path()).await
    }

    /// Opens the store at `path`. A missing file yields an empty store, a
    /// corrupt one is logged and replaced on the next commit.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let document = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            match parse_document(&content) {
                Ok(document) => {
                    info!(
                        "Loaded {} layout values from {}",
                        document.values.len(),
                        path.display()
                    );
                    document
                }
                Err(e) => {
                    warn!("Ignoring unreadable layout file {}: {}", path.display(), e);
                    LayoutDocument::default()
                }
            }
        } else {
            debug!("No layout file at {}, starting empty", path.display());
            LayoutDocument::default()
        };

        Ok(Self {
            path,
            document,
            dirty: false,
        })
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| {
            warn!("Could not determine config directory, using home directory");
            get_home_dir()
        });
        path.push(CONFIG_DIR);
        path.push(LAYOUT_FILE);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn saved_at(&self) -> Option<DateTime<Local>> {
        self.document.saved_at
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl LayoutStore for TomlLayoutStore {
    fn get(&self, key: &str) -> Option<StoreValue> {
        self.document.values.get(key).copied()
    }

    fn put(&mut self, key: &str, value: StoreValue) {
        self.document.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut document = self.document.clone();
        document.saved_at = Some(Local::now());
        let content = toml::to_string_pretty(&document)?;
        std::fs::write(&self.path, content)?;

        self.document = document;
        self.dirty = false;
        info!("Layout committed to {}", self.path.display());
        Ok(())
    }
}

fn parse_document(content: &str) -> Result<LayoutDocument, StoreError> {
    Ok(toml::from_str(content)?)
}

fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| {
        warn!("Could not determine home directory, using current directory");
        PathBuf::from(".")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let store = TomlLayoutStore::open(dir.path().join("layout.toml"))
            .await
            .unwrap();
        assert_eq!(store.get("OverlayInit"), None);
        assert!(store.saved_at().is_none());
    }

    #[tokio::test]
    async fn commit_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("layout.toml");

        {
            let mut store = TomlLayoutStore::open(path.clone()).await.unwrap();
            store.put_bool("OverlayInit", true);
            store.put_int("controlScale", 120);
            store.put_float("13-Portrait-X", 42.5);
            assert!(store.is_dirty());
            store.commit().unwrap();
            assert!(!store.is_dirty());
        }

        let store = TomlLayoutStore::open(path).await.unwrap();
        assert_eq!(store.get_bool("OverlayInit"), Some(true));
        assert_eq!(store.get_int("controlScale"), Some(120));
        assert_eq!(store.get_float("13-Portrait-X"), Some(42.5));
        assert!(store.saved_at().is_some());
    }

    #[tokio::test]
    async fn uncommitted_writes_are_not_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.toml");

        let mut store = TomlLayoutStore::open(path.clone()).await.unwrap();
        store.put_bool("showOverlay", false);
        drop(store);

        let store = TomlLayoutStore::open(path).await.unwrap();
        assert_eq!(store.get_bool("showOverlay"), None);
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        tokio::fs::write(&path, "values = [[[").await.unwrap();

        let store = TomlLayoutStore::open(path).await.unwrap();
        assert_eq!(store.get("controlScale"), None);
    }

    #[test]
    fn unreadable_document_is_a_parse_error() {
        assert!(matches!(
            parse_document("values = [[["),
            Err(StoreError::Parse(_))
        ));
        let document = parse_document("[values]\ncontrolScale = 80\n").unwrap();
        assert_eq!(document.values.get("controlScale"), Some(&StoreValue::Int(80)));
    }
}
