//! Script stores.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::ScriptSource;

/// File extension of stored scripts.
pub const SCRIPT_EXTENSION: &str = "script";

/// Loads `<root>/<name>.script` from disk.
///
/// Names containing path separators or `..` are refused, so an include
/// can never reach outside the root directory.
#[derive(Debug, Clone)]
pub struct DirectoryScriptSource {
    root: PathBuf,
}

impl DirectoryScriptSource {
    /// Serve scripts from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory scripts are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        let valid = !name.is_empty()
            && !name.contains('/')
            && !name.contains('\\')
            && !name.contains("..");
        valid.then(|| self.root.join(format!("{name}.{SCRIPT_EXTENSION}")))
    }
}

impl ScriptSource for DirectoryScriptSource {
    fn load_script(&self, name: &str) -> Option<String> {
        let Some(path) = self.path_for(name) else {
            warn!(script = name, "refusing script name");
            return None;
        };

        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), "loaded script");
                Some(text)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read script");
                None
            }
        }
    }
}

/// Scripts held in memory, keyed by name.
#[derive(Debug, Default)]
pub struct MemoryScriptSource {
    scripts: RwLock<HashMap<String, String>>,
}

impl MemoryScriptSource {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a script.
    pub fn insert(&self, name: impl Into<String>, source: impl Into<String>) {
        self.scripts.write().insert(name.into(), source.into());
    }

    /// Remove a script, reporting whether it existed.
    pub fn remove(&self, name: &str) -> bool {
        self.scripts.write().remove(name).is_some()
    }
}

impl ScriptSource for MemoryScriptSource {
    fn load_script(&self, name: &str) -> Option<String> {
        self.scripts.read().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("guiscript-{tag}-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_directory_source_loads_by_name() {
        let dir = scratch_dir("load");
        fs::write(dir.join("welcome.script"), "msg: hi\n").unwrap();

        let source = DirectoryScriptSource::new(&dir);
        assert_eq!(source.load_script("welcome").as_deref(), Some("msg: hi\n"));
        assert_eq!(source.load_script("missing"), None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_directory_source_rejects_traversal() {
        let dir = scratch_dir("traversal");
        let source = DirectoryScriptSource::new(dir.join("scripts"));
        fs::write(dir.join("secret.script"), "console: stop\n").unwrap();

        assert_eq!(source.load_script("../secret"), None);
        assert_eq!(source.load_script(".."), None);
        assert_eq!(source.load_script(""), None);
        assert_eq!(source.load_script("a\\b"), None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_memory_source() {
        let source = MemoryScriptSource::new();
        source.insert("a", "close");
        assert_eq!(source.load_script("a").as_deref(), Some("close"));
        assert!(source.remove("a"));
        assert_eq!(source.load_script("a"), None);
    }
}
