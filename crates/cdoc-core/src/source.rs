//! Loaded source buffers
//!
//! Tokens refer to their text by [`SourceId`] and byte span, so every buffer
//! a scan touches, including files pulled in by a local include, is kept
//! alive here for the lifetime of the report.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::scanner::Span;

/// Index of a buffer in a [`SourceMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceId(pub u32);

/// One loaded buffer
#[derive(Debug, Clone)]
pub struct Source {
    /// Base name used in diagnostics and as the document title
    pub label: Rc<str>,
    /// Where the text came from, if it came from disk
    pub path: Option<PathBuf>,
    /// The text, guaranteed free of NUL bytes
    pub text: Rc<str>,
}

/// All buffers loaded during a run
#[derive(Debug, Default)]
pub struct SourceMap {
    sources: Vec<Source>,
}

impl SourceMap {
    /// Create an empty source map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a buffer, rejecting text that cannot be addressed by `u32` spans
    /// or that contains a NUL byte
    pub fn add(&mut self, label: &str, path: Option<PathBuf>, text: String) -> Result<SourceId> {
        if text.contains('\0') {
            return Err(Error::EmbeddedNul {
                label: label.to_string(),
            });
        }
        if u32::try_from(text.len()).is_err() {
            return Err(Error::SourceTooLarge {
                label: label.to_string(),
            });
        }
        let id = u32::try_from(self.sources.len()).map_err(|_| Error::SourceTooLarge {
            label: label.to_string(),
        })?;
        self.sources.push(Source {
            label: label.into(),
            path,
            text: text.into(),
        });
        Ok(SourceId(id))
    }

    /// Look up a buffer
    ///
    /// # Panics
    /// Panics if `id` was not produced by this map.
    pub fn get(&self, id: SourceId) -> &Source {
        &self.sources[id.0 as usize]
    }

    /// The label of a buffer
    pub fn label(&self, id: SourceId) -> &str {
        &self.get(id).label
    }

    /// The text a span covers
    pub fn slice(&self, id: SourceId, span: Span) -> &str {
        &self.get(id).text[span.as_range()]
    }

    /// Number of loaded buffers
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Forget every buffer from index `len` on
    pub(crate) fn truncate(&mut self, len: usize) {
        self.sources.truncate(len);
    }

    /// Whether nothing has been loaded yet
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Produces text for the top-level input and for local includes
pub trait TextLoader {
    /// Read the file at `path`
    fn load(&self, path: &Path) -> Result<String>;
}

/// Loads files from the filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl TextLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The base name of a path, used as a label
pub fn label_for(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_embedded_nul() {
        let mut map = SourceMap::new();
        let err = map.add("bad.c", None, "int\0x;".to_string()).unwrap_err();
        assert!(matches!(err, Error::EmbeddedNul { .. }));
        assert!(map.is_empty());
    }

    #[test]
    fn ids_are_sequential() {
        let mut map = SourceMap::new();
        let a = map.add("a.c", None, "a".to_string()).unwrap();
        let b = map.add("b.h", None, "b".to_string()).unwrap();
        assert_eq!(a, SourceId(0));
        assert_eq!(b, SourceId(1));
        assert_eq!(map.label(b), "b.h");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn labels_are_base_names() {
        assert_eq!(label_for(Path::new("src/list.h")), "list.h");
    }
}
