//! Resolving include names and documentation links

use std::path::{Component, Path, PathBuf};

use url::Url;

/// What a link in the documentation points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Absolute URLs, rooted paths and fragments; used as written
    External(String),
    /// A file next to the input, re-expressed relative to the output
    Local(String),
}

impl Resolved {
    pub fn as_str(&self) -> &str {
        match self {
            Resolved::External(s) | Resolved::Local(s) => s,
        }
    }
}

/// Knows where the input came from and where the output goes
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl PathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Where `#include "name"` in `from` points; relative to the including
    /// file, or to the input directory for in-memory sources
    pub fn resolve_include(&self, from: Option<&Path>, name: &str) -> PathBuf {
        let base = from
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .or_else(|| self.input_dir.clone())
            .unwrap_or_default();
        normalize(&base.join(name))
    }

    /// Rewrite a link found in the documentation so it works from the
    /// output file
    pub fn resolve_link(&self, reference: &str) -> Resolved {
        if reference.starts_with('#') || reference.starts_with('/') || Url::parse(reference).is_ok()
        {
            return Resolved::External(reference.to_string());
        }
        let (Some(input), Some(output)) = (&self.input_dir, &self.output_dir) else {
            return Resolved::Local(reference.to_string());
        };
        let target = normalize(&input.join(reference));
        match pathdiff::diff_paths(&target, normalize(output)) {
            Some(relative) => Resolved::Local(relative.to_string_lossy().replace('\\', "/")),
            None => Resolved::Local(reference.to_string()),
        }
    }
}

/// Remove `.` and fold `..` without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let climbs = matches!(out.components().next_back(), None | Some(Component::ParentDir));
                if climbs {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_is_relative_to_including_file() {
        let resolver = PathResolver::new();
        assert_eq!(
            resolver.resolve_include(Some(Path::new("src/list.h")), "../common/orcish.h"),
            PathBuf::from("common/orcish.h")
        );
        assert_eq!(
            resolver.resolve_include(Some(Path::new("list.h")), "./a.h"),
            PathBuf::from("a.h")
        );
    }

    #[test]
    fn include_from_memory_uses_input_dir() {
        let resolver = PathResolver::new().with_input_dir("src");
        assert_eq!(resolver.resolve_include(None, "a.h"), PathBuf::from("src/a.h"));
    }

    #[test]
    fn external_links_are_untouched() {
        let resolver = PathResolver::new().with_input_dir("src").with_output_dir("docs");
        for link in ["https://example.org/a", "mailto:me@example.org", "#fn:push", "/abs/x.png"] {
            assert_eq!(resolver.resolve_link(link), Resolved::External(link.to_string()));
        }
    }

    #[test]
    fn local_links_follow_the_output() {
        let resolver = PathResolver::new().with_input_dir("src").with_output_dir("docs");
        assert_eq!(
            resolver.resolve_link("img/a.png"),
            Resolved::Local("../src/img/a.png".to_string())
        );
        let same = PathResolver::new().with_input_dir("src").with_output_dir("src");
        assert_eq!(same.resolve_link("a.png").as_str(), "a.png");
    }

    #[test]
    fn normalize_keeps_leading_parents() {
        assert_eq!(normalize(Path::new("../a/./b/../c")), PathBuf::from("../a/c"));
    }
}
