//! The report: every segment extracted from a translation unit
//!
//! A [`Report`] owns the loaded buffers and the sorter. It is the token sink
//! for its own scans, so a local include can load another file and scan it
//! into the same segment list.

mod segment;
mod sorter;

pub use segment::{Attribute, Segment};
pub use sorter::{collapse_whitespace, SortError, SortState, Sorter};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::resolve::{normalize, PathResolver};
use crate::scanner::{ScanContext, Scanner, StartMode, Token, TokenSink};
use crate::semantic::Division;
use crate::source::{label_for, FsLoader, SourceId, SourceMap, TextLoader};
use crate::symbol::Symbol;

/// Segments of one translation unit and the buffers they point into
pub struct Report {
    sources: SourceMap,
    sorter: Sorter,
    loader: Box<dyn TextLoader>,
    resolver: PathResolver,
    include_stack: Vec<PathBuf>,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Report")
            .field("sources", &self.sources)
            .field("sorter", &self.sorter)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Report {
    /// A report reading includes from the filesystem
    pub fn new() -> Self {
        Self::with_loader(FsLoader)
    }

    /// A report reading includes through `loader`
    pub fn with_loader(loader: impl TextLoader + 'static) -> Self {
        Self {
            sources: SourceMap::new(),
            sorter: Sorter::new(),
            loader: Box::new(loader),
            resolver: PathResolver::new(),
            include_stack: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Load and scan a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be loaded or scanned, or if the
    /// sorter rejects the token stream. Nothing from a failed scan is kept.
    pub fn scan_file(&mut self, path: &Path) -> Result<()> {
        let text = self.loader.load(path)?;
        let loaded = self.sources.len();
        let id = self
            .sources
            .add(&label_for(path), Some(path.to_path_buf()), text)?;
        self.scan_top(id, loaded, Some(normalize(path)))
    }

    /// Scan in-memory text as a file named `label`
    ///
    /// # Errors
    /// As for [`Report::scan_file`].
    pub fn scan_str(&mut self, label: &str, text: &str) -> Result<()> {
        let loaded = self.sources.len();
        let id = self.sources.add(label, None, text.to_string())?;
        self.scan_top(id, loaded, None)
    }

    /// Scan bare documentation text, such as a title from the configuration,
    /// returning its tokens with whitespace collapsed
    ///
    /// # Errors
    /// Returns an error if the text does not scan as documentation.
    pub fn parse_doc(&mut self, label: &str, text: &str) -> Result<Vec<Token>> {
        let loaded = self.sources.len();
        let id = self.sources.add(label, None, text.to_string())?;
        let mut tokens = Vec::new();
        let scanned = Scanner::new(id, self.sources.get(id), StartMode::Doc).run(&mut tokens);
        if scanned.is_err() {
            self.sources.truncate(loaded);
        }
        scanned?;
        Ok(collapse_whitespace(&tokens))
    }

    /// Scan buffer `id`; on failure drop its segments and every buffer
    /// from index `loaded` on
    fn scan_top(&mut self, id: SourceId, loaded: usize, path: Option<PathBuf>) -> Result<()> {
        let kept = self.sorter.segments().len();
        info!(label = %self.sources.label(id), "scanning");
        self.include_stack.extend(path);
        let result = self.scan_source(id);
        self.include_stack.clear();
        match result {
            Ok(()) => {
                self.sorter.finish();
                Ok(())
            }
            Err(e) => {
                self.sorter.rollback(kept);
                self.sources.truncate(loaded);
                Err(e)
            }
        }
    }

    fn scan_source(&mut self, id: SourceId) -> Result<()> {
        let scanner = Scanner::new(id, self.sources.get(id), StartMode::Code);
        scanner.run(self)
    }

    /// Scan a local include into the same segment list
    fn include(&mut self, token: Token) -> Result<()> {
        self.sorter.finish();
        let name = self.sources.slice(token.source, token.span).to_string();
        let from = self.sources.get(token.source).path.clone();
        let path = self.resolver.resolve_include(from.as_deref(), &name);
        if self.include_stack.contains(&path) {
            return Err(Error::IncludeCycle {
                label: self.sources.label(token.source).to_string(),
                path,
            });
        }

        debug!(path = %path.display(), "including");
        let text = self.loader.load(&path)?;
        let id = self.sources.add(&label_for(&path), Some(path.clone()), text)?;
        self.include_stack.push(path);
        let result = self.scan_source(id);
        self.include_stack.pop();
        result?;
        self.sorter.finish();
        Ok(())
    }

    /// Completed segments in source order
    pub fn segments(&self) -> &[Segment] {
        self.sorter.segments()
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// The text of a token
    pub fn text(&self, token: &Token) -> &str {
        self.sources.slice(token.source, token.span)
    }

    /// Label of the first buffer scanned
    pub fn label(&self) -> Option<&str> {
        (!self.sources.is_empty()).then(|| self.sources.label(SourceId(0)))
    }

    /// Drop segments with nothing worth documenting: no documentation and
    /// not a function, or an undocumented `static` function
    pub fn cull(&mut self) {
        let before = self.segments().len();
        self.sorter.segments_mut().retain(|segment| {
            if segment.is_documented() {
                return true;
            }
            segment.division == Division::Function && !segment.is_static()
        });
        debug!(before, after = self.segments().len(), "culled segments");
    }

    /// Every name index must point into its segment's code
    ///
    /// # Errors
    /// Returns [`Error::ParamOutOfRange`] for the first bad index.
    pub fn check_params(&self) -> Result<()> {
        for segment in self.segments() {
            let len = segment.code.len();
            if let Some(&index) = segment.code_params.iter().find(|&&i| i >= len) {
                let anchor = segment
                    .code
                    .first()
                    .or_else(|| segment.doc.first())
                    .copied();
                return Err(Error::ParamOutOfRange {
                    label: anchor
                        .map(|t| self.sources.label(t.source).to_string())
                        .unwrap_or_default(),
                    line: anchor.map_or(0, |t| t.line),
                    index,
                    len,
                });
            }
        }
        Ok(())
    }

    /// Diagnostics for documented segments the renderer cannot name, and for
    /// `@param` lists that disagree with a function's parameters
    pub fn warn_param_mismatch(&self) {
        for segment in self.segments() {
            let line = segment
                .code
                .first()
                .or_else(|| segment.doc.first())
                .map_or(0, |t| t.line);
            let label = segment
                .code
                .first()
                .or_else(|| segment.doc.first())
                .map_or("", |t| self.sources.label(t.source));

            if segment.is_documented()
                && segment.division != Division::Preamble
                && segment.title_token().is_none()
            {
                warn!(%label, line, division = %segment.division, "documented statement has no name");
            }
            if segment.division != Division::Function {
                continue;
            }

            let actual: HashSet<&str> = segment.params().map(|t| self.text(t)).collect();
            let documented: HashSet<&str> = segment
                .attributes_of(Symbol::AttParam)
                .flat_map(|a| a.header.iter())
                .map(|t| self.text(t))
                .collect();
            for name in documented.difference(&actual) {
                warn!(%label, line, param = %name, "@param names a parameter the function does not have");
            }
            if !documented.is_empty() {
                for name in actual.difference(&documented) {
                    debug!(%label, line, param = %name, "parameter has no @param");
                }
            }
        }
    }
}

impl TokenSink for Report {
    fn accept(&mut self, context: ScanContext) -> Result<()> {
        if context.token.symbol == Symbol::LocalInclude {
            return self.include(context.token);
        }
        self.sorter.accept(context, &self.sources)?;
        Ok(())
    }
}
