//! Dotted path references into a namespace tree.

use core::fmt;

/// A dotted path such as `"app.widgets.render"`.
///
/// Parsing is a plain split on `.`: empty segments are kept verbatim,
/// so `"a..b"` has three segments and looks up an empty key in the
/// middle. Whether the path leads anywhere is the resolver's business,
/// not the parser's.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnPath {
    raw: String,
    segments: Vec<String>,
}

impl FnPath {
    /// Parse `raw` into its dot-separated segments.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw.split('.').map(str::to_owned).collect();
        Self { raw, segments }
    }

    /// The path exactly as written.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The segments in lookup order. Never empty.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The first `len` segments rejoined with dots.
    ///
    /// Used in diagnostics to name the prefix that resolved before a
    /// walk went wrong.
    #[must_use]
    pub fn prefix(&self, len: usize) -> String {
        self.segments[..len.min(self.segments.len())].join(".")
    }
}

impl fmt::Display for FnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FnPath {
    fn from(raw: &str) -> Self {
        FnPath::new(raw)
    }
}

impl From<String> for FnPath {
    fn from(raw: String) -> Self {
        FnPath::new(raw)
    }
}
