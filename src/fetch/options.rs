//! Fetch options and configuration.

/// Largest page size the content backend accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Options for fetching block sequences from a content source.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to resolve sibling children in parallel
    pub parallel: bool,

    /// Maximum nesting depth to resolve (0 = top level only)
    pub max_depth: usize,

    /// Requested page size for child listings
    pub page_size: usize,
}

impl FetchOptions {
    /// Create new fetch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on the first source error instead of truncating.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable parallel child resolution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel child resolution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set page size, clamped to 1..=100.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            parallel: true,
            max_depth: 8,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Error handling mode while paginating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Propagate the first source error
    Strict,
    /// Stop paginating and keep what was fetched so far
    #[default]
    Lenient,
}
