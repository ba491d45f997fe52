/// Default for [`ParseOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: u32 = 128;

/// Configuration for a [`Parser`](crate::Parser).
///
/// # Default
///
/// Arrays must be homogeneous and nesting is limited to
/// [`DEFAULT_MAX_DEPTH`] levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of arrays and inline tables inside a value.
    ///
    /// Exceeding it fails the parse with
    /// [`ErrorKind::DepthLimit`](crate::ErrorKind::DepthLimit) instead of
    /// growing the call stack without bound.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: u32,

    /// Whether every element of a static array must share one [`Kind`].
    ///
    /// TOML 1.0 allows mixed arrays such as `[1, "a"]`; turn this off to
    /// accept them.
    ///
    /// # Default
    ///
    /// `true`
    ///
    /// [`Kind`]: crate::Kind
    pub homogeneous_arrays: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            homogeneous_arrays: true,
        }
    }
}

impl ParseOptions {
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn homogeneous_arrays(mut self, enabled: bool) -> Self {
        self.homogeneous_arrays = enabled;
        self
    }
}
