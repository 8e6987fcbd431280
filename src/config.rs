use log::warn;

/// Default bound on how many operators and function calls may be nested
/// inside each other while a program is evaluated.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Largest depth accepted from any source. Evaluation recurses once per
/// level, so this keeps a full-depth program within a 2 MiB thread stack.
pub const MAX_SUPPORTED_DEPTH: usize = 1024;

/// Environment variable read by [`ParserConfig::from_env`].
pub const MAX_DEPTH_ENV: &str = "MATHPARSER_MAX_DEPTH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum number of operator/function frames active at once.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    /// `max_depth` is clamped to [`MAX_SUPPORTED_DEPTH`].
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.min(MAX_SUPPORTED_DEPTH),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_SUPPORTED_DEPTH);
        self
    }

    /// Builds a config from `MATHPARSER_MAX_DEPTH`, falling back to the
    /// defaults when it is unset or not a positive integer.
    pub fn from_env() -> Self {
        Self::from_raw(std::env::var(MAX_DEPTH_ENV).ok().as_deref())
    }

    fn from_raw(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        match raw.trim().parse::<usize>() {
            Ok(max_depth) if max_depth > MAX_SUPPORTED_DEPTH => {
                warn!(
                    "Ignoring {}={}, the largest supported depth is {}",
                    MAX_DEPTH_ENV, max_depth, MAX_SUPPORTED_DEPTH
                );
                Self::default()
            }
            Ok(max_depth) if max_depth > 0 => Self::new(max_depth),
            _ => {
                warn!(
                    "Ignoring {}={:?}, expected a positive integer",
                    MAX_DEPTH_ENV, raw
                );
                Self::default()
            }
        }
    }
}
