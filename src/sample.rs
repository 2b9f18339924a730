/// Bounds on how much input detection looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLimits {
    /// Maximum characters of decoded text inspected for separators.
    pub max_chars: usize,
    /// Maximum lines of decoded text inspected for separators.
    pub max_lines: usize,
    /// Rows tokenized per candidate configuration during scoring.
    pub rows_per_candidate: usize,
    /// Separator candidates kept after ranking.
    pub max_separators: usize,
    /// Leading bytes of input any candidate may tokenize while scoring.
    ///
    /// An unmatched quote otherwise runs to the end of the input.
    pub scoring_bytes: usize,
}

/// Default for [`SampleLimits::scoring_bytes`].
pub const DEFAULT_SCORING_BYTES: usize = 64 * 1024;

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            max_chars: 1000,
            max_lines: 10,
            rows_per_candidate: 10,
            max_separators: 4,
            scoring_bytes: DEFAULT_SCORING_BYTES,
        }
    }
}

impl SampleLimits {
    /// Create limits with explicit values and the default scoring prefix.
    pub const fn new(
        max_chars: usize,
        max_lines: usize,
        rows_per_candidate: usize,
        max_separators: usize,
    ) -> Self {
        Self {
            max_chars,
            max_lines,
            rows_per_candidate,
            max_separators,
            scoring_bytes: DEFAULT_SCORING_BYTES,
        }
    }

    /// Set the scoring prefix length in bytes.
    pub const fn with_scoring_bytes(mut self, scoring_bytes: usize) -> Self {
        self.scoring_bytes = scoring_bytes;
        self
    }

    /// Byte prefix long enough to hold `max_chars` characters in any
    /// supported encoding.
    pub fn prefix_bytes(&self) -> usize {
        self.max_chars.saturating_mul(4)
    }

    /// The part of `data` candidates are scored against.
    pub fn scoring_prefix<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[..data.len().min(self.scoring_bytes)]
    }
}
