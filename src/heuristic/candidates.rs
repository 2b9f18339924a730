//! Generation of candidate configurations.

use encoding_rs::Encoding;

use crate::configuration::Configuration;
use crate::encoding::{EncodingCandidate, decode_lossy};
use crate::sample::SampleLimits;

/// Separators counted in the sample, in priority order.
/// Colon sits low because it also appears in time values (HH:MM:SS).
pub const SEPARATORS: &[char] = &[',', ';', '\t', '|', ':', '^', '~', ' ', '§', '/', '#', '&'];

/// Quote characters tried for every separator.
pub const QUOTES: &[char] = &['"', '\''];

/// Escape characters tried for every quote.
pub const ESCAPES: &[char] = &['"', '\\'];

/// Returns a priority score for separators (higher = preferred).
pub const fn separator_priority(separator: char) -> u8 {
    match separator {
        ',' => 10, // Comma - most common, highest priority
        ';' => 9,  // Semicolon - common in European locales
        '\t' => 8, // Tab - TSV files
        '|' => 7,  // Pipe - common in data exports
        ':' => 4,
        '^' | '~' => 3,
        ' ' | '§' | '/' => 2,
        '#' | '&' => 1,
        _ => 0,
    }
}

/// A configuration to score, tagged with its generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Position in generation order; lower wins ties.
    pub index: usize,
    /// Index into the encoding candidate list.
    pub encoding_index: usize,
    /// Whether the candidate's encoding decodes the input.
    pub decodes: bool,
    /// The configuration under test.
    pub configuration: Configuration,
}

/// Occurrences of one separator across the sampled lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorCount {
    pub separator: char,
    /// Count per sampled line.
    pub per_line: Vec<usize>,
}

impl SeparatorCount {
    #[inline]
    pub fn total(&self) -> usize {
        self.per_line.iter().sum()
    }
}

/// Decode the leading text used to rank separators.
///
/// `data` must already be prepared for scanning; the result holds at most
/// `max_chars` characters and `max_lines` lines.
pub fn sample_text(data: &[u8], encoding: &'static Encoding, limits: &SampleLimits) -> String {
    let prefix = &data[..data.len().min(limits.prefix_bytes())];
    let decoded = decode_lossy(prefix, encoding);

    let mut text = String::new();
    let mut lines = 0;
    for c in decoded.chars().take(limits.max_chars) {
        if c == '\n' {
            lines += 1;
            if lines >= limits.max_lines {
                break;
            }
        }
        text.push(c);
    }
    text
}

/// Count every known separator on each sampled line.
pub fn count_separators(text: &str, limits: &SampleLimits) -> Vec<SeparatorCount> {
    let lines: Vec<&str> = text.lines().take(limits.max_lines).collect();
    SEPARATORS
        .iter()
        .map(|&separator| SeparatorCount {
            separator,
            per_line: lines
                .iter()
                .map(|line| count_char(line, separator))
                .collect(),
        })
        .collect()
}

#[inline]
fn count_char(line: &str, c: char) -> usize {
    if c.is_ascii() {
        bytecount::count(line.as_bytes(), c as u8)
    } else {
        line.matches(c).count()
    }
}

/// Rank the separators present in `text` and keep the top few.
///
/// Falls back to comma alone when no known separator occurs.
pub fn separator_candidates(text: &str, limits: &SampleLimits) -> Vec<char> {
    let mut present: Vec<(usize, SeparatorCount)> = count_separators(text, limits)
        .into_iter()
        .enumerate()
        .filter(|(_, count)| count.total() > 0)
        .collect();

    present.sort_by(|(a_idx, a), (b_idx, b)| {
        separator_priority(b.separator)
            .cmp(&separator_priority(a.separator))
            .then_with(|| b.total().cmp(&a.total()))
            .then_with(|| a_idx.cmp(b_idx))
    });

    let mut separators: Vec<char> = present
        .into_iter()
        .take(limits.max_separators.max(1))
        .map(|(_, count)| count.separator)
        .collect();

    if separators.is_empty() {
        separators.push(',');
    }
    separators
}

/// Expand encodings x separators x quotes x escapes x header flag.
///
/// Order is the tie-break order: encoding outermost, header-off before
/// header-on innermost.
pub fn generate_candidates(
    encodings: &[EncodingCandidate],
    separators: &[char],
    quotes: &[char],
    escapes: &[char],
) -> Vec<Candidate> {
    let mut candidates =
        Vec::with_capacity(encodings.len() * separators.len() * quotes.len() * escapes.len() * 2);

    for (encoding_index, encoding) in encodings.iter().enumerate() {
        for &separator in separators {
            for &quote in quotes {
                for &escape in escapes {
                    let base = Configuration::new()
                        .with_encoding(encoding.encoding)
                        .with_separator(separator)
                        .with_quote(quote)
                        .with_escape(escape);
                    for header in [false, true] {
                        candidates.push(Candidate {
                            index: candidates.len(),
                            encoding_index,
                            decodes: encoding.decodes,
                            configuration: base.clone().with_header(header),
                        });
                    }
                }
            }
        }
    }

    candidates
}
