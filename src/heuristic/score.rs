//! Integer scoring of candidate configurations.
//!
//! Each candidate tokenizes only the first few rows of the input. The score
//! rewards consistent and plausible row widths and non-empty content; the
//! weights are tuning values, not invariants, and can be overridden.

use std::borrow::Cow;

use encoding_rs::Encoding;
use foldhash::{HashMap, HashMapExt};

use super::candidates::Candidate;
use super::header::looks_like_header;
use crate::configuration::Configuration;
use crate::reader::{Reader, Row};

/// Weights of the detection score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Per row whose field count equals the previous row's.
    pub consistent_row: i64,
    /// Per row whose field count lies in the plausible range.
    pub plausible_width: i64,
    /// Smallest plausible field count.
    pub min_plausible_fields: usize,
    /// Largest plausible field count.
    pub max_plausible_fields: usize,
    /// Per single-field row (normally negative).
    pub single_field_row: i64,
    /// Per row wider than the plausible range (normally negative).
    pub too_wide_row: i64,
    /// Per non-empty field.
    pub non_empty_field: i64,
    /// Flat bonus when more than one row was read.
    pub multi_row: i64,
    /// Per row whose field count equals the most frequent field count.
    pub modal_row: i64,
    /// Added to whichever header setting agrees with the header evidence.
    pub header_evidence: i64,
    /// Score of a candidate whose encoding cannot decode the input. Also
    /// the floor a winner must beat.
    pub undecodable: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            consistent_row: 10,
            plausible_width: 5,
            min_plausible_fields: 2,
            max_plausible_fields: 50,
            single_field_row: -2,
            too_wide_row: -5,
            non_empty_field: 1,
            multi_row: 20,
            modal_row: 5,
            header_evidence: 1,
            undecodable: -1,
        }
    }
}

/// Score result for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateScore {
    /// Generation order of the candidate.
    pub index: usize,
    /// The configuration that was scored.
    pub configuration: Configuration,
    /// The score (higher is better).
    pub score: i64,
    /// Number of rows tokenized.
    pub num_rows: usize,
    /// Most frequent field count among those rows.
    pub modal_field_count: usize,
}

/// Score a sample of rows. The header flag plays no part here.
pub fn score_rows(rows: &[Row], weights: &ScoringWeights) -> i64 {
    let mut score = 0;
    let mut previous: Option<usize> = None;

    for row in rows {
        let count = row.len();

        if previous == Some(count) {
            score += weights.consistent_row;
        }
        previous = Some(count);

        if (weights.min_plausible_fields..=weights.max_plausible_fields).contains(&count) {
            score += weights.plausible_width;
        }

        if count == 1 {
            score += weights.single_field_row;
        } else if count > weights.max_plausible_fields {
            score += weights.too_wide_row;
        }

        let non_empty = row.iter().filter(|field| !field.is_empty()).count();
        score += weights.non_empty_field * non_empty as i64;
    }

    if rows.len() > 1 {
        score += weights.multi_row;
    }

    let (_, modal_rows) = modal_field_count(rows);
    score += weights.modal_row * modal_rows as i64;

    score
}

/// Most frequent field count and how many rows have it.
///
/// Among equally frequent counts the larger one is reported; the number of
/// rows is the same either way.
pub fn modal_field_count(rows: &[Row]) -> (usize, usize) {
    let mut counts: HashMap<usize, usize> = HashMap::with_capacity(rows.len());
    for row in rows {
        *counts.entry(row.len()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(fc_a, count_a), (fc_b, count_b)| {
            count_a.cmp(count_b).then_with(|| fc_a.cmp(fc_b))
        })
        .unwrap_or((0, 0))
}

/// Tokenize up to `max_rows` rows of a prepared buffer.
pub fn sample_rows(
    data: &[u8],
    field_encoding: &'static Encoding,
    configuration: &Configuration,
    max_rows: usize,
) -> Vec<Row> {
    Reader::from_prepared(Cow::Borrowed(data), field_encoding, configuration)
        .take(max_rows)
        .collect()
}

/// Score one candidate against its prepared buffer.
pub fn score_candidate(
    candidate: &Candidate,
    data: &[u8],
    field_encoding: &'static Encoding,
    weights: &ScoringWeights,
    max_rows: usize,
) -> CandidateScore {
    if !candidate.decodes {
        return CandidateScore {
            index: candidate.index,
            configuration: candidate.configuration.clone(),
            score: weights.undecodable,
            num_rows: 0,
            modal_field_count: 0,
        };
    }

    let rows = sample_rows(data, field_encoding, &candidate.configuration, max_rows);
    let mut score = score_rows(&rows, weights);
    if looks_like_header(&rows) == candidate.configuration.first_row_as_header {
        score += weights.header_evidence;
    }

    CandidateScore {
        index: candidate.index,
        configuration: candidate.configuration.clone(),
        score,
        num_rows: rows.len(),
        modal_field_count: modal_field_count(&rows).0,
    }
}

/// Highest score, earliest generated on ties.
///
/// Returns `None` when there are no scores or none beats `floor`.
pub fn select_best(scores: &[CandidateScore], floor: i64) -> Option<&CandidateScore> {
    scores
        .iter()
        .filter(|s| s.score > floor)
        .max_by(|a, b| a.score.cmp(&b.score).then_with(|| b.index.cmp(&a.index)))
}
