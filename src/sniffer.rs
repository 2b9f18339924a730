//! Main Sniffer builder and detection methods.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use encoding_rs::Encoding;
use rayon::prelude::*;

use crate::configuration::Configuration;
use crate::encoding::{EncodingCandidate, decodes_cleanly, encoding_candidates, prepare_input};
use crate::error::Result;
use crate::heuristic::candidates::{
    Candidate, ESCAPES, QUOTES, generate_candidates, sample_text, separator_candidates,
};
use crate::heuristic::decimal::infer_decimal_mark;
use crate::heuristic::score::{
    CandidateScore, ScoringWeights, sample_rows, score_candidate, select_best,
};
use crate::sample::SampleLimits;

type ProgressFn = dyn Fn(f64) + Send + Sync;

/// Outcome of a detection run with every candidate's score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionReport {
    /// The chosen configuration (the default one when nothing beat the floor).
    pub configuration: Configuration,
    /// Scores in generation order.
    pub candidates: Vec<CandidateScore>,
    /// Index of the winning candidate, if any.
    pub best: Option<usize>,
}

impl DetectionReport {
    /// The winning candidate's score record.
    pub fn best_score(&self) -> Option<&CandidateScore> {
        self.best.and_then(|i| self.candidates.get(i))
    }
}

/// Delimited-text configuration sniffer.
///
/// Detection never fails: when no candidate scores above the floor the
/// default configuration is returned.
///
/// # Example
///
/// ```
/// use tabsniff::Sniffer;
///
/// let mut sniffer = Sniffer::new();
/// sniffer.parallel(false);
///
/// let config = sniffer.detect(b"name;age\nAlice;30\nBob;25\n");
/// assert_eq!(config.separator_char(), ';');
/// assert!(config.first_row_as_header);
/// ```
#[derive(Clone)]
pub struct Sniffer {
    /// How much input is inspected.
    limits: SampleLimits,
    /// Score weights.
    weights: ScoringWeights,
    /// Score candidates on the rayon pool.
    parallel: bool,
    /// Optional forced encoding (skips encoding detection).
    forced_encoding: Option<&'static Encoding>,
    /// Optional forced separator (skips separator detection).
    forced_separator: Option<char>,
    /// Optional forced quote character.
    forced_quote: Option<char>,
    /// Called with the fraction of candidates scored so far.
    progress: Option<Arc<ProgressFn>>,
}

impl fmt::Debug for Sniffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sniffer")
            .field("limits", &self.limits)
            .field("weights", &self.weights)
            .field("parallel", &self.parallel)
            .field("forced_encoding", &self.forced_encoding.map(Encoding::name))
            .field("forced_separator", &self.forced_separator)
            .field("forced_quote", &self.forced_quote)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniffer {
    /// Create a new Sniffer with default settings.
    pub fn new() -> Self {
        Self {
            limits: SampleLimits::default(),
            weights: ScoringWeights::default(),
            parallel: true,
            forced_encoding: None,
            forced_separator: None,
            forced_quote: None,
            progress: None,
        }
    }

    /// Set the sampling limits.
    pub fn sample_limits(&mut self, limits: SampleLimits) -> &mut Self {
        self.limits = limits;
        self
    }

    /// Override the score weights.
    pub fn scoring_weights(&mut self, weights: ScoringWeights) -> &mut Self {
        self.weights = weights;
        self
    }

    /// Score candidates in parallel (the default) or sequentially.
    ///
    /// Both modes return identical results.
    pub fn parallel(&mut self, parallel: bool) -> &mut Self {
        self.parallel = parallel;
        self
    }

    /// Force a specific encoding (skip encoding detection).
    pub fn encoding(&mut self, encoding: &'static Encoding) -> &mut Self {
        self.forced_encoding = Some(encoding);
        self
    }

    /// Force a specific separator (skip separator detection).
    pub fn separator(&mut self, separator: char) -> &mut Self {
        self.forced_separator = Some(separator);
        self
    }

    /// Force a specific quote character.
    pub fn quote(&mut self, quote: char) -> &mut Self {
        self.forced_quote = Some(quote);
        self
    }

    /// Register a callback receiving the fraction of candidates scored.
    ///
    /// In parallel mode the callback runs on pool threads.
    pub fn on_progress<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    /// Detect the configuration of the file at `path`.
    pub fn detect_path<P: AsRef<Path>>(&self, path: P) -> Result<Configuration> {
        let data = std::fs::read(path.as_ref())?;
        Ok(self.detect(&data))
    }

    /// Detect the most likely configuration of `data`.
    pub fn detect(&self, data: &[u8]) -> Configuration {
        self.detect_report(data).configuration
    }

    /// Detect and return every candidate's score alongside the winner.
    pub fn detect_report(&self, data: &[u8]) -> DetectionReport {
        let encodings = self.encoding_stage(data);

        let prepared = self.prepare_buffers(data, &encodings);

        let (first_buffer, first_encoding) = &prepared[0];
        let separators = self.separator_stage(first_buffer, *first_encoding);
        let quotes: Vec<char> = match self.forced_quote {
            Some(q) => vec![q],
            None => QUOTES.to_vec(),
        };

        let candidates = generate_candidates(&encodings, &separators, &quotes, ESCAPES);
        tracing::debug!(
            encodings = encodings.len(),
            separators = ?separators,
            candidates = candidates.len(),
            "generated candidate configurations"
        );

        let scores = self.score_all(&candidates, &prepared);

        let Some(best) = select_best(&scores, self.weights.undecodable) else {
            tracing::warn!(
                candidates = scores.len(),
                "no candidate scored above the floor, using default configuration"
            );
            return DetectionReport {
                configuration: Configuration::default(),
                candidates: scores,
                best: None,
            };
        };

        let winner = &candidates[best.index];
        let (buffer, field_encoding) = &prepared[winner.encoding_index];
        let sample = sample_rows(
            buffer,
            *field_encoding,
            &winner.configuration,
            self.limits.rows_per_candidate,
        );
        let configuration = best
            .configuration
            .clone()
            .with_decimal_mark(infer_decimal_mark(&sample));

        tracing::debug!(
            index = best.index,
            score = best.score,
            configuration = %configuration,
            "selected configuration"
        );

        let best = Some(best.index);
        DetectionReport {
            configuration,
            candidates: scores,
            best,
        }
    }

    /// One scan buffer per encoding, cut to the scoring prefix first so no
    /// candidate tokenizes more than `scoring_bytes` of input.
    fn prepare_buffers<'a>(
        &self,
        data: &'a [u8],
        encodings: &[EncodingCandidate],
    ) -> Vec<(Cow<'a, [u8]>, &'static Encoding)> {
        let prefix = self.limits.scoring_prefix(data);
        encodings
            .iter()
            .map(|candidate| prepare_input(prefix, candidate.encoding))
            .collect()
    }

    fn encoding_stage(&self, data: &[u8]) -> Vec<EncodingCandidate> {
        let encodings = match self.forced_encoding {
            Some(encoding) => vec![EncodingCandidate::new(
                encoding,
                decodes_cleanly(data, encoding),
            )],
            None => encoding_candidates(data),
        };
        tracing::debug!(
            encodings = ?encodings.iter().map(|c| c.encoding.name()).collect::<Vec<_>>(),
            "encoding candidates"
        );
        encodings
    }

    fn separator_stage(&self, buffer: &[u8], field_encoding: &'static Encoding) -> Vec<char> {
        if let Some(separator) = self.forced_separator {
            return vec![separator];
        }
        let text = sample_text(buffer, field_encoding, &self.limits);
        separator_candidates(&text, &self.limits)
    }

    fn score_all(
        &self,
        candidates: &[Candidate],
        prepared: &[(Cow<'_, [u8]>, &'static Encoding)],
    ) -> Vec<CandidateScore> {
        let total = candidates.len();
        let done = AtomicUsize::new(0);

        let score_one = |candidate: &Candidate| {
            let (buffer, field_encoding) = &prepared[candidate.encoding_index];
            let score = score_candidate(
                candidate,
                buffer,
                *field_encoding,
                &self.weights,
                self.limits.rows_per_candidate,
            );
            tracing::trace!(
                index = score.index,
                score = score.score,
                configuration = %score.configuration,
                "scored candidate"
            );
            if let Some(progress) = &self.progress {
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                progress(finished as f64 / total as f64);
            }
            score
        };

        // Collecting an indexed parallel iterator keeps generation order.
        if self.parallel {
            candidates.par_iter().map(score_one).collect()
        } else {
            candidates.iter().map(score_one).collect()
        }
    }
}
