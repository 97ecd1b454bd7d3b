//! Peptide-spectrum match records and search-engine score semantics.

use std::fmt;

/// Identifies one scan within one acquisition file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanId {
    /// Name of the acquisition file the scan came from
    pub file: String,
    /// The scan's acquisition number within that file
    pub number: u32,
}

impl ScanId {
    pub fn new(file: impl Into<String>, number: u32) -> Self {
        Self {
            file: file.into(),
            number,
        }
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.file, self.number)
    }
}

/// The direction in which a search engine score improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoreInterpretation {
    HigherIsBetter,
    LowerIsBetter,
}

impl ScoreInterpretation {
    /// Whether `candidate` is strictly better than `incumbent` under this
    /// interpretation.
    pub fn is_better(&self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::HigherIsBetter => candidate > incumbent,
            Self::LowerIsBetter => candidate < incumbent,
        }
    }
}

/// The search engine statistic attached to a [`PeptideSpectralMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PsmScoreType {
    /// An expectation value, smaller is more confident
    EValue,
    /// A SEQUEST-style cross-correlation score, larger is better
    XCorr,
    /// A Morpheus score, larger is better
    Morpheus,
}

impl PsmScoreType {
    pub fn interpretation(&self) -> ScoreInterpretation {
        match self {
            Self::EValue => ScoreInterpretation::LowerIsBetter,
            Self::XCorr | Self::Morpheus => ScoreInterpretation::HigherIsBetter,
        }
    }
}

/// A single peptide identification for one scan, read-only once constructed.
///
/// The peptide string is the full sequence-with-modification-state form, so
/// two matches to the same modified peptide compare equal on `peptide` while
/// differently modified forms do not.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeptideSpectralMatch {
    pub peptide: String,
    pub scan: ScanId,
    pub charge: i32,
    pub score: f64,
    pub score_type: PsmScoreType,
}

impl PeptideSpectralMatch {
    pub fn new(
        peptide: impl Into<String>,
        scan: ScanId,
        charge: i32,
        score: f64,
        score_type: PsmScoreType,
    ) -> Self {
        Self {
            peptide: peptide.into(),
            scan,
            charge,
            score,
            score_type,
        }
    }

    /// The acquisition file this match's scan belongs to.
    pub fn file_name(&self) -> &str {
        &self.scan.file
    }

    /// Whether this match outranks `other` under this match's own score
    /// interpretation.
    pub fn is_better_than(&self, other: &PeptideSpectralMatch) -> bool {
        self.score_type
            .interpretation()
            .is_better(self.score, other.score)
    }
}
