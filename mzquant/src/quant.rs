//! Isobaric quantitation over identified peptides.
//!
//! A [`QuantifiedPeak`](peak::QuantifiedPeak) is one reporter ion
//! measurement; a [`QuantifiedScan`](scan::QuantifiedScan) collects the
//! measurements extracted from one scan; a
//! [`QuantifiedPeptide`](peptide::QuantifiedPeptide) aggregates every scan
//! and identification for one peptide and answers the ratio queries.

pub mod peak;
pub mod peptide;
pub mod scan;

pub use self::peak::QuantifiedPeak;
pub use self::peptide::{group_by_peptide, QuantifiedPeptide};
pub use self::scan::{QuantifiedScan, NEUTRON_SHIFT, NUM_ISOTOPES};

use thiserror::Error;

use crate::psm::ScanId;

/// The default signal-to-noise floor below which a reporter measurement is
/// not trusted on its own.
pub const DEFAULT_SN_THRESHOLD: f64 = 3.0;

/// An error that might occur while assembling or querying quantified
/// peptides
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantError {
    #[error("peptide spectral match for {0} is already present")]
    DuplicatePsm(ScanId),
    #[error("quantified scan {0} is already attached")]
    DuplicateScan(ScanId),
    #[error("peptide {got:?} does not belong to the group for {expected:?}")]
    MismatchedPeptide { expected: String, got: String },
    #[error("no identification supports scan {0}")]
    NoMatchingIdentification(ScanId),
    #[error("no data points were collected to aggregate")]
    EmptyInput,
    #[error("at least {required} ratio points are required, found {found}")]
    InsufficientData { required: usize, found: usize },
    #[error("{0:?} weighting is not defined for per-scan ratios")]
    UnsupportedMethod(IntensityWeighting),
}

/// How reporter intensities are combined across scans and isotopologues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntensityWeighting {
    Summed,
    Average,
    Median,
}

/// Signal-quality gating applied when reading reporter intensities.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalFilter {
    /// Substitute a noise-band floor for sub-threshold peaks instead of
    /// excluding them
    pub noise_band_cap: bool,
    /// The minimum signal-to-noise ratio for a peak to count on its own
    pub sn_threshold: f64,
}

impl Default for SignalFilter {
    fn default() -> Self {
        Self {
            noise_band_cap: false,
            sn_threshold: DEFAULT_SN_THRESHOLD,
        }
    }
}

impl SignalFilter {
    pub fn new(noise_band_cap: bool, sn_threshold: f64) -> Self {
        Self {
            noise_band_cap,
            sn_threshold,
        }
    }

    /// A filter that keeps every measurement by capping sub-threshold peaks.
    pub fn noise_band_capped() -> Self {
        Self::new(true, DEFAULT_SN_THRESHOLD)
    }
}
