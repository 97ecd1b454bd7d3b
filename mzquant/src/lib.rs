//! Indexing of spectral peaks and aggregation of isobaric reporter ion
//! intensities into per-peptide quantitative ratios.
//!
//! The [`spectrum`] module provides the sorted, searchable peak container;
//! [`quant`] holds the quantified peak/scan/peptide hierarchy and the ratio
//! engine; [`select`] locates the MS1 scans eligible for quantitation around
//! a peptide's identifications.

pub mod channel;
pub mod psm;
pub mod quant;
pub mod scan;
pub mod select;
pub mod spectrum;
pub mod stats;
