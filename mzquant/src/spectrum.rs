//! A sorted, searchable collection of centroided peaks for one scan.

use std::fmt;
use std::ops::Index;

use itertools::izip;
use mzpeaks::prelude::*;
use mzpeaks::{CentroidPeak, IndexType};
use thiserror::Error;

/// An error that might occur while building or querying a [`SpectrumIndex`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectrumError {
    #[error("m/z and intensity arrays are not the same dimensions ({mzs} != {intensities})")]
    DimensionMismatch { mzs: usize, intensities: usize },
    #[error("invalid m/z range, minimum {min} is greater than maximum {max}")]
    InvalidRange { min: f64, max: f64 },
}

/// An immutable, m/z-sorted peak list supporting fast sub-range extraction.
///
/// The peak list is sorted once at construction and read-only afterwards, so
/// every query may assume ascending coordinate order. The total ion current
/// and the base peak are computed in the same construction pass and cached.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectrumIndex<C: CentroidLike = CentroidPeak> {
    peaks: Vec<C>,
    tic: f32,
    base_peak: Option<C>,
}

impl<C: CentroidLike> Default for SpectrumIndex<C> {
    fn default() -> Self {
        Self {
            peaks: Vec::new(),
            tic: 0.0,
            base_peak: None,
        }
    }
}

impl<C: CentroidLike + Clone> SpectrumIndex<C> {
    /// Build an index over an arbitrary collection of peak-like values.
    ///
    /// The peaks need not arrive sorted. Base peak ties are broken in favor
    /// of the earliest peak in the input ordering.
    pub fn new(peaks: Vec<C>) -> Self {
        let mut tic = 0.0f32;
        let mut base_peak: Option<C> = None;
        let mut max_intensity = 0.0f32;
        for peak in peaks.iter() {
            tic += peak.intensity();
            if peak.intensity() > max_intensity {
                max_intensity = peak.intensity();
                base_peak = Some(peak.clone());
            }
        }
        let mut inst = Self {
            peaks,
            tic,
            base_peak,
        };
        inst.peaks.sort_by(|a, b| a.mz().total_cmp(&b.mz()));
        for (i, peak) in inst.peaks.iter_mut().enumerate() {
            peak.set_index(i as IndexType);
        }
        inst
    }

    /// Build an index from parallel m/z and intensity arrays.
    pub fn from_arrays(mzs: &[f64], intensities: &[f32]) -> Result<Self, SpectrumError>
    where
        C: From<CentroidPeak>,
    {
        if mzs.len() != intensities.len() {
            return Err(SpectrumError::DimensionMismatch {
                mzs: mzs.len(),
                intensities: intensities.len(),
            });
        }
        let peaks = izip!(mzs.iter(), intensities.iter())
            .enumerate()
            .map(|(i, (mz, intensity))| CentroidPeak::new(*mz, *intensity, i as IndexType).into())
            .collect();
        Ok(Self::new(peaks))
    }
}

impl<C: CentroidLike> SpectrumIndex<C> {
    /// All peaks whose m/z falls within the closed interval `[min, max]`, in
    /// ascending m/z order.
    ///
    /// Returns `Ok(None)` when no peak falls inside the interval, and
    /// [`SpectrumError::InvalidRange`] when `min > max`.
    ///
    /// The first candidate is located by a lower-bound binary search and the
    /// rest by a forward scan, so a query costs O(log N + k) for k matches.
    pub fn peaks_between(&self, min: f64, max: f64) -> Result<Option<&[C]>, SpectrumError> {
        if min > max {
            return Err(SpectrumError::InvalidRange { min, max });
        }
        let start = self.peaks.partition_point(|p| p.mz() < min);
        let mut end = start;
        while end < self.peaks.len() && self.peaks[end].mz() <= max {
            end += 1;
        }
        if start == end {
            Ok(None)
        } else {
            Ok(Some(&self.peaks[start..end]))
        }
    }

    /// The total ion current, the sum of all peak intensities.
    pub fn tic(&self) -> f32 {
        self.tic
    }

    /// The most intense peak, if any peak carried signal.
    pub fn base_peak(&self) -> Option<&C> {
        self.base_peak.as_ref()
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.peaks.iter()
    }

    pub fn as_slice(&self) -> &[C] {
        &self.peaks
    }
}

impl<C: CentroidLike + Clone> FromIterator<C> for SpectrumIndex<C> {
    fn from_iter<T: IntoIterator<Item = C>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<C: CentroidLike> Index<usize> for SpectrumIndex<C> {
    type Output = C;

    fn index(&self, index: usize) -> &Self::Output {
        &self.peaks[index]
    }
}

impl<'a, C: CentroidLike> IntoIterator for &'a SpectrumIndex<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.peaks.iter()
    }
}

impl<C: CentroidLike> fmt::Display for SpectrumIndex<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SpectrumIndex({} peaks)", self.len())
    }
}
