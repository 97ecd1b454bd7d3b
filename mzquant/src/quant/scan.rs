//! The reporter ion measurements extracted from one scan for one peptide.

use std::collections::HashMap;

use identity_hash::BuildIdentityHasher;
use mzpeaks::prelude::*;
use mzpeaks::Tolerance;

use crate::channel::{ChannelSet, ReporterChannel};
use crate::psm::ScanId;
use crate::quant::QuantifiedPeak;
use crate::scan::MsScan;
use crate::stats;

/// The number of isotopologue positions read for every channel, fixed for
/// the whole system.
pub const NUM_ISOTOPES: usize = 3;

/// The mass difference between isotopologue positions, the C13 - C12 mass
/// gap.
pub const NEUTRON_SHIFT: f64 = 1.0033548378;

type ChannelTable = HashMap<u32, [Option<QuantifiedPeak>; NUM_ISOTOPES], BuildIdentityHasher<u32>>;

/// The set of [`QuantifiedPeak`] measurements extracted from one scan,
/// tagged with the originating scan and the precursor charge it was read
/// for.
///
/// Two quantified scans are equal when they came from the same source scan,
/// regardless of what was extracted.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantifiedScan {
    scan: ScanId,
    ms_level: u8,
    charge: i32,
    peaks: ChannelTable,
}

impl PartialEq for QuantifiedScan {
    fn eq(&self, other: &Self) -> bool {
        self.scan == other.scan
    }
}

impl Clone for QuantifiedScan {
    fn clone(&self) -> Self {
        Self {
            scan: self.scan.clone(),
            ms_level: self.ms_level,
            charge: self.charge,
            peaks: self.peaks.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }
}

impl QuantifiedScan {
    pub fn new(scan: ScanId, ms_level: u8, charge: i32) -> Self {
        Self {
            scan,
            ms_level,
            charge,
            peaks: ChannelTable::default(),
        }
    }

    /// Read every channel's isotopologue windows out of `scan`'s peak list.
    ///
    /// Each probe window is centered on the channel's reporter m/z shifted
    /// by the isotopologue index; survey scans use charge-scaled spacing
    /// while fragmentation scans read singly charged reporter regions. The
    /// most intense peak in a window wins, and its signal-to-noise is taken
    /// against the scan's median peak intensity.
    pub fn extract(scan: &MsScan, charge: i32, channels: &ChannelSet, tolerance: Tolerance) -> Self {
        let mut this = Self::new(scan.id.clone(), scan.ms_level, charge);
        let noise = stats::median(
            &scan
                .spectrum
                .iter()
                .map(|p| f64::from(p.intensity()))
                .collect::<Vec<_>>(),
        )
        .unwrap_or(0.0);
        let spacing = if scan.ms_level > 1 {
            NEUTRON_SHIFT
        } else {
            NEUTRON_SHIFT / f64::from(charge.unsigned_abs().max(1))
        };

        for channel in channels.iter() {
            for isotope in 0..NUM_ISOTOPES {
                let center = channel.reporter_mz + isotope as f64 * spacing;
                let (low, high) = tolerance_window(center, tolerance);
                let found = match scan.spectrum.peaks_between(low, high) {
                    Ok(Some(peaks)) => peaks,
                    _ => continue,
                };
                let best = found
                    .iter()
                    .max_by(|a, b| a.intensity().total_cmp(&b.intensity()))
                    .unwrap();
                let signal_to_noise = if noise > 0.0 {
                    f64::from(best.intensity()) / noise
                } else {
                    f64::from(best.intensity())
                };
                this.set_peak(
                    isotope,
                    QuantifiedPeak::new(channel.index, best.mz(), best.intensity(), signal_to_noise),
                );
            }
        }
        tracing::trace!(scan = %this.scan, peaks = this.peak_count(), "extracted reporter peaks");
        this
    }

    pub fn scan_id(&self) -> &ScanId {
        &self.scan
    }

    pub fn ms_level(&self) -> u8 {
        self.ms_level
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    /// Store `peak` in its channel's slot for `isotope`.
    ///
    /// # Panics
    /// If `isotope >= NUM_ISOTOPES`.
    pub fn set_peak(&mut self, isotope: usize, peak: QuantifiedPeak) {
        assert!(
            isotope < NUM_ISOTOPES,
            "isotope index {isotope} out of range"
        );
        let channel = peak.channel;
        self.peaks.entry(channel).or_default()[isotope] = Some(peak);
    }

    /// The measurement stored for `channel` at `isotope`, if one was
    /// extracted.
    pub fn peak(&self, channel: &ReporterChannel, isotope: usize) -> Option<&QuantifiedPeak> {
        self.peaks
            .get(&channel.index)
            .and_then(|slots| slots.get(isotope))
            .and_then(|slot| slot.as_ref())
    }

    /// How many measurements were stored across all channels and
    /// isotopologues.
    pub fn peak_count(&self) -> usize {
        self.peaks
            .values()
            .map(|slots| slots.iter().flatten().count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.peak_count() == 0
    }
}

fn tolerance_window(center: f64, tolerance: Tolerance) -> (f64, f64) {
    match tolerance {
        Tolerance::Da(width) => (center - width, center + width),
        Tolerance::PPM(ppm) => {
            let width = center * ppm * 1e-6;
            (center - width, center + width)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::spectrum::SpectrumIndex;

    fn make_scan() -> MsScan {
        let mut mzs = vec![400.1, 420.7, 455.2, 480.9, 499.3];
        let mut intensities = vec![2.0f32; 5];
        // two candidates inside the 126 window, plus the 127 reporter
        mzs.extend([126.127726, 126.1279, 127.124761]);
        intensities.extend([100.0, 40.0, 50.0]);
        MsScan::new(
            ScanId::new("run1.raw", 2204),
            2,
            15.2,
            45_000.0,
            Some(2),
            SpectrumIndex::from_arrays(&mzs, &intensities).unwrap(),
        )
    }

    #[test]
    fn test_extract_takes_most_intense_in_window() {
        let channels = ChannelSet::tmt_6plex();
        let quant = QuantifiedScan::extract(&make_scan(), 2, &channels, Tolerance::Da(0.003));

        let peak = quant.peak(&channels["126"], 0).unwrap();
        assert_eq!(peak.intensity, 100.0);
        // median background intensity is 2.0
        assert!((peak.signal_to_noise - 50.0).abs() < 1e-6);

        let peak = quant.peak(&channels["127"], 0).unwrap();
        assert_eq!(peak.intensity, 50.0);

        // nothing at the shifted isotopologue positions or other channels
        assert!(quant.peak(&channels["126"], 1).is_none());
        assert!(quant.peak(&channels["131"], 0).is_none());
        assert_eq!(quant.peak_count(), 2);
    }

    #[test]
    fn test_extract_empty_spectrum() {
        let scan = MsScan::new(
            ScanId::new("run1.raw", 9),
            1,
            0.4,
            120_000.0,
            None,
            SpectrumIndex::default(),
        );
        let quant = QuantifiedScan::extract(&scan, 2, &ChannelSet::tmt_6plex(), Tolerance::PPM(20.0));
        assert!(quant.is_empty());
    }

    #[test]
    fn test_equality_is_scan_identity() {
        let mut a = QuantifiedScan::new(ScanId::new("run1.raw", 7), 2, 2);
        let b = QuantifiedScan::new(ScanId::new("run1.raw", 7), 2, 3);
        let c = QuantifiedScan::new(ScanId::new("run2.raw", 7), 2, 2);
        a.set_peak(0, QuantifiedPeak::new(0, 126.1277, 55.0, 9.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_set_and_get_peak() {
        let mut quant = QuantifiedScan::new(ScanId::new("run1.raw", 7), 2, 2);
        quant.set_peak(2, QuantifiedPeak::new(4, 130.1445, 75.0, 6.0));
        let channels = ChannelSet::tmt_6plex();
        assert!(quant.peak(&channels["130"], 2).is_some());
        assert!(quant.peak(&channels["130"], 0).is_none());
        assert!(quant.peak(&channels["130"], NUM_ISOTOPES).is_none());
    }

    #[test]
    fn test_tolerance_window() {
        let (low, high) = tolerance_window(100.0, Tolerance::Da(0.5));
        assert_eq!((low, high), (99.5, 100.5));
        let (low, high) = tolerance_window(100.0, Tolerance::PPM(10.0));
        assert!((low - 99.999).abs() < 1e-9 && (high - 100.001).abs() < 1e-9);
    }

    #[test]
    fn test_survey_scan_uses_charge_scaled_spacing() {
        // precursor envelope of a doubly charged ion, spaced by half a
        // neutron shift
        let base = 642.3210;
        let mzs = vec![base, base + NEUTRON_SHIFT / 2.0, base + NEUTRON_SHIFT];
        let intensities = vec![90.0f32, 60.0, 30.0];
        let scan = MsScan::new(
            ScanId::new("run1.raw", 2201),
            1,
            15.1,
            120_000.0,
            None,
            SpectrumIndex::from_arrays(&mzs, &intensities).unwrap(),
        );
        let channels = ChannelSet::new("precursor", &[("642", base)]);
        let quant = QuantifiedScan::extract(&scan, 2, &channels, Tolerance::PPM(10.0));
        assert_eq!(quant.peak_count(), 3);
        assert_eq!(quant.peak(&channels["642"], 1).unwrap().intensity, 60.0);
    }
}
