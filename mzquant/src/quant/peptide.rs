//! Aggregation of identifications and quantified scans for one peptide, and
//! the ratio queries between reporter channels.

use std::collections::HashMap;

use crate::channel::ReporterChannel;
use crate::psm::PeptideSpectralMatch;
use crate::quant::scan::{QuantifiedScan, NUM_ISOTOPES};
use crate::quant::{IntensityWeighting, QuantError, SignalFilter};
use crate::stats;

/// Everything known about one distinct peptide: its identifications, its
/// best identification, and the quantified scans its ratios are computed
/// over.
///
/// Instances are produced by [`group_by_peptide`], populated by
/// [`add_psm`](QuantifiedPeptide::add_psm) and
/// [`add_quantified_scan`](QuantifiedPeptide::add_quantified_scan), and
/// read-only for the ratio queries afterwards.
#[derive(Debug, Clone, Default)]
pub struct QuantifiedPeptide {
    peptide: String,
    psms: Vec<PeptideSpectralMatch>,
    best: Option<usize>,
    scans: Vec<QuantifiedScan>,
}

impl QuantifiedPeptide {
    pub fn new(peptide: impl Into<String>) -> Self {
        Self {
            peptide: peptide.into(),
            ..Default::default()
        }
    }

    /// The peptide sequence-with-modifications this group quantifies.
    pub fn peptide(&self) -> &str {
        &self.peptide
    }

    pub fn psms(&self) -> &[PeptideSpectralMatch] {
        &self.psms
    }

    pub fn psm_count(&self) -> usize {
        self.psms.len()
    }

    /// The highest ranked identification seen so far. [`None`] only before
    /// the first PSM is added.
    pub fn best_psm(&self) -> Option<&PeptideSpectralMatch> {
        self.best.map(|i| &self.psms[i])
    }

    pub fn quantified_scans(&self) -> &[QuantifiedScan] {
        &self.scans
    }

    pub fn quantified_scan_count(&self) -> usize {
        self.scans.len()
    }

    /// Add an identification to this peptide's evidence.
    ///
    /// The first PSM always becomes the best; later ones replace it only
    /// when strictly better under their score's interpretation.
    pub fn add_psm(&mut self, psm: PeptideSpectralMatch) -> Result<(), QuantError> {
        if psm.peptide != self.peptide {
            return Err(QuantError::MismatchedPeptide {
                expected: self.peptide.clone(),
                got: psm.peptide,
            });
        }
        if self.psms.contains(&psm) {
            return Err(QuantError::DuplicatePsm(psm.scan));
        }
        let replace = match self.best {
            Some(incumbent) => psm.is_better_than(&self.psms[incumbent]),
            None => true,
        };
        self.psms.push(psm);
        if replace {
            self.best = Some(self.psms.len() - 1);
        }
        Ok(())
    }

    /// Attach the reporter measurements extracted from one scan.
    ///
    /// The scan must be supported by an identification already present: a
    /// fragmentation scan by the PSM matched on that very scan, a survey
    /// scan by any PSM of the same precursor charge. A scan may only be
    /// attached once, by source-scan identity.
    pub fn add_quantified_scan(&mut self, scan: QuantifiedScan) -> Result<(), QuantError> {
        if self.scans.iter().any(|s| s.scan_id() == scan.scan_id()) {
            return Err(QuantError::DuplicateScan(scan.scan_id().clone()));
        }
        let supported = self.psms.iter().any(|psm| {
            if scan.ms_level() == 2 {
                psm.scan == *scan.scan_id()
            } else {
                psm.charge == scan.charge()
            }
        });
        if !supported {
            return Err(QuantError::NoMatchingIdentification(scan.scan_id().clone()));
        }
        self.scans.push(scan);
        Ok(())
    }

    /// The aggregate intensity of one reporter channel across every
    /// quantified scan and isotopologue position.
    ///
    /// A measurement participates when its signal-to-noise meets the filter
    /// threshold, or unconditionally when the noise-band cap is on. `Summed`
    /// and `Average` degrade to `0.0` when nothing qualifies; `Median` fails
    /// with [`QuantError::EmptyInput`] instead.
    pub fn channel_intensity(
        &self,
        channel: &ReporterChannel,
        method: IntensityWeighting,
        filter: SignalFilter,
    ) -> Result<f64, QuantError> {
        let mut sum = 0.0;
        let mut intensities = Vec::new();
        for scan in self.scans.iter() {
            for isotope in 0..NUM_ISOTOPES {
                let Some(peak) = scan.peak(channel, isotope) else {
                    continue;
                };
                if peak.signal_to_noise >= filter.sn_threshold || filter.noise_band_cap {
                    let intensity =
                        peak.denormalized_intensity(filter.noise_band_cap, filter.sn_threshold);
                    sum += intensity;
                    intensities.push(intensity);
                }
            }
        }
        match method {
            IntensityWeighting::Summed => Ok(sum),
            IntensityWeighting::Average => Ok(stats::safe_div(sum, intensities.len() as f64)),
            IntensityWeighting::Median => {
                stats::median(&intensities).ok_or(QuantError::EmptyInput)
            }
        }
    }

    /// The ratio of two channels' aggregate intensities. A zero denominator
    /// yields `0.0` rather than an error.
    pub fn overall_ratio(
        &self,
        numerator: &ReporterChannel,
        denominator: &ReporterChannel,
        method: IntensityWeighting,
        filter: SignalFilter,
    ) -> Result<f64, QuantError> {
        let top = self.channel_intensity(numerator, method, filter)?;
        let bottom = self.channel_intensity(denominator, method, filter)?;
        Ok(stats::safe_div(top, bottom))
    }

    /// The per-measurement log2 ratios between two channels.
    ///
    /// One entry per (scan, isotopologue) slot where both channels hold a
    /// peak; zero-valued ratios are dropped rather than log-transformed.
    pub fn ratio_list(
        &self,
        numerator: &ReporterChannel,
        denominator: &ReporterChannel,
        filter: SignalFilter,
    ) -> Vec<f64> {
        let mut log2_ratios = Vec::new();
        for scan in self.scans.iter() {
            for isotope in 0..NUM_ISOTOPES {
                let (Some(top), Some(bottom)) = (
                    scan.peak(numerator, isotope),
                    scan.peak(denominator, isotope),
                ) else {
                    continue;
                };
                let ratio = stats::safe_div(
                    top.denormalized_intensity(filter.noise_band_cap, filter.sn_threshold),
                    bottom.denormalized_intensity(filter.noise_band_cap, filter.sn_threshold),
                );
                if ratio != 0.0 {
                    log2_ratios.push(ratio.log2());
                }
            }
        }
        log2_ratios
    }

    /// A single ratio summarizing the per-measurement ratio distribution,
    /// as `2^mean` or `2^median` of the log2 ratios.
    ///
    /// Fails with [`QuantError::EmptyInput`] when no measurement pairs
    /// exist, and with [`QuantError::UnsupportedMethod`] for `Summed`, which
    /// has no meaning on a log-ratio distribution.
    pub fn individual_ratio(
        &self,
        numerator: &ReporterChannel,
        denominator: &ReporterChannel,
        method: IntensityWeighting,
        filter: SignalFilter,
    ) -> Result<f64, QuantError> {
        let mut log2_ratios = self.ratio_list(numerator, denominator, filter);
        log2_ratios.sort_by(f64::total_cmp);
        match method {
            IntensityWeighting::Average => stats::mean(&log2_ratios)
                .map(f64::exp2)
                .ok_or(QuantError::EmptyInput),
            IntensityWeighting::Median => stats::median(&log2_ratios)
                .map(f64::exp2)
                .ok_or(QuantError::EmptyInput),
            IntensityWeighting::Summed => Err(QuantError::UnsupportedMethod(method)),
        }
    }

    /// The spread of the per-measurement ratios as `2^s`, where `s` is the
    /// sample standard deviation of the log2 ratios (Bessel's correction).
    ///
    /// Fails with [`QuantError::InsufficientData`] when fewer than two ratio
    /// points exist.
    pub fn ratio_variation(
        &self,
        numerator: &ReporterChannel,
        denominator: &ReporterChannel,
        filter: SignalFilter,
    ) -> Result<f64, QuantError> {
        let log2_ratios = self.ratio_list(numerator, denominator, filter);
        if log2_ratios.len() < 2 {
            return Err(QuantError::InsufficientData {
                required: 2,
                found: log2_ratios.len(),
            });
        }
        let center = log2_ratios.iter().sum::<f64>() / log2_ratios.len() as f64;
        let variance = log2_ratios
            .iter()
            .map(|r| (r - center).powi(2))
            .sum::<f64>()
            / (log2_ratios.len() - 1) as f64;
        Ok(variance.sqrt().exp2())
    }
}

/// Reduce a stream of identifications into one [`QuantifiedPeptide`] per
/// distinct peptide, in first-seen order.
pub fn group_by_peptide<I>(psms: I) -> Result<Vec<QuantifiedPeptide>, QuantError>
where
    I: IntoIterator<Item = PeptideSpectralMatch>,
{
    let mut peptides: Vec<QuantifiedPeptide> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;
    for psm in psms {
        let slot = match slots.get(&psm.peptide) {
            Some(&i) => i,
            None => {
                slots.insert(psm.peptide.clone(), peptides.len());
                peptides.push(QuantifiedPeptide::new(psm.peptide.clone()));
                peptides.len() - 1
            }
        };
        peptides[slot].add_psm(psm)?;
        total += 1;
    }
    tracing::debug!(
        identifications = total,
        peptides = peptides.len(),
        "grouped identifications into distinct peptides"
    );
    Ok(peptides)
}
