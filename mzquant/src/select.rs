//! Selection of the survey scans eligible for quantitation around a
//! peptide's identifications, and attachment of quantified scans to
//! peptides.

use std::collections::HashMap;

use itertools::{Itertools, MinMaxResult};
use mzpeaks::Tolerance;
use tracing::{debug, trace, warn};

use crate::channel::ChannelSet;
use crate::psm::PeptideSpectralMatch;
use crate::quant::{QuantError, QuantifiedPeptide, QuantifiedScan};
use crate::scan::{MsDataFile, MsScan};

/// Half-width of the retention time window around a peptide's
/// identifications, in minutes.
pub const DEFAULT_RT_WINDOW: f64 = 0.5;

/// The lowest resolving power a scan may have and still be quantified.
pub const DEFAULT_RESOLUTION_MIN: f64 = 100_000.0;

/// The MSn level quantifiable survey scans are read from.
pub const DEFAULT_QUANT_MS_LEVEL: u8 = 1;

/// Locates the scans inside a peptide's elution window that are good enough
/// to quantify from.
#[derive(Debug, Clone, Copy)]
pub struct ScanSelector {
    /// Retention time padding on either side of the identified scans
    pub rt_window: f64,
    /// The MSn level selected scans must have
    pub ms_level: u8,
    /// The resolution floor selected scans must meet
    pub min_resolution: f64,
}

impl Default for ScanSelector {
    fn default() -> Self {
        Self {
            rt_window: DEFAULT_RT_WINDOW,
            ms_level: DEFAULT_QUANT_MS_LEVEL,
            min_resolution: DEFAULT_RESOLUTION_MIN,
        }
    }
}

impl ScanSelector {
    pub fn new(rt_window: f64, ms_level: u8, min_resolution: f64) -> Self {
        Self {
            rt_window,
            ms_level,
            min_resolution,
        }
    }

    /// Every scan of `file` at the selector's MS level and resolution floor
    /// whose retention time falls inside the window spanned by `psms`, in
    /// file order.
    ///
    /// The window runs from the earliest identified scan's retention time
    /// minus [`rt_window`](Self::rt_window) to the latest one's plus the
    /// same, with both bounds clipped to the file's first and last scan
    /// times. Earliest and latest are decided by acquisition number.
    pub fn find_quant_scans<'a>(
        &self,
        file: &'a MsDataFile,
        psms: &[&PeptideSpectralMatch],
    ) -> Vec<&'a MsScan> {
        let (Some(first), Some(last)) = (file.first_scan(), file.last_scan()) else {
            return Vec::new();
        };
        let resolved: Vec<(u32, f64)> = psms
            .iter()
            .filter_map(|psm| match file.scan(psm.scan.number) {
                Some(scan) => Some((psm.scan.number, scan.retention_time)),
                None => {
                    warn!(
                        scan = psm.scan.number,
                        file = file.name(),
                        "identified scan is not present in its file"
                    );
                    None
                }
            })
            .collect();
        let (earliest, latest) = match resolved.iter().minmax_by_key(|(number, _)| *number) {
            MinMaxResult::NoElements => return Vec::new(),
            MinMaxResult::OneElement(only) => (only, only),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let min_time = (earliest.1 - self.rt_window).max(first.retention_time);
        let max_time = (latest.1 + self.rt_window).min(last.retention_time);
        debug!(
            file = file.name(),
            min_time, max_time, "retention time window for quantifiable scans"
        );

        file.iter()
            .filter(|scan| {
                scan.ms_level == self.ms_level
                    && scan.resolution >= self.min_resolution
                    && scan.retention_time >= min_time
                    && scan.retention_time <= max_time
            })
            .collect()
    }

    /// Attach quantified scans to every peptide in place.
    ///
    /// For each peptide, survey scans are located per (charge, file) group
    /// of its identifications and extracted with the group's charge, then
    /// each identification's own scan is extracted with the identification's
    /// charge. A scan that is already attached is skipped; any other
    /// attachment failure is surfaced.
    pub fn populate_quantified_scans(
        &self,
        files: &[MsDataFile],
        peptides: &mut [QuantifiedPeptide],
        channels: &ChannelSet,
        tolerance: Tolerance,
    ) -> Result<(), QuantError> {
        for peptide in peptides.iter_mut() {
            let mut extracted: Vec<QuantifiedScan> = Vec::new();

            for (charge, by_file) in group_psms_by_charge_and_file(peptide.psms()) {
                for (file_name, psms) in by_file {
                    let Some(file) = files.iter().find(|f| f.name() == file_name) else {
                        warn!(file = file_name, "no data file loaded for identifications");
                        continue;
                    };
                    for scan in self.find_quant_scans(file, &psms) {
                        extracted.push(QuantifiedScan::extract(scan, charge, channels, tolerance));
                    }
                }
            }

            for psm in peptide.psms() {
                let scan = files
                    .iter()
                    .find(|f| f.name() == psm.file_name())
                    .and_then(|f| f.scan(psm.scan.number));
                match scan {
                    Some(scan) => {
                        if scan.precursor_charge.is_some_and(|z| z != psm.charge) {
                            warn!(
                                scan = %psm.scan,
                                "identification charge differs from the scan's precursor charge"
                            );
                        }
                        extracted.push(QuantifiedScan::extract(
                            scan,
                            psm.charge,
                            channels,
                            tolerance,
                        ));
                    }
                    None => warn!(scan = %psm.scan, "identified scan is not present in any file"),
                }
            }

            let mut attached = 0usize;
            for scan in extracted {
                match peptide.add_quantified_scan(scan) {
                    Ok(()) => attached += 1,
                    Err(QuantError::DuplicateScan(id)) => {
                        trace!(scan = %id, "scan is already attached, skipping")
                    }
                    Err(e) => return Err(e),
                }
            }
            debug!(
                peptide = peptide.peptide(),
                attached, "attached quantified scans"
            );
        }
        Ok(())
    }
}

/// Partition identifications by precursor charge, then by source file.
/// A pure partitioning step, nothing is filtered out.
pub fn group_psms_by_charge_and_file(
    psms: &[PeptideSpectralMatch],
) -> HashMap<i32, HashMap<&str, Vec<&PeptideSpectralMatch>>> {
    let mut grouped: HashMap<i32, HashMap<&str, Vec<&PeptideSpectralMatch>>> = HashMap::new();
    for psm in psms {
        grouped
            .entry(psm.charge)
            .or_default()
            .entry(psm.file_name())
            .or_default()
            .push(psm);
    }
    grouped
}
