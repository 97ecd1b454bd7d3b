//! End-to-end run of the quantitation pipeline over a synthetic acquisition:
//! group identifications, attach quantified scans, and query ratios.

use mzpeaks::Tolerance;
use rayon::prelude::*;

use mzquant::channel::ChannelSet;
use mzquant::psm::{PeptideSpectralMatch, PsmScoreType, ScanId};
use mzquant::quant::{group_by_peptide, IntensityWeighting, SignalFilter};
use mzquant::scan::{MsDataFile, MsScan};
use mzquant::select::ScanSelector;
use mzquant::spectrum::SpectrumIndex;

const FILE: &str = "run1.raw";

fn spectrum(reporters: &[(f64, f32)]) -> SpectrumIndex {
    // a handful of unit-intensity background peaks keeps the median peak
    // intensity at 1.0, so reporter S/N equals raw reporter intensity
    let mut mzs = vec![410.2, 432.8, 458.1, 477.5, 493.9];
    let mut intensities = vec![1.0f32; 5];
    for (mz, intensity) in reporters {
        mzs.push(*mz);
        intensities.push(*intensity);
    }
    SpectrumIndex::from_arrays(&mzs, &intensities).unwrap()
}

fn survey_scan(number: u32, retention_time: f64) -> MsScan {
    MsScan::new(
        ScanId::new(FILE, number),
        1,
        retention_time,
        120_000.0,
        None,
        spectrum(&[]),
    )
}

fn fragment_scan(number: u32, retention_time: f64, reporters: &[(f64, f32)]) -> MsScan {
    MsScan::new(
        ScanId::new(FILE, number),
        2,
        retention_time,
        45_000.0,
        Some(2),
        spectrum(reporters),
    )
}

fn make_file(channels: &ChannelSet) -> MsDataFile {
    let mz_126 = channels["126"].reporter_mz;
    let mz_127 = channels["127"].reporter_mz;
    let mut scans = Vec::new();
    for number in 1u32..=10 {
        let rt = f64::from(number - 1) * 0.1;
        if number % 2 == 1 {
            scans.push(survey_scan(number, rt));
        } else {
            let reporters: Vec<(f64, f32)> = match number {
                4 => vec![(mz_126, 100.0), (mz_127, 50.0)],
                6 => vec![(mz_126, 200.0), (mz_127, 100.0)],
                _ => Vec::new(),
            };
            scans.push(fragment_scan(number, rt, &reporters));
        }
    }
    MsDataFile::new(FILE, scans)
}

fn make_psms() -> Vec<PeptideSpectralMatch> {
    vec![
        PeptideSpectralMatch::new(
            "ELVISLIVESK",
            ScanId::new(FILE, 4),
            2,
            0.05,
            PsmScoreType::EValue,
        ),
        PeptideSpectralMatch::new(
            "ELVISLIVESK",
            ScanId::new(FILE, 6),
            2,
            0.01,
            PsmScoreType::EValue,
        ),
        PeptideSpectralMatch::new(
            "PEPTIDEK",
            ScanId::new(FILE, 8),
            2,
            3.4,
            PsmScoreType::XCorr,
        ),
    ]
}

#[test_log::test]
fn test_full_pipeline() {
    let channels = ChannelSet::tmt_6plex();
    let files = vec![make_file(&channels)];

    let mut peptides = group_by_peptide(make_psms()).unwrap();
    assert_eq!(peptides.len(), 2);
    assert_eq!(peptides[0].peptide(), "ELVISLIVESK");
    assert_eq!(peptides[0].psm_count(), 2);
    assert_eq!(peptides[0].best_psm().unwrap().score, 0.01);
    assert_eq!(peptides[1].peptide(), "PEPTIDEK");

    ScanSelector::new(0.45, 1, 100_000.0)
        .populate_quantified_scans(&files, &mut peptides, &channels, Tolerance::PPM(20.0))
        .unwrap();

    // ELVISLIVESK: identified at 0.3 and 0.5 minutes, so the padded window
    // clips to the whole run and every survey scan qualifies, plus the two
    // identified fragmentation scans
    assert_eq!(peptides[0].quantified_scan_count(), 7);
    // PEPTIDEK: window [0.25, 0.9] holds three survey scans plus its own scan
    assert_eq!(peptides[1].quantified_scan_count(), 4);

    let (a, b) = (&channels["126"], &channels["127"]);
    let filter = SignalFilter::default();

    let ratio = peptides[0]
        .overall_ratio(a, b, IntensityWeighting::Summed, filter)
        .unwrap();
    assert!((ratio - 2.0).abs() < 1e-9);

    // both scans measured a 2:1 ratio, so the distribution collapses
    let individual = peptides[0]
        .individual_ratio(a, b, IntensityWeighting::Median, filter)
        .unwrap();
    assert!((individual - 2.0).abs() < 1e-9);
    let variation = peptides[0]
        .ratio_variation(a, b, filter)
        .unwrap();
    assert!((variation - 1.0).abs() < 1e-9);

    // the second peptide's scans saw no reporter signal at all
    assert_eq!(
        peptides[1]
            .overall_ratio(a, b, IntensityWeighting::Summed, filter)
            .unwrap(),
        0.0
    );
}

#[test_log::test]
fn test_peptides_quantify_in_parallel() {
    let channels = ChannelSet::tmt_6plex();
    let files = vec![make_file(&channels)];
    let mut peptides = group_by_peptide(make_psms()).unwrap();
    ScanSelector::new(0.45, 1, 100_000.0)
        .populate_quantified_scans(&files, &mut peptides, &channels, Tolerance::PPM(20.0))
        .unwrap();

    let (a, b) = (&channels["126"], &channels["127"]);
    let serial: Vec<f64> = peptides
        .iter()
        .map(|p| {
            p.overall_ratio(a, b, IntensityWeighting::Summed, SignalFilter::default())
                .unwrap()
        })
        .collect();
    let parallel: Vec<f64> = peptides
        .par_iter()
        .map(|p| {
            p.overall_ratio(a, b, IntensityWeighting::Summed, SignalFilter::default())
                .unwrap()
        })
        .collect();
    assert_eq!(serial, parallel);
}
