//! Reporter ion channel tables for isobaric labeling reagents.

use std::fmt;
use std::ops::Index;

/// One reporter ion channel of an isobaric tagging reagent, identified by
/// its position within its [`ChannelSet`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReporterChannel {
    /// Position of this channel within its owning [`ChannelSet`]
    pub index: u32,
    /// The reagent label, e.g. `"127N"`
    pub label: String,
    /// The expected m/z of the reporter ion
    pub reporter_mz: f64,
}

impl ReporterChannel {
    pub fn new(index: u32, label: impl Into<String>, reporter_mz: f64) -> Self {
        Self {
            index,
            label: label.into(),
            reporter_mz,
        }
    }
}

impl fmt::Display for ReporterChannel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.reporter_mz)
    }
}

/// An immutable table of the reporter channels belonging to one labeling
/// reagent kit.
///
/// A `ChannelSet` is constructed once, up front, and passed by reference
/// wherever channel identities are needed; it is never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSet {
    name: String,
    channels: Vec<ReporterChannel>,
}

impl ChannelSet {
    pub fn new(name: impl Into<String>, channels: &[(&str, f64)]) -> Self {
        Self {
            name: name.into(),
            channels: channels
                .iter()
                .enumerate()
                .map(|(i, (label, mz))| ReporterChannel::new(i as u32, *label, *mz))
                .collect(),
        }
    }

    /// The six-channel TMT reagent kit.
    pub fn tmt_6plex() -> Self {
        Self::new(
            "TMT6plex",
            &[
                ("126", 126.127726),
                ("127", 127.124761),
                ("128", 128.134436),
                ("129", 129.131471),
                ("130", 130.141145),
                ("131", 131.138180),
            ],
        )
    }

    /// The ten-channel TMT reagent kit, with N/C isotopologue positions.
    pub fn tmt_10plex() -> Self {
        Self::new(
            "TMT10plex",
            &[
                ("126", 126.127726),
                ("127N", 127.124761),
                ("127C", 127.131081),
                ("128N", 128.128116),
                ("128C", 128.134436),
                ("129N", 129.131471),
                ("129C", 129.137790),
                ("130N", 130.134825),
                ("130C", 130.141145),
                ("131", 131.138180),
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReporterChannel> {
        self.channels.iter()
    }

    /// Look a channel up by its reagent label.
    pub fn get(&self, label: &str) -> Option<&ReporterChannel> {
        self.channels.iter().find(|c| c.label == label)
    }
}

impl Index<&str> for ChannelSet {
    type Output = ReporterChannel;

    /// # Panics
    /// If no channel carries `label`.
    fn index(&self, label: &str) -> &Self::Output {
        self.get(label)
            .unwrap_or_else(|| panic!("no channel labeled {label} in {}", self.name))
    }
}

impl<'a> IntoIterator for &'a ChannelSet {
    type Item = &'a ReporterChannel;
    type IntoIter = std::slice::Iter<'a, ReporterChannel>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.iter()
    }
}
