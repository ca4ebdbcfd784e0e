//! Channel identities and the resolved column layout.

use epi_config::ProcessPlan;
use epi_core::{ChannelId, ProcessCompartmentId};

use crate::{ReportError, ReportResult};

// ── ReportKind ────────────────────────────────────────────────────────────────

/// What a channel records.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Occupancy, snapshotted at each whole time unit.
    Prevalence,
    /// Entries, accumulated over the reporting interval.
    Incidence,
    /// Exits, accumulated over the reporting interval.
    Outcidence,
}

impl ReportKind {
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'p' => Some(ReportKind::Prevalence),
            'i' => Some(ReportKind::Incidence),
            'o' => Some(ReportKind::Outcidence),
            _ => None,
        }
    }

    pub fn tag(self) -> char {
        match self {
            ReportKind::Prevalence => 'p',
            ReportKind::Incidence => 'i',
            ReportKind::Outcidence => 'o',
        }
    }
}

// ── BuiltinChannel ────────────────────────────────────────────────────────────

/// The nine fixed channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinChannel {
    S,
    E,
    Ip,
    Is,
    Ia,
    R,
    /// Symptom onsets (Ip → Is).
    Cases,
    /// Onsets leaving the case-reporting delay.
    CasesReported,
    /// New asymptomatic infections (E → Ia).
    Subclinical,
}

impl BuiltinChannel {
    pub const ALL: [BuiltinChannel; 9] = [
        BuiltinChannel::S,
        BuiltinChannel::E,
        BuiltinChannel::Ip,
        BuiltinChannel::Is,
        BuiltinChannel::Ia,
        BuiltinChannel::R,
        BuiltinChannel::Cases,
        BuiltinChannel::CasesReported,
        BuiltinChannel::Subclinical,
    ];

    #[inline]
    pub fn id(self) -> ChannelId {
        ChannelId(self as u32)
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinChannel::S => "S",
            BuiltinChannel::E => "E",
            BuiltinChannel::Ip => "Ip",
            BuiltinChannel::Is => "Is",
            BuiltinChannel::Ia => "Ia",
            BuiltinChannel::R => "R",
            BuiltinChannel::Cases => "cases",
            BuiltinChannel::CasesReported => "cases_reported",
            BuiltinChannel::Subclinical => "subclinical",
        }
    }

    pub fn kind(self) -> ReportKind {
        match self {
            BuiltinChannel::Cases | BuiltinChannel::CasesReported | BuiltinChannel::Subclinical => {
                ReportKind::Incidence
            }
            _ => ReportKind::Prevalence,
        }
    }
}

// ── ChannelLayout ─────────────────────────────────────────────────────────────

/// A process channel: which reporter column records which compartment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProcessChannel {
    pub channel:     ChannelId,
    pub compartment: ProcessCompartmentId,
}

/// Column names and kinds, plus the process channels grouped by kind so the
/// population tick can write them without looking anything up.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelLayout {
    names:      Vec<String>,
    kinds:      Vec<ReportKind>,
    prevalence: Vec<ProcessChannel>,
    incidence:  Vec<ProcessChannel>,
    outcidence: Vec<ProcessChannel>,
}

impl ChannelLayout {
    /// Built-in channels, then one channel per report tag of each process
    /// compartment in plan order.  Unknown tags are a configuration error.
    pub fn new(plan: &ProcessPlan) -> ReportResult<Self> {
        let mut layout = Self {
            names:      BuiltinChannel::ALL.iter().map(|c| c.name().to_owned()).collect(),
            kinds:      BuiltinChannel::ALL.iter().map(|c| c.kind()).collect(),
            prevalence: Vec::new(),
            incidence:  Vec::new(),
            outcidence: Vec::new(),
        };

        for comp in plan.compartments() {
            for tag in comp.report.chars() {
                let kind = ReportKind::from_tag(tag).ok_or_else(|| ReportError::UnknownReportKind {
                    compartment: comp.name.clone(),
                    tag,
                })?;
                let entry = ProcessChannel {
                    channel:     ChannelId(layout.names.len() as u32),
                    compartment: comp.id,
                };
                layout.names.push(format!("{}_{}", comp.name, tag));
                layout.kinds.push(kind);
                match kind {
                    ReportKind::Prevalence => layout.prevalence.push(entry),
                    ReportKind::Incidence => layout.incidence.push(entry),
                    ReportKind::Outcidence => layout.outcidence.push(entry),
                }
            }
        }
        Ok(layout)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn kind(&self, channel: ChannelId) -> ReportKind {
        self.kinds[channel.index()]
    }

    /// Channel id by column name.
    pub fn find(&self, name: &str) -> Option<ChannelId> {
        self.names.iter().position(|n| n == name).map(|i| ChannelId(i as u32))
    }

    #[inline]
    pub fn prevalence(&self) -> &[ProcessChannel] {
        &self.prevalence
    }

    #[inline]
    pub fn incidence(&self) -> &[ProcessChannel] {
        &self.incidence
    }

    #[inline]
    pub fn outcidence(&self) -> &[ProcessChannel] {
        &self.outcidence
    }
}
