//! Fixed-length meter templates.
//!
//! # Invariants
//! - A stress sequence matches only when its length equals the template's.
//! - At most `tolerance` positions may violate their slot rule.
//! - Slot rules are strict: `Stressed` accepts primary stress (1) only,
//!   `Unstressed` accepts 0 only. Secondary stress (2) never satisfies a slot.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Requirement for one syllable position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRule {
    Unstressed,
    Stressed,
}

impl SlotRule {
    pub fn accepts(self, stress: u8) -> bool {
        match self {
            Self::Unstressed => stress == 0,
            Self::Stressed => stress == 1,
        }
    }
}

/// Target meters known to the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterKind {
    #[default]
    IambicPentameter,
    AnapesticTrimeter,
}

impl MeterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IambicPentameter => "iambic_pentameter",
            Self::AnapesticTrimeter => "anapestic_trimeter",
        }
    }

    pub fn template(self) -> MeterTemplate {
        match self {
            Self::IambicPentameter => MeterTemplate::iambic_pentameter(),
            Self::AnapesticTrimeter => MeterTemplate::anapestic_trimeter(),
        }
    }
}

impl Display for MeterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-position stress rules plus an allowed number of mismatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterTemplate {
    kind: MeterKind,
    slots: Vec<SlotRule>,
    tolerance: usize,
}

impl MeterTemplate {
    /// Five iambs: `0 1 0 1 0 1 0 1 0 1`, matched exactly.
    pub fn iambic_pentameter() -> Self {
        let slots = (0..10)
            .map(|idx| {
                if idx % 2 == 0 {
                    SlotRule::Unstressed
                } else {
                    SlotRule::Stressed
                }
            })
            .collect();
        Self {
            kind: MeterKind::IambicPentameter,
            slots,
            tolerance: 0,
        }
    }

    /// Three anapests: `0 0 1 0 0 1 0 0 1`, one mismatch tolerated.
    pub fn anapestic_trimeter() -> Self {
        let slots = (0..9)
            .map(|idx| {
                if idx % 3 == 2 {
                    SlotRule::Stressed
                } else {
                    SlotRule::Unstressed
                }
            })
            .collect();
        Self {
            kind: MeterKind::AnapesticTrimeter,
            slots,
            tolerance: 1,
        }
    }

    pub fn kind(&self) -> MeterKind {
        self.kind
    }

    /// Number of syllables a matching line must have.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn tolerance(&self) -> usize {
        self.tolerance
    }

    pub fn slots(&self) -> &[SlotRule] {
        &self.slots
    }

    pub fn matches(&self, stresses: &[u8]) -> bool {
        if stresses.len() != self.slots.len() {
            return false;
        }

        let mut mismatches = 0;
        for (rule, stress) in self.slots.iter().zip(stresses) {
            if !rule.accepts(*stress) {
                mismatches += 1;
                if mismatches > self.tolerance {
                    return false;
                }
            }
        }
        true
    }
}

/// Returns whether `stresses` satisfies `template`.
pub fn matches_template(stresses: &[u8], template: &MeterTemplate) -> bool {
    template.matches(stresses)
}
