//! Couplet matching over classified lines.
//!
//! # Responsibility
//! - Keep lines that pass meter classification and end in a decidable rhyme.
//! - Pair same-key lines whose timestamps fall within the pairing window.
//!
//! # Invariants
//! - Output is reproducible: groups are visited in order of first appearance,
//!   lines within a group in input order, and the final sort is stable.
//! - Couplets are sorted by their earlier timestamp, ascending.
//! - Lines ending in the same word are never paired.

use super::key::{rhyme_key, RhymeKey, RhymeLookup};
use crate::meter::MeterClassifier;
use crate::model::Line;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Maximum time distance between the two lines of a couplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingWindow {
    Unbounded,
    /// Inclusive bound on `|t1 - t2|`.
    Within(Duration),
}

impl PairingWindow {
    pub fn within_secs(secs: u64) -> Self {
        Self::Within(Duration::from_secs(secs))
    }

    pub fn admits(self, first_ms: i64, second_ms: i64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Within(window) => {
                let distance = first_ms.abs_diff(second_ms);
                u128::from(distance) <= window.as_millis()
            }
        }
    }
}

/// Reference to one line of a couplet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRef {
    pub id: String,
    pub timestamp_ms: i64,
}

/// Two rhyming lines, stored earlier line first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Couplet {
    pub first: LineRef,
    pub second: LineRef,
    pub key: RhymeKey,
}

impl Couplet {
    pub fn earlier_ms(&self) -> i64 {
        self.first.timestamp_ms.min(self.second.timestamp_ms)
    }

    /// Timestamp of the more recent of the two lines.
    pub fn later_ms(&self) -> i64 {
        self.first.timestamp_ms.max(self.second.timestamp_ms)
    }

    pub fn line_ids(&self) -> [&str; 2] {
        [self.first.id.as_str(), self.second.id.as_str()]
    }
}

struct Candidate<'a> {
    line: &'a Line,
    last_word: String,
}

/// Finds rhyming couplets among lines using one classifier.
pub struct CoupletMatcher<'c> {
    classifier: &'c MeterClassifier,
    window: PairingWindow,
}

impl<'c> CoupletMatcher<'c> {
    pub fn new(classifier: &'c MeterClassifier, window: PairingWindow) -> Self {
        Self { classifier, window }
    }

    pub fn window(&self) -> PairingWindow {
        self.window
    }

    pub fn find_couplets(&self, lines: &[Line]) -> Vec<Couplet> {
        let mut group_index: HashMap<RhymeKey, usize> = HashMap::new();
        let mut groups: Vec<(RhymeKey, Vec<Candidate<'_>>)> = Vec::new();
        let mut accepted = 0usize;

        for line in lines {
            let assessment = self.classifier.assess(&line.text);
            if !assessment.classification.is_accepted() {
                continue;
            }
            accepted += 1;

            let Some(last_word) = assessment.line.last_token() else {
                continue;
            };
            let key = match rhyme_key(self.classifier.lexicon(), last_word) {
                RhymeLookup::Decidable(key) => key,
                RhymeLookup::Undecidable | RhymeLookup::NotFound => continue,
            };

            let candidate = Candidate {
                line,
                last_word: last_word.to_string(),
            };
            match group_index.get(&key) {
                Some(&idx) => groups[idx].1.push(candidate),
                None => {
                    group_index.insert(key.clone(), groups.len());
                    groups.push((key, vec![candidate]));
                }
            }
        }

        let mut couplets = Vec::new();
        for (key, members) in &groups {
            for (i, left) in members.iter().enumerate() {
                for right in &members[i + 1..] {
                    if left.last_word == right.last_word {
                        continue;
                    }
                    if !self
                        .window
                        .admits(left.line.timestamp_ms, right.line.timestamp_ms)
                    {
                        continue;
                    }
                    couplets.push(pair(left.line, right.line, key.clone()));
                }
            }
        }
        couplets.sort_by_key(Couplet::earlier_ms);

        debug!(
            "event=find_couplets module=rhyme status=ok lines={} accepted={} groups={} couplets={}",
            lines.len(),
            accepted,
            groups.len(),
            couplets.len()
        );
        couplets
    }
}

fn pair(left: &Line, right: &Line, key: RhymeKey) -> Couplet {
    let (first, second) = if right.timestamp_ms < left.timestamp_ms {
        (right, left)
    } else {
        (left, right)
    };
    Couplet {
        first: LineRef {
            id: first.id.clone(),
            timestamp_ms: first.timestamp_ms,
        },
        second: LineRef {
            id: second.id.clone(),
            timestamp_ms: second.timestamp_ms,
        },
        key,
    }
}

/// Convenience wrapper around [`CoupletMatcher::find_couplets`].
pub fn find_couplets(
    classifier: &MeterClassifier,
    lines: &[Line],
    window: PairingWindow,
) -> Vec<Couplet> {
    CoupletMatcher::new(classifier, window).find_couplets(lines)
}

/// Picks the couplet whose more recent line is the oldest.
///
/// Ties keep the first couplet in slice order.
pub fn oldest_recent(couplets: &[Couplet]) -> Option<&Couplet> {
    couplets.iter().min_by_key(|couplet| couplet.later_ms())
}

#[cfg(test)]
mod tests {
    use super::{oldest_recent, Couplet, LineRef, PairingWindow};
    use crate::lexicon::{Phoneme, Variant};
    use crate::rhyme::RhymeKey;
    use std::time::Duration;

    fn couplet(first_ms: i64, second_ms: i64) -> Couplet {
        let variant = Variant::new(vec![Phoneme::parse("EY1").unwrap()]);
        Couplet {
            first: LineRef {
                id: format!("a{first_ms}"),
                timestamp_ms: first_ms,
            },
            second: LineRef {
                id: format!("b{second_ms}"),
                timestamp_ms: second_ms,
            },
            key: RhymeKey::of_variant(&variant),
        }
    }

    #[test]
    fn window_bound_is_inclusive() {
        let window = PairingWindow::within_secs(86_400);
        assert!(window.admits(0, 86_400_000));
        assert!(window.admits(86_400_000, 0));
        assert!(!window.admits(0, 86_401_000));
        assert!(PairingWindow::Unbounded.admits(0, i64::MAX));
        assert!(PairingWindow::Within(Duration::ZERO).admits(5, 5));
    }

    #[test]
    fn oldest_recent_minimizes_the_later_timestamp() {
        let couplets = vec![couplet(0, 500), couplet(100, 200), couplet(50, 300)];
        let chosen = oldest_recent(&couplets).unwrap();
        assert_eq!(chosen.later_ms(), 200);
        assert!(oldest_recent(&[]).is_none());
    }

    #[test]
    fn oldest_recent_keeps_first_on_ties() {
        let couplets = vec![couplet(10, 200), couplet(20, 200)];
        assert_eq!(oldest_recent(&couplets).unwrap().first.timestamp_ms, 10);
    }
}
