#![allow(dead_code)]

use couplet_core::{FilterConfig, Lexicon, MeterClassifier};
use std::sync::Arc;

pub const FIXTURE_CMUDICT: &str = ";;; fixture pronunciations
A  AH0
AWAY  AH0 W EY1
BAT  B AE1 T
BY  B AY1
CAT  K AE1 T
FLY  F L AY0
GRAY  G R EY1
I  AY0
IN  IH0 N
LEAD  L IY1 D
LEAD(2)  L EH1 D
LIVE  L IH1 V
LIVE(2)  L AY1 V
MAT  M AE1 T
OLD  OW0 L D
ON  AA1 N
READ  R IY1 D
READ(2)  R EH1 D
SAT  S AE0 T
SAW  S AO1
SOFT  S AO1 F T
THE  DH AH0
TODAY  T AH0 D EY1
TWILIGHT  T W AY1 L AY0 T
WIND  W IH1 N D
WIND(2)  W AY1 N D
";

pub const TODAY_LINE: &str = "The cat sat on the soft old mat today";
pub const GRAY_LINE: &str = "I saw a bat fly by in twilight gray";
pub const AWAY_LINE: &str = "The cat sat on the soft old mat away";
/// Scans, but nothing in the fixture rhymes with it.
pub const MAT_LINE: &str = "I saw a bat fly by in twilight mat";

pub const DAY_MS: i64 = 86_400_000;

pub fn lexicon() -> Arc<Lexicon> {
    Arc::new(Lexicon::from_cmudict_str(FIXTURE_CMUDICT).unwrap())
}

pub fn classifier() -> Arc<MeterClassifier> {
    Arc::new(MeterClassifier::from_config(
        lexicon(),
        &FilterConfig::default(),
    ))
}

/// Relay envelope for a new post.
pub fn post_json(rkey: &str, did: &str, text: &str, created_at_ms: i64) -> String {
    serde_json::json!({
        "did": did,
        "time_us": created_at_ms * 1_000,
        "kind": "commit",
        "commit": {
            "rev": rkey,
            "operation": "create",
            "collection": "app.bsky.feed.post",
            "rkey": rkey,
            "record": { "$type": "app.bsky.feed.post", "text": text }
        }
    })
    .to_string()
}
