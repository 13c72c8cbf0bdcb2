//! Lexicon loaders for CMU-dictionary text and JSON sources.

use super::{Lexicon, LexiconError, Variant};
use log::info;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

impl Lexicon {
    /// Parses CMU-dictionary formatted text.
    ///
    /// Lines look like `WORD  PH1 PH2` with alternate readings spelled
    /// `WORD(2)  PH1 PH2`; lines starting with `;;;` are comments, and
    /// anything after `#` on an entry line is an annotation.
    pub fn from_cmudict_str(data: &str) -> Result<Self, LexiconError> {
        let mut entries: Vec<(String, Vec<Variant>)> = Vec::new();

        for (idx, line) in data.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with(";;;") {
                continue;
            }
            let entry = strip_annotation(trimmed);
            if entry.is_empty() {
                continue;
            }

            let mut parts = entry.split_whitespace();
            let Some(raw_word) = parts.next() else {
                continue;
            };
            let word = strip_variant_marker(raw_word);
            if word.is_empty() {
                return Err(LexiconError::InvalidLine {
                    line: idx + 1,
                    message: format!("empty headword `{raw_word}`"),
                });
            }

            let variant = Variant::parse(parts).map_err(|err| LexiconError::InvalidLine {
                line: idx + 1,
                message: err.to_string(),
            })?;
            entries.push((word.to_string(), vec![variant]));
        }

        if entries.is_empty() {
            return Err(LexiconError::Empty);
        }
        Ok(Self::from_entries(entries))
    }

    /// Parses a JSON object of `word -> [[phoneme, ...], ...]`.
    pub fn from_json_str(data: &str) -> Result<Self, LexiconError> {
        let raw: BTreeMap<String, Vec<Vec<String>>> = serde_json::from_str(data)?;
        if raw.is_empty() {
            return Err(LexiconError::Empty);
        }

        let mut entries = Vec::with_capacity(raw.len());
        for (word, variants) in raw {
            let variants = variants
                .iter()
                .map(|tokens| Variant::parse(tokens.iter()))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push((word, variants));
        }
        Ok(Self::from_entries(entries))
    }

    /// Loads a lexicon file; `.json` files are parsed as JSON, anything else
    /// as CMU-dictionary text.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let data = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let lexicon = if is_json {
            Self::from_json_str(&data)?
        } else {
            Self::from_cmudict_str(&data)?
        };

        info!(
            "event=lexicon_load module=lexicon status=ok format={} words={} duration_ms={}",
            if is_json { "json" } else { "cmudict" },
            lexicon.len(),
            started_at.elapsed().as_millis()
        );
        Ok(lexicon)
    }
}

fn strip_annotation(line: &str) -> &str {
    line.split_once('#').map_or(line, |(entry, _)| entry).trim_end()
}

fn strip_variant_marker(raw_word: &str) -> &str {
    raw_word
        .split_once('(')
        .map(|(base, _)| base)
        .unwrap_or(raw_word)
}

#[cfg(test)]
mod tests {
    use super::super::{Lexicon, LexiconError};
    use std::io::Write;

    const SAMPLE: &str = ";;; sample corpus
CAT  K AE1 T
TODAY  T AH0 D EY1
TODAY(2)  T UW0 D EY1
";

    #[test]
    fn cmudict_variants_merge_under_one_key() {
        let lexicon = Lexicon::from_cmudict_str(SAMPLE).unwrap();
        assert_eq!(lexicon.variants("today").unwrap().len(), 2);
        assert_eq!(lexicon.variants("cat").unwrap().len(), 1);
    }

    #[test]
    fn cmudict_reports_line_of_bad_phoneme() {
        let err = Lexicon::from_cmudict_str("CAT  K AE1 T\nDOG  D A-O1 G\n").unwrap_err();
        match err {
            LexiconError::InvalidLine { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn trailing_annotations_are_ignored() {
        let lexicon =
            Lexicon::from_cmudict_str("aachen AA1 K AH0 N # place, german\ncat K AE1 T\n# note\n")
                .unwrap();
        let aachen = &lexicon.variants("aachen").unwrap()[0];
        assert_eq!(aachen.stresses(), vec![1, 0]);
        assert_eq!(aachen.phonemes().len(), 4);
        assert!(lexicon.contains("cat"));
    }

    #[test]
    fn comment_only_source_is_empty() {
        let err = Lexicon::from_cmudict_str(";;; nothing here\n").unwrap_err();
        assert!(matches!(err, LexiconError::Empty));
    }

    #[test]
    fn json_source_parses_variants() {
        let lexicon =
            Lexicon::from_json_str(r#"{"gray": [["G", "R", "EY1"]], "Mat": [["M", "AE1", "T"]]}"#)
                .unwrap();
        assert!(lexicon.contains("gray"));
        assert!(lexicon.contains("mat"));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("lexicon.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        file.write_all(br#"{"gray": [["G", "R", "EY1"]]}"#).unwrap();
        drop(file);

        let text_path = dir.path().join("cmudict.dict");
        std::fs::write(&text_path, SAMPLE).unwrap();

        assert!(Lexicon::load(&json_path).unwrap().contains("gray"));
        assert!(Lexicon::load(&text_path).unwrap().contains("today"));
    }
}
