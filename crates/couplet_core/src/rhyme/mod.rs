//! Rhyme keys and couplet matching.

pub mod couplet;
pub mod key;

pub use couplet::{find_couplets, oldest_recent, Couplet, CoupletMatcher, LineRef, PairingWindow};
pub use key::{do_words_rhyme, rhyme_key, RhymeKey, RhymeLookup};
