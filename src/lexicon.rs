//! Static word lexicons backing the membership-ratio features.
//!
//! Everything here is built once at startup from embedded word lists and
//! never mutated afterward; extraction code only runs membership tests.

use std::collections::HashSet;

const MAIN_DICTIONARY: &str = include_str!("../data/main_dictionary.txt");
const ENGLISH_VERBS: &str = include_str!("../data/english_verbs.txt");

/// Tokens common on front-matter, index, and advertisement pages: roman
/// numerals, publishing vocabulary, single-letter OCR residue.
const PARATEXT_CLUES: &[&str] = &[
    "v", "c", "iv", "p", "pp", "contents", "d", "ib", "illustrations", "esq", "cloth", "iii",
    "vols", "ii", "ibid", "edition", "s", "vo", "book", "volume", "page", "shillings", "edited",
    "chapter", "author", "price", "illustrated", "extra", "dollars", "cents", "published",
    "library", "rev", "crown", "j", "w", "index", "vi", "viii", "ix", "x", "xi", "xii",
];

const BY_OF: &[&str] = &["by", "of"];

/// Currency symbols counted toward `fracprice`.
pub const PRICE_SYMBOLS: &[char] = &['$', '£', '¢'];

const HIGH_FREQUENCY_CAP: usize = 25;
const COMMON_CAP: usize = 2000;

/// Read-only lexicon store shared across every page-feature call.
pub struct Lexicons {
    /// Small curated set of the most frequent words. Kept for parity with
    /// the feature design this pipeline inherits; no emitted column reads
    /// it (see the `verbs` note in DESIGN.md).
    pub high_frequency: HashSet<String>,
    /// Rank-bounded common-word set behind `top2000words`.
    pub common: HashSet<String>,
    pub paratext_clues: HashSet<String>,
    pub by_of: HashSet<String>,
    pub verbs: HashSet<String>,
}

impl Lexicons {
    /// Build the store from the embedded frequency dictionary and verb list.
    ///
    /// Dictionary intake runs in rank order, skipping clue words, by/of, and
    /// words shorter than two characters, until both capped sets are full.
    pub fn load() -> Self {
        let paratext_clues: HashSet<String> =
            PARATEXT_CLUES.iter().map(|w| w.to_string()).collect();
        let by_of: HashSet<String> = BY_OF.iter().map(|w| w.to_string()).collect();

        let mut high_frequency: HashSet<String> = ["you", "was", "but", "my"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let mut common: HashSet<String> = HashSet::with_capacity(COMMON_CAP);

        for line in MAIN_DICTIONARY.lines() {
            let word = line.split('\t').next().unwrap_or("").trim();
            if word.chars().count() < 2
                || by_of.contains(word)
                || paratext_clues.contains(word)
            {
                continue;
            }
            if high_frequency.len() < HIGH_FREQUENCY_CAP {
                high_frequency.insert(word.to_string());
            }
            if common.len() < COMMON_CAP {
                common.insert(word.to_string());
            } else {
                break;
            }
        }

        let verbs: HashSet<String> = ENGLISH_VERBS
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(|w| w.to_string())
            .collect();

        Lexicons {
            high_frequency,
            common,
            paratext_clues,
            by_of,
            verbs,
        }
    }
}
