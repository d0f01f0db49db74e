//! Page-local feature extraction.

use serde::Serialize;

use crate::lexicon::{Lexicons, PRICE_SYMBOLS};

/// Characters counted as punctuation when classifying word-internal text.
const PUNCT: &[char] = &[
    '.', ',', ';', ':', '?', '!', '(', ')', '-', '"', '\u{201c}', '\u{201d}', '\'',
];

/// One row of the per-page feature matrix.
///
/// Field order is the output column order. The `*minusmean`, `*minusprev`,
/// positional-polynomial, and `htid` fields start zeroed/empty and are
/// filled by the volume-relative pass.
#[derive(Debug, Clone, Serialize)]
pub struct PageFeatures {
    pub pagenum: usize,
    pub pagefrac: f64,
    pub backnum: usize,
    pub backfrac: f64,
    pub nlines: usize,
    pub nwords: usize,
    pub nalpha: usize,
    pub fracalpha: f64,
    pub nnumeric: usize,
    pub fracnumeric: f64,
    pub npunct: usize,
    pub fracpunct: f64,
    pub nupper: usize,
    pub fracupper: f64,
    pub nother: usize,
    pub fracother: f64,
    pub meanlinelen: f64,
    pub sdlinelen: f64,
    pub meanwordlength: f64,
    pub startupper: f64,
    pub verbs: f64,
    pub top2000words: f64,
    pub paratextwords: f64,
    pub byofwords: f64,
    pub fracprice: f64,
    pub nwordsminusmean: f64,
    pub wordlengthminusmean: f64,
    pub linelenminusmean: f64,
    pub top2000minusmean: f64,
    pub nwordsminusprev: f64,
    pub top2000minusprev: f64,
    pub centerdist: f64,
    #[serde(rename = "centerdist^2")]
    pub centerdist_sq: f64,
    #[serde(rename = "pagefrac^2")]
    pub pagefrac_sq: f64,
    #[serde(rename = "backfrac^2")]
    pub backfrac_sq: f64,
    pub htid: String,
}

/// Compute the page-local features for one page.
///
/// Pure function of the page's lines, its zero-based index, the volume's
/// total page count, and the shared lexicon store.
pub fn page_features(
    page: &[&str],
    pagenum: usize,
    total_pages: usize,
    lexicons: &Lexicons,
) -> PageFeatures {
    let pagefrac = pagenum as f64 / total_pages as f64;
    let backnum = total_pages - pagenum;
    let backfrac = backnum as f64 / total_pages as f64;
    let nlines = page.len();

    let mut nwords = 0usize;
    let mut nalpha = 0usize;
    let mut nnumeric = 0usize;
    let mut npunct = 0usize;
    let mut nupper = 0usize;
    let mut nother = 0usize;
    let mut nprice = 0usize;
    let mut word_lengths: Vec<usize> = Vec::new();
    let mut line_lengths: Vec<usize> = Vec::new();
    let mut startupper_count = 0usize;
    let mut verb_hits = 0usize;
    let mut top2000_hits = 0usize;
    let mut paratext_hits = 0usize;
    let mut byof_hits = 0usize;

    for line in page {
        line_lengths.push(line.chars().count());
        if line.chars().next().is_some_and(char::is_uppercase) {
            startupper_count += 1;
        }
        for word in line.split_whitespace() {
            nwords += 1;
            word_lengths.push(word.chars().count());
            let normalized: String = word
                .chars()
                .filter(|c| c.is_alphabetic())
                .flat_map(char::to_lowercase)
                .collect();

            if lexicons.by_of.contains(normalized.as_str()) {
                byof_hits += 1;
            }
            if lexicons.verbs.contains(normalized.as_str()) {
                verb_hits += 1;
            }
            if lexicons.common.contains(normalized.as_str()) {
                top2000_hits += 1;
            }
            if lexicons.paratext_clues.contains(normalized.as_str()) {
                paratext_hits += 1;
            }

            for c in word.chars() {
                if c.is_alphabetic() {
                    nalpha += 1;
                } else if c.is_numeric() {
                    nnumeric += 1;
                } else if PUNCT.contains(&c) {
                    npunct += 1;
                } else {
                    nother += 1;
                }
                if c.is_uppercase() {
                    nupper += 1;
                }
                if PRICE_SYMBOLS.contains(&c) {
                    nprice += 1;
                }
            }
        }
    }

    let meanlinelen = mean(&line_lengths);
    let sdlinelen = if line_lengths.len() > 1 {
        population_sd(&line_lengths, meanlinelen)
    } else {
        0.0
    };
    let meanwordlength = mean(&word_lengths);

    // One implicit inter-word separator per word stands in for space count.
    let nchars = nalpha + nnumeric + npunct + nother + word_lengths.len();
    let (fracalpha, fracnumeric, fracpunct, fracupper, fracother, fracprice) = if nchars > 0 {
        let n = nchars as f64;
        (
            nalpha as f64 / n,
            nnumeric as f64 / n,
            npunct as f64 / n,
            nupper as f64 / n,
            nother as f64 / n,
            nprice as f64 / n,
        )
    } else {
        // A page with nothing to classify counts as all-alphabetic so empty
        // pages never emit undefined fractions.
        (1.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    };

    let startupper = ratio(startupper_count, nlines);

    PageFeatures {
        pagenum,
        pagefrac,
        backnum,
        backfrac,
        nlines,
        nwords,
        nalpha,
        fracalpha,
        nnumeric,
        fracnumeric,
        npunct,
        fracpunct,
        nupper,
        fracupper,
        nother,
        fracother,
        meanlinelen,
        sdlinelen,
        meanwordlength,
        startupper,
        verbs: ratio(verb_hits, nwords),
        top2000words: ratio(top2000_hits, nwords),
        paratextwords: ratio(paratext_hits, nwords),
        byofwords: ratio(byof_hits, nwords),
        fracprice,
        nwordsminusmean: 0.0,
        wordlengthminusmean: 0.0,
        linelenminusmean: 0.0,
        top2000minusmean: 0.0,
        nwordsminusprev: 0.0,
        top2000minusprev: 0.0,
        centerdist: 0.0,
        centerdist_sq: 0.0,
        pagefrac_sq: 0.0,
        backfrac_sq: 0.0,
        htid: String::new(),
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<usize>() as f64 / values.len() as f64
    }
}

fn population_sd(values: &[usize], mean: f64) -> f64 {
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

fn ratio(count: usize, denom: usize) -> f64 {
    if denom > 0 {
        count as f64 / denom as f64
    } else {
        0.0
    }
}
