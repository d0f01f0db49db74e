//! Signed Dunning log-likelihood for ranking words that separate body text
//! from paratext. Auxiliary to the feature pipeline; useful when revising
//! the paratext-clue list against labeled corpus counts.

use std::collections::HashMap;

/// Signed G² for one word given body-text and paratext frequency maps.
///
/// Positive when the word leans toward body text, negative when it leans
/// toward paratext, exactly 0 when any cell of the 2×2 table is empty.
pub fn dunning(
    word: &str,
    text_counts: &HashMap<String, u64>,
    paratext_counts: &HashMap<String, u64>,
) -> f64 {
    let text_total: u64 = text_counts.values().sum();
    let paratext_total: u64 = paratext_counts.values().sum();
    let a = text_counts.get(word).copied().unwrap_or(0);
    let c = paratext_counts.get(word).copied().unwrap_or(0);
    signed_g2(
        a as f64,
        (text_total - a) as f64,
        c as f64,
        (paratext_total - c) as f64,
    )
}

/// Score every word whose combined count exceeds `min_count`, most
/// text-like first.
pub fn rank_distinctive_words(
    text_counts: &HashMap<String, u64>,
    paratext_counts: &HashMap<String, u64>,
    min_count: u64,
) -> Vec<(f64, String)> {
    let text_total: u64 = text_counts.values().sum();
    let paratext_total: u64 = paratext_counts.values().sum();

    let mut combined: HashMap<&str, u64> = HashMap::new();
    for (word, &n) in text_counts.iter().chain(paratext_counts.iter()) {
        *combined.entry(word.as_str()).or_default() += n;
    }

    let mut ranked: Vec<(f64, String)> = combined
        .into_iter()
        .filter(|&(_, total)| total > min_count)
        .map(|(word, _)| {
            let a = text_counts.get(word).copied().unwrap_or(0);
            let c = paratext_counts.get(word).copied().unwrap_or(0);
            let score = signed_g2(
                a as f64,
                (text_total - a) as f64,
                c as f64,
                (paratext_total - c) as f64,
            );
            (score, word.to_string())
        })
        .collect();

    ranked.sort_by(|x, y| y.0.total_cmp(&x.0).then_with(|| x.1.cmp(&y.1)));
    ranked
}

fn signed_g2(a: f64, b: f64, c: f64, d: f64) -> f64 {
    if a == 0.0 || b == 0.0 || c == 0.0 || d == 0.0 {
        return 0.0;
    }

    let n = a + b + c + d;
    let e1 = (a + c) * (a + b) / n;
    let e2 = (a + c) * (c + d) / n;
    let e3 = (b + d) * (a + b) / n;
    let e4 = (b + d) * (c + d) / n;

    let g2 = 2.0 * (a * (a / e1).ln() + c * (c / e2).ln() + b * (b / e3).ln() + d * (d / e4).ln());

    if a / (a + b) > c / (c + d) {
        g2
    } else {
        -g2
    }
}
