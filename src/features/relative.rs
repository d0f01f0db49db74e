//! Volume-relative feature pass.
//!
//! Second pass over one volume's ordered page records: volume means computed
//! over non-zero values only, zero substitution for the fields where zero
//! means "no words" rather than "low signal", volume-mean deltas, trailing
//! three-page window deltas, and positional polynomials.

use super::page::PageFeatures;

/// Enrich every record in place. Order is significant: the trailing-window
/// deltas read the preceding records as already processed, so an empty
/// predecessor contributes its substituted values, keeping transitions
/// around blank pages neutral.
pub fn add_relative_features(pages: &mut [PageFeatures], htid: &str) {
    let volmeanwords = nonzero_mean(pages, |p| p.nwords as f64);
    let volmeanwordlength = nonzero_mean(pages, |p| p.meanwordlength);
    let volmeantop2000 = nonzero_mean(pages, |p| p.top2000words);
    let volmeansdlinelen = nonzero_mean(pages, |p| p.sdlinelen);
    let volmeanlinelen = nonzero_mean(pages, |p| p.meanlinelen);

    for i in 0..pages.len() {
        // Zero on these fields only restates nwords == 0; substituting the
        // volume mean keeps empty pages from reading as extreme outliers.
        if pages[i].meanwordlength == 0.0 {
            pages[i].meanwordlength = volmeanwordlength;
        }
        if pages[i].sdlinelen == 0.0 {
            pages[i].sdlinelen = volmeansdlinelen;
        }
        if pages[i].meanlinelen == 0.0 {
            pages[i].meanlinelen = volmeanlinelen;
        }
        if pages[i].top2000words == 0.0 {
            pages[i].top2000words = volmeantop2000;
        }

        pages[i].nwordsminusmean = pages[i].nwords as f64 - volmeanwords;
        pages[i].wordlengthminusmean = pages[i].meanwordlength - volmeanwordlength;
        pages[i].linelenminusmean = pages[i].meanlinelen - volmeanlinelen;
        pages[i].top2000minusmean = pages[i].top2000words - volmeantop2000;

        // A change against the trailing window flags transitions between
        // volume parts better than a single-page lag.
        let (nwordsminusprev, top2000minusprev) = if i > 0 {
            let window = &pages[i - i.min(3)..i];
            let prev_words =
                window.iter().map(|p| p.nwords as f64).sum::<f64>() / window.len() as f64;
            let prev_top2000 =
                window.iter().map(|p| p.top2000words).sum::<f64>() / window.len() as f64;
            (
                pages[i].nwords as f64 - prev_words,
                pages[i].top2000words - prev_top2000,
            )
        } else {
            (0.0, 0.0)
        };
        pages[i].nwordsminusprev = nwordsminusprev;
        pages[i].top2000minusprev = top2000minusprev;

        pages[i].centerdist = (pages[i].pagefrac - 0.5).abs();
        pages[i].centerdist_sq = pages[i].centerdist * pages[i].centerdist;
        pages[i].pagefrac_sq = pages[i].pagefrac * pages[i].pagefrac;
        pages[i].backfrac_sq = pages[i].backfrac * pages[i].backfrac;
        pages[i].htid = htid.to_string();
    }
}

/// Mean over records whose projected value is non-zero; 0.0 when none are.
fn nonzero_mean(pages: &[PageFeatures], value: impl Fn(&PageFeatures) -> f64) -> f64 {
    let nonzero: Vec<f64> = pages.iter().map(&value).filter(|&v| v != 0.0).collect();
    if nonzero.is_empty() {
        0.0
    } else {
        nonzero.iter().sum::<f64>() / nonzero.len() as f64
    }
}
