//! Delimited output tables: the per-page feature matrix and the per-volume
//! aggregate.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::features::PageFeatures;
use crate::meta::Metadata;

/// Numeric columns that survive into the volume table, in page-matrix order.
/// The dropped ones are page-local position/delta signals that average to
/// noise (or to a constant) over a whole volume.
const VOLUME_COLUMNS: &[&str] = &[
    "pagenum",
    "pagefrac",
    "backnum",
    "nlines",
    "nwords",
    "nalpha",
    "fracalpha",
    "nnumeric",
    "fracnumeric",
    "npunct",
    "fracpunct",
    "nupper",
    "fracupper",
    "nother",
    "fracother",
    "meanlinelen",
    "sdlinelen",
    "meanwordlength",
    "startupper",
    "verbs",
    "top2000words",
    "paratextwords",
    "byofwords",
    "fracprice",
    "top2000minusprev",
];

/// Write the full per-page feature matrix as TSV, one row per page record.
pub fn write_page_matrix(path: &Path, records: &[PageFeatures]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Derive the volume-table path from the page-matrix path:
/// `features.tsv` → `features_volumes.tsv`.
pub fn volume_output_path(page_path: &Path) -> PathBuf {
    let stem = page_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("features");
    match page_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => page_path.with_file_name(format!("{stem}_volumes.{ext}")),
        None => page_path.with_file_name(format!("{stem}_volumes")),
    }
}

/// Write the per-volume aggregate: column means per volume id, inner-joined
/// with metadata title and date, plus three volume-level summaries of the
/// common-word density. Returns the number of volumes written.
pub fn write_volume_matrix(
    path: &Path,
    records: &[PageFeatures],
    metadata: &Metadata,
) -> Result<usize> {
    let mut groups: BTreeMap<&str, Vec<&PageFeatures>> = BTreeMap::new();
    for record in records {
        groups.entry(&record.htid).or_default().push(record);
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header: Vec<&str> = vec!["htid"];
    header.extend(VOLUME_COLUMNS);
    header.extend([
        "title",
        "inferred_date",
        "max_top2000words",
        "std_top2000words",
        "sum_top2000words",
    ]);
    writer.write_record(&header)?;

    let mut written = 0usize;
    for (htid, pages) in &groups {
        // inner join: volumes absent from metadata are dropped silently
        let Some(meta) = metadata.rows.get(*htid) else {
            continue;
        };

        let mut row: Vec<String> = Vec::with_capacity(header.len());
        row.push((*htid).to_string());
        for column in VOLUME_COLUMNS {
            let sum: f64 = pages.iter().map(|p| column_value(p, column)).sum();
            row.push((sum / pages.len() as f64).to_string());
        }
        row.push(meta.title.clone());
        row.push(meta.inferred_date.clone());
        row.push(peak_density(pages).to_string());
        row.push(sample_sd(pages).to_string());
        row.push(matched_word_total(pages).to_string());
        writer.write_record(&row)?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Mean `top2000words` over the top decile of pages by that value
/// (at least one page).
fn peak_density(pages: &[&PageFeatures]) -> f64 {
    let mut values: Vec<f64> = pages.iter().map(|p| p.top2000words).collect();
    values.sort_by(|a, b| b.total_cmp(a));
    let take = pages.len().div_ceil(10);
    values[..take].iter().sum::<f64>() / take as f64
}

/// Sample standard deviation of `top2000words` across pages; 0 below 2 pages.
fn sample_sd(pages: &[&PageFeatures]) -> f64 {
    let n = pages.len();
    if n < 2 {
        return 0.0;
    }
    let mean = pages.iter().map(|p| p.top2000words).sum::<f64>() / n as f64;
    let variance = pages
        .iter()
        .map(|p| {
            let d = p.top2000words - mean;
            d * d
        })
        .sum::<f64>()
        / (n - 1) as f64;
    variance.sqrt()
}

/// Volume-wide Σ `top2000words × nwords`: the matched-word total.
fn matched_word_total(pages: &[&PageFeatures]) -> f64 {
    pages
        .iter()
        .map(|p| p.top2000words * p.nwords as f64)
        .sum()
}

fn column_value(r: &PageFeatures, name: &str) -> f64 {
    match name {
        "pagenum" => r.pagenum as f64,
        "pagefrac" => r.pagefrac,
        "backnum" => r.backnum as f64,
        "nlines" => r.nlines as f64,
        "nwords" => r.nwords as f64,
        "nalpha" => r.nalpha as f64,
        "fracalpha" => r.fracalpha,
        "nnumeric" => r.nnumeric as f64,
        "fracnumeric" => r.fracnumeric,
        "npunct" => r.npunct as f64,
        "fracpunct" => r.fracpunct,
        "nupper" => r.nupper as f64,
        "fracupper" => r.fracupper,
        "nother" => r.nother as f64,
        "fracother" => r.fracother,
        "meanlinelen" => r.meanlinelen,
        "sdlinelen" => r.sdlinelen,
        "meanwordlength" => r.meanwordlength,
        "startupper" => r.startupper,
        "verbs" => r.verbs,
        "top2000words" => r.top2000words,
        "paratextwords" => r.paratextwords,
        "byofwords" => r.byofwords,
        "fracprice" => r.fracprice,
        "top2000minusprev" => r.top2000minusprev,
        _ => unreachable!("unknown aggregate column {name}"),
    }
}
