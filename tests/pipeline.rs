use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use paratext_features::features::{volume_features, PageFeatures, VolumeSkip};
use paratext_features::lexicon::Lexicons;
use paratext_features::{meta, output};

/// Three-page synthetic volume: a page with one common word among ten, an
/// empty page, and a page of ten common words.
const SYNTHETIC_VOLUME: &str = "\
the zorblat frimble quexish
drazzle plonkor vintrip
sqummle brastic clorvus
<pb>
<pb>
house garden river morning
window evening mountain
village winter summer
";

fn write_volume(dir: &Path, htid: &str, text: &str) -> PathBuf {
    let path = dir.join(format!("{htid}.norm.txt"));
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn synthetic_volume_relative_features() -> Result<()> {
    let lexicons = Lexicons::load();
    let dir = tempfile::tempdir()?;
    write_volume(dir.path(), "test.vol1", SYNTHETIC_VOLUME);

    let records = volume_features("test.vol1", dir.path(), &lexicons)?;
    assert_eq!(records.len(), 3);

    let [first, empty, dense] = &records[..] else {
        panic!("expected three pages");
    };

    // the empty middle page keeps the no-text conventions
    assert_eq!(empty.nwords, 0);
    assert_eq!(empty.fracalpha, 1.0);
    assert_eq!(empty.fracnumeric, 0.0);
    assert_eq!(empty.fracprice, 0.0);

    // one of ten words vs. ten of ten
    assert!((first.top2000words - 0.1).abs() < 1e-9);
    assert!((dense.top2000words - 1.0).abs() < 1e-9);

    // zeroed stats on the empty page take the mean of the non-zero pages
    let wordlength_mean = (first.meanwordlength + dense.meanwordlength) / 2.0;
    assert!((empty.meanwordlength - wordlength_mean).abs() < 1e-9);
    let linelen_mean = (first.meanlinelen + dense.meanlinelen) / 2.0;
    assert!((empty.meanlinelen - linelen_mean).abs() < 1e-9);
    let sd_mean = (first.sdlinelen + dense.sdlinelen) / 2.0;
    assert!((empty.sdlinelen - sd_mean).abs() < 1e-9);
    assert!((empty.top2000words - 0.55).abs() < 1e-9);

    // the dense page sits far above the volume mean, the sparse page is
    // its mirror image, and the empty page is neutral
    assert!(dense.top2000minusmean > 0.3);
    assert!((first.top2000minusmean + dense.top2000minusmean).abs() < 1e-9);
    assert!(empty.top2000minusmean.abs() < 1e-9);

    // first page has no trailing window
    assert_eq!(first.nwordsminusprev, 0.0);
    assert_eq!(first.top2000minusprev, 0.0);

    Ok(())
}

#[test]
fn page_with_no_lexicon_words_is_neutralized() -> Result<()> {
    // When a page's common-word ratio is exactly zero, the volume mean is
    // substituted before the delta, so the page reads as neutral rather
    // than as an extreme low outlier.
    let lexicons = Lexicons::load();
    let dir = tempfile::tempdir()?;
    write_volume(
        dir.path(),
        "test.vol2",
        "zorblat frimble quexish drazzle\n<pb>\nhouse garden river morning\n",
    );

    let records = volume_features("test.vol2", dir.path(), &lexicons)?;
    assert!((records[0].top2000words - 1.0).abs() < 1e-9);
    assert!(records[0].top2000minusmean.abs() < 1e-9);
    Ok(())
}

#[test]
fn fixture_volume_full_run() -> Result<()> {
    let lexicons = Lexicons::load();
    let metadata = meta::load(Path::new("tests/fixtures/metadata.tsv"))?;
    assert_eq!(metadata.order.len(), 3);

    let fixtures = Path::new("tests/fixtures");
    let mut allpages: Vec<PageFeatures> = Vec::new();
    let mut missing = 0usize;

    for htid in &metadata.order {
        match volume_features(htid, fixtures, &lexicons) {
            Ok(pages) => allpages.extend(pages),
            Err(VolumeSkip::MissingSource(_)) => missing += 1,
            Err(err) => return Err(err.into()),
        }
    }

    // only the Dickens fixture has a text blob
    assert_eq!(missing, 2);
    assert_eq!(allpages.len(), 5);

    // title page: heavy uppercase, a price line, paratext vocabulary
    let title = &allpages[0];
    assert!(title.fracupper > 0.2);
    assert!(title.paratextwords > 0.0);
    assert!(title.byofwords > 0.0);

    // contents page: numerals and dot leaders push the fractions around
    let contents = &allpages[1];
    assert!(contents.fracnumeric > 0.0);
    assert!(contents.fracpunct > contents.fracnumeric);

    // body pages read as prose: long lines, dense common words, verbs
    for body in &allpages[2..4] {
        assert!(body.top2000words > 0.5, "body page should be common-word dense");
        assert!(body.verbs > 0.0);
        assert!(body.meanlinelen > contents.meanlinelen);
    }

    // trailing empty page after the final marker
    let last = &allpages[4];
    assert_eq!(last.nwords, 0);
    assert_eq!(last.pagenum, 4);

    // lexical ratios stay in range everywhere
    for page in &allpages {
        for v in [
            page.verbs,
            page.top2000words,
            page.paratextwords,
            page.byofwords,
        ] {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    Ok(())
}

#[test]
fn output_tables_roundtrip() -> Result<()> {
    let lexicons = Lexicons::load();
    let dir = tempfile::tempdir()?;
    write_volume(dir.path(), "test.vol1", SYNTHETIC_VOLUME);

    let meta_path = dir.path().join("meta.tsv");
    fs::write(
        &meta_path,
        "htid\ttitle\tinferred_date\ntest.vol1\tSynthetic Pages\t1900\nmissing.vol\tNo Text\t1901\n",
    )?;
    let metadata = meta::load(&meta_path)?;

    let mut allpages = Vec::new();
    for htid in &metadata.order {
        if let Ok(pages) = volume_features(htid, dir.path(), &lexicons) {
            allpages.extend(pages);
        }
    }

    let matrix_path = dir.path().join("features.tsv");
    output::write_page_matrix(&matrix_path, &allpages)?;
    let volume_path = output::volume_output_path(&matrix_path);
    assert_eq!(volume_path, dir.path().join("features_volumes.tsv"));
    let merged = output::write_volume_matrix(&volume_path, &allpages, &metadata)?;

    // inner join drops the metadata-only volume
    assert_eq!(merged, 1);

    let matrix = fs::read_to_string(&matrix_path)?;
    let lines: Vec<&str> = matrix.lines().collect();
    assert_eq!(lines.len(), 4, "header plus three pages");
    assert!(lines[0].starts_with("pagenum\t"));
    assert!(lines[0].ends_with("\thtid"));
    assert!(lines[1].ends_with("\ttest.vol1"));

    let volumes = fs::read_to_string(&volume_path)?;
    let vlines: Vec<&str> = volumes.lines().collect();
    assert_eq!(vlines.len(), 2, "header plus one volume");
    let header: Vec<&str> = vlines[0].split('\t').collect();
    let row: Vec<&str> = vlines[1].split('\t').collect();
    assert_eq!(row[0], "test.vol1");

    let col = |name: &str| {
        let idx = header.iter().position(|h| *h == name).unwrap();
        row[idx].to_string()
    };
    assert_eq!(col("title"), "Synthetic Pages");
    assert_eq!(col("inferred_date"), "1900");

    // ten common words on the dense page, one on the sparse page
    let sum: f64 = col("sum_top2000words").parse()?;
    assert!((sum - 11.0).abs() < 1e-9);
    // top decile of three pages is the single densest page
    let peak: f64 = col("max_top2000words").parse()?;
    assert!((peak - 1.0).abs() < 1e-9);
    let sd: f64 = col("std_top2000words").parse()?;
    assert!(sd > 0.0);

    Ok(())
}
