use std::fs;
use std::path::Path;
use std::path::PathBuf;

use amrsum::compare::Comparator;
use amrsum::compare::ComparisonOptions;
use amrsum::compare::Unrecognized;
use amrsum::config::Config;
use amrsum::organise::index::Unclassifiable;
use amrsum::organise::SampleIndex;
use amrsum::overview::build_overview;
use amrsum::overview::SUM_COLUMN;
use amrsum::summarize::command::run;

fn cohort() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("A_1_resfinder.tsv"),
        "Locus\t% Identity\ngeneX\t95.2\n",
    )
    .unwrap();
    fs::write(dir.path().join("A_1_mlst.tsv"), "Gene\t%Identity\ngeneY\t88.0\n").unwrap();
    dir
}

fn binary() -> ComparisonOptions {
    ComparisonOptions {
        binary: true,
        ..Default::default()
    }
}

#[test]
fn binary_comparison_of_two_dialects() {
    let dir = cohort();
    let config = Config::default();
    let index = SampleIndex::from_dir(dir.path(), Unclassifiable::Fail).unwrap();

    let matrix = Comparator::new(&index, &config, Unrecognized::Fail)
        .compare(&binary())
        .unwrap();

    assert_eq!(matrix.row_labels(), ["geneX", "geneY"]);
    assert_eq!(matrix.column_labels(), ["A_1_mlst.tsv", "A_1_resfinder.tsv"]);
    assert_eq!(matrix.value("geneX", "A_1_resfinder.tsv"), Some(1.0));
    assert_eq!(matrix.value("geneY", "A_1_resfinder.tsv"), Some(0.0));
    assert_eq!(matrix.value("geneX", "A_1_mlst.tsv"), Some(0.0));
    assert_eq!(matrix.value("geneY", "A_1_mlst.tsv"), Some(0.0));
}

#[test]
fn overview_counts_each_type_once() {
    let dir = cohort();
    let index = SampleIndex::from_dir(dir.path(), Unclassifiable::Fail).unwrap();
    let overview = build_overview(&index);

    assert_eq!(overview.column_labels(), ["A_1", SUM_COLUMN]);
    assert_eq!(overview.value("resfinder", SUM_COLUMN), Some(1.0));
    assert_eq!(overview.value("mlst", SUM_COLUMN), Some(1.0));
}

#[test]
fn discovery_order_does_not_matter() {
    let dir = cohort();
    let config = Config::default();
    let files: Vec<PathBuf> = ["A_1_resfinder.tsv", "A_1_mlst.tsv"]
        .iter()
        .map(|n| dir.path().join(n))
        .collect();
    let reversed: Vec<PathBuf> = files.iter().rev().cloned().collect();

    let compare = |files: Vec<PathBuf>| {
        let index = SampleIndex::from_files(files, Unclassifiable::Fail).unwrap();
        Comparator::new(&index, &config, Unrecognized::Fail)
            .compare(&ComparisonOptions::all_binary())
            .unwrap()
    };

    assert_eq!(compare(files), compare(reversed));
}

#[test]
fn summarize_writes_both_workbooks() {
    let dir = cohort();
    let out = tempfile::tempdir().unwrap();

    let written = run(
        dir.path(),
        out.path(),
        &Config::default(),
        Unclassifiable::Fail,
        Unrecognized::Fail,
    )
    .unwrap();

    let names: Vec<&Path> = written.iter().map(|p| p.strip_prefix(out.path()).unwrap()).collect();
    assert_eq!(
        names,
        [Path::new("overview_samples.xlsx"), Path::new("comparison_all.xlsx")]
    );
    assert!(written.iter().all(|p| p.is_file()));
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SampleIndex::from_dir(&dir.path().join("missing"), Unclassifiable::Fail).is_err());
}
