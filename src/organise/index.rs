//! The dense sample × type index built once at startup.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use num_format::Locale;
use num_format::ToFormattedString;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::classify::SampleFile;
use super::classify::SEPARATOR;
use super::discovery;
use crate::errors::Result;

/// What to do with a file whose name cannot be classified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Unclassifiable {
    /// Abort with the classification error.
    #[default]
    Fail,

    /// Log a warning and leave the file out of the index.
    Skip,
}

/// Mapping from sample name to sample type to the file, if any, holding the
/// results of that type for that sample.
///
/// The index is dense: every observed sample name has an entry for every
/// observed sample type, so `len() == sample_names().len() *
/// sample_types().len()`. Names and types iterate in sorted order. Once
/// built, the index is never modified.
#[derive(Debug, Default)]
pub struct SampleIndex {
    samples: BTreeMap<String, BTreeMap<String, Option<SampleFile>>>,
    sample_types: Vec<String>,
}

impl SampleIndex {
    /// Discovers and classifies every file below `root`.
    pub fn from_dir(root: &Path, unclassifiable: Unclassifiable) -> Result<SampleIndex> {
        let files = discovery::discover(root)?;
        SampleIndex::from_files(files, unclassifiable)
    }

    /// Classifies the given files and arranges them into a dense index.
    ///
    /// Files are processed in sorted path order. When two files classify to
    /// the same sample name and type, the first one is kept and a warning
    /// names both.
    pub fn from_files(
        mut files: Vec<PathBuf>,
        unclassifiable: Unclassifiable,
    ) -> Result<SampleIndex> {
        files.sort();

        let mut classified = Vec::with_capacity(files.len());
        for file in files {
            match SampleFile::classify(&file) {
                Ok(f) => classified.push(f),
                Err(e) if unclassifiable == Unclassifiable::Skip => {
                    warn!("  [*] Skipping {}: {}", file.display(), e);
                }
                Err(e) => return Err(e),
            }
        }

        let names: BTreeSet<String> = classified
            .iter()
            .map(|f| f.sample_name().to_string())
            .collect();
        let types: BTreeSet<String> = classified
            .iter()
            .map(|f| f.sample_type().to_string())
            .collect();

        // (1) Every (name, type) cell starts out empty.
        let mut samples: BTreeMap<String, BTreeMap<String, Option<SampleFile>>> = names
            .iter()
            .map(|name| {
                let row = types.iter().map(|t| (t.clone(), None)).collect();
                (name.clone(), row)
            })
            .collect();

        // (2) Fill in the discovered files.
        for file in classified {
            let cell = samples
                .get_mut(file.sample_name())
                .and_then(|row| row.get_mut(file.sample_type()))
                .expect("every classified file to have a cell in the index");

            if let Some(existing) = cell.as_ref() {
                warn!(
                    "  [*] {} and {} both classify as sample `{}`, type `{}`. Keeping {}.",
                    existing.path().display(),
                    file.path().display(),
                    file.sample_name(),
                    file.sample_type(),
                    existing.path().display(),
                );
                continue;
            }

            *cell = Some(file);
        }

        let index = SampleIndex {
            samples,
            sample_types: types.into_iter().collect(),
        };

        info!(
            "  [*] Indexed {} samples across {} sample types.",
            index.sample_names().count().to_formatted_string(&Locale::en),
            index.sample_types.len().to_formatted_string(&Locale::en),
        );
        debug!("  [*] Sample types: {}", index.sample_types.join(", "));

        Ok(index)
    }

    /// Sample names in sorted order.
    pub fn sample_names(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    /// Sample types in sorted order.
    pub fn sample_types(&self) -> &[String] {
        &self.sample_types
    }

    /// Number of cells in the index, present or not.
    pub fn len(&self) -> usize {
        self.samples.values().map(BTreeMap::len).sum()
    }

    /// Whether no file was indexed at all.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The file for a sample name and type, if one was discovered.
    pub fn get(&self, sample_name: &str, sample_type: &str) -> Option<&SampleFile> {
        self.samples
            .get(sample_name)
            .and_then(|row| row.get(sample_type))
            .and_then(Option::as_ref)
    }

    /// Every cell of the index, ordered by sample name and then sample type.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, Option<&SampleFile>)> {
        self.samples.iter().flat_map(|(name, row)| {
            row.iter()
                .map(move |(t, file)| (name.as_str(), t.as_str(), file.as_ref()))
        })
    }

    /// The files whose sample name or sample type contains `filter` (all
    /// files when `filter` is `None`), ordered by sample name and then sample
    /// type.
    pub fn select(&self, filter: Option<&str>) -> Vec<&SampleFile> {
        self.cells()
            .filter(|(name, t, _)| match filter {
                Some(f) => name.contains(f) || t.contains(f),
                None => true,
            })
            .filter_map(|(_, _, file)| file)
            .collect()
    }

    /// Splits compound sample types into base types and subtypes.
    pub fn type_groups(&self) -> TypeGroups {
        TypeGroups::from_types(&self.sample_types)
    }
}

/// Sample types with compound `base_subtype` names folded into their base.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TypeGroups {
    /// The sample types with every compound type replaced by its base type.
    pub types: BTreeSet<String>,

    /// For every base type, the subtypes that were observed.
    pub subtypes: BTreeMap<String, Vec<String>>,
}

impl TypeGroups {
    /// Splits every type containing a separator on its last separator.
    ///
    /// ```
    /// use amrsum::organise::TypeGroups;
    ///
    /// let types = ["card", "mlst_pasteur", "mlst_warwick"].map(String::from);
    /// let groups = TypeGroups::from_types(&types);
    /// assert_eq!(groups.types.iter().collect::<Vec<_>>(), ["card", "mlst"]);
    /// assert_eq!(groups.subtypes["mlst"], ["pasteur", "warwick"]);
    /// ```
    pub fn from_types(sample_types: &[String]) -> TypeGroups {
        let mut groups = TypeGroups::default();

        for sample_type in sample_types {
            match sample_type.rsplit_once(SEPARATOR) {
                Some((base, subtype)) => {
                    groups.types.insert(base.to_string());
                    groups
                        .subtypes
                        .entry(base.to_string())
                        .or_default()
                        .push(subtype.to_string());
                }
                None => {
                    groups.types.insert(sample_type.clone());
                }
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("/data").join(n)).collect()
    }

    #[test]
    fn test_index_is_dense() {
        let index = SampleIndex::from_files(
            paths(&["A_1_resfinder.tsv", "A_1_mlst.tsv", "B_2_card.txt"]),
            Unclassifiable::Fail,
        )
        .unwrap();

        assert_eq!(index.sample_names().collect::<Vec<_>>(), ["A_1", "B_2"]);
        assert_eq!(index.sample_types(), ["card", "mlst", "resfinder"]);
        assert_eq!(index.len(), 2 * 3);
        assert_eq!(index.cells().count(), 6);
        assert_eq!(index.cells().filter(|(_, _, f)| f.is_some()).count(), 3);
        assert!(index.get("A_1", "card").is_none());
        assert!(index.get("B_2", "card").is_some());
        assert!(index.get("C_3", "card").is_none());
    }

    #[test]
    fn test_collision_keeps_first_in_path_order() {
        let index = SampleIndex::from_files(
            vec![
                PathBuf::from("/data/z/A_1_mlst.tsv"),
                PathBuf::from("/data/a/A_1_mlst.txt"),
            ],
            Unclassifiable::Fail,
        )
        .unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get("A_1", "mlst").unwrap().path(),
            Path::new("/data/a/A_1_mlst.txt")
        );
    }

    #[test]
    fn test_unclassifiable_fails_by_default() {
        let err = SampleIndex::from_files(paths(&["A_1_mlst.tsv", "README"]), Unclassifiable::Fail)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedFileName { .. }));
    }

    #[test]
    fn test_unclassifiable_can_be_skipped() {
        let index =
            SampleIndex::from_files(paths(&["A_1_mlst.tsv", "README"]), Unclassifiable::Skip)
                .unwrap();
        assert_eq!(index.len(), 1);

        let index = SampleIndex::from_files(
            paths(&["A_1_mlst.tsv", "B_2.tsv"]),
            Unclassifiable::Skip,
        )
        .unwrap();
        assert_eq!(index.sample_names().collect::<Vec<_>>(), ["A_1"]);
        assert_eq!(index.sample_types(), ["mlst"]);
    }

    #[test]
    fn test_select_matches_name_or_type() {
        let index = SampleIndex::from_files(
            paths(&["A_1_resfinder.tsv", "A_1_mlst.tsv", "B_2_mlst.tsv"]),
            Unclassifiable::Fail,
        )
        .unwrap();

        let names = |files: Vec<&SampleFile>| {
            files
                .into_iter()
                .map(|f| f.file_name().to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(
            names(index.select(Some("mlst"))),
            ["A_1_mlst.tsv", "B_2_mlst.tsv"]
        );
        assert_eq!(names(index.select(Some("B_"))), ["B_2_mlst.tsv"]);
        assert_eq!(index.select(None).len(), 3);
        assert!(index.select(Some("plasmid")).is_empty());
    }

    #[test]
    fn test_type_groups_split_on_last_separator() {
        let types = ["plasmid", "mlst_cgmlst_v2", "mlst"].map(String::from);
        let groups = TypeGroups::from_types(&types);

        assert_eq!(
            groups.types.into_iter().collect::<Vec<_>>(),
            ["mlst", "mlst_cgmlst", "plasmid"]
        );
        assert_eq!(groups.subtypes["mlst_cgmlst"], ["v2"]);
        assert!(!groups.subtypes.contains_key("mlst"));
    }
}
