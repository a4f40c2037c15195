//! Parameters of the STEC pipeline tool.
//!
//! The structure mirrors the nested sections the tool form expects; it is
//! serialized as-is into the `inputs` of a tool run request.

use serde::Serialize;

use super::DatasetId;
use crate::config::PipelineConfig;

/// Inputs of one STEC pipeline run.
#[derive(Clone, Debug, Serialize)]
pub struct ToolInputs {
    /// AMR databases to search.
    pub section_amr: AmrSection,

    /// Sample name, detection method and reads.
    pub section_input: InputSection,

    /// Plasmid detection.
    pub section_plasmid: PlasmidSection,

    /// Quality control.
    pub section_qc: QcSection,

    /// Report contents.
    pub section_report: ReportSection,

    /// Serotyping.
    pub section_serotype: SerotypeSection,

    /// Sequence typing schemes.
    pub section_st: StSection,

    /// Virulence databases.
    pub section_virulence: VirulenceSection,
}

/// AMR search settings.
#[derive(Clone, Debug, Serialize)]
pub struct AmrSection {
    /// Databases to search.
    pub dbs_amr: Vec<String>,
}

/// Sample and read settings.
#[derive(Clone, Debug, Serialize)]
pub struct InputSection {
    /// `blast` or `kma`.
    pub detection_method: String,
    /// The reads.
    pub read_type: ReadType,
    /// Name of the sample in the report.
    pub sample_name: String,
}

/// Paired Illumina reads.
#[derive(Clone, Debug, Serialize)]
pub struct ReadType {
    /// Index of the selected case of the read type conditional; `0` is
    /// paired Illumina reads.
    #[serde(rename = "__current_case__")]
    pub current_case: u8,

    /// Read 1.
    pub fastq_1: DatasetValues,

    /// Read 2.
    pub fastq_2: DatasetValues,

    /// Always `illumina`.
    pub input_type_selector: String,

    /// Library preparation kit.
    pub library: String,
}

/// A data parameter pointing at datasets of the session.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetValues {
    /// The referenced datasets.
    pub values: Vec<DatasetRef>,
}

impl DatasetValues {
    /// A parameter holding a single dataset.
    pub fn single(id: &DatasetId) -> Self {
        DatasetValues {
            values: vec![DatasetRef {
                id: id.0.clone(),
                src: String::from("hda"),
            }],
        }
    }
}

/// Reference to one dataset.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetRef {
    /// The dataset identifier.
    pub id: String,

    /// Where the dataset lives; `hda` is a dataset in a history.
    pub src: String,
}

/// Plasmid search settings.
#[derive(Clone, Debug, Serialize)]
pub struct PlasmidSection {
    /// Plasmid database.
    pub dbs_plasmid: String,
}

/// Quality control settings.
#[derive(Clone, Debug, Serialize)]
pub struct QcSection {
    /// Whether to run kraken.
    pub kraken: String,
}

/// What to bundle into the report.
#[derive(Clone, Debug, Serialize)]
pub struct ReportSection {
    /// Whether to include alignments.
    pub report_include_bam: String,
    /// Whether to include the reads.
    pub report_include_fastq: String,
}

/// Serotyping settings.
#[derive(Clone, Debug, Serialize)]
pub struct SerotypeSection {
    /// Whether to run serotypefinder.
    pub serotypefinder: String,
}

/// Sequence typing settings.
#[derive(Clone, Debug, Serialize)]
pub struct StSection {
    /// MLST schemes.
    pub schemes: Vec<String>,
}

/// Virulence search settings.
#[derive(Clone, Debug, Serialize)]
pub struct VirulenceSection {
    /// Virulence database.
    pub dbs_viru: String,
}

impl ToolInputs {
    /// Inputs for one sample, with read 1 and read 2 as uploaded.
    pub fn new(
        config: &PipelineConfig,
        sample: &str,
        read_1: &DatasetId,
        read_2: &DatasetId,
    ) -> Self {
        // Boolean tool parameters are sent as strings.
        ToolInputs {
            section_amr: AmrSection {
                dbs_amr: config.amr_databases.clone(),
            },
            section_input: InputSection {
                detection_method: config.detection_method.clone(),
                read_type: ReadType {
                    current_case: 0,
                    fastq_1: DatasetValues::single(read_1),
                    fastq_2: DatasetValues::single(read_2),
                    input_type_selector: String::from("illumina"),
                    library: config.library.clone(),
                },
                sample_name: String::from(sample),
            },
            section_plasmid: PlasmidSection {
                dbs_plasmid: String::from("plasmid"),
            },
            section_qc: QcSection {
                kraken: String::from("true"),
            },
            section_report: ReportSection {
                report_include_bam: String::from("false"),
                report_include_fastq: String::from("false"),
            },
            section_serotype: SerotypeSection {
                serotypefinder: String::from("true"),
            },
            section_st: StSection {
                schemes: config.mlst_schemes.clone(),
            },
            section_virulence: VirulenceSection {
                dbs_viru: String::from("virulence"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_layout() {
        let inputs = ToolInputs::new(
            &PipelineConfig::default(),
            "S1",
            &DatasetId::from("r1"),
            &DatasetId::from("r2"),
        );

        let value = serde_json::to_value(&inputs).unwrap();
        assert_eq!(
            value["section_input"],
            json!({
                "detection_method": "blast",
                "read_type": {
                    "__current_case__": 0,
                    "fastq_1": {"values": [{"id": "r1", "src": "hda"}]},
                    "fastq_2": {"values": [{"id": "r2", "src": "hda"}]},
                    "input_type_selector": "illumina",
                    "library": "NexteraPE"
                },
                "sample_name": "S1"
            })
        );
        assert_eq!(
            value["section_amr"]["dbs_amr"],
            json!(["resfinder", "argannot", "card", "ncbi-amr", "pointfinder"])
        );
        assert_eq!(
            value["section_st"]["schemes"],
            json!(["mlst-pasteur", "mlst-warwick", "cgmlst"])
        );
        assert_eq!(value["section_qc"]["kraken"], "true");
    }
}
