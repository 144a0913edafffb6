//! Integration tests for the pipeline module.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use dwca_cli::pipeline::{PipelineConfig, prepare, run_pipeline};
use dwca_cli::types::RunStage;
use dwca_extract::{ExtractOptions, Selection, WriteMode};
use dwca_model::DwcTerm;
use zip::write::SimpleFileOptions;

const META: &str = r#"<archive xmlns="http://rs.tdwg.org/dwc/text/">
  <core fieldsTerminatedBy="\t" fieldsEnclosedBy="" ignoreHeaderLines="1"
        rowType="http://rs.tdwg.org/dwc/terms/Occurrence">
    <files><location>occurrence.txt</location></files>
    <id index="0"/>
    <field index="0" term="http://rs.tdwg.org/dwc/terms/occurrenceID"/>
    <field index="1" term="http://rs.tdwg.org/dwc/terms/institutionCode"/>
    <field index="2" term="http://rs.tdwg.org/dwc/terms/scientificName"/>
  </core>
</archive>
"#;

const OCCURRENCES: &str = "occurrenceID\tinstitutionCode\tscientificName\n\
occ-1\tMCZ\tPuma concolor\n\
occ-2\tMCZ\tPanthera onca\n\
occ-3\tMCZ\tLeopardus pardalis\n";

fn write_archive(dir: &Path) {
    fs::create_dir_all(dir).expect("create archive dir");
    fs::write(dir.join("meta.xml"), META).expect("write meta");
    fs::write(dir.join("occurrence.txt"), OCCURRENCES).expect("write core");
}

fn data_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read output")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn extracts_directory_archive() {
    let temp = tempfile::tempdir().expect("temp dir");
    let archive = temp.path().join("dwca");
    write_archive(&archive);
    let output = temp.path().join("flat.csv");

    let config = PipelineConfig::new(&archive, &output).with_work_dir(temp.path());
    let result = run_pipeline(&config).expect("run pipeline");

    assert_eq!(result.summary.records_extracted, 3);
    assert_eq!(result.archive_dir, archive);
    assert!(result.missing_terms.contains(&DwcTerm::EventDate));
    assert!(!result.missing_terms.contains(&DwcTerm::ScientificName));

    let lines = data_lines(&output);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("\"institutionID\",\"collectionID\""));
    assert!(lines[1].contains("\"occ-1\""));
}

#[test]
fn limit_and_append_runs() {
    let temp = tempfile::tempdir().expect("temp dir");
    let archive = temp.path().join("dwca");
    write_archive(&archive);
    let output = temp.path().join("flat.csv");

    let limited = ExtractOptions {
        selection: Selection::from_options(Some(2), None).expect("selection"),
        ..ExtractOptions::default()
    };
    let first = PipelineConfig::new(&archive, &output).with_options(limited);
    let picked = ExtractOptions {
        selection: Selection::from_options(None, Some("occ-3|")).expect("selection"),
        ..ExtractOptions::default()
    };
    let second = PipelineConfig::new(&archive, &output)
        .with_mode(WriteMode::Append)
        .with_options(picked);
    assert!(!second.options.write_header);

    assert_eq!(run_pipeline(&first).expect("first run").summary.records_extracted, 2);
    assert_eq!(run_pipeline(&second).expect("second run").summary.records_extracted, 1);

    let lines = data_lines(&output);
    assert_eq!(lines.len(), 1 + 2 + 1);
    assert!(lines[3].contains("\"Leopardus pardalis\""));
}

#[test]
fn example_copies_double_the_rows() {
    let temp = tempfile::tempdir().expect("temp dir");
    let archive = temp.path().join("dwca");
    write_archive(&archive);
    let output = temp.path().join("flat.csv");

    let options = ExtractOptions {
        create_examples: true,
        dataset_doi: Some("10.5281/zenodo.1".to_string()),
        ..ExtractOptions::default()
    };
    let config = PipelineConfig::new(&archive, &output).with_options(options);
    let result = run_pipeline(&config).expect("run pipeline");
    assert_eq!(result.summary.records_extracted, 3);
    assert_eq!(result.summary.example_rows, 3);

    let lines = data_lines(&output);
    assert_eq!(lines.len(), 1 + 6);
    assert!(lines[0].ends_with("\"relatedResourceID\",\"relationshipOfResource\",\"relationshipRemarks\""));
    assert!(lines[2].contains("\"urn:uuid:"));
    assert!(lines[2].contains("\"example.org\""));
    assert!(lines[2].contains("\"source for modified example record\""));
    assert!(lines[2].contains("\"\"sourceDatasetID\"\":\"\"10.5281/zenodo.1\"\""));
}

#[test]
fn extracts_zip_wrapped_in_folder() {
    let temp = tempfile::tempdir().expect("temp dir");
    let zip_path = temp.path().join("mcz.dwca.zip");
    {
        let file = File::create(&zip_path).expect("create zip");
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        zip.add_directory("export/", options).expect("add folder");
        for (name, contents) in [
            ("export/meta.xml", META),
            ("export/occurrence.txt", OCCURRENCES),
        ] {
            zip.start_file(name, options).expect("start entry");
            zip.write_all(contents.as_bytes()).expect("write entry");
        }
        zip.finish().expect("finish zip");
    }
    let work = temp.path().join("work");
    fs::create_dir_all(&work).expect("create work dir");
    let output = temp.path().join("flat.csv");

    let config = PipelineConfig::new(&zip_path, &output).with_work_dir(&work);
    let result = run_pipeline(&config).expect("run pipeline");

    assert_eq!(result.archive_dir, work.join("mcz_dwca_zip_content").join("export"));
    assert_eq!(result.summary.records_extracted, 3);
}

#[test]
fn non_occurrence_core_fails_setup_without_touching_output() {
    let temp = tempfile::tempdir().expect("temp dir");
    let archive = temp.path().join("taxa");
    fs::create_dir_all(&archive).expect("create dir");
    fs::write(archive.join("taxon.txt"), "taxonID\tscientificName\nt1\tPuma\n").expect("write");
    let output = temp.path().join("flat.csv");
    fs::write(&output, "keep me\n").expect("seed output");

    let failure = run_pipeline(&PipelineConfig::new(&archive, &output)).expect_err("taxon core");
    assert_eq!(failure.stage, RunStage::Setup);
    assert_eq!(failure.stage.exit_code(), 1);
    assert!(format!("{:#}", failure.error).contains("expected an Occurrence core"));
    assert_eq!(fs::read_to_string(&output).expect("read output"), "keep me\n");
}

#[test]
fn uncreatable_output_fails_setup() {
    let temp = tempfile::tempdir().expect("temp dir");
    let archive = temp.path().join("dwca");
    write_archive(&archive);
    let output = temp.path().join("no").join("such").join("dir").join("out.csv");

    let failure = run_pipeline(&PipelineConfig::new(&archive, &output)).expect_err("no output dir");
    assert_eq!(failure.stage, RunStage::Setup);
    assert_eq!(failure.stage.exit_code(), 1);
    assert!(format!("{:#}", failure.error).contains("create output"));
    assert!(!output.exists());
}

#[test]
fn missing_input_fails_setup() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config = PipelineConfig::new(temp.path().join("absent.zip"), temp.path().join("out.csv"));

    let error = prepare(&config).expect_err("missing input");
    assert!(format!("{error:#}").contains("archive not found"));
    assert!(!temp.path().join("out.csv").exists());
}

#[test]
fn exit_codes_by_stage() {
    assert_eq!(RunStage::Setup.exit_code(), 1);
    assert_eq!(RunStage::Extract.exit_code(), 2);
}

#[test]
fn prepare_reports_archive_and_missing_terms() {
    let temp = tempfile::tempdir().expect("temp dir");
    let archive = temp.path().join("dwca");
    write_archive(&archive);
    let output = temp.path().join("flat.csv");

    let prepared = prepare(&PipelineConfig::new(&archive, &output)).expect("prepare");
    assert_eq!(prepared.archive_dir(), archive);
    assert_eq!(prepared.missing_terms().len(), 7);
    assert!(output.exists());
}
