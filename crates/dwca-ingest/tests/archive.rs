//! Integration tests for opening archives and iterating star records.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use dwca_ingest::{Archive, ArchiveError, resolve_archive_dir};
use dwca_model::{DwcTerm, RecordValues};
use zip::write::SimpleFileOptions;

const META: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<archive xmlns="http://rs.tdwg.org/dwc/text/" metadata="eml.xml">
  <core encoding="UTF-8" fieldsTerminatedBy="\t" linesTerminatedBy="\n" fieldsEnclosedBy=""
        ignoreHeaderLines="1" rowType="http://rs.tdwg.org/dwc/terms/Occurrence">
    <files><location>occurrence.txt</location></files>
    <id index="0"/>
    <field index="1" term="http://rs.tdwg.org/dwc/terms/occurrenceID"/>
    <field index="2" term="http://rs.tdwg.org/dwc/terms/scientificName"/>
    <field index="3" term="http://rs.tdwg.org/dwc/terms/country"/>
    <field term="http://rs.tdwg.org/dwc/terms/basisOfRecord" default="PreservedSpecimen"/>
  </core>
  <extension encoding="UTF-8" fieldsTerminatedBy="\t" fieldsEnclosedBy="" ignoreHeaderLines="1"
             rowType="http://rs.tdwg.org/dwc/terms/MeasurementOrFact">
    <files><location>measurementorfact.txt</location></files>
    <coreid index="0"/>
    <field index="1" term="http://rs.tdwg.org/dwc/terms/measurementType"/>
    <field index="2" term="http://rs.tdwg.org/dwc/terms/measurementValue"/>
  </extension>
</archive>
"#;

const OCCURRENCES: &str = "id\toccurrenceID\tscientificName\tcountry\n\
1\tocc-1\tPuma concolor\tBrazil\n\
2\tocc-2\tLeopardus pardalis\t\n\
3\tocc-3\tPanthera onca\tPeru\n";

const MEASUREMENTS: &str = "coreid\tmeasurementType\tmeasurementValue\n\
1\tweight\t52\n\
3\tweight\t96\n\
1\tlength\t1.4\n";

fn write_archive(dir: &Path) {
    fs::create_dir_all(dir).expect("create archive dir");
    fs::write(dir.join("meta.xml"), META).expect("write meta");
    fs::write(dir.join("occurrence.txt"), OCCURRENCES).expect("write core");
    fs::write(dir.join("measurementorfact.txt"), MEASUREMENTS).expect("write extension");
    fs::write(dir.join("eml.xml"), "<eml/>").expect("write eml");
}

#[test]
fn opens_descriptor_and_joins_extensions() {
    let temp = tempfile::tempdir().expect("temp dir");
    write_archive(temp.path());

    let archive = Archive::open(temp.path()).expect("open archive");
    assert_eq!(archive.core_row_type(), Some(DwcTerm::Occurrence));
    assert!(archive.has_core_term(DwcTerm::ScientificName));
    assert!(!archive.has_core_term(DwcTerm::Locality));
    assert_eq!(archive.extensions().len(), 1);
    assert_eq!(archive.descriptor().metadata.as_deref(), Some("eml.xml"));

    let records: Vec<_> = archive
        .star_records()
        .expect("star records")
        .collect::<Result<_, _>>()
        .expect("read records");
    assert_eq!(records.len(), 3);

    let ids: Vec<_> = records.iter().map(|r| r.occurrence_id()).collect();
    assert_eq!(ids, vec![Some("occ-1"), Some("occ-2"), Some("occ-3")]);

    assert_eq!(records[0].value(DwcTerm::Country), Some("Brazil"));
    assert_eq!(records[1].value(DwcTerm::Country), None);
    assert_eq!(
        records[2].value(DwcTerm::BasisOfRecord),
        Some("PreservedSpecimen")
    );

    let first: Vec<_> = records[0]
        .extension(DwcTerm::MeasurementOrFact)
        .filter_map(|m| m.value(DwcTerm::MeasurementType))
        .collect();
    assert_eq!(first, vec!["weight", "length"]);
    assert_eq!(records[1].extensions().len(), 0);
    assert_eq!(records[2].extensions().len(), 1);
}

#[test]
fn falls_back_to_wrapped_subdirectory() {
    let temp = tempfile::tempdir().expect("temp dir");
    fs::create_dir_all(temp.path().join("a-notes")).expect("create sibling");
    write_archive(&temp.path().join("dwca"));

    let err = Archive::open(temp.path()).expect_err("root is not an archive");
    assert!(err.is_unrecognized());

    let archive = Archive::open_with_fallback(temp.path()).expect("open nested archive");
    assert_eq!(archive.location(), temp.path().join("dwca"));
}

#[test]
fn fallback_returns_original_error() {
    let temp = tempfile::tempdir().expect("temp dir");
    fs::create_dir_all(temp.path().join("empty")).expect("create child");

    let err = Archive::open_with_fallback(temp.path()).expect_err("no archive anywhere");
    match err {
        ArchiveError::UnsupportedArchive { path, .. } => assert_eq!(path, temp.path()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn infers_core_without_descriptor() {
    let temp = tempfile::tempdir().expect("temp dir");
    fs::write(
        temp.path().join("occurrences.csv"),
        "occurrenceID,scientificName,dwc:locality,notes\nocc-9,Puma concolor,\"Mata, Norte\",x\n",
    )
    .expect("write csv");

    let archive = Archive::open(temp.path()).expect("open inferred archive");
    assert_eq!(archive.core_row_type(), Some(DwcTerm::Occurrence));
    assert_eq!(archive.core().id_index, Some(0));
    assert!(archive.extensions().is_empty());

    let records: Vec<_> = archive
        .star_records()
        .expect("star records")
        .collect::<Result<_, _>>()
        .expect("read records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].occurrence_id(), Some("occ-9"));
    assert_eq!(records[0].core().id(), Some("occ-9"));
    assert_eq!(records[0].value(DwcTerm::Locality), Some("Mata, Norte"));
}

#[test]
fn reports_non_occurrence_core() {
    let temp = tempfile::tempdir().expect("temp dir");
    fs::write(
        temp.path().join("taxa.txt"),
        "taxonID\tscientificName\nt1\tPuma concolor\n",
    )
    .expect("write taxa");

    let archive = Archive::open(temp.path()).expect("open taxon archive");
    assert_eq!(archive.core_row_type(), Some(DwcTerm::Taxon));
}

#[test]
fn missing_data_file_is_reported() {
    let temp = tempfile::tempdir().expect("temp dir");
    write_archive(temp.path());
    fs::remove_file(temp.path().join("occurrence.txt")).expect("remove core");

    let archive = Archive::open(temp.path()).expect("descriptor still parses");
    let err = archive.star_records().expect_err("core is missing");
    assert!(matches!(err, ArchiveError::MissingDataFile { .. }));
}

#[test]
fn unzips_once_and_reuses_directory() {
    let temp = tempfile::tempdir().expect("temp dir");
    let zip_path = temp.path().join("dwca-test.zip");
    {
        let file = File::create(&zip_path).expect("create zip");
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, contents) in [
            ("meta.xml", META),
            ("occurrence.txt", OCCURRENCES),
            ("measurementorfact.txt", MEASUREMENTS),
        ] {
            zip.start_file(name, options).expect("start entry");
            zip.write_all(contents.as_bytes()).expect("write entry");
        }
        zip.finish().expect("finish zip");
    }

    let work = temp.path().join("work");
    fs::create_dir_all(&work).expect("create work dir");
    let dir = resolve_archive_dir(&zip_path, &work).expect("unzip");
    assert_eq!(dir, work.join("dwca-test_zip_content"));
    assert!(dir.join("meta.xml").is_file());

    // A second resolve must not unzip again.
    fs::write(dir.join("marker"), "kept").expect("write marker");
    let again = resolve_archive_dir(&zip_path, &work).expect("reuse");
    assert_eq!(again, dir);
    assert!(again.join("marker").is_file());

    let archive = Archive::open_with_fallback(&dir).expect("open unzipped");
    assert_eq!(archive.star_records().expect("records").count(), 3);
}

#[test]
fn corrupt_zip_leaves_no_directory() {
    let temp = tempfile::tempdir().expect("temp dir");
    let zip_path = temp.path().join("broken.zip");
    fs::write(&zip_path, "not a zip file").expect("write junk");

    let err = resolve_archive_dir(&zip_path, temp.path()).expect_err("junk is not a zip");
    assert!(matches!(err, ArchiveError::Zip { .. }));
    assert!(!temp.path().join("broken_zip_content").exists());
}
