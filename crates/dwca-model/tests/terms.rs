//! Tests for the flat term schema.

use std::collections::BTreeSet;

use dwca_model::{DwcTerm, RELATIONSHIP_TERMS, TermGroup, flat_terms};

#[test]
fn flat_terms_are_deterministic() {
    let first = flat_terms();
    let second = flat_terms();
    assert_eq!(first, second);
    assert_eq!(first.len(), 161);
}

#[test]
fn flat_terms_exclude_class_terms() {
    let terms = flat_terms();
    assert!(terms.iter().all(|term| !term.is_class()));
    for class in [
        DwcTerm::Occurrence,
        DwcTerm::Identification,
        DwcTerm::Location,
        DwcTerm::Event,
        DwcTerm::GeologicalContext,
        DwcTerm::Taxon,
        DwcTerm::MaterialSample,
        DwcTerm::Organism,
    ] {
        assert!(!terms.contains(&class), "{class} should not be flat");
    }
}

#[test]
fn flat_terms_have_no_duplicates() {
    let terms = flat_terms();
    let unique: BTreeSet<DwcTerm> = terms.iter().copied().collect();
    assert_eq!(unique.len(), terms.len());
}

#[test]
fn flat_terms_follow_group_order() {
    let terms = flat_terms();
    assert_eq!(terms[0], DwcTerm::InstitutionId);
    assert_eq!(terms[11], DwcTerm::OccurrenceId);
    assert_eq!(terms.last(), Some(&DwcTerm::OrganismRemarks));

    let group_rank = |group: TermGroup| {
        TermGroup::FLAT
            .iter()
            .position(|candidate| *candidate == group)
            .expect("flat group")
    };
    let ranks: Vec<usize> = terms.iter().map(|term| group_rank(term.group())).collect();
    assert!(ranks.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn relationship_terms_are_not_flat() {
    let terms = flat_terms();
    for term in RELATIONSHIP_TERMS {
        assert_eq!(term.group(), TermGroup::ResourceRelationship);
        assert!(!terms.contains(&term));
    }
}

#[test]
fn list_by_group_keeps_declaration_order() {
    let identification: Vec<&str> = DwcTerm::list_by_group(TermGroup::Identification)
        .map(DwcTerm::simple_name)
        .collect();
    assert_eq!(
        identification,
        vec![
            "Identification",
            "identificationID",
            "identificationQualifier",
            "typeStatus",
            "identifiedBy",
            "dateIdentified",
            "identificationReferences",
            "identificationVerificationStatus",
            "identificationRemarks",
        ]
    );
}
