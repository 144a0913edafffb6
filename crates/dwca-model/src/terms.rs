//! Darwin Core term vocabulary.
//!
//! Terms are declared group by group in the order the Darwin Core standard
//! lists them. That declaration order is the column order of every flat
//! output file, so reordering entries here changes the output schema.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Namespace shared by every Darwin Core term URI.
pub const DWC_NAMESPACE: &str = "http://rs.tdwg.org/dwc/terms/";

/// Darwin Core term groups (the classes terms are organised under).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TermGroup {
    Record,
    Occurrence,
    Organism,
    MaterialSample,
    Event,
    Location,
    GeologicalContext,
    Identification,
    Taxon,
    ResourceRelationship,
    MeasurementOrFact,
}

impl TermGroup {
    /// Groups whose leaf terms make up a flat occurrence record, in output order.
    pub const FLAT: [TermGroup; 9] = [
        TermGroup::Record,
        TermGroup::Occurrence,
        TermGroup::Identification,
        TermGroup::Location,
        TermGroup::Event,
        TermGroup::GeologicalContext,
        TermGroup::Taxon,
        TermGroup::MaterialSample,
        TermGroup::Organism,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Record => "Record-level",
            Self::Occurrence => "Occurrence",
            Self::Organism => "Organism",
            Self::MaterialSample => "MaterialSample",
            Self::Event => "Event",
            Self::Location => "Location",
            Self::GeologicalContext => "GeologicalContext",
            Self::Identification => "Identification",
            Self::Taxon => "Taxon",
            Self::ResourceRelationship => "ResourceRelationship",
            Self::MeasurementOrFact => "MeasurementOrFact",
        }
    }
}

impl fmt::Display for TermGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

macro_rules! dwc_terms {
    (
        $(
            $group:ident $( ( $class:ident = $class_name:literal ) )? {
                $( $variant:ident = $name:literal ),* $(,)?
            }
        )*
    ) => {
        /// A Darwin Core term.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum DwcTerm {
            $(
                $( $class, )?
                $( $variant, )*
            )*
        }

        impl DwcTerm {
            /// Every term, in declaration order.
            pub const ALL: &'static [DwcTerm] = &[
                $(
                    $( DwcTerm::$class, )?
                    $( DwcTerm::$variant, )*
                )*
            ];

            /// Unqualified term name, e.g. `occurrenceID`.
            #[must_use]
            pub const fn simple_name(self) -> &'static str {
                match self {
                    $(
                        $( DwcTerm::$class => $class_name, )?
                        $( DwcTerm::$variant => $name, )*
                    )*
                }
            }

            #[must_use]
            pub const fn group(self) -> TermGroup {
                match self {
                    $(
                        $( DwcTerm::$class => TermGroup::$group, )?
                        $( DwcTerm::$variant => TermGroup::$group, )*
                    )*
                }
            }

            /// True for class terms (`Occurrence`, `Taxon`, ...) that name a
            /// group rather than hold a value.
            #[must_use]
            pub const fn is_class(self) -> bool {
                match self {
                    $( $( DwcTerm::$class => true, )? )*
                    _ => false,
                }
            }
        }
    };
}

dwc_terms! {
    Record {
        InstitutionId = "institutionID",
        CollectionId = "collectionID",
        DatasetId = "datasetID",
        InstitutionCode = "institutionCode",
        CollectionCode = "collectionCode",
        DatasetName = "datasetName",
        OwnerInstitutionCode = "ownerInstitutionCode",
        BasisOfRecord = "basisOfRecord",
        InformationWithheld = "informationWithheld",
        DataGeneralizations = "dataGeneralizations",
        DynamicProperties = "dynamicProperties",
    }
    Occurrence (Occurrence = "Occurrence") {
        OccurrenceId = "occurrenceID",
        CatalogNumber = "catalogNumber",
        RecordNumber = "recordNumber",
        RecordedBy = "recordedBy",
        IndividualCount = "individualCount",
        OrganismQuantity = "organismQuantity",
        OrganismQuantityType = "organismQuantityType",
        Sex = "sex",
        LifeStage = "lifeStage",
        ReproductiveCondition = "reproductiveCondition",
        Behavior = "behavior",
        EstablishmentMeans = "establishmentMeans",
        OccurrenceStatus = "occurrenceStatus",
        Preparations = "preparations",
        Disposition = "disposition",
        AssociatedMedia = "associatedMedia",
        AssociatedReferences = "associatedReferences",
        AssociatedSequences = "associatedSequences",
        AssociatedTaxa = "associatedTaxa",
        OtherCatalogNumbers = "otherCatalogNumbers",
        OccurrenceRemarks = "occurrenceRemarks",
    }
    Organism (Organism = "Organism") {
        OrganismId = "organismID",
        OrganismName = "organismName",
        OrganismScope = "organismScope",
        AssociatedOccurrences = "associatedOccurrences",
        AssociatedOrganisms = "associatedOrganisms",
        PreviousIdentifications = "previousIdentifications",
        OrganismRemarks = "organismRemarks",
    }
    MaterialSample (MaterialSample = "MaterialSample") {
        MaterialSampleId = "materialSampleID",
    }
    Event (Event = "Event") {
        EventId = "eventID",
        ParentEventId = "parentEventID",
        FieldNumber = "fieldNumber",
        EventDate = "eventDate",
        EventTime = "eventTime",
        StartDayOfYear = "startDayOfYear",
        EndDayOfYear = "endDayOfYear",
        Year = "year",
        Month = "month",
        Day = "day",
        VerbatimEventDate = "verbatimEventDate",
        Habitat = "habitat",
        SamplingProtocol = "samplingProtocol",
        SampleSizeValue = "sampleSizeValue",
        SampleSizeUnit = "sampleSizeUnit",
        SamplingEffort = "samplingEffort",
        FieldNotes = "fieldNotes",
        EventRemarks = "eventRemarks",
    }
    Location (Location = "Location") {
        LocationId = "locationID",
        HigherGeographyId = "higherGeographyID",
        HigherGeography = "higherGeography",
        Continent = "continent",
        WaterBody = "waterBody",
        IslandGroup = "islandGroup",
        Island = "island",
        Country = "country",
        CountryCode = "countryCode",
        StateProvince = "stateProvince",
        County = "county",
        Municipality = "municipality",
        Locality = "locality",
        VerbatimLocality = "verbatimLocality",
        MinimumElevationInMeters = "minimumElevationInMeters",
        MaximumElevationInMeters = "maximumElevationInMeters",
        VerbatimElevation = "verbatimElevation",
        MinimumDepthInMeters = "minimumDepthInMeters",
        MaximumDepthInMeters = "maximumDepthInMeters",
        VerbatimDepth = "verbatimDepth",
        MinimumDistanceAboveSurfaceInMeters = "minimumDistanceAboveSurfaceInMeters",
        MaximumDistanceAboveSurfaceInMeters = "maximumDistanceAboveSurfaceInMeters",
        LocationAccordingTo = "locationAccordingTo",
        LocationRemarks = "locationRemarks",
        DecimalLatitude = "decimalLatitude",
        DecimalLongitude = "decimalLongitude",
        GeodeticDatum = "geodeticDatum",
        CoordinateUncertaintyInMeters = "coordinateUncertaintyInMeters",
        CoordinatePrecision = "coordinatePrecision",
        PointRadiusSpatialFit = "pointRadiusSpatialFit",
        VerbatimCoordinates = "verbatimCoordinates",
        VerbatimLatitude = "verbatimLatitude",
        VerbatimLongitude = "verbatimLongitude",
        VerbatimCoordinateSystem = "verbatimCoordinateSystem",
        VerbatimSrs = "verbatimSRS",
        FootprintWkt = "footprintWKT",
        FootprintSrs = "footprintSRS",
        FootprintSpatialFit = "footprintSpatialFit",
        GeoreferencedBy = "georeferencedBy",
        GeoreferencedDate = "georeferencedDate",
        GeoreferenceProtocol = "georeferenceProtocol",
        GeoreferenceSources = "georeferenceSources",
        GeoreferenceVerificationStatus = "georeferenceVerificationStatus",
        GeoreferenceRemarks = "georeferenceRemarks",
    }
    GeologicalContext (GeologicalContext = "GeologicalContext") {
        GeologicalContextId = "geologicalContextID",
        EarliestEonOrLowestEonothem = "earliestEonOrLowestEonothem",
        LatestEonOrHighestEonothem = "latestEonOrHighestEonothem",
        EarliestEraOrLowestErathem = "earliestEraOrLowestErathem",
        LatestEraOrHighestErathem = "latestEraOrHighestErathem",
        EarliestPeriodOrLowestSystem = "earliestPeriodOrLowestSystem",
        LatestPeriodOrHighestSystem = "latestPeriodOrHighestSystem",
        EarliestEpochOrLowestSeries = "earliestEpochOrLowestSeries",
        LatestEpochOrHighestSeries = "latestEpochOrHighestSeries",
        EarliestAgeOrLowestStage = "earliestAgeOrLowestStage",
        LatestAgeOrHighestStage = "latestAgeOrHighestStage",
        LowestBiostratigraphicZone = "lowestBiostratigraphicZone",
        HighestBiostratigraphicZone = "highestBiostratigraphicZone",
        LithostratigraphicTerms = "lithostratigraphicTerms",
        Group = "group",
        Formation = "formation",
        Member = "member",
        Bed = "bed",
    }
    Identification (Identification = "Identification") {
        IdentificationId = "identificationID",
        IdentificationQualifier = "identificationQualifier",
        TypeStatus = "typeStatus",
        IdentifiedBy = "identifiedBy",
        DateIdentified = "dateIdentified",
        IdentificationReferences = "identificationReferences",
        IdentificationVerificationStatus = "identificationVerificationStatus",
        IdentificationRemarks = "identificationRemarks",
    }
    Taxon (Taxon = "Taxon") {
        TaxonId = "taxonID",
        ScientificNameId = "scientificNameID",
        AcceptedNameUsageId = "acceptedNameUsageID",
        ParentNameUsageId = "parentNameUsageID",
        OriginalNameUsageId = "originalNameUsageID",
        NameAccordingToId = "nameAccordingToID",
        NamePublishedInId = "namePublishedInID",
        TaxonConceptId = "taxonConceptID",
        ScientificName = "scientificName",
        AcceptedNameUsage = "acceptedNameUsage",
        ParentNameUsage = "parentNameUsage",
        OriginalNameUsage = "originalNameUsage",
        NameAccordingTo = "nameAccordingTo",
        NamePublishedIn = "namePublishedIn",
        NamePublishedInYear = "namePublishedInYear",
        HigherClassification = "higherClassification",
        Kingdom = "kingdom",
        Phylum = "phylum",
        Class = "class",
        Order = "order",
        Family = "family",
        Genus = "genus",
        Subgenus = "subgenus",
        SpecificEpithet = "specificEpithet",
        InfraspecificEpithet = "infraspecificEpithet",
        TaxonRank = "taxonRank",
        VerbatimTaxonRank = "verbatimTaxonRank",
        ScientificNameAuthorship = "scientificNameAuthorship",
        VernacularName = "vernacularName",
        NomenclaturalCode = "nomenclaturalCode",
        TaxonomicStatus = "taxonomicStatus",
        NomenclaturalStatus = "nomenclaturalStatus",
        TaxonRemarks = "taxonRemarks",
    }
    ResourceRelationship (ResourceRelationship = "ResourceRelationship") {
        ResourceRelationshipId = "resourceRelationshipID",
        ResourceId = "resourceID",
        RelatedResourceId = "relatedResourceID",
        RelationshipOfResource = "relationshipOfResource",
        RelationshipAccordingTo = "relationshipAccordingTo",
        RelationshipEstablishedDate = "relationshipEstablishedDate",
        RelationshipRemarks = "relationshipRemarks",
    }
    MeasurementOrFact (MeasurementOrFact = "MeasurementOrFact") {
        MeasurementId = "measurementID",
        MeasurementType = "measurementType",
        MeasurementValue = "measurementValue",
        MeasurementAccuracy = "measurementAccuracy",
        MeasurementUnit = "measurementUnit",
        MeasurementDeterminedBy = "measurementDeterminedBy",
        MeasurementDeterminedDate = "measurementDeterminedDate",
        MeasurementMethod = "measurementMethod",
        MeasurementRemarks = "measurementRemarks",
    }
}

/// Trailing columns that tie an example record back to its source.
pub const RELATIONSHIP_TERMS: [DwcTerm; 3] = [
    DwcTerm::RelatedResourceId,
    DwcTerm::RelationshipOfResource,
    DwcTerm::RelationshipRemarks,
];

/// Core terms an occurrence archive is expected to declare.
///
/// Absence is reported, never fatal: missing columns flatten to empty cells.
pub const EXPECTED_CORE_TERMS: [DwcTerm; 9] = [
    DwcTerm::ScientificName,
    DwcTerm::ScientificNameAuthorship,
    DwcTerm::EventDate,
    DwcTerm::RecordedBy,
    DwcTerm::DecimalLatitude,
    DwcTerm::DecimalLongitude,
    DwcTerm::Locality,
    DwcTerm::BasisOfRecord,
    DwcTerm::OccurrenceId,
];

impl DwcTerm {
    /// Full term URI, e.g. `http://rs.tdwg.org/dwc/terms/occurrenceID`.
    #[must_use]
    pub fn qualified_name(self) -> String {
        format!("{DWC_NAMESPACE}{}", self.simple_name())
    }

    /// Terms of one group, in declaration order (class term included).
    pub fn list_by_group(group: TermGroup) -> impl Iterator<Item = DwcTerm> {
        Self::ALL.iter().copied().filter(move |term| term.group() == group)
    }

    #[must_use]
    pub fn from_simple_name(name: &str) -> Option<DwcTerm> {
        Self::ALL
            .iter()
            .copied()
            .find(|term| term.simple_name() == name)
    }

    /// Resolve a term from a descriptor reference.
    ///
    /// Accepts the full Darwin Core URI, a `dwc:` prefixed name, or a bare
    /// simple name. Terms from other vocabularies resolve to `None`.
    #[must_use]
    pub fn from_qualified_name(name: &str) -> Option<DwcTerm> {
        let trimmed = name.trim();
        let simple = trimmed
            .strip_prefix(DWC_NAMESPACE)
            .or_else(|| trimmed.strip_prefix("https://rs.tdwg.org/dwc/terms/"))
            .or_else(|| trimmed.strip_prefix("dwc:"))
            .unwrap_or(trimmed);
        if simple.contains('/') || simple.contains(':') {
            return None;
        }
        Self::from_simple_name(simple)
    }
}

impl fmt::Display for DwcTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

impl FromStr for DwcTerm {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_qualified_name(s).ok_or_else(|| ModelError::UnknownTerm {
            name: s.to_string(),
        })
    }
}

/// Leaf terms of every flat group, in output order.
///
/// Class terms are dropped and each term appears once. The result depends
/// only on the static vocabulary, never on an input archive.
#[must_use]
pub fn flat_terms() -> Vec<DwcTerm> {
    let mut terms: Vec<DwcTerm> = Vec::new();
    for group in TermGroup::FLAT {
        for term in DwcTerm::list_by_group(group) {
            if term.is_class() || terms.contains(&term) {
                continue;
            }
            terms.push(term);
        }
    }
    terms
}
