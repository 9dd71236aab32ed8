//! Prompt construction for CTDL extraction
//!
//! The prompts embed the harvested corpus, the fixed CTDL controlled
//! vocabularies, and the formatting rules for the selected output mode.
//! The vocabularies are allow-lists: the model is instructed to use
//! exact values only, and the validator filters anything else out again
//! downstream.

/// CTDL support-service taxonomy (bare values, without the `support:`
/// prefix used in api-mode output)
pub const SUPPORT_SERVICE_TYPES: &[&str] = &[
    "AcademicAdvising",
    "AssistiveTechnologySupport",
    "AudiologicalHealthCare",
    "BehavioralService",
    "BenefitsSupport",
    "CareerAdvising",
    "CareerAssessment",
    "CareerExploration",
    "CaseManagement",
    "ChildcareSupport",
    "ClothingAssistance",
    "ComputerHub",
    "Counseling",
    "CrisisSupport",
    "DiversityEquityInclusion",
    "EquipmentProvision",
    "FinancialLiteracy",
    "HealthCare",
    "ImmigrationAssistance",
    "InternetAccess",
    "JobPlacement",
    "LearningResourceProvision",
    "LegalService",
    "MentalHealthCounseling",
    "Mentoring",
    "Networking",
    "NeurodivergenceService",
    "NoteTakingAssistance",
    "PeerService",
    "PersonalAssistance",
    "PostalAddress",
    "PsychologicalService",
    "PublicBenefitsCaseManagement",
    "ReaderService",
    "Rehabilitation",
    "ResidentialLiving",
    "RespiteCare",
    "SignLanguage",
    "SkillMapping",
    "StudySkills",
    "SubstanceAbusePrevention",
    "SupportCoordination",
    "SupportedWork",
    "TalentMarketplaceSignaling",
    "TechnologyLending",
    "TestAssistance",
    "Translation",
    "Transportation",
    "Tutoring",
    "VisionService",
];

/// CTDL accommodation taxonomy (bare values, without the
/// `accommodation:` prefix used in api-mode output)
pub const ACCOMMODATION_TYPES: &[&str] = &[
    "PhysicalAccessibility",
    "AccessibleHousing",
    "AccessibleParking",
    "AccessibleRestroom",
    "AdjustableLighting",
    "AdjustableWorkstations",
    "AlternativeFormats",
    "AssistiveTechnology",
    "AudioCaptioning",
    "CaptioningAndTranscripts",
    "ClearSignage",
    "ColorBlindness",
    "Communication",
    "DietaryAccommodation",
    "FacilityAccommodation",
    "FlexibleSchedule",
    "HearingLoops",
    "MultipleLanguage",
    "PlainLanguage",
    "ResourceAndServiceAccommodation",
    "ScreenReader",
    "Sensory",
    "ServiceAnimal",
    "TactileSignage",
];

fn join_with_prefix(values: &[&str], prefix: &str) -> String {
    values
        .iter()
        .map(|v| format!("{}{}", prefix, v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the api-mode prompt: one publish envelope with `ce-`-prefixed
/// generated identifiers, owned by `org_id`.
pub fn api_prompt(corpus: &str, org_id: &str) -> String {
    let support_types = join_with_prefix(SUPPORT_SERVICE_TYPES, "support:");
    let accommodation_types = join_with_prefix(ACCOMMODATION_TYPES, "accommodation:");

    format!(
        r#"You are a helpful assistant that specializes in generating structured data in the CTDL (Credential Transparency Description Language) format.
Your task is to extract support service information from text and structure it in JSON format.
For the support services you find in the text below, return a single JSON object shaped like this example:

{{
    "PublishForOrganizationIdentifier": "{org_id}",
    "DefaultLanguage": "en-US",
    "SupportServices": [{{
        "CTID": "ce-84365aea-57a5-4b5a-8c1c-eae95d7a8c9b",
        "Name": "My Support Service One",
        "Description": "This is some text that describes my Support Service.",
        "OwnedBy": [{{ "CTID": "{org_id}" }}],
        "InLanguage": ["en-US"],
        "LifeCycleStatusType": "Active",
        "AvailableAt": [{{
            "Name": "Office of Student Financial Aid",
            "Address1": "One University Plaza",
            "City": "Springfield",
            "AddressRegion": "IL",
            "PostalCode": "62703",
            "Country": "United States"
        }}],
        "SupportServiceType": ["support:Counseling", "support:CareerAdvising"],
        "AccommodationType": ["accommodation:ScreenReader"]
    }}]
}}

When categorizing SupportServiceType values, use these predefined categories:

{support_types}

If applicable, also define AccommodationType for accessibility features using these predefined categories:

{accommodation_types}

Key Guidelines:
    1.  Keep the PublishForOrganizationIdentifier consistent and unchanged for all services ({org_id}).
    2.  Generate a unique UUID following the UUID4 format for each service and use it as the CTID, prefixing it with "ce-" (e.g., "ce-84365aea-57a5-4b5a-8c1c-eae95d7a8c9b").
    3.  Use "en-US" as the DefaultLanguage for all services.
    4.  If the same service is repeated in the input text, ensure it appears only once in the output.
    5.  Summarize each support service's purpose or benefit in a short, clear description.
    6.  Specify the location for each service with the "AvailableAt" field and EXACTLY follow the schema provided. If a service has no address, omit the field from the output.
    7.  Ensure the JSON is well-organized, follows the provided schema, and is free from formatting errors.
    8.  Include accommodation types for services that offer accessibility features.
    9.  SupportServiceType and AccommodationType are mutually exclusive categories. Do NOT categorize a support service as an accommodation type, and do NOT categorize an accommodation type as a support service.
    10. Only use values for SupportServiceType and AccommodationType that EXACTLY match the predefined categories provided above. Do NOT use synonyms, paraphrases, or related terms.
    11. If a value does not match any of the predefined categories for either SupportServiceType or AccommodationType, you MUST omit it entirely. Do NOT attempt to create new categories.

Text to extract from:

{corpus}
"#
    )
}

/// Build the bulk-mode prompt: flat service records with
/// `<institution>_ss_<n>` external identifiers, suitable for the
/// bulk-upload CSV template.
pub fn bulk_prompt(corpus: &str, institution_code: &str) -> String {
    let support_types = SUPPORT_SERVICE_TYPES.join(", ");
    let accommodation_types = ACCOMMODATION_TYPES.join(", ");

    format!(
        r#"You are a helpful assistant that specializes in generating data in structured JSON format.
Your task is to extract support service information from text and structure it in JSON format.
For the support services you find in the text below, return a JSON array of flat objects shaped like this example:

{{
    "ExternalIdentifier": "{institution_code}_ss_01",
    "ResourceName": "The official name of the resource.",
    "Description": "The description commonly used or already available on the website.",
    "SubjectWebpage": "The main, public webpage about this SupportService.",
    "LifeCycleStatusType": "Active",
    "Language": "english",
    "AccommodationType": "AccessibleHousing | AccessibleParking",
    "SupportServiceType": "AcademicAdvising | CrisisSupport",
    "DeliveryType": "BlendedDelivery | In-Person | OnlineOnly | Variable Site",
    "Keywords": "first keyword | another keyword",
    "OfferedBy": "same as owner"
}}

When categorizing SupportServiceType values, use these predefined categories:

{support_types}

If applicable, also define AccommodationType for accessibility features using these predefined categories:

{accommodation_types}

Key Guidelines:
    1.  The external identifier for each SupportService must follow this format: {institution_code}_ss_01, where "{institution_code}" is the institution abbreviation and "ss" is the support service code. The number must be unique for each service.
    2.  If the same service is repeated in the input text, ensure it appears only once in the output.
    3.  Summarize each support service's purpose or benefit in a short, clear description.
    4.  Ensure the JSON is well-organized, follows the provided schema, and is free from formatting errors.
    5.  Include accommodation types for services that offer accessibility features.
    6.  SupportServiceType and AccommodationType are mutually exclusive categories. Do NOT categorize a support service as an accommodation type, and do NOT categorize an accommodation type as a support service.
    7.  Only use values for SupportServiceType and AccommodationType that EXACTLY match the predefined categories provided above. Do NOT use synonyms, paraphrases, or related terms.
    8.  If a value does not match any of the predefined categories for either SupportServiceType or AccommodationType, you MUST omit it entirely. Do NOT attempt to create new categories.
    9.  If you encounter a duplicate external identifier, adjust the identifier to make it unique.
    10. If a field is not applicable to a particular service, leave it as a blank space.
    11. The delivery type for each service can not be In-Person and OnlineOnly at the same time. If a service is offered both in-person and online, select the appropriate delivery type: BlendedDelivery or Variable Site.

Text to extract from:

{corpus}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_prompt_embeds_corpus_org_and_prefixed_taxonomies() {
        let prompt = api_prompt("Tutoring is available in the library.", "ce-1234");
        assert!(prompt.contains("Tutoring is available in the library."));
        assert!(prompt.contains("\"PublishForOrganizationIdentifier\": \"ce-1234\""));
        assert!(prompt.contains("support:AcademicAdvising"));
        assert!(prompt.contains("accommodation:TactileSignage"));
    }

    #[test]
    fn test_bulk_prompt_embeds_institution_code_and_bare_taxonomies() {
        let prompt = bulk_prompt("Counseling services.", "uiuc");
        assert!(prompt.contains("Counseling services."));
        assert!(prompt.contains("uiuc_ss_01"));
        // Bulk mode uses unprefixed taxonomy values.
        assert!(prompt.contains("\n\nAcademicAdvising, "));
        assert!(!prompt.contains("support:AcademicAdvising"));
    }
}
