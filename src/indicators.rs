// Column names as they appear in the facility export header.
//
// Indicator names are long, human-readable strings and are matched exactly,
// including the doubled spaces that some of them carry.

pub const PERIOD: &str = "periodname";
pub const REGION: &str = "orgunitlevel1";
pub const SUB_REGION: &str = "orgunitlevel2";
pub const FACILITY: &str = "orgunitlevel3";
pub const ORG_UNIT_NAME: &str = "organisationunitname";
pub const ORG_UNIT_CODE: &str = "organisationunitcode";
pub const PERIOD_DESCRIPTION: &str = "perioddescription";
pub const PERIOD_ID: &str = "periodid";
pub const PERIOD_CODE: &str = "periodcode";

/// Derived columns written on export when requested.
pub const QUARTER: &str = "quarter";
pub const YEAR: &str = "year";

/// Columns kept verbatim as text during normalization.
pub const DESCRIPTOR_COLUMNS: [&str; 11] = [
    PERIOD,
    REGION,
    SUB_REGION,
    FACILITY,
    ORG_UNIT_NAME,
    ORG_UNIT_CODE,
    PERIOD_DESCRIPTION,
    PERIOD_ID,
    PERIOD_CODE,
    QUARTER,
    YEAR,
];

pub fn is_descriptor(column: &str) -> bool {
    DESCRIPTOR_COLUMNS.contains(&column)
}

// ANC
pub const ANC_CLIENTS: &str = "PMTCT_ANC_1 Number of New ANC clients";
pub const HIV_TESTED_ANC: &str =
    "PMTCT_HTS_6 Number of  pregnant women HIV tested and received results ANC";
pub const HIV_POSITIVE_ANC: &str = "PMTCT_HTS_7. Number of pregnant women tested HIV positive_ ANC";
pub const PREVIOUSLY_KNOWN_POSITIVE: &str =
    "PMTCT_HTS_5. Number of pregnant women with previously known HIV positive infection";

// Labour & delivery
pub const HIV_TESTED_LD: &str =
    "PMTCT_HTS_6 Number of  pregnant women HIV tested and received results L&D";
pub const HIV_POSITIVE_LD: &str = "PMTCT_HTS_7. Number of pregnant women tested HIV positive_ L&D";
pub const DELIVERIES_TOTAL: &str =
    "PMTCT_L&D_20. Total deliveries at facility (booked and unbooked pregnant women)";
pub const DELIVERIES_HIV_POSITIVE: &str =
    "PMTCT_L&D_21. Number of booked HIV positive pregnant women who delivered at facility";

// ART initiation
pub const ART_ALREADY: &str =
    "PMTCT_ART_15a. Number of HIV positive pregnant women already on ART prior to this pregnancy";
pub const ART_ANC_EARLY: &str = "PMTCT_ART_15b. Number of HIV positive pregnant women newly started on  ART during ANC  <36wks of pregnancy";
pub const ART_ANC_LATE: &str = "PMTCT_ART_15c. Number of HIV positive pregnant women newly started on  ART during ANC >36wks of pregnancy";
pub const ART_LABOUR: &str =
    "PMTCT_ART_15d. Number of HIV positive pregnant women newly started on  ART during Labour";
pub const ART_POSTPARTUM: &str = "PMTCT_ART_15e. Number of HIV positive pregnant women newly started on  ART during Post Partum (<72 hrs)";

// Hub & spoke
pub const REFERRED_TO_HUB: &str =
    "PMTCT_ART_15h. Number of Pregnant women referred to a Hub facility for treatment";
pub const INITIATED_AT_HUB: &str = "PMTCT_ADDENDUM_15h Number of HIV positive pregnant women  identified in the spoke site who were initiated on ART in the comprehensive site";

// Early infant diagnosis
pub const EID_SAMPLES: &str =
    "PMTCT_EID_33. No. of of HEI whose samples were taken within 2 months of birth for DNA PCR";
pub const EID_NEGATIVE: &str = "PMTCT_EID_33. No. of HIV PCR results received for babies whose samples were taken for DNA PCR_Negative";
pub const EID_POSITIVE: &str = "PMTCT_EID_33. No. of HIV PCR results received for babies whose samples were taken for DNA PCR_Positive";

// Hepatitis and syphilis
pub const HBV_TESTED: &str =
    "PMTCT_HTS_10. Number of new ANC Clients tested for HBV ( ANC, L&D, <72hrs Post Partum)";
pub const HCV_TESTED: &str =
    "PMTCT_HTS_11. Number of new ANC Clients tested for HCV ( ANC, L&D, <72hrs Post Partum)";
pub const SYPHILIS_TESTED: &str = "PMTCT_ANC_2. Number of new ANC Clients tested for syphilis total";
pub const SYPHILIS_POSITIVE: &str =
    "PMTCT_ANC_3. Number of new ANC Clients tested positive for syphilis Total";
pub const SYPHILIS_TREATED: &str = "PMTCT_ANC_4. Number of the ANC Clients treated for Syphilis total";

// Reporting rates
pub const REPORTING_RATE_COMPREHENSIVE: &str = "PMTCT MSF Comprehensive - Reporting rate";
pub const REPORTING_RATE_SPOKE: &str = "PMTCT MSF FOR SPOKE SITES   - Reporting rate";
