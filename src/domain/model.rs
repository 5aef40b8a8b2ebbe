use serde::Serialize;

/// Column order for every tabular rendering of a batch.
pub const COLUMNS: [&str; 16] = [
    "Application Number",
    "Application Date",
    "Status",
    "Publication Date",
    "First Use Date(s)",
    "Use in Commerce Date(s)",
    "NOA Date",
    "Registration Number",
    "Registration Date",
    "Register Type",
    "Mark Name",
    "Mark Type (Category)",
    "International Classes",
    "Current Owner Name",
    "Filed as ITU",
    "Error",
];

pub const NOT_AVAILABLE: &str = "N/A";

/// One row of the output table: the fields extracted for a single serial
/// number, or an error row when the lookup failed.
#[derive(Debug, Clone, Serialize)]
pub struct StatusRecord {
    #[serde(rename = "Application Number")]
    pub application_number: String,
    #[serde(rename = "Application Date")]
    pub application_date: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Publication Date")]
    pub publication_date: String,
    #[serde(rename = "First Use Date(s)")]
    pub first_use_dates: String,
    #[serde(rename = "Use in Commerce Date(s)")]
    pub use_in_commerce_dates: String,
    #[serde(rename = "NOA Date")]
    pub noa_date: String,
    #[serde(rename = "Registration Number")]
    pub registration_number: String,
    #[serde(rename = "Registration Date")]
    pub registration_date: String,
    #[serde(rename = "Register Type")]
    pub register_type: String,
    #[serde(rename = "Mark Name")]
    pub mark_name: String,
    #[serde(rename = "Mark Type (Category)")]
    pub mark_category: String,
    #[serde(rename = "International Classes")]
    pub international_classes: String,
    #[serde(rename = "Current Owner Name")]
    pub current_owner_name: String,
    #[serde(rename = "Filed as ITU")]
    pub filed_as_itu: String,
    #[serde(rename = "Error", skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl StatusRecord {
    /// A record with every field at its sentinel default. The extractor
    /// overwrites whatever the document actually provides.
    pub fn with_defaults(application_number: &str) -> Self {
        Self {
            application_number: application_number.to_string(),
            application_date: NOT_AVAILABLE.to_string(),
            status: NOT_AVAILABLE.to_string(),
            publication_date: NOT_AVAILABLE.to_string(),
            first_use_dates: NOT_AVAILABLE.to_string(),
            use_in_commerce_dates: NOT_AVAILABLE.to_string(),
            noa_date: NOT_AVAILABLE.to_string(),
            registration_number: NOT_AVAILABLE.to_string(),
            registration_date: NOT_AVAILABLE.to_string(),
            register_type: NOT_AVAILABLE.to_string(),
            mark_name: NOT_AVAILABLE.to_string(),
            mark_category: NOT_AVAILABLE.to_string(),
            international_classes: NOT_AVAILABLE.to_string(),
            current_owner_name: NOT_AVAILABLE.to_string(),
            filed_as_itu: "No".to_string(),
            error: String::new(),
        }
    }

    /// A failed lookup: only the serial number and the error description
    /// carry data, so error rows tabulate with empty cells elsewhere.
    pub fn failure(application_number: &str, message: impl Into<String>) -> Self {
        Self {
            application_number: application_number.to_string(),
            application_date: String::new(),
            status: String::new(),
            publication_date: String::new(),
            first_use_dates: String::new(),
            use_in_commerce_dates: String::new(),
            noa_date: String::new(),
            registration_number: String::new(),
            registration_date: String::new(),
            register_type: String::new(),
            mark_name: String::new(),
            mark_category: String::new(),
            international_classes: String::new(),
            current_owner_name: String::new(),
            filed_as_itu: String::new(),
            error: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.error.is_empty()
    }

    /// Field values in `COLUMNS` order.
    pub fn to_row(&self) -> [&str; 16] {
        [
            &self.application_number,
            &self.application_date,
            &self.status,
            &self.publication_date,
            &self.first_use_dates,
            &self.use_in_commerce_dates,
            &self.noa_date,
            &self.registration_number,
            &self.registration_date,
            &self.register_type,
            &self.mark_name,
            &self.mark_category,
            &self.international_classes,
            &self.current_owner_name,
            &self.filed_as_itu,
            &self.error,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TableResult {
    pub records: Vec<StatusRecord>,
    pub csv_output: String,
    pub tsv_output: String,
    pub failed: Vec<StatusRecord>,
}
