//! Medicine reference catalog and medication field validation.
//!
//! The catalog backs the medicine picker in the mobile app. It is a fixed
//! list until a drug database is wired in.

use serde::Serialize;

/// Maximum length of a medication brand name (matches the column width).
pub const MAX_BRAND_NAME_LENGTH: usize = 255;

/// A medicine the user can pick when adding a medication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Medicine {
    pub brand_name: &'static str,
    pub generic_name: &'static str,
    pub manufacturer: &'static str,
    pub indications: &'static str,
    pub dosage: &'static str,
}

/// The built-in medicine catalog.
pub const MEDICINE_CATALOG: &[Medicine] = &[
    Medicine {
        brand_name: "Metformin",
        generic_name: "Metformin Hydrochloride",
        manufacturer: "Pharma Inc.",
        indications: "Used to treat type 2 diabetes.",
        dosage: "500 mg twice daily.",
    },
    Medicine {
        brand_name: "Lisinopril",
        generic_name: "Lisinopril",
        manufacturer: "HealthCorp",
        indications: "Used to treat high blood pressure.",
        dosage: "10 mg once daily.",
    },
    Medicine {
        brand_name: "Atorvastatin",
        generic_name: "Atorvastatin Calcium",
        manufacturer: "MediLife",
        indications: "Used to lower cholesterol.",
        dosage: "20 mg once daily.",
    },
];

/// Validate a brand name: non-blank and within the length limit.
pub fn validate_brand_name(brand_name: &str) -> Result<(), String> {
    if brand_name.trim().is_empty() {
        return Err("brand_name cannot be empty".to_string());
    }
    if brand_name.chars().count() > MAX_BRAND_NAME_LENGTH {
        return Err(format!(
            "brand_name exceeds maximum length of {MAX_BRAND_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}
