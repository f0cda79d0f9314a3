//! Job-board data types
//!
//! Filters for the recommended-job listing call and the flat DTOs the
//! upstream responses are reshaped into. Every listing field is optional;
//! absence means the upstream did not provide it.

use serde::{Deserialize, Serialize};

/// Filters for the recommended-job listing call
///
/// Labels are the human-readable values the site shows (e.g. "不限",
/// "全职", "10-20k"); they are mapped to upstream numeric codes by the jobs
/// client and unrecognized labels are silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobFilters {
    /// Page number, starting at 1
    pub page: u32,
    /// Listings per page
    pub page_size: u32,
    /// Experience bracket label
    pub experience: Option<String>,
    /// Employment type label
    pub job_type: Option<String>,
    /// Salary band label
    pub salary: Option<String>,
    /// Opaque expectation id forwarded verbatim when present
    pub encrypt_expect_id: Option<String>,
}

impl Default for JobFilters {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 15,
            experience: None,
            job_type: None,
            salary: None,
            encrypt_expect_id: None,
        }
    }
}

impl JobFilters {
    /// Create filters with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set experience label
    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = Some(experience.into());
        self
    }

    /// Set employment type label
    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    /// Set salary band label
    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = Some(salary.into());
        self
    }
}

/// One recommended job listing, reshaped from the upstream record
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    /// Opaque token required by the greeting call
    pub security_id: Option<String>,
    /// Encrypted boss identifier
    pub encrypt_boss_id: Option<String>,
    /// Encrypted job identifier
    pub encrypt_job_id: Option<String>,
    /// Required education level
    pub job_degree: Option<String>,
    /// Job title
    pub job_name: Option<String>,
    /// Listing id used for tracking
    pub lid: Option<String>,
    /// Salary as displayed (e.g. "15-25K")
    pub salary_desc: Option<String>,
    /// Labels shown on the listing card
    #[serde(default)]
    pub job_labels: Vec<String>,
    /// Required skills
    #[serde(default)]
    pub skills: Vec<String>,
    /// Required experience as displayed
    pub job_experience: Option<String>,
    /// City name
    pub city_name: Option<String>,
    /// District within the city
    pub area_district: Option<String>,
    /// Encrypted brand identifier
    pub encrypt_brand_id: Option<String>,
    /// Company brand name
    pub brand_name: Option<String>,
    /// Company size as displayed
    pub brand_scale_name: Option<String>,
    /// Industry name
    pub industry: Option<String>,
    /// Whether the boss has been contacted already
    #[serde(default)]
    pub contact: bool,
    /// Whether the listing is a promoted top position
    #[serde(default)]
    pub show_top_position: bool,
}

/// One page of recommended job listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListPage {
    /// Whether more pages exist upstream
    pub has_more: bool,
    /// Listings on this page
    pub job_list: Vec<JobListing>,
    /// Number of listings on this page
    pub total: usize,
}

/// Result of a greeting (friend-add) call
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GreetingReceipt {
    /// Whether the upstream will show the greeting
    #[serde(default)]
    pub show_greeting: bool,
    /// Security id echoed back
    pub security_id: Option<String>,
    /// Boss source channel
    pub boss_source: Option<i64>,
    /// Source channel
    pub source: Option<i64>,
    /// Encrypted boss id echoed back
    pub enc_boss_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_default() {
        let filters = JobFilters::default();
        assert_eq!(filters.page, 1);
        assert_eq!(filters.page_size, 15);
        assert_eq!(filters.experience, None);
    }

    #[test]
    fn test_filters_builder() {
        let filters = JobFilters::new()
            .with_page(3)
            .with_experience("不限")
            .with_job_type("全职")
            .with_salary("10-20k");

        assert_eq!(filters.page, 3);
        assert_eq!(filters.experience.as_deref(), Some("不限"));
        assert_eq!(filters.job_type.as_deref(), Some("全职"));
        assert_eq!(filters.salary.as_deref(), Some("10-20k"));
    }

    #[test]
    fn test_listing_deserializes_with_missing_fields() {
        let listing: JobListing =
            serde_json::from_str(r#"{"jobName": "Rust 工程师", "salaryDesc": "20-35K"}"#).unwrap();

        assert_eq!(listing.job_name.as_deref(), Some("Rust 工程师"));
        assert_eq!(listing.salary_desc.as_deref(), Some("20-35K"));
        assert_eq!(listing.security_id, None);
        assert!(listing.skills.is_empty());
        assert!(!listing.contact);
    }

    #[test]
    fn test_filters_query_deserialization() {
        // Server handlers deserialize filters straight from query strings
        let filters: JobFilters =
            serde_json::from_str(r#"{"page": 2, "experience": "应届生"}"#).unwrap();
        assert_eq!(filters.page, 2);
        assert_eq!(filters.page_size, 15);
        assert_eq!(filters.experience.as_deref(), Some("应届生"));
    }
}
