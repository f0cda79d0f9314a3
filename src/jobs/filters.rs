//! Human-readable filter labels → upstream filter codes
//!
//! The recommend endpoint takes numeric filter codes; callers supply the
//! Chinese labels shown in the web UI. Unrecognized labels map to `None`
//! and are silently dropped from the query.

/// Work-experience filter code for a UI label.
pub fn experience_code(label: &str) -> Option<u32> {
    match label {
        "不限" => Some(101),
        "应届生" => Some(102),
        "一年以内" => Some(103),
        "一到三年" => Some(104),
        "三到五年" => Some(105),
        "五到十年" => Some(106),
        "十年以上" => Some(107),
        "在校生" => Some(108),
        _ => None,
    }
}

/// Job-type filter code for a UI label.
pub fn job_type_code(label: &str) -> Option<u32> {
    match label {
        "全职" => Some(1901),
        "兼职" => Some(1903),
        _ => None,
    }
}

/// Salary-range filter code for a UI label.
pub fn salary_code(label: &str) -> Option<u32> {
    match label {
        "3k以下" => Some(402),
        "3-5k" => Some(403),
        "5-10k" => Some(404),
        "10-20k" => Some(405),
        "20-50k" => Some(406),
        "50以上" => Some(407),
        _ => None,
    }
}
