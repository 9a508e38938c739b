//! Header names the pipeline looks up by exact, case-sensitive match.
//! Tables missing any of them lose the matching feature, nothing more.

pub const DATE: &str = "Date";
pub const DATE_POSTED: &str = "Date Posted";
pub const DEACTIVATE: &str = "Deactivate?";
pub const PATHWAY: &str = "Pathway";
pub const LOCATION: &str = "Location";
pub const LANGUAGE: &str = "Language";
pub const SALARY_RANGE: &str = "Salary Range";
