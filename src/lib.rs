pub mod parser;
pub mod record;

pub use parser::extract::company::{extract_company, transform_company};
pub use parser::extract::job::{extract_job, transform_job};
pub use parser::extract::{Extraction, Notice};
pub use record::{CompanyIntelligenceRecord, JobPostingRecord};
