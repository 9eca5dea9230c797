use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::links::extract_domain;
use super::{Extraction, Notice, Notices};
use crate::parser::dates::{normalize_date, parse_date};
use crate::parser::fields::{block_patterns, first_capture, line_patterns};
use crate::parser::keywords::{collect_keywords, TECH_PATTERN};
use crate::parser::salary::{normalize_salary, salary_line};
use crate::record::JobPostingRecord;

pub const NOT_AVAILABLE: &str = "N/A";

// Most specific label first; the first one that yields a value wins.
static TITLE: LazyLock<Vec<Regex>> =
    LazyLock::new(|| line_patterns(&["Job Title", "Position Title", "Title", "Position", "Role"]));
static COMPANY: LazyLock<Vec<Regex>> =
    LazyLock::new(|| line_patterns(&["Company Name", "Company", "Employer", "Organization"]));
static DOMAIN: LazyLock<Vec<Regex>> =
    LazyLock::new(|| line_patterns(&["Company Domain", "Domain", "Company Website", "Website"]));
static LOCATION: LazyLock<Vec<Regex>> =
    LazyLock::new(|| line_patterns(&["Job Location", "Location"]));
static JOB_TYPE: LazyLock<Vec<Regex>> =
    LazyLock::new(|| line_patterns(&["Job Type", "Employment Type", "Type"]));
static EXPERIENCE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    line_patterns(&["Experience Level", "Seniority Level", "Seniority", "Experience"])
});
static INDUSTRY: LazyLock<Vec<Regex>> = LazyLock::new(|| line_patterns(&["Industry", "Sector"]));
static POSTED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    line_patterns(&["Posting Date", "Date Posted", "Posted Date", "Posted On", "Posted"])
});
static DEADLINE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    line_patterns(&["Application Deadline", "Deadline", "Apply By", "Closing Date"])
});

static DESCRIPTION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    block_patterns(&["Job Description", "Role Description", "Description", "About the Role"])
});
static REQUIREMENTS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| block_patterns(&["Requirements", "Qualifications"]));
static BENEFITS: LazyLock<Vec<Regex>> = LazyLock::new(|| block_patterns(&["Benefits", "Perks"]));

static REMOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bremote\b").unwrap());

/// Build a job-posting record from loosely labeled text.
///
/// `job_url` and `source_site` come from the caller and are copied as-is.
pub fn transform_job(raw_text: &str, job_url: &str, source_site: &str) -> JobPostingRecord {
    extract_job(raw_text, job_url, source_site).into_record()
}

pub fn extract_job(raw_text: &str, job_url: &str, source_site: &str) -> Extraction<JobPostingRecord> {
    let mut notices = Notices::default();
    let mut field = |name: &'static str, patterns: &[Regex]| {
        notices.track(name, first_capture(patterns, raw_text, 1))
    };

    let title = field("title", &TITLE);
    let company = field("company", &COMPANY);
    let company_domain = field("company_domain", &DOMAIN);
    let location = field("location", &LOCATION);
    let job_type = field("job_type", &JOB_TYPE);
    let experience_level = field("experience_level", &EXPERIENCE);
    let industry = field("industry", &INDUSTRY);
    let description = field("description", &DESCRIPTION);
    let requirements = field("requirements", &REQUIREMENTS);
    let benefits = field("benefits", &BENEFITS);
    let posted_raw = field("posting_date", &POSTED);
    let deadline_raw = field("application_deadline", &DEADLINE);

    let company_domain = company_domain.map(|d| extract_domain(&d).unwrap_or(d));

    for (name, raw) in [
        ("posting_date", &posted_raw),
        ("application_deadline", &deadline_raw),
    ] {
        if let Some(raw) = raw {
            if parse_date(raw).is_none() {
                notices.push(Notice::Unparsed {
                    field: name,
                    raw: raw.clone(),
                });
            }
        }
    }

    let salary = normalize_salary(&salary_line(raw_text).unwrap_or_default());
    if salary.is_verbatim() {
        if let Some(display) = &salary.display {
            notices.push(Notice::Unparsed {
                field: "salary",
                raw: display.clone(),
            });
        }
    }

    let is_remote = location
        .as_deref()
        .is_some_and(|loc| REMOTE_RE.is_match(loc));

    // Explicit skills blocks, plus known tech terms in the main prose.
    let mut keywords = collect_keywords(raw_text, None);
    let prose = [&title, &description, &requirements]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    keywords.extend(collect_keywords(&prose, Some(&[TECH_PATTERN.as_str()])));

    let mut missing = Vec::new();
    if title.is_none() {
        missing.push("title");
    }
    if company.is_none() {
        missing.push("company");
    }
    if job_url.trim().is_empty() {
        missing.push("job_url");
    }
    if source_site.trim().is_empty() {
        missing.push("source_site");
    }
    if !missing.is_empty() {
        warn!(job_url, ?missing, "job record incomplete; keeping it as low-confidence");
        notices.push(Notice::Incomplete { missing });
    }

    let record = JobPostingRecord {
        title: title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        company: company.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        company_domain,
        location,
        job_url: job_url.to_string(),
        source_site: source_site.to_string(),
        description,
        requirements,
        benefits,
        job_type,
        experience_level,
        industry,
        posting_date: normalize_date(posted_raw.as_deref()),
        application_deadline: normalize_date(deadline_raw.as_deref()),
        is_remote,
        min_salary: salary.min,
        max_salary: salary.max,
        salary_range_string: salary.display,
        keywords: keywords.into_iter().collect(),
        raw_text_content: raw_text.to_string(),
    };

    Extraction {
        record,
        notices: notices.into_vec(),
    }
}
