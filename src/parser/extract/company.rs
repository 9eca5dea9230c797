use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::links::{classify_domain, extract_domain, looks_like_url};
use super::{Extraction, Notice, Notices};
use crate::parser::fields::{capture, first_capture, line_patterns};
use crate::parser::sections::{
    cluster_sections, find_section, parse_free_text, parse_key_value_line, parse_list,
    parse_person, parse_tech_item, route_pain_points, Section,
};
use crate::record::{CompanyIntelligenceRecord, LocationInfo, SizeInfo, WebsiteAudit};

pub const UNKNOWN_COMPANY: &str = "Unknown Company";

static HEADER_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*#{1,3}[ \t]*Company Intelligence(?: Report)?[ \t]*:[ \t]*(.+?)[ \t#]*$")
        .unwrap()
});
static NAME_LABEL: LazyLock<Vec<Regex>> = LazyLock::new(|| line_patterns(&["Company Name"]));
static DOMAIN_LABEL: LazyLock<Vec<Regex>> =
    LazyLock::new(|| line_patterns(&["Company Domain", "Domain"]));
static WEBSITE_LABEL: LazyLock<Vec<Regex>> =
    LazyLock::new(|| line_patterns(&["Website URL", "Website", "Homepage"]));

const SUMMARY: &[&str] = &["Summary", "Company Summary", "Overview"];
const INDUSTRY_TAGS: &[&str] = &["Industry Tags", "Industries", "Industry"];
const LOCATION: &[&str] = &["Location", "Headquarters"];
const SIZE: &[&str] = &["Size", "Company Size"];
const SOCIAL: &[&str] = &["Social Media", "Social Media Links", "Social Links"];
const TECH: &[&str] = &["Observed Tech", "Observed Tech Stack", "Tech Stack"];
const PAIN_POINTS: &[&str] = &["Pain Points / Opportunities", "Pain Points", "Opportunities"];
const KEY_PEOPLE: &[&str] = &["Key People", "Key Personnel"];
const WEBSITE_AUDIT: &[&str] = &["Website Audit", "Website Audit Observations"];
const SESSION_NOTES: &[&str] = &["Session Notes", "Notes"];

/// Build a company-intelligence record from a `## Section ##` report.
///
/// `visited_urls` is copied into the record and used to infer the website.
pub fn transform_company(raw_text: &str, visited_urls: &[String]) -> CompanyIntelligenceRecord {
    extract_company(raw_text, visited_urls).into_record()
}

pub fn extract_company(
    raw_text: &str,
    visited_urls: &[String],
) -> Extraction<CompanyIntelligenceRecord> {
    let mut notices = Notices::default();
    let sections = cluster_sections(raw_text);
    let section = |titles: &[&str]| body(&sections, titles);

    let company_name = notices.track(
        "company_name",
        capture(&HEADER_NAME_RE, raw_text, 1)
            .or_else(|| first_capture(&NAME_LABEL, raw_text, 1)),
    );
    let mut company_domain = first_capture(&DOMAIN_LABEL, raw_text, 1)
        .map(|d| extract_domain(&d).unwrap_or(d));
    let mut website_url = first_capture(&WEBSITE_LABEL, raw_text, 1);

    if website_url.is_none() {
        if let Some(domain) = company_domain.as_deref() {
            website_url = infer_website(domain, visited_urls);
        }
    }
    if company_domain.is_none() {
        company_domain = website_url.as_deref().and_then(extract_domain);
    }

    let (identified_pain_points, potential_opportunities) = match section(PAIN_POINTS) {
        Some(body) => {
            let (pains, opps) = route_pain_points(&parse_list(body));
            (Some(pains), Some(opps))
        }
        None => (None, None),
    };

    let record = CompanyIntelligenceRecord {
        company_name: company_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
        company_domain,
        website_url,
        description_summary: section(SUMMARY).and_then(parse_free_text),
        industry_tags: section(INDUSTRY_TAGS).map(parse_tags),
        source_urls_visited: visited_urls.to_vec(),
        session_notes: section(SESSION_NOTES).and_then(parse_free_text),
        location_info: section(LOCATION)
            .and_then(parse_free_text)
            .map(|full_address| LocationInfo { full_address }),
        size_info: section(SIZE)
            .and_then(parse_free_text)
            .map(|employee_count_text| SizeInfo { employee_count_text }),
        social_media_links: section(SOCIAL).map(social_links),
        observed_tech_stack: section(TECH)
            .map(|body| parse_list(body).iter().map(|i| parse_tech_item(i)).collect()),
        identified_pain_points,
        potential_opportunities,
        key_personnel: section(KEY_PEOPLE)
            .map(|body| parse_list(body).iter().map(|i| parse_person(i)).collect()),
        website_audit_observations: section(WEBSITE_AUDIT)
            .and_then(parse_free_text)
            .map(|overall_impression| WebsiteAudit { overall_impression }),
    };

    let mut missing = Vec::new();
    if company_name.is_none() {
        missing.push("company_name");
    }
    if record.company_domain.is_none() {
        missing.push("company_domain");
    }
    if !missing.is_empty() {
        warn!(
            company = %record.company_name,
            ?missing,
            "company record incomplete; keeping it as low-confidence"
        );
        notices.push(Notice::Incomplete { missing });
    }

    log_unknown_sections(&sections);

    Extraction {
        record,
        notices: notices.into_vec(),
    }
}

fn body<'a>(sections: &'a [Section], titles: &[&str]) -> Option<&'a str> {
    find_section(sections, titles).map(|s| s.body.as_str())
}

/// A visited URL on the company's own domain, else the first one visited.
fn infer_website(domain: &str, visited_urls: &[String]) -> Option<String> {
    visited_urls
        .iter()
        .find(|u| u.contains(domain))
        .or_else(|| visited_urls.first())
        .cloned()
}

/// List items, with comma-separated tags on one line split apart.
fn parse_tags(body: &str) -> Vec<String> {
    parse_list(body)
        .iter()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// `Platform: handle` lines, plus bare profile URLs keyed by platform.
fn social_links(body: &str) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();
    for line in body.lines() {
        let item = line
            .trim()
            .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•') || c.is_whitespace());
        if looks_like_url(item) {
            if let Some(platform) = extract_domain(item).as_deref().and_then(classify_domain) {
                links.insert(platform.to_string(), item.to_string());
            }
            continue;
        }
        if let Some((key, value)) = parse_key_value_line(line) {
            links.insert(key, value);
        }
    }
    links
}

fn log_unknown_sections(sections: &[Section]) {
    let known = [
        SUMMARY,
        INDUSTRY_TAGS,
        LOCATION,
        SIZE,
        SOCIAL,
        TECH,
        PAIN_POINTS,
        KEY_PEOPLE,
        WEBSITE_AUDIT,
        SESSION_NOTES,
    ];
    for s in sections {
        if !known.iter().any(|titles| s.is_titled(titles)) {
            debug!(title = %s.title, "ignoring unrecognized section");
        }
    }
}
