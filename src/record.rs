use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Job postings ──

/// Flat job-posting row. Every key is always serialized; misses become `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPostingRecord {
    pub title: String,
    pub company: String,
    pub company_domain: Option<String>,
    pub location: Option<String>,
    pub job_url: String,
    pub source_site: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub industry: Option<String>,
    /// ISO date when parseable, otherwise the captured text.
    pub posting_date: Option<String>,
    pub application_deadline: Option<String>,
    pub is_remote: bool,
    pub min_salary: Option<u64>,
    pub max_salary: Option<u64>,
    pub salary_range_string: Option<String>,
    pub keywords: Vec<String>,
    pub raw_text_content: String,
}

// ── Company intelligence ──

/// Company report row. `None` fields are left out of the JSON entirely, so the
/// key set follows whichever sections the report contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyIntelligenceRecord {
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_tags: Option<Vec<String>>,
    pub source_urls_visited: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_info: Option<LocationInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_info: Option<SizeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media_links: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_tech_stack: Option<Vec<TechItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identified_pain_points: Option<Vec<PainPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_opportunities: Option<Vec<Opportunity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_personnel: Option<Vec<Person>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_audit_observations: Option<WebsiteAudit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub full_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeInfo {
    pub employee_count_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteAudit {
    pub overall_impression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechItem {
    pub name: String,
    pub category: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainPoint {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub title: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_company() -> CompanyIntelligenceRecord {
        CompanyIntelligenceRecord {
            company_name: "Acme".into(),
            company_domain: None,
            website_url: None,
            description_summary: Some("Makes anvils.".into()),
            industry_tags: None,
            source_urls_visited: vec![],
            session_notes: None,
            location_info: None,
            size_info: None,
            social_media_links: None,
            observed_tech_stack: None,
            identified_pain_points: None,
            potential_opportunities: None,
            key_personnel: None,
            website_audit_observations: None,
        }
    }

    #[test]
    fn company_omits_absent_sections() {
        let json = serde_json::to_value(bare_company()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("description_summary"));
        assert!(obj.contains_key("source_urls_visited"));
        assert!(!obj.contains_key("key_personnel"));
        assert!(!obj.contains_key("company_domain"));
    }

    #[test]
    fn company_keeps_present_but_empty_lists() {
        let mut c = bare_company();
        c.key_personnel = Some(vec![]);
        let json = serde_json::to_value(c).unwrap();
        assert_eq!(json["key_personnel"], serde_json::json!([]));
    }

    #[test]
    fn opportunity_serializes_type_key() {
        let o = Opportunity {
            kind: "SEO".into(),
            description: "Fix titles".into(),
        };
        let json = serde_json::to_value(o).unwrap();
        assert_eq!(json["type"], "SEO");
    }
}
