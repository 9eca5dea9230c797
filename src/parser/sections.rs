use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::record::{Opportunity, PainPoint, Person, TechItem};

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*##[ \t]*([^#\n]+?)[ \t]*##[ \t]*$").unwrap());

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Split text into `## Title ##` sections. Text before the first header is
/// not part of any section.
pub fn cluster_sections(text: &str) -> Vec<Section> {
    let headers: Vec<_> = HEADER_RE.captures_iter(text).collect();
    let mut sections = Vec::with_capacity(headers.len());
    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        sections.push(Section {
            title: title.as_str().trim().to_string(),
            body: text[whole.end()..end].trim().to_string(),
        });
    }
    sections
}

impl Section {
    /// Title matches one of `titles`, ignoring case and extra whitespace.
    pub fn is_titled(&self, titles: &[&str]) -> bool {
        let own = normalize_title(&self.title);
        titles.iter().any(|t| normalize_title(t) == own)
    }
}

/// First section titled any of `titles`.
pub fn find_section<'a>(sections: &'a [Section], titles: &[&str]) -> Option<&'a Section> {
    sections.iter().find(|s| s.is_titled(titles))
}

/// Body of the `## title ##` section, or `None` if the header is absent.
pub fn section_text(text: &str, title: &str) -> Option<String> {
    find_section(&cluster_sections(text), &[title]).map(|s| s.body.clone())
}

fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" / ", "/")
        .to_lowercase()
}

// ── Body parsers ──

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '-' | '*' | '•') || c.is_whitespace())
        .trim_end()
}

/// One item per non-blank line, bullets stripped, source order kept.
pub fn parse_list(body: &str) -> Vec<String> {
    body.lines()
        .map(strip_bullet)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// `key: value` on the first colon. Lines without one are skipped; a repeated
/// key keeps its last value.
pub fn parse_key_values(body: &str) -> BTreeMap<String, String> {
    body.lines().filter_map(parse_key_value_line).collect()
}

pub(crate) fn parse_key_value_line(line: &str) -> Option<(String, String)> {
    let (key, value) = strip_bullet(line).split_once(':')?;
    let key = key.trim().trim_matches('*').trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().trim_start_matches('*').trim().to_string()))
}

pub fn parse_free_text(body: &str) -> Option<String> {
    let body = body.trim();
    (!body.is_empty()).then(|| body.to_string())
}

// ── Item parsers ──

/// Split `"Name (rest"` on the first `(`, dropping the closing paren.
/// Returns the parenthetical and whatever trails it.
fn split_paren(item: &str) -> (&str, Option<(&str, &str)>) {
    let Some((name, rest)) = item.split_once('(') else {
        return (item.trim(), None);
    };
    let (inner, trailing) = match rest.find(')') {
        Some(close) => (&rest[..close], &rest[close + 1..]),
        None => (rest, ""),
    };
    (name.trim(), Some((inner.trim(), trailing.trim())))
}

/// `Name (Category: Notes)` or `Name (Notes)`.
pub fn parse_tech_item(item: &str) -> TechItem {
    let (name, paren) = split_paren(item);
    let (category, notes) = match paren {
        Some((inner, _)) => match inner.split_once(':') {
            Some((category, notes)) => (category.trim().to_string(), non_empty(notes)),
            None => (UNKNOWN.to_string(), non_empty(inner)),
        },
        None => (UNKNOWN.to_string(), None),
    };
    TechItem {
        name: name.to_string(),
        category,
        notes,
    }
}

/// Items mentioning "opportunity" become opportunities, everything else is a
/// pain point. An opportunity's `Type: description` prefix sets its type.
pub fn route_pain_points(items: &[String]) -> (Vec<PainPoint>, Vec<Opportunity>) {
    let mut pains = Vec::new();
    let mut opportunities = Vec::new();
    for item in items {
        if item.to_lowercase().contains("opportunity") {
            let (kind, description) = match item.split_once(':') {
                Some((kind, desc)) if !kind.trim().is_empty() && !desc.trim().is_empty() => {
                    (kind.trim().to_string(), desc.trim().to_string())
                }
                _ => ("General".to_string(), item.trim().to_string()),
            };
            opportunities.push(Opportunity { kind, description });
        } else {
            pains.push(PainPoint {
                description: item.trim().to_string(),
            });
        }
    }
    (pains, opportunities)
}

/// `Name (Title - email@host)`. Without an `@` on the right of the dash the
/// email stays `None` and the whole parenthetical is kept as notes.
pub fn parse_person(item: &str) -> Person {
    let (name, paren) = split_paren(item);
    let Some((inner, trailing)) = paren else {
        return Person {
            name: name.to_string(),
            title: UNKNOWN.to_string(),
            email: None,
            notes: None,
        };
    };

    let trailing = trailing.trim_start_matches(['-', '–', '—']).trim();
    // " - " first so hyphenated titles like "Co-Founder" survive.
    let (title, email) = match inner.split_once(" - ").or_else(|| inner.split_once('-')) {
        Some((title, rhs)) if rhs.contains('@') => (title.trim(), Some(rhs.trim().to_string())),
        _ => (inner.split_once(" - ").map_or(inner, |(t, _)| t.trim()), None),
    };
    let notes = match (&email, trailing.is_empty()) {
        (Some(_), true) => None,
        (Some(_), false) => Some(trailing.to_string()),
        (None, true) => non_empty(inner),
        (None, false) => Some(format!("{inner} - {trailing}")),
    };

    Person {
        name: name.to_string(),
        title: if title.is_empty() { UNKNOWN.to_string() } else { title.to_string() },
        email,
        notes,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "# Company Intelligence: Acme\n\n## Summary ##\nAcme builds anvils.\n\n## Key People ##\n- Jane Doe (CEO - jane@acme.io)\n* Bob (CTO)\n\n##Observed Tech##\nReact (Frontend: marketing site)\n";

    #[test]
    fn clusters_by_header() {
        let sections = cluster_sections(REPORT);
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Summary", "Key People", "Observed Tech"]);
        assert_eq!(sections[0].body, "Acme builds anvils.");
    }

    #[test]
    fn section_lookup_is_case_insensitive() {
        assert_eq!(section_text(REPORT, "summary").as_deref(), Some("Acme builds anvils."));
        assert_eq!(
            section_text(REPORT, "observed  tech").as_deref(),
            Some("React (Frontend: marketing site)")
        );
    }

    #[test]
    fn missing_section_is_none() {
        assert_eq!(section_text(REPORT, "Session Notes"), None);
        assert!(cluster_sections("no headers at all").is_empty());
    }

    #[test]
    fn slash_titles_match_loosely() {
        let text = "## Pain Points/Opportunities ##\n- Slow site";
        let sections = cluster_sections(text);
        assert!(find_section(&sections, &["Pain Points / Opportunities"]).is_some());
    }

    #[test]
    fn empty_section_body() {
        let text = "## Key People ##\n## Summary ##\nText";
        assert_eq!(section_text(text, "Key People").as_deref(), Some(""));
    }

    #[test]
    fn list_strips_bullets() {
        let body = "- one\n* two\n\n  •  three  \n   \nfour";
        assert_eq!(parse_list(body), vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn key_values_first_colon_last_wins() {
        let body = "LinkedIn: https://linkedin.com/company/acme\nno colon here\nTwitter: @old\n- Twitter: @acme\n: orphan";
        let map = parse_key_values(body);
        assert_eq!(map.len(), 2);
        assert_eq!(map["LinkedIn"], "https://linkedin.com/company/acme");
        assert_eq!(map["Twitter"], "@acme");
    }

    #[test]
    fn free_text() {
        assert_eq!(parse_free_text("  hello\nworld \n").as_deref(), Some("hello\nworld"));
        assert_eq!(parse_free_text(" \n "), None);
    }

    #[test]
    fn tech_with_category() {
        let t = parse_tech_item("React (Frontend: marketing site)");
        assert_eq!(t.name, "React");
        assert_eq!(t.category, "Frontend");
        assert_eq!(t.notes.as_deref(), Some("marketing site"));
    }

    #[test]
    fn tech_without_category() {
        let t = parse_tech_item("Cloudflare (seen in response headers)");
        assert_eq!(t.category, "Unknown");
        assert_eq!(t.notes.as_deref(), Some("seen in response headers"));

        let bare = parse_tech_item("WordPress");
        assert_eq!(bare.name, "WordPress");
        assert_eq!(bare.category, "Unknown");
        assert_eq!(bare.notes, None);
    }

    #[test]
    fn pain_point_routing() {
        let items = vec![
            "Slow mobile load times".to_string(),
            "SEO Opportunity: missing meta descriptions".to_string(),
            "Big opportunity in automation".to_string(),
        ];
        let (pains, opps) = route_pain_points(&items);
        assert_eq!(pains.len(), 1);
        assert_eq!(pains[0].description, "Slow mobile load times");
        assert_eq!(opps.len(), 2);
        assert_eq!(opps[0].kind, "SEO Opportunity");
        assert_eq!(opps[0].description, "missing meta descriptions");
        assert_eq!(opps[1].kind, "General");
        assert_eq!(opps[1].description, "Big opportunity in automation");
    }

    #[test]
    fn person_with_email() {
        let p = parse_person("Jane Doe (CEO - jane@acme.io)");
        assert_eq!(p.name, "Jane Doe");
        assert_eq!(p.title, "CEO");
        assert_eq!(p.email.as_deref(), Some("jane@acme.io"));
        assert_eq!(p.notes, None);
    }

    #[test]
    fn person_without_email_keeps_parenthetical() {
        let p = parse_person("Dr. A (Founder & CEO) - Found on About page.");
        assert_eq!(p.name, "Dr. A");
        assert_eq!(p.title, "Founder & CEO");
        assert_eq!(p.email, None);
        assert_eq!(p.notes.as_deref(), Some("Founder & CEO - Found on About page."));
    }

    #[test]
    fn person_dash_without_at() {
        let p = parse_person("Sam (Head of Sales - Berlin office)");
        assert_eq!(p.title, "Head of Sales");
        assert_eq!(p.email, None);
        assert_eq!(p.notes.as_deref(), Some("Head of Sales - Berlin office"));
    }

    #[test]
    fn person_hyphenated_title() {
        let p = parse_person("Lee (Co-Founder - lee@acme.io)");
        assert_eq!(p.title, "Co-Founder");
        assert_eq!(p.email.as_deref(), Some("lee@acme.io"));

        let q = parse_person("Max (Co-Founder)");
        assert_eq!(q.title, "Co-Founder");
        assert_eq!(q.notes.as_deref(), Some("Co-Founder"));
    }

    #[test]
    fn person_name_only() {
        let p = parse_person("Alex Kim");
        assert_eq!(p.name, "Alex Kim");
        assert_eq!(p.title, "Unknown");
        assert_eq!(p.email, None);
    }
}
