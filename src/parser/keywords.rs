use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// `Skills:` / `Keywords:` / `Technologies:` blocks, up to a blank line, the
/// next label line, or end of text.
static SKILLS_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\b(?:skills|keywords|technologies)\**[ \t]*:\**[ \t]*(.*?)(?:\n[ \t]*\n|\n[ \t]*(?:[-*•][ \t]+)?\**[A-Za-z][A-Za-z /&()'-]{0,40}\**[ \t]*:\**(?:[ \t]|\n|\z)|\z)",
    )
    .unwrap()
});
static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n,;•*]|\s+-\s+").unwrap());

/// Tech vocabulary scanned in title, description and requirements.
pub const TECH_TERMS: &[&str] = &[
    "Rust", "Python", "Java", "JavaScript", "TypeScript", "Golang", "Ruby", "PHP", "Kotlin",
    "Swift", "Scala", "Elixir", "SQL", "PostgreSQL", "MySQL", "SQLite", "MongoDB", "Redis",
    "Kafka", "RabbitMQ", "Elasticsearch", "AWS", "GCP", "Azure", "Docker", "Kubernetes",
    "Terraform", "Ansible", "React", "Angular", "Vue", "Svelte", "Node.js", "Django", "Flask",
    "FastAPI", "Rails", "Spring", "Spark", "Hadoop", "Airflow", "Snowflake", "GraphQL", "gRPC",
    "REST", "Linux", "Git", "CI/CD", "Machine Learning", "TensorFlow", "PyTorch", "LLM",
];

/// Word-bounded, case-sensitive alternation over [`TECH_TERMS`].
pub static TECH_PATTERN: LazyLock<String> = LazyLock::new(|| {
    let alts: Vec<String> = TECH_TERMS.iter().map(|t| regex::escape(t)).collect();
    format!(r"\b({})\b", alts.join("|"))
});

/// Sorted, de-duplicated keywords.
///
/// With `patterns`, every match of every pattern contributes its non-empty
/// capture groups (or the whole match when the pattern has no groups). Without
/// patterns, the `Skills:`-style blocks are split on line breaks, commas,
/// semicolons and bullets.
pub fn extract_keywords(text: &str, patterns: Option<&[&str]>) -> Vec<String> {
    collect_keywords(text, patterns).into_iter().collect()
}

pub fn collect_keywords(text: &str, patterns: Option<&[&str]>) -> BTreeSet<String> {
    match patterns {
        Some(patterns) => from_patterns(text, patterns),
        None => from_skills_blocks(text),
    }
}

fn from_patterns(text: &str, patterns: &[&str]) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for pattern in patterns {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                debug!(pattern, error = %e, "malformed keyword pattern, skipping");
                continue;
            }
        };
        for caps in re.captures_iter(text) {
            let groups: Vec<_> = if caps.len() > 1 {
                caps.iter().skip(1).flatten().collect()
            } else {
                caps.get(0).into_iter().collect()
            };
            for m in groups {
                let piece = m.as_str().trim();
                if !piece.is_empty() {
                    out.insert(piece.to_string());
                }
            }
        }
    }
    out
}

fn from_skills_blocks(text: &str) -> BTreeSet<String> {
    SKILLS_BLOCK_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .flat_map(|m| SPLIT_RE.split(m.as_str()))
        .map(|piece| piece.trim().trim_start_matches('-').trim())
        .filter(|piece| piece.chars().count() > 1)
        .map(str::to_string)
        .collect()
}
