/// Host part of a URL or bare domain, lower-cased, without `www.` or port.
pub fn extract_domain(url: &str) -> Option<String> {
    let url = url.trim();
    let host = url
        .split("//")
        .nth(1)
        .unwrap_or(url)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("");
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    let host = host.trim_start_matches("www.").trim_end_matches('.').to_lowercase();
    (host.contains('.') && !host.contains(char::is_whitespace)).then_some(host)
}

pub fn looks_like_url(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.")
}

pub fn classify_domain(domain: &str) -> Option<&'static str> {
    match domain {
        d if d.contains("linkedin.com") => Some("linkedin"),
        d if d.contains("twitter.com") || d == "x.com" => Some("twitter"),
        d if d.contains("facebook.com") => Some("facebook"),
        d if d.contains("crunchbase.com") => Some("crunchbase"),
        d if d.contains("github.com") => Some("github"),
        d if d.contains("youtube.com") => Some("youtube"),
        d if d.contains("instagram.com") => Some("instagram"),
        _ => None,
    }
}
