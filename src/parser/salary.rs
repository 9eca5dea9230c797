//! Salary expressions → numeric range plus a display string.
//!
//! Forms are tried in a fixed order and the first match wins:
//! range with a dash, range with "to", `$X+`, `Up to $X`, a lone `$X`, and
//! finally the verbatim `Salary:` line (or "Competitive"). `$X+` directly
//! after "up to" counts as `Up to $X`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const AMOUNT: &str = r"\$\s*(\d[\d,]*(?:\.\d+)?)\s*([kK]\b)?";
const BOUND: &str = r"\$?\s*(\d[\d,]*(?:\.\d+)?)\s*([kK]\b)?";

static DASH_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{AMOUNT}\s*[-–—]\s*{BOUND}")).unwrap());
static TO_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i){AMOUNT}\s+to\s+{BOUND}")).unwrap());
static OPEN_MIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{AMOUNT}\s*\+")).unwrap());
static OPEN_MAX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:up\s+to|maximum|max\.?)\s*:?\s*{AMOUNT}")).unwrap()
});
static SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(AMOUNT).unwrap());
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:[-*•][ \t]+)?\**(?:salary(?: range)?|compensation|pay range)\**[ \t]*:\**[ \t]*(.*)$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Salary {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub display: Option<String>,
}

impl Salary {
    /// Display text was kept as written because nothing numeric parsed.
    pub fn is_verbatim(&self) -> bool {
        self.display.is_some() && self.min.is_none() && self.max.is_none()
    }
}

/// The whole `Salary:` line (label included), if the text has one.
pub fn salary_line(text: &str) -> Option<String> {
    LABEL_RE.find(text).map(|m| m.as_str().trim().to_string())
}

pub fn normalize_salary(text: &str) -> Salary {
    if let Some(c) = DASH_RANGE_RE
        .captures(text)
        .or_else(|| TO_RANGE_RE.captures(text))
    {
        let upper_k = c.get(4).is_some();
        let mut min = amount(&c[1], c.get(2).is_some());
        let max = amount(&c[3], upper_k);
        // "$100-120k": the unit on the upper bound carries to a bare lower bound.
        if upper_k && c.get(2).is_none() {
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo < 1000 && lo * 1000 <= hi {
                    min = Some(lo * 1000);
                }
            }
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            return Salary {
                min,
                max,
                display: Some(format!("{} - {}", dollars(lo), dollars(hi))),
            };
        }
    }

    let open_max = OPEN_MAX_RE.captures(text);
    if let Some(c) = OPEN_MIN_RE.captures(text) {
        // "Up to $120k+" is still a ceiling.
        let ceiling = open_max.as_ref().and_then(|m| m.get(1)).map(|m| m.start())
            == c.get(1).map(|m| m.start());
        if let Some(lo) = amount(&c[1], c.get(2).is_some()).filter(|_| !ceiling) {
            return Salary {
                min: Some(lo),
                max: None,
                display: Some(format!("{}+", dollars(lo))),
            };
        }
    }

    if let Some(c) = open_max {
        if let Some(hi) = amount(&c[1], c.get(2).is_some()) {
            return Salary {
                min: None,
                max: Some(hi),
                display: Some(format!("Up to {}", dollars(hi))),
            };
        }
    }

    if let Some(c) = SINGLE_RE.captures(text) {
        if let Some(v) = amount(&c[1], c.get(2).is_some()) {
            return Salary {
                min: Some(v),
                max: Some(v),
                display: Some(dollars(v)),
            };
        }
    }

    let display = if text.to_lowercase().contains("competitive") {
        Some("Competitive".to_string())
    } else {
        LABEL_RE
            .captures(text)
            .map(|c| c[1].trim().to_string())
            .filter(|s| !s.is_empty())
    };
    Salary {
        min: None,
        max: None,
        display,
    }
}

/// `"120,000"` / `"85.5"` + k → whole dollars.
fn amount(digits: &str, thousands: bool) -> Option<u64> {
    let cleaned = digits.replace(',', "");
    let mut value: f64 = cleaned.parse().ok()?;
    if thousands {
        value *= 1000.0;
    }
    (value.is_finite() && value >= 0.0 && value < u64::MAX as f64).then(|| value.round() as u64)
}

/// `120000` → `"$120,000"`.
pub fn dollars(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
