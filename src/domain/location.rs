use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Subject of a lookup. Immutable once handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

const STATE_FIPS: [(&str, &str); 51] = [
    ("AL", "01"),
    ("AK", "02"),
    ("AZ", "04"),
    ("AR", "05"),
    ("CA", "06"),
    ("CO", "08"),
    ("CT", "09"),
    ("DE", "10"),
    ("DC", "11"),
    ("FL", "12"),
    ("GA", "13"),
    ("HI", "15"),
    ("ID", "16"),
    ("IL", "17"),
    ("IN", "18"),
    ("IA", "19"),
    ("KS", "20"),
    ("KY", "21"),
    ("LA", "22"),
    ("ME", "23"),
    ("MD", "24"),
    ("MA", "25"),
    ("MI", "26"),
    ("MN", "27"),
    ("MS", "28"),
    ("MO", "29"),
    ("MT", "30"),
    ("NE", "31"),
    ("NV", "32"),
    ("NH", "33"),
    ("NJ", "34"),
    ("NM", "35"),
    ("NY", "36"),
    ("NC", "37"),
    ("ND", "38"),
    ("OH", "39"),
    ("OK", "40"),
    ("OR", "41"),
    ("PA", "42"),
    ("RI", "44"),
    ("SC", "45"),
    ("SD", "46"),
    ("TN", "47"),
    ("TX", "48"),
    ("UT", "49"),
    ("VT", "50"),
    ("VA", "51"),
    ("WA", "53"),
    ("WV", "54"),
    ("WI", "55"),
    ("WY", "56"),
];

// 州碼必須是大寫，且前面有逗號，或後面接 ZIP
fn tail_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:,\s*([A-Z]{2})(?:\s+(\d{5})(?:-\d{4})?)?|\s([A-Z]{2})\s+(\d{5})(?:-\d{4})?)\s*(?:,\s*(?i:usa|united states))?\s*$",
        )
        .ok()
    })
    .as_ref()
}

fn trailing_zip_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[\s,])(\d{5})(?:-\d{4})?\s*(?:,\s*(?i:usa|united states))?\s*$").ok()
    })
    .as_ref()
}

/// 州縮寫轉 FIPS 代碼
pub fn fips_for_state(abbr: &str) -> Option<&'static str> {
    let upper = abbr.to_ascii_uppercase();
    STATE_FIPS
        .iter()
        .find(|(state, _)| *state == upper)
        .map(|(_, fips)| *fips)
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
        }
    }

    /// Two-letter state code at the end of the address (`, WA` or `WA 98109`), if it is a known state.
    pub fn state_abbr(&self) -> Option<String> {
        let caps = tail_regex()?.captures(self.address.trim())?;
        let abbr = caps.get(1).or_else(|| caps.get(3))?.as_str().to_string();
        fips_for_state(&abbr).map(|_| abbr)
    }

    /// Five-digit ZIP at the end of the address (ZIP+4 suffix dropped). House numbers never count.
    pub fn zip_code(&self) -> Option<String> {
        let address = self.address.trim();
        let from_tail = tail_regex()?
            .captures(address)
            .and_then(|caps| caps.get(2).or_else(|| caps.get(4)));
        from_tail
            .or_else(|| trailing_zip_regex()?.captures(address)?.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn state_fips(&self) -> Option<&'static str> {
        self.state_abbr().and_then(|abbr| fips_for_state(&abbr))
    }
}
