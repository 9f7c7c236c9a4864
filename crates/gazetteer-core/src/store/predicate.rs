// crates/gazetteer-core/src/store/predicate.rs

//! Typed predicates understood by [`crate::traits::GeoStore::select`].

use crate::model::GeoRecord;
use regex::Regex;

/// Smallest string greater than every string starting with `prefix`.
///
/// `increment("cant") == "canu"`, so `cant*` becomes
/// `name >= "cant" AND name < "canu"`.
pub fn increment(prefix: &str) -> String {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = char::from_u32(last as u32 + 1) {
            chars.push(next);
            return chars.into_iter().collect();
        }
    }
    String::new()
}

/// An anchored glob where `*` matches any run of characters.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    literal_prefix: String,
    regex: Regex,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Option<Self> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^{body}$")).ok()?;
        let literal_prefix = pattern.split('*').next().unwrap_or_default().to_string();
        Some(Self {
            source: pattern.to_string(),
            literal_prefix,
            regex,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Text before the first `*`; may be empty.
    pub fn literal_prefix(&self) -> &str {
        &self.literal_prefix
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// How a text column is matched.
#[derive(Debug, Clone)]
pub enum TextMatch {
    Exact(String),
    /// `lo <= value < hi`.
    Range { lo: String, hi: String },
    Pattern(WildcardPattern),
    Contains(String),
    /// Some whitespace-separated word of the value starts with this.
    WordPrefix(String),
}

impl TextMatch {
    /// Half-open range covering every value that starts with `prefix`.
    pub fn prefix(prefix: &str) -> Self {
        Self::Range {
            lo: prefix.to_string(),
            hi: increment(prefix),
        }
    }

    /// Translates user text: no `*` is exact, a single trailing `*` is a
    /// range scan, anything else an anchored pattern.
    pub fn from_wildcard(text: &str) -> Self {
        match text.find('*') {
            None => Self::Exact(text.to_string()),
            Some(pos) if pos == text.len() - 1 && pos > 0 => Self::prefix(&text[..pos]),
            Some(_) => match WildcardPattern::new(text) {
                Some(p) => Self::Pattern(p),
                None => Self::Exact(text.replace('*', "")),
            },
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(v) => value == v,
            Self::Range { lo, hi } => value >= lo.as_str() && (hi.is_empty() || value < hi.as_str()),
            Self::Pattern(p) => p.is_match(value),
            Self::Contains(v) => value.contains(v.as_str()),
            Self::WordPrefix(v) => value.split_whitespace().any(|w| w.starts_with(v.as_str())),
        }
    }
}

/// Conjunction of column constraints. Unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    pub name: Option<TextMatch>,
    pub phonetic_key: Option<TextMatch>,
    pub country_iso: Option<String>,
    pub admin1_id: Option<String>,
    pub admin2_id: Option<String>,
    pub feature: Option<TextMatch>,
    pub geoid: Option<String>,
}

fn known(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, m: TextMatch) -> Self {
        self.name = Some(m);
        self
    }

    pub fn phonetic_key(mut self, m: TextMatch) -> Self {
        self.phonetic_key = Some(m);
        self
    }

    /// Narrows by country; an empty `iso` leaves the predicate unchanged.
    pub fn country(mut self, iso: &str) -> Self {
        self.country_iso = known(iso);
        self
    }

    pub fn admin1(mut self, id: &str) -> Self {
        self.admin1_id = known(id);
        self
    }

    pub fn admin2(mut self, id: &str) -> Self {
        self.admin2_id = known(id);
        self
    }

    /// Feature filter; `*` in `code` is honoured (`PP*`).
    pub fn feature(mut self, code: &str) -> Self {
        self.feature = (!code.is_empty()).then(|| TextMatch::from_wildcard(code));
        self
    }

    pub fn geoid(mut self, geoid: &str) -> Self {
        self.geoid = known(geoid);
        self
    }

    pub fn matches(&self, r: &GeoRecord) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref().map_or(true, |w| w == have)
        }
        fn text(want: &Option<TextMatch>, have: &str) -> bool {
            want.as_ref().map_or(true, |m| m.matches(have))
        }
        eq(&self.geoid, &r.geoid)
            && eq(&self.country_iso, &r.country_iso)
            && eq(&self.admin1_id, &r.admin1_id)
            && eq(&self.admin2_id, &r.admin2_id)
            && text(&self.feature, r.feature_code.as_str())
            && text(&self.name, &r.name)
            && text(&self.phonetic_key, &r.phonetic_key)
    }
}
