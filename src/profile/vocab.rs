//! Fixed attribute vocabularies and keyword translation tables.
//!
//! Each table row is `(alias, canonical, display)`. Lookups match any alias
//! case-insensitively; tags outside the vocabulary pass through trimmed.

/// A resolved vocabulary term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    /// Canonical English tag stored on the profile.
    pub canonical: &'static str,
    /// Korean display term used in query text and keyword matching.
    pub display: &'static str,
}

pub const SKIN_TYPES: &[(&str, &str, &str)] = &[
    ("sensitive", "Sensitive", "민감성"),
    ("dry", "Dry", "건성"),
    ("oily", "Oily", "지성"),
    ("combination", "Combination", "복합성"),
    ("neutral", "Neutral", "중성"),
    ("normal", "Neutral", "중성"),
];

pub const CONCERNS: &[(&str, &str, &str)] = &[
    ("pores", "Pores", "모공"),
    ("sebum", "Sebum", "피지"),
    ("acne", "Acne", "여드름"),
    ("redness", "Redness", "홍조"),
    ("dryness", "Dryness", "건조"),
    ("wrinkle", "Wrinkle", "주름"),
    ("elasticity", "Elasticity", "탄력"),
    ("dullness", "Dullness", "칙칙함"),
    ("anti-aging", "Anti-aging", "안티에이징"),
    ("antiaging", "Anti-aging", "안티에이징"),
    ("sensitive", "Sensitivity", "민감"),
    ("sensitivity", "Sensitivity", "민감"),
];

pub const TONES: &[(&str, &str, &str)] = &[
    ("cool_summer", "Cool_Summer", "쿨톤 여름"),
    ("cool_winter", "Cool_Winter", "쿨톤 겨울"),
    ("warm_spring", "Warm_Spring", "웜톤 봄"),
    ("warm_autumn", "Warm_Autumn", "웜톤 가을"),
    ("neutral", "Neutral", "뉴트럴"),
];

/// Keyword translations keyed by [`keyword_key`] form.
pub const KEYWORD_TRANSLATIONS: &[(&str, &[&str])] = &[
    ("antiaging", &["안티에이징", "주름", "탄력"]),
    ("vegan", &["비건"]),
    ("moisturizing", &["보습"]),
    ("moisture", &["보습"]),
    ("hydration", &["수분"]),
    ("hydrating", &["수분"]),
    ("whitening", &["미백"]),
    ("brightening", &["미백", "톤업"]),
    ("soothing", &["진정"]),
    ("calming", &["진정"]),
    ("sunscreen", &["선크림", "자외선"]),
    ("suncare", &["선크림", "자외선"]),
    ("cooling", &["쿨링"]),
    ("natural", &["천연", "자연유래"]),
    ("lowirritation", &["저자극"]),
    ("porecare", &["모공"]),
    ("sebumcontrol", &["피지"]),
    ("longlasting", &["지속력"]),
    ("coverage", &["커버력"]),
    ("nourishing", &["영양"]),
    ("firming", &["탄력"]),
];

fn lookup(table: &[(&str, &'static str, &'static str)], tag: &str) -> Option<Term> {
    let needle = tag.trim().to_lowercase();
    table
        .iter()
        .find(|(alias, _, _)| *alias == needle)
        .map(|&(_, canonical, display)| Term { canonical, display })
}

pub fn skin_type(tag: &str) -> Option<Term> {
    lookup(SKIN_TYPES, tag)
}

pub fn concern(tag: &str) -> Option<Term> {
    lookup(CONCERNS, tag)
}

pub fn tone(tag: &str) -> Option<Term> {
    lookup(TONES, tag)
}

/// Lowercases and strips `_`, `-` and spaces.
pub fn keyword_key(keyword: &str) -> String {
    keyword
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .collect()
}

/// Returns the translated variants registered for `keyword`.
pub fn translations(keyword: &str) -> &'static [&'static str] {
    let key = keyword_key(keyword);
    KEYWORD_TRANSLATIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(&[])
}

/// Expands keywords with their translations, keeping first occurrences.
///
/// Originals are kept trimmed (case preserved) ahead of their translations.
pub fn expand_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len() * 2);
    let mut push = |value: &str| {
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    };

    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        push(keyword);
        for translated in translations(keyword) {
            push(translated);
        }
    }

    out
}
