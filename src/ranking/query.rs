use crate::profile::{CustomerProfile, vocab};

const MISSING: &str = "- 정보 없음";

/// Renders `tags` as `Tag(표시어)` where the vocabulary knows a display term.
fn with_display(tags: &[String], resolve: fn(&str) -> Option<vocab::Term>) -> Vec<String> {
    tags.iter()
        .map(|tag| match resolve(tag) {
            Some(term) if term.display != tag.as_str() => format!("{tag}({})", term.display),
            _ => tag.clone(),
        })
        .collect()
}

fn bullet(items: &[String]) -> String {
    if items.is_empty() {
        MISSING.to_string()
    } else {
        format!("- {}", items.join(", "))
    }
}

/// Query text embedded for coarse retrieval and paired with each product for re-ranking.
///
/// The keyword section comes first so truncation never drops it.
pub fn build_query(profile: &CustomerProfile) -> String {
    let keywords = profile.expanded_keywords();
    let skin_types = with_display(&profile.skin_types, vocab::skin_type);
    let concerns = with_display(&profile.concerns, vocab::concern);
    let tone = profile.tone_term();

    let keyword_line = if keywords.is_empty() {
        "- (없음)".to_string()
    } else {
        bullet(&keywords)
    };

    let emphasis = if keywords.is_empty() {
        "- 키워드 기반 우선 추천".to_string()
    } else {
        format!("- 핵심 키워드({})와 연관성이 높은 제품을 우선 추천", keywords.join(", "))
    };

    [
        "스킨케어 제품 추천 쿼리 (키워드 최우선)".to_string(),
        String::new(),
        "[중요 키워드]".to_string(),
        keyword_line,
        String::new(),
        "[피부타입]".to_string(),
        bullet(&skin_types),
        String::new(),
        "[피부고민]".to_string(),
        bullet(&concerns),
        String::new(),
        "[추구 톤]".to_string(),
        tone.map(|t| format!("- {t}")).unwrap_or_else(|| MISSING.to_string()),
        String::new(),
        "[평가 기준]".to_string(),
        emphasis,
    ]
    .join("\n")
}

/// Longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
