use super::*;

#[test]
fn test_normalize_list_postgres_array() {
    assert_eq!(
        normalize_list("{Dry,\"Sensitive\", Oily}"),
        vec!["Dry", "Sensitive", "Oily"]
    );
}

#[test]
fn test_normalize_list_comma_string_and_blanks() {
    assert_eq!(normalize_list(" vegan , ,anti_aging,"), vec!["vegan", "anti_aging"]);
    assert!(normalize_list("").is_empty());
    assert!(normalize_list("{}").is_empty());
}

#[test]
fn test_normalize_list_json_array_string() {
    assert_eq!(normalize_list(r#"["a", " b "]"#), vec!["a", "b"]);
}

#[test]
fn test_raw_list_deserializes_both_shapes() {
    let list: RawList = serde_json::from_str(r#"["Dry","Oily"]"#).unwrap();
    assert_eq!(list.into_vec(), vec!["Dry", "Oily"]);

    let text: RawList = serde_json::from_str(r#""{Dry,Oily}""#).unwrap();
    assert_eq!(text.into_vec(), vec!["Dry", "Oily"]);
}

#[test]
fn test_raw_profile_accepts_storage_field_names() {
    let raw: RawProfile = serde_json::from_str(
        r#"{
            "customer_id": " c-1 ",
            "skin_type": "{normal}",
            "skin_concerns": ["antiaging", "Pores"],
            "preferred_tone": ["cool_summer"],
            "keywords": "vegan, vegan, glow"
        }"#,
    )
    .unwrap();

    let profile = CustomerProfile::from(raw);
    assert_eq!(profile.customer_id, "c-1");
    assert_eq!(profile.skin_types, vec!["Neutral"]);
    assert_eq!(profile.concerns, vec!["Anti-aging", "Pores"]);
    assert_eq!(profile.tone.as_deref(), Some("Cool_Summer"));
    assert_eq!(profile.keywords, vec!["vegan", "glow"]);
}

#[test]
fn test_normalized_is_idempotent() {
    let profile = CustomerProfile::new("c")
        .skin_types(["dry", "Normal", "neutral"])
        .concerns(["sensitive", "Sensitivity", "unknown-thing"])
        .tone(" warm_spring ")
        .normalized();

    assert_eq!(profile.skin_types, vec!["Dry", "Neutral"]);
    assert_eq!(profile.concerns, vec!["Sensitivity", "unknown-thing"]);
    assert_eq!(profile.tone.as_deref(), Some("Warm_Spring"));
    assert_eq!(profile.clone().normalized(), profile);
}

#[test]
fn test_display_terms() {
    let profile = CustomerProfile::new("c")
        .skin_types(["Combination"])
        .concerns(["Wrinkle", "Freckles"])
        .tone("Warm_Autumn");

    assert_eq!(profile.skin_type_terms(), vec!["복합성"]);
    assert_eq!(profile.concern_terms(), vec!["주름", "Freckles"]);
    assert_eq!(profile.tone_term().as_deref(), Some("웜톤 가을"));
}

#[test]
fn test_expand_keywords_adds_translations_once() {
    let expanded = expand_keywords(&["Anti_Aging", "vegan", "anti-aging"]);
    assert_eq!(
        expanded,
        vec!["Anti_Aging", "안티에이징", "주름", "탄력", "vegan", "비건", "anti-aging"]
    );
}

#[test]
fn test_expand_keywords_unknown_passthrough() {
    assert_eq!(expand_keywords(&["glow"]), vec!["glow"]);
    assert!(expand_keywords::<&str>(&[]).is_empty());
}

#[test]
fn test_keyword_key_strips_separators() {
    assert_eq!(vocab::keyword_key("Low-Irritation Care_x"), "lowirritationcarex");
}

#[test]
fn test_season_from_month_boundaries() {
    assert_eq!(Season::from_month(2), Season::Winter);
    assert_eq!(Season::from_month(3), Season::Spring);
    assert_eq!(Season::from_month(5), Season::Spring);
    assert_eq!(Season::from_month(6), Season::Summer);
    assert_eq!(Season::from_month(8), Season::Summer);
    assert_eq!(Season::from_month(9), Season::Fall);
    assert_eq!(Season::from_month(11), Season::Fall);
    assert_eq!(Season::from_month(12), Season::Winter);
    assert_eq!(Season::from_month(1), Season::Winter);
}

#[test]
fn test_priority_keywords_are_weather_keywords() {
    for season in [Season::Spring, Season::Summer, Season::Fall, Season::Winter] {
        for p in season.priority_keywords() {
            assert!(
                season.weather_keywords().contains(p),
                "{season}: {p} missing from weather keywords"
            );
        }
    }
}
