use super::*;
use std::collections::HashSet;

fn profile() -> CustomerProfile {
    CustomerProfile::new("c-1")
        .name("김아모레")
        .skin_types(["Dry", "Sensitive"])
        .concerns(["Wrinkle", "Pores"])
        .tone("Cool_Summer")
        .keywords(["vegan", "anti_aging"])
}

fn input(profile: &CustomerProfile) -> SignatureInput<'_> {
    SignatureInput {
        brand: "Laneige",
        persona: "2",
        intent: Intent::Regular,
        weather: "",
        product_name: "Water Sleeping Mask",
        channel: Channel::AppPush,
        profile,
    }
}

#[test]
fn test_signature_deterministic() {
    let p = profile();
    assert_eq!(signature(&input(&p)), signature(&input(&p)));
}

#[test]
fn test_signature_invariant_under_list_reordering() {
    let a = profile();
    let b = CustomerProfile::new("someone-else")
        .name("다른 고객")
        .skin_types(["Sensitive", "Dry"])
        .concerns(["Pores", "Wrinkle"])
        .tone("Cool_Summer")
        .keywords(["anti_aging", "vegan"]);

    assert_eq!(signature(&input(&a)), signature(&input(&b)));
}

#[test]
fn test_signature_changes_with_each_scalar_field() {
    let p = profile();
    let base = signature(&input(&p));

    let variants = [
        SignatureInput {
            brand: "Hera",
            ..input(&p)
        },
        SignatureInput {
            persona: "3",
            ..input(&p)
        },
        SignatureInput {
            intent: Intent::Promotional,
            ..input(&p)
        },
        SignatureInput {
            product_name: "Lip Sleeping Mask",
            ..input(&p)
        },
        SignatureInput {
            channel: Channel::Sms,
            ..input(&p)
        },
    ];

    let mut seen = HashSet::new();
    seen.insert(base);
    for v in &variants {
        assert!(seen.insert(signature(v)), "collision for {v:?}");
    }
}

#[test]
fn test_weather_only_counts_for_weather_intent() {
    let p = profile();
    let regular_sunny = SignatureInput {
        weather: "sunny",
        ..input(&p)
    };
    assert_eq!(signature(&regular_sunny), signature(&input(&p)));

    let weather_sunny = SignatureInput {
        intent: Intent::Weather,
        weather: "sunny",
        ..input(&p)
    };
    let weather_rain = SignatureInput {
        intent: Intent::Weather,
        weather: "rain",
        ..input(&p)
    };
    assert_ne!(signature(&weather_sunny), signature(&weather_rain));
}

#[test]
fn test_profile_list_changes_change_signature() {
    let a = profile();
    let b = profile().keywords(["vegan"]);
    let c = profile().tone("Warm_Spring");

    assert_ne!(signature(&input(&a)), signature(&input(&b)));
    assert_ne!(signature(&input(&a)), signature(&input(&c)));
}

#[test]
fn test_separators_in_values_do_not_collide() {
    let p = CustomerProfile::new("c").keywords(["a,b"]);
    let q = CustomerProfile::new("c").keywords(["a", "b"]);
    assert_ne!(signature(&input(&p)), signature(&input(&q)));

    let p = profile();
    let left = SignatureInput {
        brand: "A|B",
        persona: "C",
        ..input(&p)
    };
    let right = SignatureInput {
        brand: "A",
        persona: "B|C",
        ..input(&p)
    };
    assert_ne!(signature(&left), signature(&right));
}

#[test]
fn test_canonical_profile_rendering() {
    let p = profile();
    assert_eq!(
        canonical_profile(&p),
        "skin=Dry,Sensitive;concerns=Pores,Wrinkle;keywords=anti_aging,vegan;tone=Cool_Summer"
    );

    let empty = CustomerProfile::new("c");
    assert_eq!(canonical_profile(&empty), "skin=;concerns=;keywords=;tone=");
}

#[test]
fn test_hex_round_trip_and_serde() {
    let p = profile();
    let sig = signature(&input(&p));
    let hex = sig.to_hex();

    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    assert_eq!(hex.parse::<Signature>().unwrap(), sig);

    let json = serde_json::to_string(&sig).unwrap();
    assert_eq!(json, format!("\"{hex}\""));
    let back: Signature = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sig);
}

#[test]
fn test_parse_rejects_bad_hex() {
    assert!("xyz".parse::<Signature>().is_err());
    assert!("ab".repeat(31).parse::<Signature>().is_err());
}

#[test]
fn test_hash_parts_to_u64_deterministic_and_separated() {
    assert_eq!(
        hash_parts_to_u64(&["Hera", "SMS"]),
        hash_parts_to_u64(&["Hera", "SMS"])
    );
    assert_ne!(
        hash_parts_to_u64(&["Hera", "SMS"]),
        hash_parts_to_u64(&["HeraSMS"])
    );
}
