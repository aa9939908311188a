//! Marketer intent labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a message is being sent. Controls ranking tie-breaks and prompt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Regular,
    Promotional,
    Weather,
    Launch,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown intent '{value}'")]
pub struct IntentParseError {
    pub value: String,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Regular => "regular",
            Intent::Promotional => "promotional",
            Intent::Weather => "weather",
            Intent::Launch => "launch",
        }
    }

    /// Prompt-facing description of the campaign type.
    pub fn description(&self) -> &'static str {
        match self {
            Intent::Regular => "일반적인 앱 푸시 마케팅 (Daily Refresh)",
            Intent::Promotional => "할인 이벤트나 증정 행사 마케팅 (Promotional)",
            Intent::Weather => "계절 및 날씨 요인에 맞춘 마케팅 (Seasonal)",
            Intent::Launch => "신제품 출시 홍보 (Launch)",
        }
    }

    pub fn is_weather(&self) -> bool {
        matches!(self, Intent::Weather)
    }
}

impl FromStr for Intent {
    type Err = IntentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        match label.to_lowercase().as_str() {
            "regular" | "일반홍보" => Ok(Intent::Regular),
            "promotional" | "promotion" | "event" | "events" | "할인행사" | "이벤트"
            | "프로모션" => Ok(Intent::Promotional),
            "weather" | "날씨" => Ok(Intent::Weather),
            "launch" | "신제품" => Ok(Intent::Launch),
            _ => Err(IntentParseError {
                value: label.to_string(),
            }),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_english_and_korean_labels() {
        assert_eq!("regular".parse::<Intent>().unwrap(), Intent::Regular);
        assert_eq!(" Events ".parse::<Intent>().unwrap(), Intent::Promotional);
        assert_eq!("할인행사".parse::<Intent>().unwrap(), Intent::Promotional);
        assert_eq!("날씨".parse::<Intent>().unwrap(), Intent::Weather);
        assert_eq!("신제품".parse::<Intent>().unwrap(), Intent::Launch);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "flash-sale".parse::<Intent>().unwrap_err();
        assert_eq!(err.value, "flash-sale");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for intent in [
            Intent::Regular,
            Intent::Promotional,
            Intent::Weather,
            Intent::Launch,
        ] {
            assert_eq!(intent.to_string().parse::<Intent>().unwrap(), intent);
        }
    }
}
