use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Meteorological season used by weather-intent ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Months 3-5 spring, 6-8 summer, 9-11 fall, everything else winter.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    /// Season of the local calendar date.
    pub fn current() -> Self {
        Self::from_month(chrono::Local::now().month())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }

    /// Keywords appended to the user's set under weather intent.
    pub fn weather_keywords(&self) -> &'static [&'static str] {
        match self {
            Season::Spring => &["진정", "미세먼지", "보습", "각질", "톤업", "산뜻"],
            Season::Summer => &["쿨링", "선크림", "자외선", "피지", "산뜻", "수분"],
            Season::Fall => &["보습", "건조", "탄력", "영양", "각질"],
            Season::Winter => &["보습", "건조", "영양", "장벽", "고보습"],
        }
    }

    /// Subset of [`Season::weather_keywords`] that counts double.
    pub fn priority_keywords(&self) -> &'static [&'static str] {
        match self {
            Season::Spring => &["진정", "미세먼지"],
            Season::Summer => &["쿨링", "선크림", "자외선"],
            Season::Fall => &["보습", "영양"],
            Season::Winter => &["보습", "장벽"],
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
