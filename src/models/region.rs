//! Region model
//!
//! Users are only matched with partners from the same region. Regions are
//! continents; a user's starting region is inferred from the Telegram client
//! language.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::utils::errors::PartnerChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Africa,
    Asia,
    Europe,
    NorthAmerica,
    SouthAmerica,
    Oceania,
}

/// Full language tags are looked up first, then their primary subtag.
const LANGUAGE_REGIONS: &[(&str, Region)] = &[
    ("id", Region::Asia),
    ("ms", Region::Asia),
    ("zh", Region::Asia),
    ("ja", Region::Asia),
    ("en", Region::NorthAmerica),
    ("en-US", Region::NorthAmerica),
    ("en-GB", Region::Europe),
    ("es", Region::SouthAmerica),
    ("es-ES", Region::Europe),
    ("pt-BR", Region::SouthAmerica),
    ("fr", Region::Europe),
    ("de", Region::Europe),
    ("ru", Region::Europe),
];

impl Region {
    /// Every selectable region, in menu order
    pub const ALL: [Region; 6] = [
        Region::Africa,
        Region::Asia,
        Region::Europe,
        Region::NorthAmerica,
        Region::SouthAmerica,
        Region::Oceania,
    ];

    pub const DEFAULT: Region = Region::Europe;

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::NorthAmerica => "NorthAmerica",
            Region::SouthAmerica => "SouthAmerica",
            Region::Oceania => "Oceania",
        }
    }

    /// Comma separated list of region names for prompts
    pub fn options() -> String {
        Self::ALL
            .iter()
            .map(Region::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Infer a region from a Telegram `language_code` such as `en-GB` or `ru`.
pub fn infer_region(language_code: Option<&str>) -> Region {
    let code = match language_code.map(str::trim) {
        Some(code) if !code.is_empty() => code,
        _ => return Region::DEFAULT,
    };

    lookup_language(code)
        .or_else(|| code.split('-').next().and_then(lookup_language))
        .unwrap_or(Region::DEFAULT)
}

fn lookup_language(code: &str) -> Option<Region> {
    LANGUAGE_REGIONS
        .iter()
        .find(|(language, _)| *language == code)
        .map(|(_, region)| *region)
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = PartnerChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Region::ALL
            .iter()
            .copied()
            .find(|region| region.as_str() == name)
            .ok_or_else(|| PartnerChatError::InvalidInput(format!("Unknown region: {}", name)))
    }
}
