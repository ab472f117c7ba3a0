use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Trade category a waitlist member declares at signup.
///
/// The set is closed; the serialized form is the display name
/// (`"General Contracting"`, `"HVAC"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    Plumbing,
    Electrical,
    #[serde(rename = "HVAC")]
    Hvac,
    Painting,
    Carpentry,
    Roofing,
    Handyman,
    #[serde(rename = "General Contracting")]
    GeneralContracting,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trade type: {0}")]
pub struct UnknownTradeType(pub String);

impl TradeType {
    /// Display order used by the signup form.
    pub const ALL: [TradeType; 9] = [
        TradeType::Plumbing,
        TradeType::Electrical,
        TradeType::Hvac,
        TradeType::Painting,
        TradeType::Carpentry,
        TradeType::Roofing,
        TradeType::Handyman,
        TradeType::GeneralContracting,
        TradeType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TradeType::Plumbing => "Plumbing",
            TradeType::Electrical => "Electrical",
            TradeType::Hvac => "HVAC",
            TradeType::Painting => "Painting",
            TradeType::Carpentry => "Carpentry",
            TradeType::Roofing => "Roofing",
            TradeType::Handyman => "Handyman",
            TradeType::GeneralContracting => "General Contracting",
            TradeType::Other => "Other",
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeType {
    type Err = UnknownTradeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TradeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTradeType(s.to_string()))
    }
}
