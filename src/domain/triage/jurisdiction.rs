//! UK legal jurisdiction derived from a postcode.
//!
//! The postcode *area* (the leading letters) decides: `BT` is Northern
//! Ireland, the Scottish areas below are Scotland, everything else falls
//! back to England and Wales. Matching is on the whole area, so `GU`
//! (Guildford) never matches the Glasgow area `G`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

const NORTHERN_IRELAND_AREA: &str = "BT";

const SCOTLAND_AREAS: [&str; 16] = [
    "AB", "DD", "DG", "EH", "FK", "G", "HS", "IV", "KA", "KW", "KY", "ML", "PA", "PH", "TD", "ZE",
];

/// One of the three UK death-registration regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Jurisdiction {
    EnglandWales,
    Scotland,
    NorthernIreland,
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::EnglandWales => "england-wales",
            Jurisdiction::Scotland => "scotland",
            Jurisdiction::NorthernIreland => "northern-ireland",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Jurisdiction::EnglandWales => "England/Wales",
            Jurisdiction::Scotland => "Scotland",
            Jurisdiction::NorthernIreland => "Northern Ireland",
        }
    }

    /// Days allowed to register a death.
    pub fn registration_deadline_days(&self) -> u8 {
        match self {
            Jurisdiction::Scotland => 8,
            Jurisdiction::EnglandWales | Jurisdiction::NorthernIreland => 5,
        }
    }

    /// Name of the grant that authorises estate administration.
    pub fn probate_term(&self) -> &'static str {
        match self {
            Jurisdiction::Scotland => "Confirmation",
            Jurisdiction::EnglandWales | Jurisdiction::NorthernIreland => "Probate",
        }
    }

    /// Whether the Tell Us Once service is offered at registration.
    pub fn tell_us_once_available(&self) -> bool {
        !matches!(self, Jurisdiction::NorthernIreland)
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Jurisdiction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "england-wales" => Ok(Jurisdiction::EnglandWales),
            "scotland" => Ok(Jurisdiction::Scotland),
            "northern-ireland" => Ok(Jurisdiction::NorthernIreland),
            other => Err(ValidationError::invalid_format(
                "jurisdiction",
                format!("unknown jurisdiction '{}'", other),
            )),
        }
    }
}

/// Derives the jurisdiction for a postcode. Case and surrounding whitespace are ignored.
pub fn resolve_jurisdiction(postcode: &str) -> Jurisdiction {
    let normalized = postcode.trim().to_uppercase();
    let area: String = normalized
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    if area == NORTHERN_IRELAND_AREA {
        Jurisdiction::NorthernIreland
    } else if SCOTLAND_AREAS.contains(&area.as_str()) {
        Jurisdiction::Scotland
    } else {
        Jurisdiction::EnglandWales
    }
}
