//! Closed enumerations: weed species, growth stages and treatment cost levels
//!
//! Every value parses from and displays as its human-readable name. Unknown
//! names are rejected with a [`ModelError`] instead of falling back to a
//! default.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Weed species the detector recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeedSpecies {
    #[serde(rename = "Carpetweed")]
    Carpetweed,
    #[serde(rename = "Cutleaf Groundcherry")]
    CutleafGroundcherry,
    #[serde(rename = "Eclipta")]
    Eclipta,
    #[serde(rename = "Goosegrass")]
    Goosegrass,
    #[serde(rename = "Morning Glory")]
    MorningGlory,
    #[serde(rename = "Palmer Amaranth")]
    PalmerAmaranth,
    #[serde(rename = "Prickly Sida")]
    PricklySida,
    #[serde(rename = "Purslane")]
    Purslane,
    #[serde(rename = "Ragweed")]
    Ragweed,
    #[serde(rename = "Sicklepod")]
    Sicklepod,
    #[serde(rename = "Spotted Spurge")]
    SpottedSpurge,
    #[serde(rename = "Waterhemp")]
    Waterhemp,
}

impl WeedSpecies {
    /// All species, in catalogue order
    pub const ALL: [Self; 12] = [
        Self::Carpetweed,
        Self::CutleafGroundcherry,
        Self::Eclipta,
        Self::Goosegrass,
        Self::MorningGlory,
        Self::PalmerAmaranth,
        Self::PricklySida,
        Self::Purslane,
        Self::Ragweed,
        Self::Sicklepod,
        Self::SpottedSpurge,
        Self::Waterhemp,
    ];

    /// Human-readable name
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Carpetweed => "Carpetweed",
            Self::CutleafGroundcherry => "Cutleaf Groundcherry",
            Self::Eclipta => "Eclipta",
            Self::Goosegrass => "Goosegrass",
            Self::MorningGlory => "Morning Glory",
            Self::PalmerAmaranth => "Palmer Amaranth",
            Self::PricklySida => "Prickly Sida",
            Self::Purslane => "Purslane",
            Self::Ragweed => "Ragweed",
            Self::Sicklepod => "Sicklepod",
            Self::SpottedSpurge => "Spotted Spurge",
            Self::Waterhemp => "Waterhemp",
        }
    }
}

impl Display for WeedSpecies {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeedSpecies {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|species| species.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownSpecies(s.to_string()))
    }
}

/// Growth stage, ordered from emergence to maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GrowthStage {
    #[serde(rename = "Seedling")]
    Seedling,
    #[serde(rename = "Early Vegetative")]
    EarlyVegetative,
    #[serde(rename = "Late Vegetative")]
    LateVegetative,
    #[serde(rename = "Early Budding")]
    EarlyBudding,
    #[serde(rename = "Late Budding")]
    LateBudding,
    #[serde(rename = "Early Flowering")]
    EarlyFlowering,
    #[serde(rename = "Late Flowering")]
    LateFlowering,
    #[serde(rename = "Early Maturity")]
    EarlyMaturity,
    #[serde(rename = "Late Maturity")]
    LateMaturity,
}

impl GrowthStage {
    /// All stages, in growth order
    pub const ALL: [Self; 9] = [
        Self::Seedling,
        Self::EarlyVegetative,
        Self::LateVegetative,
        Self::EarlyBudding,
        Self::LateBudding,
        Self::EarlyFlowering,
        Self::LateFlowering,
        Self::EarlyMaturity,
        Self::LateMaturity,
    ];

    /// Human-readable name
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Seedling => "Seedling",
            Self::EarlyVegetative => "Early Vegetative",
            Self::LateVegetative => "Late Vegetative",
            Self::EarlyBudding => "Early Budding",
            Self::LateBudding => "Late Budding",
            Self::EarlyFlowering => "Early Flowering",
            Self::LateFlowering => "Late Flowering",
            Self::EarlyMaturity => "Early Maturity",
            Self::LateMaturity => "Late Maturity",
        }
    }

    /// Zero-based position in the growth order
    #[inline]
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// The "Early" stages; a seedling is not one of them
    #[inline]
    #[must_use]
    pub const fn is_early(&self) -> bool {
        matches!(
            self,
            Self::EarlyVegetative
                | Self::EarlyBudding
                | Self::EarlyFlowering
                | Self::EarlyMaturity
        )
    }

    /// How hard a weed at this stage is to control
    #[inline]
    #[must_use]
    pub const fn control_outlook(&self) -> ControlOutlook {
        if self.is_early() {
            ControlOutlook::EarlyTreatment
        } else {
            ControlOutlook::Aggressive
        }
    }
}

impl Display for GrowthStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GrowthStage {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownGrowthStage(s.to_string()))
    }
}

/// Treatment guidance derived from a growth stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlOutlook {
    /// Easier to control; treat early
    EarlyTreatment,
    /// More difficult to control; treat aggressively
    Aggressive,
}

impl ControlOutlook {
    /// Advice sentence completing "<species> at <stage> stage ..."
    #[inline]
    #[must_use]
    pub const fn advice(&self) -> &'static str {
        match self {
            Self::EarlyTreatment => "is easier to control. Early treatment recommended.",
            Self::Aggressive => "is more difficult to control. Aggressive treatment required.",
        }
    }
}

/// Relative cost of a treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CostLevel {
    Low,
    Medium,
    High,
}

impl CostLevel {
    /// All levels, cheapest first
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Human-readable name
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Display for CostLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CostLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownCostLevel(s.to_string()))
    }
}
