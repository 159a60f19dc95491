//! Analysis result types
//!
//! Defines the contract between an analysis backend and presentation:
//! - Per-weed detections and treatment recommendations
//! - The ROI aggregate for the whole image
//! - [`AnalysisResult`] and its invariant check

use crate::error::ModelError;
use crate::image_ref::ImageReference;
use crate::taxonomy::{ControlOutlook, CostLevel, GrowthStage, WeedSpecies};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Axis-aligned box in source-image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create new bounding box
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box area in square pixels
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Centre point
    #[inline]
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn check(&self) -> Result<(), &'static str> {
        let all = [self.x, self.y, self.width, self.height];
        if all.iter().any(|v| !v.is_finite()) {
            return Err("non-finite coordinate");
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Err("negative origin");
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err("non-positive extent");
        }
        Ok(())
    }
}

/// One identified weed instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeedDetection {
    pub id: String,
    pub species: WeedSpecies,
    /// Detector confidence in [0, 1]
    pub confidence: f64,
    pub bounding_box: BoundingBox,
    pub growth_stage: GrowthStage,
}

impl WeedDetection {
    /// Confidence as a whole percentage
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// Control guidance for this weed's growth stage
    #[inline]
    #[must_use]
    pub fn control_outlook(&self) -> ControlOutlook {
        self.growth_stage.control_outlook()
    }
}

/// Treatment suggestion for one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub weed_species: WeedSpecies,
    pub method: String,
    pub description: String,
    /// Expected effectiveness in [0, 100]
    pub effectiveness: u8,
    pub cost_level: CostLevel,
}

/// Expected yield change, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldImpact {
    /// Expected loss if untreated (negative)
    pub without_treatment: f64,
    /// Expected gain if treated (positive)
    pub with_treatment: f64,
}

/// Cost/benefit figures for treating the whole image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiImpact {
    /// Treatment cost in currency units
    pub estimated_cost: f64,
    pub labor_hours: f64,
    pub yield_impact: YieldImpact,
    /// Baseline value of the affected crop
    pub market_value: f64,
}

impl RoiImpact {
    /// Losses avoided by treating now: market value times the untreated loss
    #[inline]
    #[must_use]
    pub fn potential_savings(&self) -> f64 {
        self.market_value * (self.yield_impact.without_treatment.abs() / 100.0)
    }

    fn check(&self) -> Result<(), ModelError> {
        let amounts = [
            ("estimatedCost", self.estimated_cost),
            ("laborHours", self.labor_hours),
            ("marketValue", self.market_value),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidAmount { field, value });
            }
        }

        let yields = [
            ("yieldImpact.withoutTreatment", self.yield_impact.without_treatment),
            ("yieldImpact.withTreatment", self.yield_impact.with_treatment),
        ];
        for (field, value) in yields {
            if !value.is_finite() {
                return Err(ModelError::InvalidAmount { field, value });
            }
        }
        Ok(())
    }
}

/// Everything produced by one analysis of one image
///
/// Immutable once produced; presentation receives it read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub original_image: ImageReference,
    /// Original image with detection overlays
    pub annotated_image: ImageReference,
    /// In detection order
    pub detections: Vec<WeedDetection>,
    pub recommendations: Vec<Recommendation>,
    pub roi_impact: RoiImpact,
}

impl AnalysisResult {
    /// Check every invariant of the result contract
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for detection in &self.detections {
            if !seen.insert(detection.id.as_str()) {
                return Err(ModelError::DuplicateId {
                    kind: "detection",
                    id: detection.id.clone(),
                });
            }
            if !(0.0..=1.0).contains(&detection.confidence) {
                return Err(ModelError::ConfidenceOutOfRange {
                    id: detection.id.clone(),
                    value: detection.confidence,
                });
            }
            detection
                .bounding_box
                .check()
                .map_err(|reason| ModelError::InvalidBoundingBox {
                    id: detection.id.clone(),
                    reason,
                })?;
        }

        let mut seen = HashSet::new();
        for rec in &self.recommendations {
            if !seen.insert(rec.id.as_str()) {
                return Err(ModelError::DuplicateId {
                    kind: "recommendation",
                    id: rec.id.clone(),
                });
            }
            if rec.effectiveness > 100 {
                return Err(ModelError::EffectivenessOutOfRange {
                    id: rec.id.clone(),
                    value: rec.effectiveness,
                });
            }
        }

        self.roi_impact.check()
    }

    /// Detected species, first-seen order, without repeats
    #[must_use]
    pub fn distinct_species(&self) -> Vec<WeedSpecies> {
        let mut species = Vec::new();
        for detection in &self.detections {
            if !species.contains(&detection.species) {
                species.push(detection.species);
            }
        }
        species
    }

    /// Recommendations targeting the given species
    pub fn recommendations_for(
        &self,
        species: WeedSpecies,
    ) -> impl Iterator<Item = &Recommendation> + '_ {
        self.recommendations
            .iter()
            .filter(move |rec| rec.weed_species == species)
    }
}
