//! Deterministic mock analysis
//!
//! Stands in for model inference until a real backend is attached. The
//! output depends only on the image reference it is given, and only to
//! fill the image fields.

use crate::image_ref::ImageReference;
use crate::result::{
    AnalysisResult, BoundingBox, Recommendation, RoiImpact, WeedDetection, YieldImpact,
};
use crate::taxonomy::{CostLevel, GrowthStage, WeedSpecies};

/// Build the fixed demo result for an image
///
/// Pure, total and synchronous. The annotated image is the original: no
/// overlay rendering happens here.
#[must_use]
pub fn build_mock_result(image: &ImageReference) -> AnalysisResult {
    AnalysisResult {
        original_image: image.clone(),
        annotated_image: image.clone(),
        detections: vec![
            detection(
                "1",
                WeedSpecies::PalmerAmaranth,
                0.92,
                BoundingBox::new(120.0, 80.0, 100.0, 150.0),
                GrowthStage::EarlyVegetative,
            ),
            detection(
                "2",
                WeedSpecies::Goosegrass,
                0.87,
                BoundingBox::new(320.0, 180.0, 80.0, 90.0),
                GrowthStage::Seedling,
            ),
            detection(
                "3",
                WeedSpecies::Ragweed,
                0.79,
                BoundingBox::new(220.0, 280.0, 110.0, 140.0),
                GrowthStage::EarlyBudding,
            ),
        ],
        recommendations: vec![
            recommendation(
                "1",
                WeedSpecies::PalmerAmaranth,
                "Glyphosate + Dicamba",
                "Apply post-emergence when weeds are 2-4 inches tall.",
                85,
                CostLevel::Medium,
            ),
            recommendation(
                "2",
                WeedSpecies::Goosegrass,
                "Pendimethalin",
                "Apply as a pre-emergent herbicide before weed germination.",
                92,
                CostLevel::Medium,
            ),
            recommendation(
                "3",
                WeedSpecies::Ragweed,
                "Atrazine",
                "Apply early post-emergence when ragweed is small.",
                80,
                CostLevel::Low,
            ),
        ],
        roi_impact: RoiImpact {
            estimated_cost: 42.50,
            labor_hours: 2.5,
            yield_impact: YieldImpact {
                without_treatment: -15.0,
                with_treatment: 7.0,
            },
            market_value: 1250.00,
        },
    }
}

fn detection(
    id: &str,
    species: WeedSpecies,
    confidence: f64,
    bounding_box: BoundingBox,
    growth_stage: GrowthStage,
) -> WeedDetection {
    WeedDetection {
        id: id.to_string(),
        species,
        confidence,
        bounding_box,
        growth_stage,
    }
}

fn recommendation(
    id: &str,
    weed_species: WeedSpecies,
    method: &str,
    description: &str,
    effectiveness: u8,
    cost_level: CostLevel,
) -> Recommendation {
    Recommendation {
        id: id.to_string(),
        weed_species,
        method: method.to_string(),
        description: description.to_string(),
        effectiveness,
        cost_level,
    }
}
