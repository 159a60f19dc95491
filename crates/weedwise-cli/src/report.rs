//! Plain-text rendering of analysis results

use std::fmt::{self, Display, Formatter};
use weedwise_core::Notice;
use weedwise_model::AnalysisResult;

/// Human-readable report for one analysis
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a> {
    result: &'a AnalysisResult,
}

impl<'a> TextReport<'a> {
    #[must_use]
    pub fn new(result: &'a AnalysisResult) -> Self {
        Self { result }
    }
}

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let result = self.result;

        writeln!(f, "=== WeedWise Analysis Report ===")?;
        writeln!(f)?;
        writeln!(f, "Detected Weeds: {}", result.detections.len())?;
        for (i, detection) in result.detections.iter().enumerate() {
            let bbox = &detection.bounding_box;
            writeln!(
                f,
                "{}. {} ({}% confidence)",
                i + 1,
                detection.species,
                detection.confidence_percent()
            )?;
            writeln!(
                f,
                "   {} at {} stage {}",
                detection.species,
                detection.growth_stage,
                detection.control_outlook().advice()
            )?;
            writeln!(
                f,
                "   Location: x={}, y={}, {}x{}",
                bbox.x, bbox.y, bbox.width, bbox.height
            )?;
        }

        writeln!(f)?;
        writeln!(f, "=== Treatment Recommendations ===")?;
        for (i, rec) in result.recommendations.iter().enumerate() {
            writeln!(f, "{}. {} [{} Cost]", i + 1, rec.method, rec.cost_level)?;
            writeln!(f, "   Target: {}", rec.weed_species)?;
            writeln!(f, "   Effectiveness: {}%", rec.effectiveness)?;
            writeln!(f, "   {}", rec.description)?;
        }

        let roi = &result.roi_impact;
        writeln!(f)?;
        writeln!(f, "=== ROI Impact Analysis ===")?;
        writeln!(f, "Estimated Treatment Cost: ${:.2}", roi.estimated_cost)?;
        writeln!(f, "Required Labor Hours: {}", roi.labor_hours)?;
        writeln!(f, "Market Value: ${:.2}", roi.market_value)?;
        writeln!(
            f,
            "Yield Impact: {}% without treatment, {:+}% with treatment",
            roi.yield_impact.without_treatment, roi.yield_impact.with_treatment
        )?;
        writeln!(
            f,
            "Early treatment provides the best ROI. Treating now could save ${:.2} in potential losses.",
            roi.potential_savings()
        )
    }
}

/// One-line rendering of a notice
#[must_use]
pub fn notice_line(notice: &Notice) -> String {
    format!("{}: {}", notice.title, notice.description)
}
