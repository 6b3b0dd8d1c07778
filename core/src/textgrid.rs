//! Praat TextGrid file export.
//!
//! Maps an [`AnnotationDocument`] onto the `textgrid` crate's structures
//! and writes a Praat-compatible file. The builder guarantees the tier
//! invariants, so the mapping is a straight copy with no repair pass.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use textgrid::{Interval, TextGrid, Tier, TierType};

use crate::annotation::AnnotationDocument;

/// Convert an annotation document into a Praat TextGrid structure.
pub fn to_textgrid(document: &AnnotationDocument) -> Result<TextGrid> {
    let mut grid = TextGrid::new(0.0, document.duration)
        .map_err(|err| anyhow!("failed to build TextGrid structure: {err}"))?;

    for tier in &document.tiers {
        let intervals = tier
            .intervals
            .iter()
            .map(|interval| Interval {
                xmin: interval.start,
                xmax: interval.end,
                text: interval.label.clone(),
            })
            .collect();

        grid.add_tier(Tier {
            name: tier.name.clone(),
            tier_type: TierType::IntervalTier,
            xmin: 0.0,
            xmax: document.duration,
            intervals,
            points: Vec::new(),
        })
        .map_err(|err| anyhow!("failed to add tier '{}': {err}", tier.name))?;
    }

    Ok(grid)
}

/// Write the document to `path` in long TextGrid format, creating parent
/// directories as needed.
pub fn write_textgrid(document: &AnnotationDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }

    let grid = to_textgrid(document)?;
    grid.to_file(path, false)
        .map_err(|err| anyhow!("failed to write TextGrid '{}': {err}", path.display()))?;

    Ok(())
}
