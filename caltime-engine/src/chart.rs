use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::aligner::AlignedGrid;
use crate::bucket::Granularity;
use crate::palette::Palette;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartSeries {
    pub label: String,
    /// Seconds per bucket, index-aligned with [`ChartPayload::labels`].
    pub data: Vec<u64>,
    #[cfg_attr(feature = "serde", serde(rename = "borderColor"))]
    pub color: String,
    pub fill: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartPayload {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
}

/// Turns an aligned grid into labeled, colored series.
///
/// `names` maps calendar identifiers to display labels; calendars missing
/// from it are labeled with their identifier.
#[must_use]
pub fn format(
    grid: AlignedGrid,
    names: &HashMap<String, String>,
    granularity: Granularity,
    palette: &Palette,
) -> ChartPayload {
    let labels = grid
        .dates
        .iter()
        .map(|date| granularity.label(*date))
        .collect();

    let datasets = grid
        .series
        .into_iter()
        .map(|series| {
            let label = names
                .get(&series.calendar_id)
                .cloned()
                .unwrap_or_else(|| series.calendar_id.clone());
            let color = palette.color_for(&series.calendar_id, &label).to_string();

            ChartSeries {
                label,
                data: series.durations,
                color,
                fill: false,
            }
        })
        .collect();

    ChartPayload { labels, datasets }
}
