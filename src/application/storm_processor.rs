// Storm processing - Grouping, classification and track segment building
use crate::domain::category::{resolve_category, CategorySource};
use crate::domain::geo::{short_arc, split_on_dateline, LonLat};
use crate::domain::storm::{
    ClassifiedPositions, ColoredTrackSegment, ProcessedStorm, RawPosition, RenderableCone,
    SegmentKind, TrajectoryCone,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Partition positions by storm id, each group sorted by observation time.
///
/// Records without a storm id are discarded. Untimed records sort after timed ones, keeping
/// their relative input order.
pub fn group_by_storm(positions: &[RawPosition]) -> BTreeMap<String, Vec<RawPosition>> {
    let mut groups: BTreeMap<String, Vec<RawPosition>> = BTreeMap::new();

    for position in positions {
        let id = position.storm_id.trim();
        if id.is_empty() {
            continue;
        }
        groups.entry(id.to_string()).or_default().push(position.clone());
    }

    for timeline in groups.values_mut() {
        timeline.sort_by_key(|p| (p.timestamp_ms.is_none(), p.timestamp_ms));
    }

    groups
}

/// Split a time-ordered timeline into historical, current and forecast fixes.
///
/// Observed fixes need a timestamp to be placed on the timeline; untimed ones are skipped.
pub fn classify(ordered: &[RawPosition]) -> ClassifiedPositions {
    let (mut historical, untimed): (Vec<RawPosition>, Vec<RawPosition>) = ordered
        .iter()
        .filter(|p| !p.is_forecast())
        .cloned()
        .partition(|p| p.timestamp_ms.is_some());

    if let Some(first) = untimed.first() {
        debug!(
            storm_id = %first.storm_id,
            skipped = untimed.len(),
            "Skipping observed positions without a timestamp"
        );
    }

    let mut forecast: Vec<RawPosition> = ordered.iter().filter(|p| p.is_forecast()).cloned().collect();
    forecast.sort_by_key(|p| p.forecast_hour);

    let current = historical.pop();

    ClassifiedPositions {
        historical,
        current,
        forecast,
    }
}

/// Two-point colored segments for one storm's full timeline.
pub fn build_segments(
    ordered: &[RawPosition],
    storm_name: &str,
    storm_id: &str,
) -> Vec<ColoredTrackSegment> {
    segments_for(&classify(ordered), storm_name, storm_id)
}

fn segments_for(
    classified: &ClassifiedPositions,
    storm_name: &str,
    storm_id: &str,
) -> Vec<ColoredTrackSegment> {
    let Some(current) = &classified.current else {
        return Vec::new();
    };

    let segment = |from: &RawPosition, to: &RawPosition, source, kind| {
        ColoredTrackSegment::new(
            short_arc(from.position, to.position),
            resolve_category(from, source),
            storm_id,
            storm_name,
            kind,
        )
    };

    let mut segments = Vec::with_capacity(classified.historical.len() + classified.forecast.len());

    // Observed track, closing on the current fix
    let observed: Vec<&RawPosition> = classified
        .historical
        .iter()
        .chain(std::iter::once(current))
        .collect();
    for pair in observed.windows(2) {
        segments.push(segment(pair[0], pair[1], CategorySource::Direct, SegmentKind::Historical));
    }

    // Bridge from the current fix, colored by what is observed now
    if let Some(first) = classified.forecast.first() {
        segments.push(segment(current, first, CategorySource::Direct, SegmentKind::Forecast));
    }

    for pair in classified.forecast.windows(2) {
        segments.push(segment(&pair[0], &pair[1], CategorySource::Derived, SegmentKind::Forecast));
    }

    segments
}

/// Alternate forecast overlay built from the secondary feed, trusting its category field.
pub fn build_secondary_segments(forecast: &[RawPosition]) -> Vec<ColoredTrackSegment> {
    let mut segments = Vec::new();

    for (storm_id, mut timeline) in group_by_storm(forecast) {
        timeline.sort_by_key(|p| p.forecast_hour);

        for pair in timeline.windows(2) {
            segments.push(ColoredTrackSegment::new(
                short_arc(pair[0].position, pair[1].position),
                resolve_category(&pair[0], CategorySource::Direct),
                &storm_id,
                &pair[0].storm_name,
                SegmentKind::Forecast,
            ));
        }
    }

    segments
}

/// Flatten each cone's outer ring; cones without a usable ring are skipped.
pub fn assemble_cones(cones: &[TrajectoryCone]) -> Vec<RenderableCone> {
    cones
        .iter()
        .filter_map(|cone| {
            let ring = cone.rings.first()?;
            if ring.len() < 3 {
                return None;
            }
            Some(RenderableCone {
                storm_id: cone.storm_id.clone(),
                forecast_hour: cone.forecast_hour,
                polygon: ring.clone(),
            })
        })
        .collect()
}

/// Build one storm's aggregate; storms with no observed fix are not displayable.
pub fn process_storm(
    storm_id: &str,
    timeline: &[RawPosition],
    cones: &[RenderableCone],
) -> Option<ProcessedStorm> {
    let classified = classify(timeline);
    let current = classified.current.clone()?;

    let name = current.storm_name.clone();
    let colored_track_segments = segments_for(&classified, &name, storm_id);

    let historical_points: Vec<LonLat> = classified
        .historical
        .iter()
        .chain(std::iter::once(&current))
        .map(|p| p.position)
        .collect();
    let forecast_points: Vec<LonLat> = std::iter::once(&current)
        .chain(classified.forecast.iter())
        .map(|p| p.position)
        .collect();

    Some(ProcessedStorm {
        id: storm_id.to_string(),
        name,
        basin: current.basin.clone(),
        current_category: resolve_category(&current, CategorySource::Direct),
        historical_path: split_on_dateline(&historical_points),
        forecast_path: split_on_dateline(&forecast_points),
        colored_track_segments,
        cones: cones.iter().filter(|c| c.storm_id == storm_id).cloned().collect(),
        historical: classified.historical,
        current,
        forecast: classified.forecast,
    })
}

pub fn process_storms(positions: &[RawPosition], cones: &[RenderableCone]) -> Vec<ProcessedStorm> {
    group_by_storm(positions)
        .iter()
        .filter_map(|(id, timeline)| {
            let storm = process_storm(id, timeline, cones);
            if storm.is_none() {
                debug!(storm_id = %id, "Skipping storm without observed positions");
            }
            storm
        })
        .collect()
}
