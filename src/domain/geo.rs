// Geographic primitives and antimeridian handling

/// A `[longitude, latitude]` pair in degrees.
pub type LonLat = [f64; 2];

/// Independent drawable paths; no path contains a longitude jump above 180°.
pub type PathSegmentSet = Vec<Vec<LonLat>>;

pub fn is_valid_coordinate(lon: f64, lat: f64) -> bool {
    lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat)
}

fn crosses_dateline(from: LonLat, to: LonLat) -> bool {
    (to[0] - from[0]).abs() > 180.0
}

/// Split a chronological point list wherever consecutive longitudes jump by more than 180°.
///
/// The point after the jump starts the new segment; it is never duplicated into the previous
/// one. Fewer than two points yield no segments at all.
pub fn split_on_dateline(points: &[LonLat]) -> PathSegmentSet {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = vec![points[0]];

    for pair in points.windows(2) {
        if crosses_dateline(pair[0], pair[1]) {
            segments.push(std::mem::take(&mut current));
        }
        current.push(pair[1]);
    }

    segments.push(current);
    segments
}

/// Two-point path from `from` to `to`, shifting `to` by ±360° when the pair straddles the
/// antimeridian so the short way round is drawn.
pub fn short_arc(from: LonLat, to: LonLat) -> Vec<LonLat> {
    let delta = to[0] - from[0];
    let lon = if delta > 180.0 {
        to[0] - 360.0
    } else if delta < -180.0 {
        to[0] + 360.0
    } else {
        to[0]
    };
    vec![from, [lon, to[1]]]
}
