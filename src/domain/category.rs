// Saffir-Simpson category resolution and styling tables
use super::storm::RawPosition;
use serde::Serialize;

/// Saffir-Simpson category, 0 (tropical storm) through 5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Category(u8);

const CATEGORY_COLORS: [[u8; 4]; 6] = [
    [0, 160, 255, 230],
    [255, 255, 0, 230],
    [255, 204, 0, 230],
    [255, 136, 0, 230],
    [255, 51, 0, 230],
    [204, 0, 204, 230],
];

const CATEGORY_RADII: [f32; 6] = [6.0, 8.0, 10.0, 12.0, 14.0, 16.0];

// Lower bounds in knots for categories 5 down to 1.
const WIND_THRESHOLDS: [(f64, u8); 5] = [(137.0, 5), (113.0, 4), (96.0, 3), (83.0, 2), (64.0, 1)];

impl Category {
    pub const TROPICAL_STORM: Category = Category(0);
    pub const MAX: Category = Category(5);

    /// Clamp a reported category into 0..=5, flooring fractional values.
    pub fn from_reported(value: f64) -> Self {
        if !value.is_finite() {
            return Self::TROPICAL_STORM;
        }
        Category(value.floor().clamp(0.0, f64::from(Self::MAX.0)) as u8)
    }

    pub fn from_wind_knots(knots: f64) -> Self {
        WIND_THRESHOLDS
            .iter()
            .find(|(threshold, _)| knots >= *threshold)
            .map(|(_, category)| Category(*category))
            .unwrap_or(Self::TROPICAL_STORM)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn color(self) -> [u8; 4] {
        CATEGORY_COLORS[self.0 as usize]
    }

    pub fn dot_radius(self) -> f32 {
        CATEGORY_RADII[self.0 as usize]
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Tropical Storm",
            1 => "Category 1",
            2 => "Category 2",
            3 => "Category 3",
            4 => "Category 4",
            _ => "Category 5",
        }
    }
}

/// Which intensity basis to trust for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySource {
    /// Observed fixes: the reported category field.
    Direct,
    /// Forecast fixes: wind speed, falling back to the reported category when no wind is given.
    Derived,
}

impl CategorySource {
    pub fn for_position(position: &RawPosition) -> Self {
        if position.is_forecast() {
            CategorySource::Derived
        } else {
            CategorySource::Direct
        }
    }
}

/// Forecast records carry reliable wind but a mostly-zero category; observed records are the
/// reverse. Every caller that colors or sizes a position goes through here.
pub fn resolve_category(position: &RawPosition, source: CategorySource) -> Category {
    let reported = || position.category.map(Category::from_reported).unwrap_or_default();

    match source {
        CategorySource::Direct => reported(),
        CategorySource::Derived => match position.wind_knots {
            Some(knots) if knots > 0.0 => Category::from_wind_knots(knots),
            _ => reported(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(category: Option<f64>, wind: Option<f64>, forecast_hour: u32) -> RawPosition {
        RawPosition {
            storm_id: "AL052024".to_string(),
            storm_name: "ERNESTO".to_string(),
            basin: "AL".to_string(),
            position: [-65.0, 20.0],
            category,
            wind_knots: wind,
            pressure_mb: None,
            forecast_hour,
            timestamp_ms: Some(0),
        }
    }

    #[test]
    fn test_wind_threshold_boundaries() {
        assert_eq!(Category::from_wind_knots(137.0).value(), 5);
        assert_eq!(Category::from_wind_knots(113.0).value(), 4);
        assert_eq!(Category::from_wind_knots(96.0).value(), 3);
        assert_eq!(Category::from_wind_knots(83.0).value(), 2);
        assert_eq!(Category::from_wind_knots(64.0).value(), 1);
        assert_eq!(Category::from_wind_knots(33.0).value(), 0);
    }

    #[test]
    fn test_wind_just_below_boundaries() {
        assert_eq!(Category::from_wind_knots(136.9).value(), 4);
        assert_eq!(Category::from_wind_knots(112.9).value(), 3);
        assert_eq!(Category::from_wind_knots(95.9).value(), 2);
        assert_eq!(Category::from_wind_knots(82.9).value(), 1);
        assert_eq!(Category::from_wind_knots(63.9).value(), 0);
    }

    #[test]
    fn test_reported_category_is_clamped_and_floored() {
        assert_eq!(Category::from_reported(3.7).value(), 3);
        assert_eq!(Category::from_reported(9.0).value(), 5);
        assert_eq!(Category::from_reported(-1.0).value(), 0);
        assert_eq!(Category::from_reported(f64::NAN).value(), 0);
    }

    #[test]
    fn test_direct_ignores_wind() {
        let p = position(Some(2.0), Some(140.0), 0);
        assert_eq!(resolve_category(&p, CategorySource::Direct).value(), 2);
    }

    #[test]
    fn test_derived_prefers_wind() {
        let p = position(Some(0.0), Some(100.0), 24);
        assert_eq!(resolve_category(&p, CategorySource::Derived).value(), 3);
    }

    #[test]
    fn test_derived_falls_back_to_reported_without_wind() {
        assert_eq!(resolve_category(&position(Some(4.0), Some(0.0), 24), CategorySource::Derived).value(), 4);
        assert_eq!(resolve_category(&position(Some(4.0), None, 24), CategorySource::Derived).value(), 4);
        assert_eq!(resolve_category(&position(None, None, 24), CategorySource::Derived).value(), 0);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let p = position(Some(1.0), Some(90.0), 12);
        let first = resolve_category(&p, CategorySource::Derived);
        let second = resolve_category(&p, CategorySource::Derived);
        assert_eq!(first, second);
    }

    #[test]
    fn test_source_follows_forecast_hour() {
        assert_eq!(CategorySource::for_position(&position(None, None, 0)), CategorySource::Direct);
        assert_eq!(CategorySource::for_position(&position(None, None, 12)), CategorySource::Derived);
    }

    #[test]
    fn test_styling_tables_cover_every_category() {
        for value in 0..=5 {
            let category = Category::from_reported(value as f64);
            assert_eq!(category.color()[3], 230);
            assert!(category.dot_radius() > 0.0);
        }
        assert_ne!(Category::TROPICAL_STORM.color(), Category::MAX.color());
        assert!(Category::MAX.dot_radius() > Category::TROPICAL_STORM.dot_radius());
    }
}
