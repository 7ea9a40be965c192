// Earthquake domain model
use super::geo::LonLat;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Earthquake {
    pub id: String,
    pub magnitude: f64,
    pub place: String,
    pub time_ms: i64,
    pub position: LonLat,
    pub depth_km: f64,
}

impl Earthquake {
    pub fn color(&self) -> [u8; 4] {
        match self.magnitude {
            m if m >= 7.0 => [139, 0, 0, 220],
            m if m >= 6.0 => [220, 20, 60, 220],
            m if m >= 5.0 => [255, 99, 71, 210],
            m if m >= 4.0 => [255, 165, 0, 200],
            _ => [255, 215, 0, 180],
        }
    }

    /// Marker radius grows with magnitude; tiny events still get a visible dot.
    pub fn radius(&self) -> f32 {
        (self.magnitude.max(1.0) * 3.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quake(magnitude: f64) -> Earthquake {
        Earthquake {
            id: "us7000abcd".to_string(),
            magnitude,
            place: "10 km S of Somewhere".to_string(),
            time_ms: 0,
            position: [140.0, 35.0],
            depth_km: 10.0,
        }
    }

    #[test]
    fn test_color_scales_with_magnitude() {
        assert_eq!(quake(7.2).color(), [139, 0, 0, 220]);
        assert_eq!(quake(4.5).color(), [255, 165, 0, 200]);
        assert_eq!(quake(2.6).color(), [255, 215, 0, 180]);
    }

    #[test]
    fn test_radius_has_floor() {
        assert_eq!(quake(0.2).radius(), 3.0);
        assert!(quake(6.0).radius() > quake(3.0).radius());
    }
}
