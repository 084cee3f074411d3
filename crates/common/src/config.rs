use serde::{Deserialize, Serialize};

/// Errors detected while validating a scene configuration.
///
/// All of these are raised at construction time; a scene that constructed
/// successfully cannot hit them mid-tick.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("scene needs {required} transform slots but the buffer holds {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },
    #[error("non-finite value in {field}")]
    NonFinite { field: &'static str },
    #[error("phi clamp bounds must satisfy 0 < min < max < 180, got [{min}, {max}]")]
    InvalidPhiBounds { min: f32, max: f32 },
    #[error("initial phi {phi} outside clamp range [{min}, {max}]")]
    PhiOutOfRange { phi: f32, min: f32, max: f32 },
}

/// Camera orientation state and sensitivity.
///
/// `phi` is the polar angle from the +Y axis, `theta` the azimuth about Y,
/// both in degrees. The clamp bounds keep `phi` strictly inside (0, 180)
/// so the forward vector never becomes collinear with world-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub phi_degrees: f32,
    pub theta_degrees: f32,
    pub rotation_speed: f32,
    pub phi_min: f32,
    pub phi_max: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 2.0],
            phi_degrees: 90.0,
            theta_degrees: 0.0,
            rotation_speed: 0.05,
            phi_min: 5.0,
            phi_max: 178.0,
        }
    }
}

/// A row of triangles along the X axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangleRow {
    pub count: u32,
    pub start: [f32; 3],
    pub spacing: f32,
}

impl Default for TriangleRow {
    fn default() -> Self {
        Self {
            count: 11,
            start: [-5.0, 0.0, -2.0],
            spacing: 1.0,
        }
    }
}

/// A square grid of floor quads centered on the origin in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadGrid {
    pub half_extent: u32,
    pub spacing: f32,
    pub height: f32,
}

impl Default for QuadGrid {
    fn default() -> Self {
        Self {
            half_extent: 10,
            spacing: 1.0,
            height: -1.0,
        }
    }
}

impl QuadGrid {
    /// Number of quads the grid generates: (2 * half_extent + 1)^2.
    pub fn quad_count(&self) -> usize {
        let side = 2 * self.half_extent as usize + 1;
        side * side
    }
}

/// Full scene configuration: buffer capacity, entity layout generators,
/// and camera state. Entity counts are fixed for the whole session once
/// the scene is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub capacity_slots: CapacitySlots,
    pub triangle_row: TriangleRow,
    pub quad_grid: QuadGrid,
    pub camera: CameraConfig,
}

/// Newtype so `SceneConfig::default()` gets the 1024-slot default without
/// a hand-written Default impl for the whole config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacitySlots(pub usize);

impl Default for CapacitySlots {
    fn default() -> Self {
        Self(1024)
    }
}

impl SceneConfig {
    /// Total entity count the generators will produce.
    pub fn total_entities(&self) -> usize {
        self.triangle_row.count as usize + self.quad_grid.quad_count()
    }

    /// Validate the configuration. Called once by scene construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = self.total_entities();
        let capacity = self.capacity_slots.0;
        if required > capacity {
            return Err(ConfigError::CapacityExceeded { required, capacity });
        }

        check_finite(&self.triangle_row.start, "triangle_row.start")?;
        check_finite(&[self.triangle_row.spacing], "triangle_row.spacing")?;
        check_finite(
            &[self.quad_grid.spacing, self.quad_grid.height],
            "quad_grid",
        )?;
        check_finite(&self.camera.position, "camera.position")?;
        check_finite(
            &[self.camera.phi_degrees, self.camera.theta_degrees, self.camera.rotation_speed],
            "camera",
        )?;

        let (min, max) = (self.camera.phi_min, self.camera.phi_max);
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || max >= 180.0 || min >= max {
            return Err(ConfigError::InvalidPhiBounds { min, max });
        }
        let phi = self.camera.phi_degrees;
        if phi < min || phi > max {
            return Err(ConfigError::PhiOutOfRange { phi, min, max });
        }

        Ok(())
    }
}

fn check_finite(values: &[f32], field: &'static str) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity_slots.0, 1024);
    }

    #[test]
    fn default_counts() {
        let config = SceneConfig::default();
        assert_eq!(config.triangle_row.count, 11);
        assert_eq!(config.quad_grid.quad_count(), 441);
        assert_eq!(config.total_entities(), 452);
    }

    #[test]
    fn over_capacity_is_rejected() {
        let mut config = SceneConfig::default();
        config.capacity_slots = CapacitySlots(100);
        match config.validate() {
            Err(ConfigError::CapacityExceeded { required, capacity }) => {
                assert_eq!(required, 452);
                assert_eq!(capacity, 100);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn exact_capacity_is_accepted() {
        let mut config = SceneConfig::default();
        config.capacity_slots = CapacitySlots(452);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let mut config = SceneConfig::default();
        config.camera.position = [f32::NAN, 0.0, 0.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn degenerate_phi_bounds_are_rejected() {
        let mut config = SceneConfig::default();
        config.camera.phi_min = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPhiBounds { .. })
        ));

        let mut config = SceneConfig::default();
        config.camera.phi_max = 180.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPhiBounds { .. })
        ));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: SceneConfig = serde_json::from_str(
            r#"{ "capacity_slots": 500, "quad_grid": { "half_extent": 3 } }"#,
        )
        .expect("parse");
        assert_eq!(config.capacity_slots, CapacitySlots(500));
        assert_eq!(config.quad_grid.half_extent, 3);
        // Untouched sections keep their defaults.
        assert_eq!(config.triangle_row.count, 11);
        assert_eq!(config.camera.phi_degrees, 90.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn initial_phi_outside_bounds_is_rejected() {
        let mut config = SceneConfig::default();
        config.camera.phi_degrees = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PhiOutOfRange { .. })
        ));
    }
}
