//! Structural checks on loaded configuration.
//!
//! These checks are independent of the merge logic: they run on a single
//! config right after migration and before registration.

use crate::config::{NomaiCoordinates, PlanetConfig, StarSystemConfig};

/// Highest digit a coordinate axis may contain.
pub const MAX_COORDINATE_DIGIT: i32 = 5;

/// Reasons a body configuration is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("body has no name")]
    MissingName,

    #[error("body '{body}' does not name a star system")]
    MissingStarSystem { body: String },

    #[error("body '{body}' has negative orbit distance {distance}")]
    NegativeOrbit { body: String, distance: f32 },
}

/// Validates bodies and normalizes system coordinates.
pub trait ConfigValidator {
    /// Reject a body whose structure cannot be built.
    fn validate(&self, body: &PlanetConfig) -> Result<(), ValidationError>;

    /// Normalize the system's vessel coordinates in place.
    fn fix_coordinates(&self, system: &mut StarSystemConfig);
}

/// The validator used when no other is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardValidator;

impl ConfigValidator for StandardValidator {
    fn validate(&self, body: &PlanetConfig) -> Result<(), ValidationError> {
        if body.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if body.star_system.trim().is_empty() {
            return Err(ValidationError::MissingStarSystem {
                body: body.name.clone(),
            });
        }
        if let Some(distance) = body.orbit.as_ref().and_then(|o| o.semi_major_axis) {
            if distance < 0.0 {
                return Err(ValidationError::NegativeOrbit {
                    body: body.name.clone(),
                    distance,
                });
            }
        }
        Ok(())
    }

    fn fix_coordinates(&self, system: &mut StarSystemConfig) {
        if let Some(coords) = system.vessel.as_mut().and_then(|v| v.coords.as_mut()) {
            fix_axes(coords);
        }
        // Not migrated yet when called from a raw file.
        if let Some(coords) = system.coords.as_mut() {
            fix_axes(coords);
        }
    }
}

fn fix_axes(coords: &mut NomaiCoordinates) {
    fix_axis(&mut coords.x);
    fix_axis(&mut coords.y);
    fix_axis(&mut coords.z);
}

/// Drop out-of-range and repeated digits, keeping first occurrences in order.
fn fix_axis(axis: &mut Vec<i32>) {
    let mut seen = [false; (MAX_COORDINATE_DIGIT + 1) as usize];
    axis.retain(|&digit| {
        if !(0..=MAX_COORDINATE_DIGIT).contains(&digit) {
            return false;
        }
        let slot = &mut seen[digit as usize];
        if *slot {
            return false;
        }
        *slot = true;
        true
    });
}
