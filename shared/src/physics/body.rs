use bevy::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::BodyConfigError;

/// Friction and restitution of a body's surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactMaterial {
    pub friction: f32,
    /// Values above 1 amplify the rebound; the trampoline pad relies on this.
    pub restitution: f32,
}

impl ContactMaterial {
    pub const fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }

    pub fn validate(&self) -> Result<(), BodyConfigError> {
        let valid = |c: f32| c.is_finite() && c >= 0.0;
        if valid(self.friction) && valid(self.restitution) {
            Ok(())
        } else {
            Err(BodyConfigError::InvalidMaterial {
                friction: self.friction,
                restitution: self.restitution,
            })
        }
    }

    /// Coefficients for a contact between two bodies that both carry a material.
    pub fn combine(self, other: ContactMaterial) -> ContactMaterial {
        ContactMaterial {
            friction: self.friction * other.friction,
            restitution: self.restitution * other.restitution,
        }
    }
}

/// Collision shape of a body. Cylinders and planes are Y-aligned in body space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    Sphere {
        radius: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    /// Infinite half-space whose surface passes through the body origin, normal +Y.
    Plane,
}

impl BodyShape {
    pub const fn sphere(radius: f32) -> Self {
        BodyShape::Sphere { radius }
    }

    pub const fn cylinder(radius: f32, height: f32) -> Self {
        BodyShape::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            height,
        }
    }

    pub fn validate(&self) -> Result<(), BodyConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        match *self {
            BodyShape::Sphere { radius } if !positive(radius) => {
                Err(BodyConfigError::InvalidRadius {
                    shape: "sphere",
                    radius,
                })
            }
            BodyShape::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                for radius in [radius_top, radius_bottom] {
                    if !positive(radius) {
                        return Err(BodyConfigError::InvalidRadius {
                            shape: "cylinder",
                            radius,
                        });
                    }
                }
                if !positive(height) {
                    return Err(BodyConfigError::InvalidHeight(height));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Everything needed to insert one body into a [`PhysicsWorld`](super::PhysicsWorld).
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub label: &'static str,
    pub shape: BodyShape,
    /// 0 makes the body static (infinite mass).
    pub mass: f32,
    pub position: Vec3,
    pub rotation: Quat,
    /// `None` defers to the world's default contact material.
    pub material: Option<ContactMaterial>,
}

impl BodyDesc {
    pub fn fixed(label: &'static str, shape: BodyShape, position: Vec3) -> Self {
        Self {
            label,
            shape,
            mass: 0.0,
            position,
            rotation: Quat::IDENTITY,
            material: None,
        }
    }

    pub fn dynamic(label: &'static str, shape: BodyShape, mass: f32, position: Vec3) -> Self {
        Self {
            mass,
            ..Self::fixed(label, shape, position)
        }
    }

    pub fn with_material(mut self, material: ContactMaterial) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    pub fn validate(&self) -> Result<(), BodyConfigError> {
        self.shape.validate()?;
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(BodyConfigError::InvalidMass(self.mass));
        }
        if matches!(self.shape, BodyShape::Plane) && !self.is_static() {
            return Err(BodyConfigError::DynamicPlane(self.mass));
        }
        if !self.position.is_finite() {
            return Err(BodyConfigError::NonFinitePosition(self.position));
        }
        if let Some(material) = &self.material {
            material.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_radius_rejected() {
        let desc = BodyDesc::dynamic("ball", BodyShape::sphere(-0.5), 1.0, Vec3::ZERO);
        assert_eq!(
            desc.validate(),
            Err(BodyConfigError::InvalidRadius {
                shape: "sphere",
                radius: -0.5
            })
        );
    }

    #[test]
    fn test_cylinder_checks_both_radii_and_height() {
        let bad_bottom = BodyShape::Cylinder {
            radius_top: 1.0,
            radius_bottom: 0.0,
            height: 1.0,
        };
        assert!(matches!(
            bad_bottom.validate(),
            Err(BodyConfigError::InvalidRadius { .. })
        ));
        assert_eq!(
            BodyShape::cylinder(1.0, f32::NAN).validate().map_err(|e| e.to_string()),
            Err("cylinder height must be positive and finite, got NaN".to_string())
        );
    }

    #[test]
    fn test_mass_rules() {
        let negative = BodyDesc::dynamic("ball", BodyShape::sphere(0.5), -1.0, Vec3::ZERO);
        assert_eq!(negative.validate(), Err(BodyConfigError::InvalidMass(-1.0)));

        let dynamic_plane = BodyDesc::dynamic("ground", BodyShape::Plane, 5.0, Vec3::ZERO);
        assert_eq!(
            dynamic_plane.validate(),
            Err(BodyConfigError::DynamicPlane(5.0))
        );

        let ground = BodyDesc::fixed("ground", BodyShape::Plane, Vec3::ZERO);
        assert!(ground.is_static());
        assert_eq!(ground.validate(), Ok(()));
    }

    #[test]
    fn test_material_validation() {
        let desc = BodyDesc::fixed("pad", BodyShape::cylinder(2.0, 0.1), Vec3::Y)
            .with_material(ContactMaterial::new(0.1, -1.0));
        assert!(matches!(
            desc.validate(),
            Err(BodyConfigError::InvalidMaterial { .. })
        ));
    }

    #[test]
    fn test_combine_multiplies() {
        let pad = ContactMaterial::new(0.1, 1.4);
        let character = ContactMaterial::new(0.1, 0.3);
        let pair = pad.combine(character);
        assert!((pair.friction - 0.01).abs() < 1e-6);
        assert!((pair.restitution - 0.42).abs() < 1e-6);
    }
}
