//! Scene components

use glam::{Mat4, Quat, Vec3};

use crate::interaction::PickShape;
use crate::physics::RigidBodyHandle;
use crate::renderer::RenderObject;

/// Transform component for position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Transform {
    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Uniformly scaled copy
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Get the transformation matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Name component for debugging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Which side owns the position of a linked entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySync {
    /// The body's position is copied onto the transform after each step.
    /// Rotation stays with the transform.
    FollowBody,
    /// The transform's position becomes the kinematic body's next target
    DriveBody,
}

/// Link between an entity and its rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLink {
    pub body: RigidBodyHandle,
    pub sync: BodySync,
}

impl BodyLink {
    pub fn follow(body: RigidBodyHandle) -> Self {
        Self {
            body,
            sync: BodySync::FollowBody,
        }
    }

    pub fn drive(body: RigidBodyHandle) -> Self {
        Self {
            body,
            sync: BodySync::DriveBody,
        }
    }
}

/// Marks an entity the mouse can drag
#[derive(Debug, Clone, Copy, Default)]
pub struct Draggable;

/// Geometry used to hit-test an entity under the cursor
#[derive(Debug, Clone)]
pub struct Pickable(pub PickShape);

/// GPU meshes drawn at the entity's transform
pub struct RenderParts(pub Vec<RenderObject>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_applies_scale_then_rotation() {
        let transform = Transform::from_position_rotation(
            Vec3::new(0.6, 1.5, 1.5),
            Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2),
        )
        .with_scale(0.24);

        let p = transform.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.6, 1.5, 1.74)).length() < 1e-5);
    }

    #[test]
    fn test_links() {
        let handle = RigidBodyHandle(rapier3d::dynamics::RigidBodyHandle::invalid());
        assert_eq!(BodyLink::follow(handle).sync, BodySync::FollowBody);
        assert_eq!(BodyLink::drive(handle).sync, BodySync::DriveBody);
    }
}
