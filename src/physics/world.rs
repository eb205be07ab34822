//! Physics simulation using rapier3d

use glam::{Mat4, Quat, Vec3};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

use super::materials::{ContactMaterials, MaterialId};
use super::stepper::{FixedStepper, StepPlan};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

/// Convert glam Quat to rapier3d UnitQuaternion
fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Convert rapier3d UnitQuaternion to glam Quat
fn rapier_to_quat(uq: &UnitQuaternion<f32>) -> Quat {
    let q = uq.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry<f32> {
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

/// How a body moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves
    Fixed,
    /// Driven by forces and contacts
    Dynamic,
    /// Moved by the application
    Kinematic,
}

/// Collision shape of a collider, in its local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeOutline {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
}

/// World-space description of one collider, for debug drawing
#[derive(Debug, Clone, Copy)]
pub struct ColliderOutline {
    pub kind: BodyKind,
    pub shape: ShapeOutline,
    pub transform: Mat4,
}

/// Physics world manager
pub struct Physics {
    /// Gravity vector
    pub gravity: Vec3,
    /// Surface materials and their contact table
    pub materials: ContactMaterials,
    /// Fixed-timestep accumulator
    stepper: FixedStepper,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    integration_parameters: IntegrationParameters,
}

impl Physics {
    /// Create a new physics world with earth gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.82, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            materials: ContactMaterials::new(),
            stepper: FixedStepper::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
        }
    }

    /// Replace the fixed-step settings used by [`Physics::step_frame`]
    pub fn set_timestep(&mut self, fixed_dt: f32, max_substeps: u32) {
        self.stepper = FixedStepper::new(fixed_dt, max_substeps);
    }

    /// Advance by one frame's elapsed time, in whole fixed steps
    pub fn step_frame(&mut self, frame_dt: f32) -> StepPlan {
        let plan = self.stepper.advance(frame_dt);
        let dt = self.stepper.fixed_dt();
        for _ in 0..plan.steps {
            self.step(dt);
        }
        plan
    }

    /// Step the physics simulation once
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vector![self.gravity.x, self.gravity.y, self.gravity.z],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &self.materials,
            &(),
        );
    }

    /// Create a static rigid body (doesn't move)
    pub fn create_fixed_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Create a dynamic rigid body (affected by forces)
    pub fn create_dynamic_body(
        &mut self,
        position: Vec3,
        rotation: Quat,
        ccd: bool,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .position(isometry(position, rotation))
            .ccd_enabled(ccd)
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Create a kinematic rigid body (controlled directly)
    pub fn create_kinematic_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    fn insert_collider(
        &mut self,
        body: RigidBodyHandle,
        builder: ColliderBuilder,
        material: Option<MaterialId>,
    ) -> ColliderHandle {
        let builder = match material {
            Some(material) => builder
                .user_data(material.to_user_data())
                .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS),
            None => builder,
        };

        ColliderHandle(self.collider_set.insert_with_parent(
            builder.build(),
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Add a box collider to a rigid body
    pub fn add_box_collider(
        &mut self,
        body: RigidBodyHandle,
        half_extents: Vec3,
        material: Option<MaterialId>,
    ) -> ColliderHandle {
        let builder = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.insert_collider(body, builder, material)
    }

    /// Add a sphere collider with a given mass to a rigid body
    pub fn add_sphere_collider(
        &mut self,
        body: RigidBodyHandle,
        radius: f32,
        mass: f32,
        material: Option<MaterialId>,
    ) -> ColliderHandle {
        let builder = ColliderBuilder::ball(radius).mass(mass);
        self.insert_collider(body, builder, material)
    }

    /// Get the position of a rigid body
    pub fn get_position(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let pos = rb.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Get the rotation of a rigid body
    pub fn get_rotation(&self, body: RigidBodyHandle) -> Option<Quat> {
        self.rigid_body_set
            .get(body.0)
            .map(|rb| rapier_to_quat(rb.rotation()))
    }

    /// Get the linear velocity of a body
    pub fn get_linear_velocity(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let vel = rb.linvel();
            Vec3::new(vel.x, vel.y, vel.z)
        })
    }

    /// Set where a kinematic body should be after the next step
    pub fn set_kinematic_position(&mut self, body: RigidBodyHandle, position: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_next_kinematic_translation(vector![position.x, position.y, position.z]);
        }
    }

    /// Teleport a body and clear its motion
    pub fn reset_body(&mut self, body: RigidBodyHandle, position: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_translation(vector![position.x, position.y, position.z], true);
            rb.set_rotation(UnitQuaternion::identity(), true);
            rb.set_linvel(vector![0.0, 0.0, 0.0], true);
            rb.set_angvel(vector![0.0, 0.0, 0.0], true);
        }
    }

    /// Cast a ray against all colliders and return the closest hit.
    ///
    /// Collider positions are those of the last completed step.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                QueryFilter::default(),
            )
            .map(|(handle, distance)| {
                let point = ray.point_at(distance);
                RaycastHit {
                    collider: ColliderHandle(handle),
                    point: Vec3::new(point.x, point.y, point.z),
                    distance,
                }
            })
    }

    /// Number of rigid bodies in the world
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// World-space outlines of every supported collider shape
    pub fn collider_outlines(&self) -> Vec<ColliderOutline> {
        self.collider_set
            .iter()
            .filter_map(|(_, collider)| {
                let shape = if let Some(cuboid) = collider.shape().as_cuboid() {
                    let he = cuboid.half_extents;
                    ShapeOutline::Cuboid {
                        half_extents: Vec3::new(he.x, he.y, he.z),
                    }
                } else if let Some(ball) = collider.shape().as_ball() {
                    ShapeOutline::Ball {
                        radius: ball.radius,
                    }
                } else {
                    return None;
                };

                let kind = collider
                    .parent()
                    .and_then(|parent| self.rigid_body_set.get(parent))
                    .map_or(BodyKind::Fixed, |rb| match rb.body_type() {
                        RigidBodyType::Dynamic => BodyKind::Dynamic,
                        RigidBodyType::Fixed => BodyKind::Fixed,
                        RigidBodyType::KinematicPositionBased
                        | RigidBodyType::KinematicVelocityBased => BodyKind::Kinematic,
                    });

                let iso = collider.position();
                let t = iso.translation.vector;
                let transform = Mat4::from_rotation_translation(
                    rapier_to_quat(&iso.rotation),
                    Vec3::new(t.x, t.y, t.z),
                );

                Some(ColliderOutline {
                    kind,
                    shape,
                    transform,
                })
            })
            .collect()
    }
}

/// Result of [`Physics::raycast`]
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    pub collider: ColliderHandle,
    pub point: Vec3,
    /// Distance along the ray, in units of the direction's length
    pub distance: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}
