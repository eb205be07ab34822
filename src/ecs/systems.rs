//! Systems linking transforms to physics and picking

use glam::Vec3;
use hecs::Entity;

use super::components::{BodyLink, BodySync, Draggable, Pickable, Transform};
use super::world::World;
use crate::interaction::Ray;
use crate::physics::Physics;

/// Copy body positions onto entities that follow their body
pub fn sync_from_physics(world: &mut World, physics: &Physics) {
    for (_, (transform, link)) in world.query_mut::<(&mut Transform, &BodyLink)>() {
        if link.sync != BodySync::FollowBody {
            continue;
        }
        if let Some(position) = physics.get_position(link.body) {
            transform.position = position;
        }
    }
}

/// Hand entity positions to the kinematic bodies they drive
pub fn push_kinematic_targets(world: &World, physics: &mut Physics) {
    for (_, (transform, link)) in world.query::<(&Transform, &BodyLink)>().iter() {
        if link.sync == BodySync::DriveBody {
            physics.set_kinematic_position(link.body, transform.position);
        }
    }
}

/// Nearest draggable entity under a ray
pub fn pick_draggable(world: &World, ray: &Ray) -> Option<Entity> {
    world
        .query::<(&Transform, &Pickable)>()
        .with::<&Draggable>()
        .iter()
        .filter_map(|(entity, (transform, pickable))| {
            pickable
                .0
                .pick(ray, transform.matrix())
                .map(|distance| (entity, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}

/// Move an entity, returning its new position
pub fn move_entity(world: &mut World, entity: Entity, position: Vec3) -> Option<Vec3> {
    let mut transform = world.get_mut::<Transform>(entity).ok()?;
    transform.position = position;
    Some(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::PickShape;
    use glam::{Mat4, Quat};

    fn square_shape() -> PickShape {
        let mut shape = PickShape::default();
        let positions = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        shape.extend_indexed(&positions, &[0, 1, 2, 2, 3, 0], Mat4::IDENTITY);
        shape
    }

    #[test]
    fn test_follow_copies_position_only() {
        let mut physics = Physics::new();
        let body = physics.create_dynamic_body(Vec3::new(0.0, 3.0, 0.0), Quat::IDENTITY, false);
        physics.add_sphere_collider(body, 0.1, 1.0, None);

        let mut world = World::new();
        let tilted = Quat::from_rotation_z(0.5);
        let ball = world.spawn((
            Transform::from_position_rotation(Vec3::ZERO, tilted),
            BodyLink::follow(body),
        ));

        for _ in 0..10 {
            physics.step(1.0 / 60.0);
        }
        sync_from_physics(&mut world, &physics);

        let transform = *world.get::<Transform>(ball).unwrap();
        assert_eq!(Some(transform.position), physics.get_position(body));
        assert_eq!(transform.rotation, tilted);
    }

    #[test]
    fn test_driven_body_reaches_transform() {
        let mut physics = Physics::new();
        let body = physics.create_kinematic_body(Vec3::new(0.6, 1.5, 1.5), Quat::IDENTITY);
        physics.add_box_collider(body, Vec3::splat(0.24), None);

        let mut world = World::new();
        let bat = world.spawn((
            Transform::from_position(Vec3::new(0.6, 1.5, 1.5)),
            BodyLink::drive(body),
        ));

        let target = Vec3::new(0.6, 2.1, -0.4);
        assert_eq!(move_entity(&mut world, bat, target), Some(target));
        push_kinematic_targets(&world, &mut physics);
        physics.step(1.0 / 60.0);

        let reached = physics.get_position(body).unwrap();
        assert!((reached - target).length() < 1e-4);

        // Driven entities are not overwritten by the body
        sync_from_physics(&mut world, &physics);
        assert_eq!(world.get::<Transform>(bat).unwrap().position, target);
    }

    #[test]
    fn test_pick_only_draggable() {
        let mut world = World::new();
        let near = Transform::from_position(Vec3::new(0.0, 0.0, 1.0));
        let far = Transform::from_position(Vec3::new(0.0, 0.0, -1.0));

        // A non-draggable object in front must not shadow the draggable one
        world.spawn((near, Pickable(square_shape())));
        let bat = world.spawn((far, Pickable(square_shape()), Draggable));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(pick_draggable(&world, &ray), Some(bat));

        let miss = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(pick_draggable(&world, &miss), None);
    }

    #[test]
    fn test_pick_nearest_draggable() {
        let mut world = World::new();
        let front = world.spawn((
            Transform::from_position(Vec3::new(0.0, 0.0, 1.0)),
            Pickable(square_shape()),
            Draggable,
        ));
        world.spawn((
            Transform::from_position(Vec3::new(0.0, 0.0, -1.0)),
            Pickable(square_shape()),
            Draggable,
        ));

        let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::NEG_Z);
        assert_eq!(pick_draggable(&world, &ray), Some(front));
    }
}
