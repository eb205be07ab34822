//! Scene construction that needs no GPU: physics bodies and entities

use glam::Quat;
use hecs::Entity;

use crate::core::{BodySettings, DemoConfig};
use crate::ecs::{BodyLink, Draggable, Name, Pickable, Transform, World};
use crate::interaction::PickShape;
use crate::physics::{ContactMaterial, Physics, RigidBodyHandle};

/// Rigid bodies of the scene
#[derive(Debug, Clone, Copy)]
pub struct SceneBodies {
    pub ball: RigidBodyHandle,
    pub bat: RigidBodyHandle,
    pub table: RigidBodyHandle,
    pub net: RigidBodyHandle,
}

/// Entities of the scene
#[derive(Debug, Clone, Copy)]
pub struct SceneEntities {
    pub table: Entity,
    pub bat: Entity,
    pub ball: Entity,
}

/// Create the world, its materials and the four bodies
pub fn build_physics(config: &DemoConfig) -> (Physics, SceneBodies) {
    let settings = &config.physics;
    let b = &config.bodies;

    let mut physics = Physics::with_gravity(settings.gravity);
    physics.set_timestep(settings.fixed_timestep, settings.max_substeps);

    let plywood = physics.materials.register("plywood");
    let plastic = physics.materials.register("plastic");
    physics.materials.set_contact(
        plywood,
        plastic,
        ContactMaterial::new(
            settings.plywood_plastic_friction,
            settings.plywood_plastic_restitution,
        ),
    );

    let ball = physics.create_dynamic_body(b.ball_spawn, Quat::IDENTITY, true);
    physics.add_sphere_collider(ball, b.ball_radius, b.ball_mass, Some(plastic));

    let bat = physics.create_kinematic_body(b.bat_position, Quat::IDENTITY);
    physics.add_box_collider(bat, b.bat_half_extents, Some(plywood));

    let table = physics.create_fixed_body(b.table_position, b.table_rotation());
    physics.add_box_collider(table, b.table_half_extents, Some(plywood));

    let net = physics.create_fixed_body(b.net_position, Quat::IDENTITY);
    physics.add_box_collider(net, b.net_half_extents, Some(plywood));

    log::info!("Physics ready with {} bodies", physics.body_count());

    (
        physics,
        SceneBodies {
            ball,
            bat,
            table,
            net,
        },
    )
}

/// Spawn the table, bat and ball entities with their transforms and links
pub fn spawn_entities(
    world: &mut World,
    settings: &BodySettings,
    bodies: &SceneBodies,
    bat_shape: PickShape,
) -> SceneEntities {
    let table = world.spawn((Name::new("table"), Transform::default()));

    let bat = world.spawn((
        Name::new("bat"),
        Transform::from_position_rotation(settings.bat_position, settings.bat_model_rotation())
            .with_scale(settings.bat_model_scale),
        BodyLink::drive(bodies.bat),
        Pickable(bat_shape),
        Draggable,
    ));

    let ball = world.spawn((
        Name::new("ball"),
        Transform::from_position(settings.ball_spawn),
        BodyLink::follow(bodies.ball),
    ));

    SceneEntities { table, bat, ball }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::bat_stand_in;
    use crate::ecs::{move_entity, pick_draggable, push_kinematic_targets, sync_from_physics};
    use crate::interaction::{DragController, Ray};
    use crate::renderer::Camera;
    use glam::{Vec2, Vec3};

    fn scene() -> (Physics, SceneBodies, World, SceneEntities) {
        let config = DemoConfig::default();
        let (physics, bodies) = build_physics(&config);
        let mut world = World::new();
        let entities = spawn_entities(
            &mut world,
            &config.bodies,
            &bodies,
            bat_stand_in().pick_shape(),
        );
        (physics, bodies, world, entities)
    }

    #[test]
    fn test_bodies_start_at_configured_positions() {
        let (physics, bodies, world, entities) = scene();
        let b = BodySettings::default();

        assert_eq!(physics.body_count(), 4);
        assert_eq!(physics.get_position(bodies.ball), Some(b.ball_spawn));
        assert_eq!(physics.get_position(bodies.bat), Some(b.bat_position));
        assert_eq!(physics.get_position(bodies.net), Some(b.net_position));
        assert_eq!(physics.get_position(bodies.table), Some(b.table_position));
        assert_eq!(world.find_by_name("bat"), Some(entities.bat));
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn test_table_body_is_laid_flat() {
        let (physics, bodies, _, _) = scene();
        let rotation = physics.get_rotation(bodies.table).unwrap();

        let expected = Quat::from_axis_angle(Vec3::NEG_X, std::f32::consts::FRAC_PI_2);
        assert!(rotation.dot(expected).abs() > 0.9999);
        // The box's thin Z axis ends up vertical
        assert!((rotation * Vec3::Z - Vec3::Y).length() < 1e-5);
        assert_eq!(physics.get_rotation(bodies.net), Some(Quat::IDENTITY));
    }

    #[test]
    fn test_ball_bounces_on_table() {
        let (mut physics, bodies, mut world, entities) = scene();

        let mut lowest = f32::MAX;
        let mut bounced = false;
        for _ in 0..120 {
            physics.step_frame(1.0 / 60.0);
            sync_from_physics(&mut world, &physics);

            let y = world.get::<Transform>(entities.ball).unwrap().position.y;
            lowest = lowest.min(y);
            bounced |= physics.get_linear_velocity(bodies.ball).unwrap().y > 0.5;
        }

        assert!(bounced);
        // Table top is at 1.51 and the ball radius is 0.1
        assert!(lowest > 1.55, "ball sank to {lowest}");
    }

    #[test]
    fn test_camera_ray_picks_and_drags_bat() {
        let (mut physics, bodies, mut world, entities) = scene();
        let camera = Camera::from_settings(&DemoConfig::default().camera);
        let b = BodySettings::default();

        let towards_bat = Ray::new(camera.position, b.bat_position - camera.position);
        let mut drag = DragController::new();
        if let Some(entity) = pick_draggable(&world, &towards_bat) {
            drag.begin(entity);
        }
        assert_eq!(drag.selected(), Some(entities.bat));

        // Cursor at the window centre cuts the drag plane at (0, 2, 0)
        let ray = camera.screen_ray(Vec2::ZERO);
        let current = world.get::<Transform>(entities.bat).unwrap().position;
        let target = drag.target(&ray, current).unwrap();
        assert!((target - Vec3::new(0.6, 2.0, 0.0)).length() < 1e-4);

        move_entity(&mut world, entities.bat, target);
        push_kinematic_targets(&world, &mut physics);
        physics.step_frame(1.0 / 60.0);
        let body = physics.get_position(bodies.bat).unwrap();
        assert!((body - target).length() < 1e-4);

        drag.end();
        assert_eq!(drag.selected(), None);
    }

    #[test]
    fn test_ray_past_bat_selects_nothing() {
        let (_, _, world, _) = scene();
        let ray = Ray::new(Vec3::new(0.0, 2.0, 4.0), Vec3::Y);
        assert_eq!(pick_draggable(&world, &ray), None);
    }
}
