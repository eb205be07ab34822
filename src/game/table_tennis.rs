//! The table tennis scene and its frame loop

use std::path::Path;

use glam::Vec3;
use winit::event::MouseButton;

use super::setup::{SceneBodies, SceneEntities, build_physics, spawn_entities};
use crate::assets::{Model, bat_stand_in, table_stand_in};
use crate::core::{DemoConfig, EngineContext, Game};
use crate::ecs::{
    RenderParts, Transform, move_entity, pick_draggable, push_kinematic_targets,
    sync_from_physics,
};
use crate::input::{InputAction, InputMapper};
use crate::interaction::{DragController, Ray, cursor_to_ndc};
use crate::physics::{Physics, collider_lines};
use crate::renderer::{
    Camera, ColorSpace, Material, MaterialMaps, Mesh, RenderObject, Renderer, SceneLights,
    Texture,
};

/// Table, net, bat and ball with a mouse-dragged bat
pub struct TableTennis {
    config: DemoConfig,
    camera: Camera,
    lights: SceneLights,
    physics: Physics,
    bodies: SceneBodies,
    entities: Option<SceneEntities>,
    bindings: InputMapper,
    drag: DragController,
}

impl TableTennis {
    /// Build the simulation; GPU resources are created in [`Game::init`]
    pub fn new(config: DemoConfig) -> Self {
        let (physics, bodies) = build_physics(&config);
        Self {
            camera: Camera::from_settings(&config.camera),
            lights: SceneLights::from_settings(&config.lighting),
            physics,
            bodies,
            entities: None,
            bindings: InputMapper::with_defaults(),
            drag: DragController::new(),
            config,
        }
    }

    fn cursor_ray(&self, ctx: &EngineContext) -> Ray {
        let ndc = cursor_to_ndc(ctx.input.mouse_position(), ctx.width(), ctx.height());
        self.camera.screen_ray(ndc)
    }

    fn handle_actions(&mut self, ctx: &mut EngineContext) {
        if self.bindings.just_triggered(&ctx.input, InputAction::Quit) {
            ctx.quit();
        }

        if self.bindings.just_triggered(&ctx.input, InputAction::ResetBall) {
            self.physics
                .reset_body(self.bodies.ball, self.config.bodies.ball_spawn);
            log::info!("Ball reset");
        }

        if self.bindings.just_triggered(&ctx.input, InputAction::ToggleColliders) {
            ctx.debug.toggle_colliders();
            log::info!(
                "Collider wireframe {}",
                if ctx.debug.show_colliders { "on" } else { "off" }
            );
        }
    }

    fn handle_drag(&mut self, ctx: &mut EngineContext) {
        let ray = self.cursor_ray(ctx);

        if ctx.input.is_mouse_button_just_pressed(MouseButton::Left)
            && let Some(entity) = pick_draggable(&ctx.world, &ray)
        {
            self.drag.begin(entity);
        }

        if let Some(entity) = self.drag.selected()
            && ctx.input.mouse_delta() != glam::Vec2::ZERO
        {
            let current = ctx.world.get::<Transform>(entity).map(|t| t.position);
            if let Ok(current) = current
                && let Some(target) = self.drag.target(&ray, current)
            {
                move_entity(&mut ctx.world, entity, target);
            }
        }

        if ctx.input.is_mouse_button_just_released(MouseButton::Left) {
            self.drag.end();
        }
    }
}

impl Game for TableTennis {
    fn init(&mut self, ctx: &mut EngineContext) {
        self.camera.set_aspect(ctx.width(), ctx.height());

        let assets = &self.config.assets;
        let table = load_model(&assets.resolve(&assets.table_model))
            .unwrap_or_else(|| table_stand_in(&self.config.bodies));
        let bat = load_model(&assets.resolve(&assets.bat_model)).unwrap_or_else(bat_stand_in);

        let entities = spawn_entities(
            &mut ctx.world,
            &self.config.bodies,
            &self.bodies,
            bat.pick_shape(),
        );
        self.entities = Some(entities);

        let (world, renderer) = ctx.world_and_renderer();
        let Some(renderer) = renderer else {
            log::warn!("No renderer; the scene will simulate without drawing");
            return;
        };
        renderer.update_lights(&self.lights);

        let ball = ball_object(renderer, &self.config);
        let parts = [
            (entities.table, upload_model(renderer, table)),
            (entities.bat, upload_model(renderer, bat)),
            (entities.ball, vec![ball]),
        ];
        for (entity, objects) in parts {
            if let Err(e) = world.inner.insert_one(entity, RenderParts(objects)) {
                log::warn!("Cannot attach meshes to {entity:?}: {e}");
            }
        }

        log::info!("Scene ready");
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        self.handle_actions(ctx);
        self.handle_drag(ctx);

        push_kinematic_targets(&ctx.world, &mut self.physics);
        self.physics.step_frame(ctx.time.delta_seconds());
        sync_from_physics(&mut ctx.world, &self.physics);

        if ctx.debug.show_colliders
            && let Some(renderer) = ctx.renderer_mut()
        {
            renderer.set_debug_lines(&collider_lines(&self.physics));
        }
    }

    fn render(&mut self, ctx: &mut EngineContext) {
        let show_colliders = ctx.debug.show_colliders;
        let (world, renderer) = ctx.world_and_renderer();
        let Some(renderer) = renderer else {
            return;
        };

        renderer.update_camera(&self.camera);
        let renderer: &Renderer = renderer;

        let mut query = world.query::<(&Transform, &RenderParts)>();
        let drawables: Vec<_> = query.iter().map(|(_, components)| components).collect();

        for (transform, parts) in &drawables {
            for object in &parts.0 {
                object.set_world_transform(renderer, transform.matrix());
            }
        }

        let Some(mut frame) = renderer.begin_frame() else {
            return;
        };

        {
            let mut pass = renderer.begin_shadow_pass(&mut frame);
            for (_, parts) in &drawables {
                for object in &parts.0 {
                    renderer.draw_shadow_caster(&mut pass, object);
                }
            }
        }

        {
            let mut pass = renderer.begin_render_pass(&mut frame);
            for (_, parts) in &drawables {
                for object in &parts.0 {
                    renderer.draw_object(&mut pass, object);
                }
            }
            if show_colliders {
                renderer.draw_debug_lines(&mut pass);
            }
        }

        renderer.end_frame(frame);
    }

    fn on_resize(&mut self, _ctx: &mut EngineContext, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    fn shutdown(&mut self, _ctx: &mut EngineContext) {
        if let Some(position) = self.physics.get_position(self.bodies.ball) {
            log::info!("Shutting down; ball last seen at {position}");
        }
    }
}

fn load_model(path: &Path) -> Option<Model> {
    match Model::load(path) {
        Ok(model) => Some(model),
        Err(e) => {
            log::warn!("{e}; using a stand-in");
            None
        }
    }
}

fn load_map(renderer: &Renderer, path: &Path, color_space: ColorSpace) -> Option<Texture> {
    match Texture::from_path(renderer.device(), renderer.queue(), path, color_space) {
        Ok(texture) => Some(texture),
        Err(e) => {
            log::warn!("{}: {e}; using a neutral map", path.display());
            None
        }
    }
}

fn upload_model(renderer: &Renderer, model: Model) -> Vec<RenderObject> {
    model
        .parts
        .into_iter()
        .map(|part| {
            let base_color = part.base_color_image.as_ref().map(|image| {
                Texture::from_image(
                    renderer.device(),
                    renderer.queue(),
                    image,
                    ColorSpace::Srgb,
                    part.name.as_deref(),
                )
            });
            let maps = MaterialMaps {
                base_color,
                ..Default::default()
            };
            let material = renderer.create_material(&part.material, &maps);
            RenderObject::new(renderer, part.mesh, part.transform, material)
        })
        .collect()
}

fn ball_object(renderer: &Renderer, config: &DemoConfig) -> RenderObject {
    let assets = &config.assets;
    let maps = MaterialMaps {
        base_color: load_map(renderer, &assets.resolve(&assets.ball_base_color), ColorSpace::Srgb),
        roughness: load_map(renderer, &assets.resolve(&assets.ball_roughness), ColorSpace::Linear),
        normal: load_map(renderer, &assets.resolve(&assets.ball_normal), ColorSpace::Linear),
        ambient_occlusion: load_map(
            renderer,
            &assets.resolve(&assets.ball_ambient_occlusion),
            ColorSpace::Linear,
        ),
    };

    let material = if maps.base_color.is_some() {
        Material::textured()
    } else {
        Material {
            base_color: Vec3::new(1.0, 0.55, 0.1).extend(1.0),
            ..Material::textured()
        }
    };

    let mesh = Mesh::sphere(config.bodies.ball_radius, 16, 16);
    let gpu_material = renderer.create_material(&material, &maps);
    RenderObject::new(renderer, mesh, glam::Mat4::IDENTITY, gpu_material)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;
    use winit::event::ElementState;
    use winit::keyboard::KeyCode;

    use super::*;

    const WIDTH: u32 = 1280;
    const HEIGHT: u32 = 720;

    /// Scene initialised without a window; models fall back to stand-ins
    fn headless() -> (TableTennis, EngineContext) {
        let mut game = TableTennis::new(DemoConfig::default());
        let mut ctx = EngineContext::new(WIDTH, HEIGHT);
        game.init(&mut ctx);
        (game, ctx)
    }

    /// One engine frame of 20 ms, long enough for at least one physics step
    fn frame(game: &mut TableTennis, ctx: &mut EngineContext) {
        ctx.time.advance(Duration::from_millis(20));
        game.update(ctx);
        ctx.input.update();
    }

    /// Window pixel that shows `point`
    fn pixel_of(game: &TableTennis, point: Vec3) -> Vec2 {
        let ndc = game.camera.view_projection_matrix().project_point3(point);
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * WIDTH as f32,
            (1.0 - ndc.y) * 0.5 * HEIGHT as f32,
        )
    }

    fn press_key(ctx: &mut EngineContext, key: KeyCode) {
        ctx.input.process_keyboard(key, ElementState::Pressed);
    }

    #[test]
    fn test_press_drag_release_moves_bat_and_body() {
        let (mut game, mut ctx) = headless();
        let bat = game.entities.unwrap().bat;
        let start = game.config.bodies.bat_position;

        ctx.input.process_mouse_motion(pixel_of(&game, start));
        ctx.input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        frame(&mut game, &mut ctx);
        assert_eq!(game.drag.selected(), Some(bat));

        // The window centre looks straight down -Z and meets the drag plane at (0, 2, 0)
        ctx.input
            .process_mouse_motion(Vec2::new(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0));
        frame(&mut game, &mut ctx);

        let expected = Vec3::new(start.x, 2.0, 0.0);
        let moved = ctx.world.get::<Transform>(bat).unwrap().position;
        assert!((moved - expected).length() < 1e-3, "bat at {moved}");
        let body = game.physics.get_position(game.bodies.bat).unwrap();
        assert!((body - expected).length() < 1e-3, "bat body at {body}");

        ctx.input.process_mouse_button(MouseButton::Left, ElementState::Released);
        frame(&mut game, &mut ctx);
        assert_eq!(game.drag.selected(), None);

        ctx.input.process_mouse_motion(Vec2::new(100.0, 100.0));
        frame(&mut game, &mut ctx);
        let parked = ctx.world.get::<Transform>(bat).unwrap().position;
        assert!((parked - expected).length() < 1e-3);
    }

    #[test]
    fn test_press_away_from_bat_selects_nothing() {
        let (mut game, mut ctx) = headless();

        ctx.input.process_mouse_motion(Vec2::new(20.0, 20.0));
        ctx.input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        frame(&mut game, &mut ctx);
        assert_eq!(game.drag.selected(), None);

        ctx.input.process_mouse_motion(Vec2::new(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0));
        frame(&mut game, &mut ctx);
        let bat = game.entities.unwrap().bat;
        let position = ctx.world.get::<Transform>(bat).unwrap().position;
        assert_eq!(position, game.config.bodies.bat_position);
    }

    #[test]
    fn test_ball_mesh_follows_body_and_space_resets_it() {
        let (mut game, mut ctx) = headless();
        let ball = game.entities.unwrap().ball;
        let spawn = game.config.bodies.ball_spawn;

        for _ in 0..30 {
            frame(&mut game, &mut ctx);
        }
        let body = game.physics.get_position(game.bodies.ball).unwrap();
        let mesh = ctx.world.get::<Transform>(ball).unwrap().position;
        assert_eq!(mesh, body);
        assert!((body - spawn).length() > 0.5, "ball still near spawn at {body}");

        press_key(&mut ctx, KeyCode::Space);
        frame(&mut game, &mut ctx);
        let body = game.physics.get_position(game.bodies.ball).unwrap();
        assert!((body - spawn).length() < 0.02, "ball at {body} after reset");
    }

    #[test]
    fn test_f1_toggles_wireframe_and_escape_quits() {
        let (mut game, mut ctx) = headless();
        assert!(!ctx.debug.show_colliders);

        press_key(&mut ctx, KeyCode::F1);
        frame(&mut game, &mut ctx);
        assert!(ctx.debug.show_colliders);
        assert!(!ctx.should_quit());

        ctx.input.process_keyboard(KeyCode::F1, ElementState::Released);
        press_key(&mut ctx, KeyCode::F1);
        frame(&mut game, &mut ctx);
        assert!(!ctx.debug.show_colliders);

        press_key(&mut ctx, KeyCode::Escape);
        frame(&mut game, &mut ctx);
        assert!(ctx.should_quit());
    }
}
