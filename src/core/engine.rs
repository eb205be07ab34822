//! Core Engine struct and main game loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::core::Time;
use crate::core::config::WindowSettings;
use crate::core::debug::DebugInfo;
use crate::ecs::World;
use crate::input::Input;
use crate::renderer::{Renderer, ShadowConfig};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Frame rate cap when VSync is off (0 for unlimited)
    pub target_fps: u32,
    /// Enable VSync
    pub vsync: bool,
    /// Shadow map parameters
    pub shadows: ShadowConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Engine"),
            width: 1280,
            height: 720,
            target_fps: 60,
            vsync: true,
            shadows: ShadowConfig::default(),
        }
    }
}

impl From<&WindowSettings> for EngineConfig {
    fn from(window: &WindowSettings) -> Self {
        Self::default()
            .with_title(window.title.clone())
            .with_size(window.width, window.height)
            .with_vsync(window.vsync)
    }
}

impl EngineConfig {
    /// Create a new config with a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set window dimensions
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Enable or disable VSync
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Set shadow map parameters
    pub fn with_shadows(mut self, shadows: ShadowConfig) -> Self {
        self.shadows = shadows;
        self
    }

    /// Minimum time between frames, if frames are paced by the engine
    pub fn frame_interval(&self) -> Option<Duration> {
        (!self.vsync && self.target_fps > 0)
            .then(|| Duration::from_secs_f64(1.0 / f64::from(self.target_fps)))
    }
}

/// Game trait that users implement
pub trait Game: 'static {
    /// Called once when the engine starts
    fn init(&mut self, engine: &mut EngineContext);

    /// Called every frame for game logic updates
    fn update(&mut self, engine: &mut EngineContext);

    /// Called every frame for rendering
    fn render(&mut self, engine: &mut EngineContext);

    /// Called when the window is resized
    fn on_resize(&mut self, _engine: &mut EngineContext, _width: u32, _height: u32) {}

    /// Called when the game is shutting down
    fn shutdown(&mut self, _engine: &mut EngineContext) {}
}

/// Context passed to game callbacks
pub struct EngineContext {
    /// Time tracking
    pub time: Time,
    /// Input state
    pub input: Input,
    /// ECS world
    pub world: World,
    /// Debug information and stats
    pub debug: DebugInfo,
    /// Renderer (available after initialization)
    renderer: Option<Renderer>,
    /// Window size
    window_size: PhysicalSize<u32>,
    /// Should the engine quit
    should_quit: bool,
}

impl EngineContext {
    /// Context with no window or renderer yet
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            time: Time::new(),
            input: Input::new(),
            world: World::new(),
            debug: DebugInfo::new(),
            renderer: None,
            window_size: PhysicalSize::new(width, height),
            should_quit: false,
        }
    }

    /// Get the renderer, once the window exists
    pub fn renderer(&self) -> Option<&Renderer> {
        self.renderer.as_ref()
    }

    /// Get the renderer mutably
    pub fn renderer_mut(&mut self) -> Option<&mut Renderer> {
        self.renderer.as_mut()
    }

    /// Split borrow of the world and the renderer
    pub fn world_and_renderer(&mut self) -> (&mut World, Option<&mut Renderer>) {
        (&mut self.world, self.renderer.as_mut())
    }

    /// Get window width
    pub fn width(&self) -> u32 {
        self.window_size.width
    }

    /// Get window height
    pub fn height(&self) -> u32 {
        self.window_size.height
    }

    /// Get aspect ratio
    pub fn aspect_ratio(&self) -> f32 {
        self.window_size.width as f32 / self.window_size.height.max(1) as f32
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Main engine struct
pub struct Engine<G: Game> {
    config: EngineConfig,
    game: G,
    context: EngineContext,
    window: Option<Arc<Window>>,
    initialized: bool,
    last_redraw: Instant,
    fatal: Option<Box<dyn std::error::Error>>,
}

impl<G: Game> Engine<G> {
    /// Create a new engine with the given game
    pub fn new(config: EngineConfig, game: G) -> Self {
        let context = EngineContext::new(config.width, config.height);
        Self {
            config,
            game,
            context,
            window: None,
            initialized: false,
            last_redraw: Instant::now(),
            fatal: None,
        }
    }

    /// Run the engine until the window closes
    ///
    /// # Errors
    ///
    /// Returns an error if the event loop, the window or the renderer cannot
    /// be created
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        // The binary may already have installed the logger
        let _ = env_logger::try_init();
        log::info!("Starting engine: {}", self.config.title);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Box<dyn std::error::Error>) {
        log::error!("{error}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.last_redraw = Instant::now();
        self.context.time.update();

        if let Some(summary) = self.context.debug.record_frame(self.context.time.delta()) {
            log::debug!("{summary}");
        }

        self.game.update(&mut self.context);

        if self.context.should_quit() {
            self.game.shutdown(&mut self.context);
            event_loop.exit();
            return;
        }

        self.game.render(&mut self.context);

        // Clear per-frame input state
        self.context.input.update();

        if self.config.frame_interval().is_none()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}

impl<G: Game> ApplicationHandler for Engine<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, Box::new(e)),
        };

        let renderer = match pollster::block_on(Renderer::new(
            Arc::clone(&window),
            self.config.vsync,
            self.config.shadows.clone(),
        )) {
            Ok(renderer) => renderer,
            Err(e) => return self.fail(event_loop, Box::new(e)),
        };

        self.context.window_size = window.inner_size();
        self.context.renderer = Some(renderer);
        self.window = Some(window);

        if !self.initialized {
            self.game.init(&mut self.context);
            self.initialized = true;
            log::info!("Engine initialized successfully");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                self.game.shutdown(&mut self.context);
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    self.context.window_size = new_size;
                    if let Some(renderer) = &mut self.context.renderer {
                        renderer.resize(new_size.width, new_size.height);
                    }
                    self.game
                        .on_resize(&mut self.context, new_size.width, new_size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key_code) = event.physical_key {
                    self.context.input.process_keyboard(key_code, event.state);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.context.input.process_mouse_button(button, state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.context
                    .input
                    .process_mouse_motion(glam::Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        match self.config.frame_interval() {
            Some(interval) => {
                let next = self.last_redraw + interval;
                if Instant::now() >= next {
                    event_loop.set_control_flow(ControlFlow::Poll);
                    window.request_redraw();
                } else {
                    event_loop.set_control_flow(ControlFlow::WaitUntil(next));
                }
            }
            None => window.request_redraw(),
        }
    }
}
