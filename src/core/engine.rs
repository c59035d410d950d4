//! Engine core: window lifecycle, event routing, and the frame loop

use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Fullscreen, Window, WindowId};

use crate::input::InputManager;
use crate::renderer::{RenderFrame, Renderer};
use crate::ui::DebugOverlay;

use super::debug::DebugInfo;
use super::time::{FixedStep, Time};

/// Window and renderer configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }
}

/// Application hooks called by the engine loop
pub trait Game {
    /// Called once after the window and renderer exist
    fn init(&mut self, ctx: &mut EngineContext);

    /// Called every frame, after input dispatch
    fn update(&mut self, ctx: &mut EngineContext);

    /// Called at the fixed simulation rate, zero or more times per frame
    fn fixed_update(&mut self, _ctx: &mut EngineContext) {}

    /// Record scene draw commands into the frame
    fn render(&mut self, ctx: &mut EngineContext, frame: &mut RenderFrame);

    /// Called after the surface has been resized
    fn on_resize(&mut self, _ctx: &mut EngineContext, _width: u32, _height: u32) {}

    /// Called once when the event loop is about to exit
    fn shutdown(&mut self, _ctx: &mut EngineContext) {}
}

/// Per-frame services handed to the [`Game`] hooks
pub struct EngineContext {
    pub time: Time,
    pub fixed_step: FixedStep,
    pub input: InputManager,
    pub debug: DebugInfo,
    pub renderer: Renderer,
    window_size: (u32, u32),
    should_quit: bool,
    cursor_request: Option<bool>,
    fullscreen_toggle: bool,
}

impl EngineContext {
    fn new(renderer: Renderer, window_size: (u32, u32)) -> Self {
        Self {
            time: Time::new(),
            fixed_step: FixedStep::new(60.0),
            input: InputManager::new(),
            debug: DebugInfo::new(),
            renderer,
            window_size,
            should_quit: false,
            cursor_request: None,
            fullscreen_toggle: false,
        }
    }

    /// Ask the engine to exit at the end of this frame
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Request a cursor visibility change, applied after `update`
    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_request = Some(visible);
    }

    /// Request a fullscreen toggle, applied after `update`
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_toggle = !self.fullscreen_toggle;
    }

    /// Current window size in physical pixels
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Shorthand for the frame's delta time in seconds
    pub fn delta_seconds(&self) -> f32 {
        self.time.delta_seconds()
    }
}

/// Owns the window, the game, and the frame loop
pub struct Engine<G: Game> {
    config: EngineConfig,
    game: G,
    window: Option<Arc<Window>>,
    overlay: Option<DebugOverlay>,
    ctx: Option<EngineContext>,
}

impl<G: Game> Engine<G> {
    pub fn new(config: EngineConfig, game: G) -> Self {
        Self {
            config,
            game,
            window: None,
            overlay: None,
            ctx: None,
        }
    }

    /// Run the event loop until the game quits or the window closes
    pub fn run(mut self) -> Result<(), winit::error::EventLoopError> {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .try_init();

        log::info!("Starting engine: {}", self.config.title);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Self {
            game,
            window,
            overlay,
            ctx,
            ..
        } = self;
        let (Some(window), Some(overlay), Some(ctx)) =
            (window.as_ref(), overlay.as_mut(), ctx.as_mut())
        else {
            return;
        };

        ctx.time.update();
        let delta = ctx.time.delta();
        ctx.debug.record_frame(delta);

        for _ in 0..ctx.fixed_step.tick(delta) {
            game.fixed_update(ctx);
        }

        // Exactly once per frame: evaluates bindings, runs callbacks,
        // advances the input snapshots.
        ctx.input.process_frame();

        game.update(ctx);

        if let Some(visible) = ctx.cursor_request.take() {
            window.set_cursor_visible(visible);
        }
        if std::mem::take(&mut ctx.fullscreen_toggle) {
            let fullscreen = window
                .fullscreen()
                .is_none()
                .then(|| Fullscreen::Borderless(None));
            window.set_fullscreen(fullscreen);
        }
        if ctx.should_quit {
            event_loop.exit();
            return;
        }

        let Some(mut frame) = ctx.renderer.begin_frame() else {
            return;
        };

        game.render(ctx, &mut frame);

        if ctx.debug.enabled {
            let fps = ctx.debug.frame_stats.fps();
            let avg = ctx.debug.frame_stats.avg_frame_time_ms();
            let min = ctx.debug.frame_stats.min_frame_time_ms();
            let max = ctx.debug.frame_stats.max_frame_time_ms();
            let lines = ctx.debug.custom_lines().to_vec();
            let supports_wireframe = ctx.renderer.supports_wireframe();
            let mut wireframe = ctx.renderer.wireframe;
            let size = ctx.renderer.size();

            let (view, encoder) = frame.overlay_target();
            overlay.draw(
                window,
                ctx.renderer.device(),
                ctx.renderer.queue(),
                encoder,
                view,
                size,
                |egui_ctx| {
                    egui::Window::new("Debug Panel")
                        .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
                        .resizable(false)
                        .show(egui_ctx, |ui| {
                            ui.label(format!("FPS: {fps:.1}"));
                            ui.label(format!(
                                "Frame: {avg:.2} ms (min {min:.2}, max {max:.2})"
                            ));
                            ui.label(format!("Window: {}x{}", size.0, size.1));
                            if supports_wireframe {
                                ui.checkbox(&mut wireframe, "Wireframe");
                            }
                            if !lines.is_empty() {
                                ui.separator();
                                for line in &lines {
                                    ui.label(line);
                                }
                            }
                        });
                },
            );

            ctx.renderer.wireframe = wireframe;
        }
        ctx.debug.clear_lines();

        ctx.renderer.end_frame(frame);
    }
}

impl<G: Game> ApplicationHandler for Engine<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .expect("Failed to create window"),
        );

        let renderer = pollster::block_on(Renderer::new(window.clone(), self.config.vsync));
        let overlay = DebugOverlay::new(&window, renderer.device(), renderer.surface_format());
        let size = renderer.size();

        let mut ctx = EngineContext::new(renderer, size);
        self.game.init(&mut ctx);

        self.window = Some(window);
        self.overlay = Some(overlay);
        self.ctx = Some(ctx);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(overlay)) = (self.window.as_ref(), self.overlay.as_mut()) else {
            return;
        };

        // egui gets first refusal; consumed events never reach game input.
        let consumed = overlay.on_window_event(window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let Self { game, ctx, .. } = self;
                if let Some(ctx) = ctx.as_mut() {
                    ctx.window_size = (size.width, size.height);
                    ctx.renderer.resize(size.width, size.height);
                    game.on_resize(ctx, size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                if let (PhysicalKey::Code(code), Some(ctx)) =
                    (event.physical_key, self.ctx.as_mut())
                {
                    ctx.input.key_transition(code, event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } if !consumed => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.input.mouse_button_transition(button, state);
                }
            }
            WindowEvent::CursorMoved { position, .. } if !consumed => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.input
                        .set_mouse_position(Vec2::new(position.x as f32, position.y as f32));
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                if let Some(ctx) = self.ctx.as_mut() {
                    let delta = match delta {
                        MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y),
                        MouseScrollDelta::PixelDelta(pos) => {
                            Vec2::new(pos.x as f32, pos.y as f32) / 20.0
                        }
                    };
                    ctx.input.add_scroll(delta);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let Self { game, ctx, .. } = self;
        if let Some(ctx) = ctx.as_mut() {
            game.shutdown(ctx);
        }
        log::info!("Engine shut down");
    }
}
