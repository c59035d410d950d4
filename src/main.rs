//! Demo scene: fly camera, spinning cube, async glTF loading

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use glint::prelude::*;
use winit::keyboard::KeyCode;

const MODEL_PATH: &str = "assets/models/scene.gltf";

struct SceneObject {
    mesh: Mesh,
    buffer: glint::wgpu::Buffer,
    bind_group: glint::wgpu::BindGroup,
}

struct Demo {
    camera: Rc<RefCell<Camera>>,
    // Callbacks run during input dispatch and cannot reach the context, so
    // the pieces they need live in shared cells.
    move_dt: Rc<Cell<f32>>,
    quit: Rc<Cell<bool>>,
    fullscreen: Rc<Cell<bool>>,
    cursor_toggle: Rc<Cell<bool>>,
    cursor_visible: bool,
    light: Light,
    cube: Option<SceneObject>,
    floor: Option<SceneObject>,
    loader: ModelLoader,
    models: Vec<Model>,
}

impl Demo {
    fn new() -> Self {
        Self {
            camera: Rc::new(RefCell::new(Camera::new(Vec3::new(0.0, 1.5, 4.0)))),
            move_dt: Rc::new(Cell::new(0.0)),
            quit: Rc::new(Cell::new(false)),
            fullscreen: Rc::new(Cell::new(false)),
            cursor_toggle: Rc::new(Cell::new(false)),
            // Start in mouse-capture mode; T releases the cursor.
            cursor_visible: false,
            light: Light::new(Vec3::new(4.0, 6.0, 4.0)),
            cube: None,
            floor: None,
            loader: ModelLoader::new(),
            models: Vec::new(),
        }
    }

    fn register_actions(&self, ctx: &mut EngineContext) -> Result<(), InputError> {
        let quit = Rc::clone(&self.quit);
        ctx.input.register_action_with(
            "Quit",
            Binding::key(KeyCode::Escape, EdgeEvent::Pressed),
            move |_| quit.set(true),
        )?;

        let fullscreen = Rc::clone(&self.fullscreen);
        ctx.input.register_action_with(
            "ToggleFullscreen",
            Binding::key(KeyCode::KeyF, EdgeEvent::Pressed),
            move |_| fullscreen.set(true),
        )?;

        let cursor = Rc::clone(&self.cursor_toggle);
        ctx.input.register_action_with(
            "ToggleCursor",
            Binding::key(KeyCode::KeyT, EdgeEvent::Pressed),
            move |_| cursor.set(true),
        )?;

        let moves = [
            ("CameraForward", KeyCode::KeyW, Movement::Forward),
            ("CameraBackward", KeyCode::KeyS, Movement::Backward),
            ("CameraLeft", KeyCode::KeyA, Movement::Left),
            ("CameraRight", KeyCode::KeyD, Movement::Right),
            ("CameraUp", KeyCode::Space, Movement::Up),
            ("CameraDown", KeyCode::ControlLeft, Movement::Down),
        ];
        for (name, code, movement) in moves {
            let camera = Rc::clone(&self.camera);
            let dt = Rc::clone(&self.move_dt);
            ctx.input.register_action_with(
                name,
                Binding::key(code, EdgeEvent::Held),
                move |_| camera.borrow_mut().process_keyboard(movement, dt.get()),
            )?;
        }

        let camera = Rc::clone(&self.camera);
        ctx.input.register_action_with(
            "CameraLook",
            Binding::mouse_motion(f32::EPSILON, f32::EPSILON),
            move |frame| {
                camera
                    .borrow_mut()
                    .process_mouse_motion(frame.motion_delta.x, frame.motion_delta.y)
            },
        )?;
        // Looking only makes sense in mouse-capture mode.
        ctx.input.set_active("CameraLook", !self.cursor_visible)?;

        let camera = Rc::clone(&self.camera);
        ctx.input.register_action_with(
            "Zoom",
            Binding::mouse_scroll(0.0, 0.1),
            move |frame| camera.borrow_mut().process_scroll(frame.scroll_delta.y),
        )?;

        Ok(())
    }
}

impl Game for Demo {
    fn init(&mut self, ctx: &mut EngineContext) {
        if let Err(e) = self.register_actions(ctx) {
            log::error!("Input setup failed: {e}");
        }
        ctx.set_cursor_visible(self.cursor_visible);

        let (width, height) = ctx.window_size();
        self.camera.borrow_mut().set_aspect(width, height);
        ctx.renderer.update_light(&self.light);

        let mut cube_mesh = Mesh::cube();
        ctx.renderer.upload_mesh(&mut cube_mesh);
        let (buffer, bind_group) = ctx
            .renderer
            .create_model_bind_group(Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0)));
        self.cube = Some(SceneObject {
            mesh: cube_mesh,
            buffer,
            bind_group,
        });

        let mut floor_mesh = Mesh::plane(10.0);
        ctx.renderer.upload_mesh(&mut floor_mesh);
        let (buffer, bind_group) = ctx.renderer.create_model_bind_group(Mat4::IDENTITY);
        self.floor = Some(SceneObject {
            mesh: floor_mesh,
            buffer,
            bind_group,
        });

        if Path::new(MODEL_PATH).exists() {
            self.loader.load_async(MODEL_PATH);
        }
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        self.move_dt.set(ctx.delta_seconds());

        if self.quit.take() {
            ctx.quit();
        }
        if self.fullscreen.take() {
            ctx.toggle_fullscreen();
        }
        if self.cursor_toggle.take() {
            self.cursor_visible = !self.cursor_visible;
            ctx.set_cursor_visible(self.cursor_visible);
            if let Err(e) = ctx.input.set_active("CameraLook", !self.cursor_visible) {
                log::error!("{e}");
            }
        }

        let camera = self.camera.borrow();
        ctx.renderer.update_camera(&camera);

        ctx.debug.add_line(format!(
            "Camera: ({:.1}, {:.1}, {:.1})  fov {:.0}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.zoom()
        ));
        drop(camera);

        if let Some(cube) = &self.cube {
            let transform = Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0))
                * Mat4::from_rotation_y(ctx.time.elapsed_seconds() * 0.7);
            ctx.renderer.update_model_buffer(&cube.buffer, transform);
        }

        let loaded = self.loader.update(&ctx.renderer);
        self.models.extend(loaded);
        if self.loader.pending_count() > 0 {
            ctx.debug.add_line(format!(
                "Loading: {} model(s) pending",
                self.loader.pending_count()
            ));
        }
    }

    fn on_resize(&mut self, _ctx: &mut EngineContext, width: u32, height: u32) {
        self.camera.borrow_mut().set_aspect(width, height);
    }

    fn render(&mut self, ctx: &mut EngineContext, frame: &mut RenderFrame) {
        let mut render_pass = ctx.renderer.begin_render_pass(frame);

        for object in [&self.cube, &self.floor].into_iter().flatten() {
            ctx.renderer
                .draw_mesh(&mut render_pass, &object.mesh, &object.bind_group, None);
        }
        for model in &self.models {
            model.draw(&ctx.renderer, &mut render_pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_starts_in_capture_mode() {
        let demo = Demo::new();
        assert!(!demo.cursor_visible);
    }
}

fn main() -> Result<(), winit::error::EventLoopError> {
    let config = EngineConfig::new().title("glint demo").size(1280, 720);
    Engine::new(config, Demo::new()).run()
}
