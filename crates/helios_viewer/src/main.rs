//! Interactive demo viewer.
//!
//! Opens a window, drives the camera from keyboard and mouse input, and
//! presents the renderer's pixel buffer through a softbuffer surface.
//!
//! Bindings: WASD + mouse fly the camera (LShift = 4x speed), left/right
//! arrows change the field of view, F2 toggles shadows, F3 cycles the
//! lighting mode, X saves the current frame as a BMP.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use helios_core::{load_obj, CullMode, Light, Material, Plane, Scene, Sphere, TriangleMesh};
use helios_math::{ColorRGB, Vec3};
use helios_renderer::{Camera, Framebuffer, Renderer};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

const MOVEMENT_SPEED: f32 = 5.0;
const ROTATION_SPEED: f32 = 0.5;
const BOOST_FACTOR: f32 = 4.0;

const SCREENSHOT_FILE: &str = "RayTracing_Buffer.bmp";
const BUNNY_OBJ: &str = "resources/lowpoly_bunny.obj";

/// Application state
struct App {
    window: Option<Arc<Window>>,
    context: Option<softbuffer::Context<Arc<Window>>>,
    surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,

    scene: Scene,
    camera: Camera,
    renderer: Renderer,
    frame: Framebuffer,

    // Input state
    keys_pressed: HashSet<KeyCode>,
    left_mouse_pressed: bool,
    right_mouse_pressed: bool,
    middle_mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    mouse_delta: (f32, f32),
    last_frame_time: Instant,

    // Demo animation and stats
    mesh_yaw: f32,
    fps_accumulator: f32,
    fps_frames: u32,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            context: None,
            surface: None,
            scene: build_scene(),
            camera: Camera::new(Vec3::new(0.0, 3.0, -9.0), 45.0),
            renderer: Renderer::new(WIDTH, HEIGHT),
            frame: Framebuffer::new(WIDTH, HEIGHT),
            keys_pressed: HashSet::new(),
            left_mouse_pressed: false,
            right_mouse_pressed: false,
            middle_mouse_pressed: false,
            last_mouse_pos: None,
            mouse_delta: (0.0, 0.0),
            last_frame_time: Instant::now(),
            mesh_yaw: 0.0,
            fps_accumulator: 0.0,
            fps_frames: 0,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return; // minimized
        };
        if let Some(surface) = &mut self.surface {
            if surface.resize(w, h).is_err() {
                log::error!("failed to resize surface to {width}x{height}");
                return;
            }
        }
        self.renderer = Renderer::new(width, height);
        self.frame = Framebuffer::new(width, height);
    }

    /// Apply the per-frame input mapping to the camera.
    fn update_camera(&mut self, delta_time: f32) {
        let boost = if self.keys_pressed.contains(&KeyCode::ShiftLeft) {
            BOOST_FACTOR
        } else {
            1.0
        };
        let movement_speed = MOVEMENT_SPEED * boost;
        let rotation_speed = ROTATION_SPEED * boost;

        let forward = self.camera.forward;
        let right = self.camera.right;
        let up = self.camera.up;

        if self.keys_pressed.contains(&KeyCode::KeyW) {
            self.camera.translate(forward * movement_speed * delta_time);
        }
        if self.keys_pressed.contains(&KeyCode::KeyS) {
            self.camera.translate(-forward * movement_speed * delta_time);
        }
        if self.keys_pressed.contains(&KeyCode::KeyD) {
            self.camera.translate(right * movement_speed * delta_time);
        }
        if self.keys_pressed.contains(&KeyCode::KeyA) {
            self.camera.translate(-right * movement_speed * delta_time);
        }

        if self.keys_pressed.contains(&KeyCode::ArrowLeft) {
            self.camera.add_fov(-movement_speed * delta_time);
        }
        if self.keys_pressed.contains(&KeyCode::ArrowRight) {
            self.camera.add_fov(movement_speed * delta_time);
        }

        let (dx, dy) = self.mouse_delta;
        self.mouse_delta = (0.0, 0.0);
        if dx != 0.0 || dy != 0.0 {
            if self.left_mouse_pressed && self.right_mouse_pressed {
                // Pan in the view plane
                self.camera.translate(right * movement_speed * dx * delta_time);
                self.camera.translate(-up * movement_speed * dy * delta_time);
            } else if self.left_mouse_pressed {
                // Turn and dolly
                self.camera.add_yaw(rotation_speed * dx * delta_time);
                self.camera
                    .translate(-forward * movement_speed * dy * delta_time);
            } else if self.right_mouse_pressed {
                // Free look
                self.camera.add_yaw(rotation_speed * dx * delta_time);
                self.camera.add_pitch(-rotation_speed * dy * delta_time);
            } else if self.middle_mouse_pressed {
                self.camera
                    .translate(-forward * movement_speed * dy * delta_time);
            }
        }

        self.camera.update();
    }

    fn render_frame(&mut self) {
        let now = Instant::now();
        let delta_time = (now - self.last_frame_time).as_secs_f32().max(0.0);
        self.last_frame_time = now;

        self.update_camera(delta_time);

        // Spin the meshes; their BVHs are refit, not rebuilt.
        self.mesh_yaw += delta_time;
        for mesh in self.scene.meshes_mut() {
            mesh.set_rotation_y(self.mesh_yaw);
            mesh.update_transforms();
        }

        if let Err(e) = self.renderer.render(&self.scene, &self.camera, &mut self.frame) {
            log::error!("render failed: {e}");
            return;
        }

        if let Some(surface) = &mut self.surface {
            match surface.buffer_mut() {
                Ok(mut buffer) => {
                    buffer.copy_from_slice(self.frame.pixels());
                    if let Err(e) = buffer.present() {
                        log::error!("present failed: {e}");
                    }
                }
                Err(e) => log::error!("surface lock failed: {e}"),
            }
        }

        self.fps_accumulator += delta_time;
        self.fps_frames += 1;
        if self.fps_accumulator >= 1.0 {
            log::info!(
                "{:.1} fps ({:.1} ms/frame)",
                self.fps_frames as f32 / self.fps_accumulator,
                1000.0 * self.fps_accumulator / self.fps_frames as f32
            );
            self.fps_accumulator = 0.0;
            self.fps_frames = 0;
        }
    }

    fn handle_key_press(&mut self, key: KeyCode) {
        match key {
            KeyCode::F2 => {
                self.renderer.toggle_shadows();
                log::info!("shadows: {}", self.renderer.shadows_enabled());
            }
            KeyCode::F3 => {
                self.renderer.cycle_lighting_mode();
                log::info!("lighting mode: {:?}", self.renderer.lighting_mode());
            }
            KeyCode::KeyX => match self.frame.save_bmp(SCREENSHOT_FILE) {
                Ok(()) => log::info!("saved {SCREENSHOT_FILE}"),
                Err(e) => log::error!("failed to save {SCREENSHOT_FILE}: {e}"),
            },
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Helios Ray Tracer")
                .with_inner_size(winit::dpi::PhysicalSize::new(WIDTH, HEIGHT))
                .with_resizable(false);

            let window = Arc::new(
                event_loop
                    .create_window(window_attrs)
                    .expect("Failed to create window"),
            );

            let context =
                softbuffer::Context::new(window.clone()).expect("Failed to create surface context");
            let surface = softbuffer::Surface::new(&context, window.clone())
                .expect("Failed to create surface");

            self.window = Some(window);
            self.context = Some(context);
            self.surface = Some(surface);
            self.resize(WIDTH, HEIGHT);

            log::info!("window and surface initialized at {WIDTH}x{HEIGHT}");

            if let Some(window) = &self.window {
                window.request_redraw();
            }
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
                log::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size.width, physical_size.height);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.left_mouse_pressed = pressed,
                    MouseButton::Right => self.right_mouse_pressed = pressed,
                    MouseButton::Middle => self.middle_mouse_pressed = pressed,
                    _ => {}
                }
                if !pressed {
                    self.last_mouse_pos = None;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let any_button = self.left_mouse_pressed
                    || self.right_mouse_pressed
                    || self.middle_mouse_pressed;
                if any_button {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        self.mouse_delta.0 += (position.x - last_x) as f32;
                        self.mouse_delta.1 += (position.y - last_y) as f32;
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.keys_pressed.insert(keycode);
                    if !repeat {
                        self.handle_key_press(keycode);
                    }
                }
                ElementState::Released => {
                    self.keys_pressed.remove(&keycode);
                }
            },
            WindowEvent::RedrawRequested => {
                self.render_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// The in-code demo scene: five enclosing planes, two rows of spheres
/// sweeping roughness across metal and plastic, three spinning quads with
/// different cull modes, and warm/cool point lights.
fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let gray_blue = scene.add_material(Material::Lambert {
        reflectance: 1.0,
        color: ColorRGB::new(0.49, 0.57, 0.57),
    });
    let white = scene.add_material(Material::Lambert {
        reflectance: 1.0,
        color: ColorRGB::ONE,
    });

    let silver = ColorRGB::new(0.972, 0.960, 0.915);
    let metal_rough = scene.add_material(Material::CookTorrance {
        albedo: silver,
        metalness: 1.0,
        roughness: 1.0,
    });
    let metal_medium = scene.add_material(Material::CookTorrance {
        albedo: silver,
        metalness: 1.0,
        roughness: 0.6,
    });
    let metal_smooth = scene.add_material(Material::CookTorrance {
        albedo: silver,
        metalness: 1.0,
        roughness: 0.1,
    });

    let plastic = ColorRGB::splat(0.75);
    let plastic_rough = scene.add_material(Material::CookTorrance {
        albedo: plastic,
        metalness: 0.0,
        roughness: 1.0,
    });
    let plastic_medium = scene.add_material(Material::CookTorrance {
        albedo: plastic,
        metalness: 0.0,
        roughness: 0.4,
    });
    let plastic_smooth = scene.add_material(Material::CookTorrance {
        albedo: plastic,
        metalness: 0.0,
        roughness: 0.1,
    });

    // Room
    scene.add_plane(Plane::new(Vec3::ZERO, Vec3::Y, gray_blue));
    scene.add_plane(Plane::new(Vec3::new(0.0, 10.0, 0.0), -Vec3::Y, gray_blue));
    scene.add_plane(Plane::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z, gray_blue));
    scene.add_plane(Plane::new(Vec3::new(5.75, 0.0, 0.0), -Vec3::X, gray_blue));
    scene.add_plane(Plane::new(Vec3::new(-5.75, 0.0, 0.0), Vec3::X, gray_blue));

    // Metal row below, plastic row above
    scene.add_sphere(Sphere::new(Vec3::new(-1.75, 1.0, 0.0), 0.75, metal_rough));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 0.75, metal_medium));
    scene.add_sphere(Sphere::new(Vec3::new(1.75, 1.0, 0.0), 0.75, metal_smooth));
    scene.add_sphere(Sphere::new(Vec3::new(-1.75, 3.0, 0.0), 0.75, plastic_rough));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, 3.0, 0.0), 0.75, plastic_medium));
    scene.add_sphere(Sphere::new(Vec3::new(1.75, 3.0, 0.0), 0.75, plastic_smooth));

    // Spinning quads, one per cull mode
    for (x, cull_mode) in [
        (-1.75, CullMode::BackFace),
        (0.0, CullMode::FrontFace),
        (1.75, CullMode::NoCulling),
    ] {
        let mut quad = quad_mesh(0.75, cull_mode, white);
        quad.set_translation(Vec3::new(x, 4.5, 0.0));
        quad.update_transforms();
        scene.add_mesh(quad);
    }

    // An OBJ mesh if one is available next to the binary
    match load_obj(BUNNY_OBJ) {
        Ok(obj) => {
            let mut mesh = TriangleMesh::with_normals(
                obj.positions,
                obj.indices,
                obj.normals,
                CullMode::BackFace,
                white,
            );
            mesh.set_scale(Vec3::splat(2.0));
            mesh.set_translation(Vec3::new(0.0, 0.0, 3.0));
            mesh.update_transforms();
            log::info!("loaded {} ({} triangles)", BUNNY_OBJ, mesh.triangle_count());
            scene.add_mesh(mesh);
        }
        Err(e) => log::warn!("no OBJ mesh in the scene: {e}"),
    }

    scene.add_light(Light::point(
        Vec3::new(0.0, 5.0, 5.0),
        ColorRGB::new(1.0, 0.61, 0.45),
        50.0,
    ));
    scene.add_light(Light::point(
        Vec3::new(-2.5, 5.0, -5.0),
        ColorRGB::new(1.0, 0.8, 0.45),
        70.0,
    ));
    scene.add_light(Light::point(
        Vec3::new(2.5, 2.5, -5.0),
        ColorRGB::new(0.34, 0.47, 0.68),
        50.0,
    ));

    scene
}

/// A two-triangle quad centered on the origin in the XY plane.
fn quad_mesh(half_extent: f32, cull_mode: CullMode, material_index: usize) -> TriangleMesh {
    let h = half_extent;
    TriangleMesh::new(
        vec![
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ],
        vec![0, 1, 2, 0, 2, 3],
        cull_mode,
        material_index,
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("starting helios viewer");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
