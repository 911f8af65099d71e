//! Per-pixel ray dispatch and shading composition.

use crate::camera::Camera;
use crate::framebuffer::Framebuffer;
use helios_core::{HitRecord, Light, LightKind, Scene};
use helios_math::{max_to_one, pack_rgb, ColorRGB, Mat4, Mat4Ext, Ray, Vec3};
use rayon::prelude::*;
use thiserror::Error;

/// Offset applied along the surface normal before spawning shadow rays,
/// so a shadow ray never re-intersects the surface it starts on.
const SHADOW_BIAS: f32 = 2e-4;

/// What the per-light contribution is composed of.
///
/// The first three isolate one factor of the full product for debugging;
/// `Combined` is the default `radiance * brdf * cos` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingMode {
    /// `max(0, n.l)` as grayscale
    ObservedArea,
    /// Incident radiance only
    Radiance,
    /// Material shade only
    Brdf,
    Combined,
}

/// Frame-fatal render failures. Anything that goes wrong inside a single
/// pixel stays inside that pixel (it renders black).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("framebuffer is {actual_width}x{actual_height}, renderer expects {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Turns camera + scene into frames of packed pixels.
pub struct Renderer {
    width: u32,
    height: u32,
    lighting_mode: LightingMode,
    shadows_enabled: bool,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            lighting_mode: LightingMode::Combined,
            shadows_enabled: true,
        }
    }

    pub fn lighting_mode(&self) -> LightingMode {
        self.lighting_mode
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    /// Step to the next lighting mode, wrapping after `Combined`.
    pub fn cycle_lighting_mode(&mut self) {
        self.lighting_mode = match self.lighting_mode {
            LightingMode::ObservedArea => LightingMode::Radiance,
            LightingMode::Radiance => LightingMode::Brdf,
            LightingMode::Brdf => LightingMode::Combined,
            LightingMode::Combined => LightingMode::ObservedArea,
        };
    }

    pub fn toggle_shadows(&mut self) {
        self.shadows_enabled = !self.shadows_enabled;
    }

    /// Render one frame into the framebuffer.
    ///
    /// Pixel tasks are independent and the scene is read-only for the
    /// duration of the call, so the flat pixel range is dispatched to a
    /// rayon parallel-for; the call returns after the last pixel task.
    pub fn render(
        &self,
        scene: &Scene,
        camera: &Camera,
        frame: &mut Framebuffer,
    ) -> Result<(), RenderError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(RenderError::DimensionMismatch {
                width: self.width,
                height: self.height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }

        let fov_scale = (camera.fov_angle().to_radians() / 2.0).tan();
        let aspect = self.width as f32 / self.height as f32;
        let camera_to_world = camera.camera_to_world();
        let camera_origin = camera.origin;

        frame
            .pixels_mut()
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, pixel)| {
                *pixel = self.render_pixel(
                    scene,
                    camera_origin,
                    &camera_to_world,
                    fov_scale,
                    aspect,
                    index as u32,
                );
            });

        Ok(())
    }

    fn render_pixel(
        &self,
        scene: &Scene,
        camera_origin: Vec3,
        camera_to_world: &Mat4,
        fov_scale: f32,
        aspect: f32,
        index: u32,
    ) -> u32 {
        let px = (index % self.width) as f32;
        let py = (index / self.width) as f32;

        // NDC -> camera space, then rotate into the world (no translation)
        let cx = (2.0 * (px + 0.5) / self.width as f32 - 1.0) * aspect * fov_scale;
        let cy = (1.0 - 2.0 * (py + 0.5) / self.height as f32) * fov_scale;
        let direction = camera_to_world.transform_vector3(Vec3::new(cx, cy, 1.0).normalize());

        let view_ray = Ray::new(camera_origin, direction);
        let hit = scene.closest_hit(&view_ray);

        let mut final_color = ColorRGB::ZERO;
        if hit.did_hit {
            let shadow_origin = hit.origin + hit.normal * SHADOW_BIAS;

            for light in scene.lights() {
                let to_light = light.direction_to(shadow_origin);
                let distance = to_light.length();
                let l = to_light / distance;

                if self.shadows_enabled {
                    let t_max = match light.kind {
                        LightKind::Point => distance,
                        LightKind::Directional => f32::INFINITY,
                    };
                    if scene.does_hit(&Ray::with_limit(shadow_origin, l, t_max)) {
                        continue;
                    }
                }

                final_color += self.light_contribution(scene, light, &hit, l, direction);
            }
        }

        pack_rgb(max_to_one(final_color))
    }

    fn light_contribution(
        &self,
        scene: &Scene,
        light: &Light,
        hit: &HitRecord,
        l: Vec3,
        view_direction: Vec3,
    ) -> ColorRGB {
        let observed_area = hit.normal.dot(l);

        match self.lighting_mode {
            LightingMode::ObservedArea => {
                if observed_area > 0.0 {
                    ColorRGB::ONE * observed_area
                } else {
                    ColorRGB::ZERO
                }
            }
            LightingMode::Radiance => light.radiance(hit.origin),
            LightingMode::Brdf => match scene.materials().get(hit.material_index) {
                Some(material) => material.shade(hit, l, view_direction),
                None => ColorRGB::ZERO,
            },
            LightingMode::Combined => {
                if observed_area <= 0.0 {
                    return ColorRGB::ZERO;
                }
                match scene.materials().get(hit.material_index) {
                    Some(material) => {
                        light.radiance(hit.origin)
                            * material.shade(hit, l, view_direction)
                            * observed_area
                    }
                    None => ColorRGB::ZERO,
                }
            }
        }
    }
}
