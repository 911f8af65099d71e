//! Materials and their BRDF evaluators.
//!
//! Materials are a tagged variant rather than trait objects: each variant
//! stores its parameters inline and `shade` dispatches on the tag, so hit
//! records can reference materials by plain index into a scene-owned list.

use crate::hit::HitRecord;
use helios_math::{ColorRGB, Vec3};
use std::f32::consts::PI;

/// A shadeable surface description.
///
/// `shade` receives the direction `l` from the hit point toward the light
/// and the primary ray direction `v` (camera toward surface).
#[derive(Debug, Clone, Copy)]
pub enum Material {
    /// Flat color, no lighting response shaping
    SolidColor { color: ColorRGB },
    /// Lambert diffuse
    Lambert {
        reflectance: f32,
        color: ColorRGB,
    },
    /// Lambert diffuse plus a Phong specular lobe
    LambertPhong {
        diffuse_reflectance: f32,
        specular_reflectance: f32,
        phong_exponent: f32,
        color: ColorRGB,
    },
    /// Cook-Torrance microfacet model (GGX distribution, Smith-Schlick
    /// geometry, Schlick fresnel)
    CookTorrance {
        albedo: ColorRGB,
        metalness: f32,
        roughness: f32,
    },
}

impl Material {
    pub fn shade(&self, hit: &HitRecord, l: Vec3, v: Vec3) -> ColorRGB {
        match *self {
            Material::SolidColor { color } => color,

            Material::Lambert { reflectance, color } => brdf::lambert(reflectance, color),

            Material::LambertPhong {
                diffuse_reflectance,
                specular_reflectance,
                phong_exponent,
                color,
            } => {
                brdf::lambert(diffuse_reflectance, color)
                    + brdf::phong(specular_reflectance, phong_exponent, l, v, hit.normal)
            }

            Material::CookTorrance {
                albedo,
                metalness,
                roughness,
            } => {
                let n = hit.normal;
                // The microfacet terms want the outgoing view vector.
                let view = -v;
                let h = (view + l).normalize();

                let f0 = ColorRGB::splat(0.04).lerp(albedo, metalness);
                let fresnel = brdf::fresnel_schlick(h, view, f0);
                let distribution = brdf::normal_distribution_ggx(n, h, roughness);
                let geometry = brdf::geometry_smith(n, view, l, roughness);

                let n_dot_v = n.dot(view).max(0.0);
                let n_dot_l = n.dot(l).max(0.0);
                let specular =
                    fresnel * distribution * geometry / (4.0 * n_dot_v * n_dot_l + 1e-5);

                let kd = (ColorRGB::ONE - fresnel) * (1.0 - metalness);
                let diffuse = kd * albedo / PI;

                diffuse + specular
            }
        }
    }
}

/// The individual BRDF terms, as pure functions.
pub mod brdf {
    use helios_math::{ColorRGB, Vec3};
    use std::f32::consts::PI;

    /// Lambert diffuse: `kd * cd / pi`.
    pub fn lambert(kd: f32, cd: ColorRGB) -> ColorRGB {
        cd * kd / PI
    }

    /// Phong specular lobe.
    ///
    /// `l` points toward the light, `v` is the primary ray direction
    /// (camera toward surface); the reflection of `l` across `n` lands on
    /// the same side as `v`, so their dot is the highlight cosine.
    pub fn phong(ks: f32, exponent: f32, l: Vec3, v: Vec3, n: Vec3) -> ColorRGB {
        let reflection = l - 2.0 * n.dot(l).max(0.0) * n;
        let cos_alpha = reflection.dot(v).max(0.0);
        ColorRGB::splat((ks * cos_alpha.powf(exponent)).max(0.0))
    }

    /// Schlick fresnel. `h` is the half vector, `v` the outgoing view
    /// vector, `f0` the base reflectivity at normal incidence.
    pub fn fresnel_schlick(h: Vec3, v: Vec3, f0: ColorRGB) -> ColorRGB {
        let factor = 1.0 - v.dot(h).max(0.0);
        f0 + (ColorRGB::ONE - f0) * factor.powi(5)
    }

    /// Trowbridge-Reitz GGX normal distribution with the UE4
    /// reparameterization `alpha = roughness^2`.
    pub fn normal_distribution_ggx(n: Vec3, h: Vec3, roughness: f32) -> f32 {
        let alpha_sq = roughness * roughness * roughness * roughness;
        let n_dot_h = n.dot(h).max(0.0);
        let factor = n_dot_h * n_dot_h * (alpha_sq - 1.0) + 1.0;
        alpha_sq / (PI * factor * factor)
    }

    /// Schlick-GGX masking term for direct lighting,
    /// `k = (roughness + 1)^2 / 8`.
    pub fn geometry_schlick_ggx(n: Vec3, v: Vec3, roughness: f32) -> f32 {
        let r = roughness + 1.0;
        let k = r * r / 8.0;
        let n_dot_v = n.dot(v).max(0.0);
        n_dot_v / (n_dot_v * (1.0 - k) + k)
    }

    /// Smith geometry: masking for the view direction times shadowing for
    /// the light direction.
    pub fn geometry_smith(n: Vec3, v: Vec3, l: Vec3, roughness: f32) -> f32 {
        geometry_schlick_ggx(n, v, roughness) * geometry_schlick_ggx(n, l, roughness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(normal: Vec3) -> HitRecord {
        HitRecord {
            origin: Vec3::ZERO,
            normal,
            t: 1.0,
            material_index: 0,
            did_hit: true,
        }
    }

    #[test]
    fn test_lambert_magnitude() {
        let mat = Material::Lambert {
            reflectance: 1.0,
            color: ColorRGB::ONE,
        };
        let shade = mat.shade(&record_at(Vec3::Y), Vec3::Y, -Vec3::Y);
        assert!((shade.x - 1.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn test_phong_highlight_alignment() {
        let n = Vec3::Y;
        // Light from 45 degrees on one side; the mirror direction continues
        // down on the other side.
        let l = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let mirror_v = Vec3::new(-1.0, -1.0, 0.0).normalize();
        let off_v = Vec3::new(1.0, -1.0, 0.0).normalize();

        let aligned = brdf::phong(1.0, 32.0, l, mirror_v, n);
        let misaligned = brdf::phong(1.0, 32.0, l, off_v, n);

        assert!((aligned.x - 1.0).abs() < 1e-4);
        assert!(misaligned.x < 1e-4);
    }

    #[test]
    fn test_fresnel_at_normal_incidence() {
        let f0 = ColorRGB::splat(0.04);
        // View along the half vector: cos = 1, fresnel collapses to f0
        let f = brdf::fresnel_schlick(Vec3::Y, Vec3::Y, f0);
        assert!((f - f0).length() < 1e-6);
    }

    #[test]
    fn test_fresnel_at_grazing() {
        let f0 = ColorRGB::splat(0.04);
        // View orthogonal to the half vector: full reflection
        let f = brdf::fresnel_schlick(Vec3::Y, Vec3::X, f0);
        assert!((f - ColorRGB::ONE).length() < 1e-6);
    }

    #[test]
    fn test_cook_torrance_metal_has_no_diffuse() {
        let n = Vec3::Y;
        let hit = record_at(n);
        let l = Vec3::new(0.3, 1.0, 0.0).normalize();
        let v = Vec3::new(0.5, -1.0, 0.2).normalize();

        let metal = Material::CookTorrance {
            albedo: ColorRGB::new(0.95, 0.64, 0.54),
            metalness: 1.0,
            roughness: 0.3,
        };
        let dielectric = Material::CookTorrance {
            albedo: ColorRGB::new(0.95, 0.64, 0.54),
            metalness: 0.0,
            roughness: 0.3,
        };

        let metal_shade = metal.shade(&hit, l, v);
        let dielectric_shade = dielectric.shade(&hit, l, v);

        // Both respond, and the dielectric carries the diffuse term the
        // metal suppresses away from the highlight.
        assert!(metal_shade.max_element() > 0.0);
        assert!(dielectric_shade.max_element() > 0.0);

        let away_l = Vec3::new(-0.8, 1.0, 0.0).normalize();
        let metal_away = metal.shade(&hit, away_l, v);
        let dielectric_away = dielectric.shade(&hit, away_l, v);
        assert!(metal_away.length() < dielectric_away.length());
    }

    #[test]
    fn test_ggx_peaks_at_normal() {
        let n = Vec3::Y;
        let at_normal = brdf::normal_distribution_ggx(n, n, 0.3);
        let off_normal =
            brdf::normal_distribution_ggx(n, Vec3::new(0.5, 1.0, 0.0).normalize(), 0.3);
        assert!(at_normal > off_normal);
    }

    #[test]
    fn test_solid_color_ignores_geometry() {
        let mat = Material::SolidColor {
            color: ColorRGB::new(0.2, 0.4, 0.6),
        };
        let shade = mat.shade(&record_at(Vec3::Y), Vec3::X, Vec3::Z);
        assert_eq!(shade, ColorRGB::new(0.2, 0.4, 0.6));
    }
}
