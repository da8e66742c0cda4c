//! Material parameters.
//!
//! A material is a small parameter block plus a type tag. The tag is a closed
//! enum rather than raw bits: a surface is one of the four basic types, or a
//! dielectric stochastically mixed with exactly one opaque type. Raw bit
//! patterns are converted through [`MaterialType::from_bits`], which rejects
//! every other combination.

use bitflags::bitflags;
use lux_math::Vec3;

use crate::{Color, SceneError};

bitflags! {
    /// Raw material type bits, as stored by external scene formats.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaterialFlags: u32 {
        const LAMBERTIAN = 1 << 0;
        const METALLIC = 1 << 1;
        const DIELECTRIC = 1 << 2;
        const MIRROR = 1 << 3;
    }
}

/// The non-refractive component of a transparent material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueType {
    Lambertian,
    Metallic,
    Mirror,
}

impl OpaqueType {
    fn flag(self) -> MaterialFlags {
        match self {
            OpaqueType::Lambertian => MaterialFlags::LAMBERTIAN,
            OpaqueType::Metallic => MaterialFlags::METALLIC,
            OpaqueType::Mirror => MaterialFlags::MIRROR,
        }
    }
}

/// How a surface scatters light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialType {
    Lambertian,
    Metallic,
    Dielectric,
    Mirror,
    /// Dielectric with probability `transparency`, otherwise the opaque type.
    Transparent(OpaqueType),
}

impl MaterialType {
    /// Decode raw type bits.
    ///
    /// Valid patterns are a single type bit, or the dielectric bit combined
    /// with exactly one other bit.
    pub fn from_bits(bits: u32) -> Result<Self, SceneError> {
        let invalid = SceneError::InvalidMaterialType { bits };
        let flags = MaterialFlags::from_bits(bits).ok_or(invalid.clone())?;

        let opaque = flags.difference(MaterialFlags::DIELECTRIC);
        let opaque = if opaque.is_empty() {
            None
        } else if opaque == MaterialFlags::LAMBERTIAN {
            Some(OpaqueType::Lambertian)
        } else if opaque == MaterialFlags::METALLIC {
            Some(OpaqueType::Metallic)
        } else if opaque == MaterialFlags::MIRROR {
            Some(OpaqueType::Mirror)
        } else {
            return Err(invalid);
        };

        match (flags.contains(MaterialFlags::DIELECTRIC), opaque) {
            (false, None) => Err(invalid),
            (true, None) => Ok(MaterialType::Dielectric),
            (false, Some(OpaqueType::Lambertian)) => Ok(MaterialType::Lambertian),
            (false, Some(OpaqueType::Metallic)) => Ok(MaterialType::Metallic),
            (false, Some(OpaqueType::Mirror)) => Ok(MaterialType::Mirror),
            (true, Some(base)) => Ok(MaterialType::Transparent(base)),
        }
    }

    /// Raw bit representation of this type.
    pub fn flags(self) -> MaterialFlags {
        match self {
            MaterialType::Lambertian => MaterialFlags::LAMBERTIAN,
            MaterialType::Metallic => MaterialFlags::METALLIC,
            MaterialType::Dielectric => MaterialFlags::DIELECTRIC,
            MaterialType::Mirror => MaterialFlags::MIRROR,
            MaterialType::Transparent(base) => MaterialFlags::DIELECTRIC | base.flag(),
        }
    }
}

/// Surface material parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialType,
    /// Diffuse color for lambertian surfaces, tint for metals and mirrors.
    pub albedo: Color,
    /// Fuzz radius for metallic reflection.
    pub roughness: f32,
    /// Index of refraction for the dielectric component.
    pub refractive_index: f32,
    /// Probability of evaluating the dielectric component of a
    /// `Transparent` material.
    pub transparency: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialType::Lambertian,
            albedo: Vec3::splat(0.5),
            roughness: 0.0,
            refractive_index: 1.5,
            transparency: 0.0,
        }
    }
}

impl Material {
    /// Diffuse material.
    pub fn lambertian(albedo: Color) -> Self {
        Self {
            kind: MaterialType::Lambertian,
            albedo,
            ..Default::default()
        }
    }

    /// Fuzzy metal. `roughness` 0 is a perfect reflector.
    pub fn metallic(albedo: Color, roughness: f32) -> Self {
        Self {
            kind: MaterialType::Metallic,
            albedo,
            roughness,
            ..Default::default()
        }
    }

    /// Perfect mirror.
    pub fn mirror(albedo: Color) -> Self {
        Self {
            kind: MaterialType::Mirror,
            albedo,
            ..Default::default()
        }
    }

    /// Clear glass-like dielectric.
    pub fn dielectric(refractive_index: f32) -> Self {
        Self {
            kind: MaterialType::Dielectric,
            albedo: Vec3::ONE,
            refractive_index,
            ..Default::default()
        }
    }

    /// Mix a dielectric layer into an opaque material.
    ///
    /// Has no effect on materials that are already dielectric or transparent
    /// other than updating the parameters.
    pub fn with_transparency(mut self, refractive_index: f32, transparency: f32) -> Self {
        self.kind = match self.kind {
            MaterialType::Lambertian => MaterialType::Transparent(OpaqueType::Lambertian),
            MaterialType::Metallic => MaterialType::Transparent(OpaqueType::Metallic),
            MaterialType::Mirror => MaterialType::Transparent(OpaqueType::Mirror),
            other => other,
        };
        self.refractive_index = refractive_index;
        self.transparency = transparency;
        self
    }

    /// Build a material from raw type bits, validating both the bits and the
    /// parameters.
    pub fn from_raw(
        type_bits: u32,
        albedo: Color,
        roughness: f32,
        refractive_index: f32,
        transparency: f32,
    ) -> Result<Self, SceneError> {
        let material = Self {
            kind: MaterialType::from_bits(type_bits)?,
            albedo,
            roughness,
            refractive_index,
            transparency,
        };
        material.validate()?;
        Ok(material)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), SceneError> {
        if let Some(&value) = self.albedo.to_array().iter().find(|c| !c.is_finite()) {
            return Err(SceneError::InvalidMaterial {
                field: "albedo",
                value,
            });
        }
        if !(self.roughness.is_finite() && self.roughness >= 0.0) {
            return Err(SceneError::InvalidMaterial {
                field: "roughness",
                value: self.roughness,
            });
        }
        if !(self.refractive_index.is_finite() && self.refractive_index > 0.0) {
            return Err(SceneError::InvalidMaterial {
                field: "refractive_index",
                value: self.refractive_index,
            });
        }
        if !(0.0..=1.0).contains(&self.transparency) {
            return Err(SceneError::InvalidMaterial {
                field: "transparency",
                value: self.transparency,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_type_bits() {
        assert_eq!(MaterialType::from_bits(1), Ok(MaterialType::Lambertian));
        assert_eq!(MaterialType::from_bits(2), Ok(MaterialType::Metallic));
        assert_eq!(MaterialType::from_bits(4), Ok(MaterialType::Dielectric));
        assert_eq!(MaterialType::from_bits(8), Ok(MaterialType::Mirror));
    }

    #[test]
    fn test_dielectric_combinations() {
        assert_eq!(
            MaterialType::from_bits(4 | 1),
            Ok(MaterialType::Transparent(OpaqueType::Lambertian))
        );
        assert_eq!(
            MaterialType::from_bits(4 | 2),
            Ok(MaterialType::Transparent(OpaqueType::Metallic))
        );
        assert_eq!(
            MaterialType::from_bits(4 | 8),
            Ok(MaterialType::Transparent(OpaqueType::Mirror))
        );
    }

    #[test]
    fn test_invalid_bits_rejected() {
        for bits in [0, 2 | 8, 1 | 2, 1 | 2 | 4, 16, 1 | 32] {
            assert_eq!(
                MaterialType::from_bits(bits),
                Err(SceneError::InvalidMaterialType { bits }),
                "bits {bits:#b} should be rejected"
            );
        }
    }

    #[test]
    fn test_flags_match_from_bits() {
        let kinds = [
            MaterialType::Lambertian,
            MaterialType::Metallic,
            MaterialType::Dielectric,
            MaterialType::Mirror,
            MaterialType::Transparent(OpaqueType::Lambertian),
            MaterialType::Transparent(OpaqueType::Metallic),
            MaterialType::Transparent(OpaqueType::Mirror),
        ];
        for kind in kinds {
            assert_eq!(MaterialType::from_bits(kind.flags().bits()), Ok(kind));
        }
    }

    #[test]
    fn test_default_refractive_index() {
        assert_eq!(Material::default().refractive_index, 1.5);
        assert!(Material::default().validate().is_ok());
    }

    #[test]
    fn test_with_transparency() {
        let m = Material::metallic(Vec3::ONE, 0.2).with_transparency(1.33, 0.25);
        assert_eq!(m.kind, MaterialType::Transparent(OpaqueType::Metallic));
        assert_eq!(m.refractive_index, 1.33);
        assert_eq!(m.transparency, 0.25);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let bad_ior = Material::dielectric(0.0);
        assert!(matches!(
            bad_ior.validate(),
            Err(SceneError::InvalidMaterial { field: "refractive_index", .. })
        ));

        let bad_roughness = Material::metallic(Vec3::ONE, -0.1);
        assert!(bad_roughness.validate().is_err());

        let bad_transparency = Material::lambertian(Vec3::ONE).with_transparency(1.5, 1.5);
        assert!(bad_transparency.validate().is_err());

        let bad_albedo = Material::lambertian(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(bad_albedo.validate().is_err());
    }

    #[test]
    fn test_from_raw() {
        let m = Material::from_raw(4 | 1, Vec3::splat(0.8), 0.0, 1.5, 0.5).unwrap();
        assert_eq!(m.kind, MaterialType::Transparent(OpaqueType::Lambertian));
        assert!(Material::from_raw(2 | 8, Vec3::ONE, 0.0, 1.5, 0.0).is_err());
    }
}
