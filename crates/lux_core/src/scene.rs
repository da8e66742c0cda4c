//! Flat scene buffers.
//!
//! The scene is stored as parallel arrays indexed by vertex, plus one mask per
//! triangle and a material table. Triangle `t` owns vertices `3t`, `3t + 1`
//! and `3t + 2`; all three reference the same material slot. There is no
//! per-triangle object and no pointer between entries: everything is
//! cross-referenced by index.

use lux_math::{Mat4, Vec2, Vec3};

use crate::{Color, FaceMask, Material, SceneError, TriangleMask};

/// Corners of the unit cube centered at the origin.
const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
];

/// Corner indices of each face, wound so the face normal points outward.
const CUBE_FACES: [(FaceMask, [usize; 4]); 6] = [
    (FaceMask::NEGATIVE_X, [0, 4, 6, 2]),
    (FaceMask::POSITIVE_X, [1, 3, 7, 5]),
    (FaceMask::NEGATIVE_Y, [0, 1, 5, 4]),
    (FaceMask::POSITIVE_Y, [2, 6, 7, 3]),
    (FaceMask::NEGATIVE_Z, [0, 2, 3, 1]),
    (FaceMask::POSITIVE_Z, [4, 5, 7, 6]),
];

/// Triangle soup with per-vertex attributes and a material table.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<Color>,
    masks: Vec<TriangleMask>,
    vertex_to_material: Vec<u32>,
    materials: Vec<Material>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validated material to the table, returning its index.
    pub fn push_material(&mut self, material: Material) -> Result<u32, SceneError> {
        material.validate()?;
        self.materials.push(material);
        Ok((self.materials.len() - 1) as u32)
    }

    /// Append the requested faces of a transformed unit cube.
    ///
    /// Every face becomes two triangles. The material is appended to the
    /// table once and all appended vertices reference it; its index is
    /// returned. Normals point out of the cube unless `inward_normals` is set.
    /// Previously appended entries are never touched.
    pub fn create_cube(
        &mut self,
        faces: FaceMask,
        transform: &Mat4,
        inward_normals: bool,
        triangle_mask: TriangleMask,
        material: Material,
    ) -> Result<u32, SceneError> {
        let determinant = transform.determinant();
        if !determinant.is_finite() || determinant == 0.0 || !transform.is_finite() {
            return Err(SceneError::DegenerateTransform { determinant });
        }

        let material_index = self.push_material(material)?;

        let corners = CUBE_CORNERS.map(|corner| transform.transform_point3(corner));
        // A mirroring transform reverses the winding, and with it the normals.
        let flip = inward_normals != (determinant < 0.0);

        for (face, [i0, i1, i2, i3]) in CUBE_FACES {
            if !faces.contains(face) {
                continue;
            }
            let quad = [corners[i0], corners[i1], corners[i2], corners[i3]];
            self.push_triangle([quad[0], quad[1], quad[2]], flip, triangle_mask, material_index, &material);
            self.push_triangle([quad[0], quad[2], quad[3]], flip, triangle_mask, material_index, &material);
        }

        log::debug!(
            "create_cube: faces={:?} mask={:?} material={} -> {} triangles total",
            faces,
            triangle_mask,
            material_index,
            self.triangle_count()
        );

        Ok(material_index)
    }

    fn push_triangle(
        &mut self,
        corners: [Vec3; 3],
        flip: bool,
        triangle_mask: TriangleMask,
        material_index: u32,
        material: &Material,
    ) {
        let [v0, v1, v2] = corners;
        let normal = (v1 - v0).cross(v2 - v0).normalize();
        let normal = if flip { -normal } else { normal };

        for vertex in corners {
            self.vertices.push(vertex);
            self.normals.push(normal);
            self.colors.push(material.albedo);
            self.vertex_to_material.push(material_index);
        }
        self.masks.push(triangle_mask);
    }

    /// Check the parallel-buffer layout invariants.
    pub fn validate(&self) -> Result<(), SceneError> {
        let vertex_count = self.vertices.len();
        let check = |buffer: &'static str, expected: usize, actual: usize| {
            if expected == actual {
                Ok(())
            } else {
                Err(SceneError::BufferMismatch {
                    buffer,
                    expected,
                    actual,
                })
            }
        };

        check("vertices", vertex_count - vertex_count % 3, vertex_count)?;
        check("normals", vertex_count, self.normals.len())?;
        check("colors", vertex_count, self.colors.len())?;
        check("vertex_to_material", vertex_count, self.vertex_to_material.len())?;
        check("masks", vertex_count / 3, self.masks.len())?;

        if let Some((vertex, &material)) = self
            .vertex_to_material
            .iter()
            .enumerate()
            .find(|(_, m)| **m as usize >= self.materials.len())
        {
            return Err(SceneError::MaterialOutOfRange {
                vertex,
                material,
                count: self.materials.len(),
            });
        }
        Ok(())
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.masks.len()
    }

    /// Vertex positions of triangle `primitive`.
    #[inline]
    pub fn triangle(&self, primitive: usize) -> [Vec3; 3] {
        let base = primitive * 3;
        [self.vertices[base], self.vertices[base + 1], self.vertices[base + 2]]
    }

    /// Visibility mask of triangle `primitive`.
    #[inline]
    pub fn triangle_mask(&self, primitive: usize) -> TriangleMask {
        self.masks[primitive]
    }

    /// Material table index of triangle `primitive`.
    #[inline]
    pub fn material_index(&self, primitive: usize) -> u32 {
        self.vertex_to_material[primitive * 3]
    }

    /// Material of triangle `primitive`.
    #[inline]
    pub fn material(&self, primitive: usize) -> &Material {
        &self.materials[self.material_index(primitive) as usize]
    }

    /// Shading normal at barycentric coordinate `barycentric` of triangle
    /// `primitive`.
    ///
    /// `barycentric` holds the weights of the second and third vertices; the
    /// first vertex gets `1 - u - v`.
    pub fn interpolate_normal(&self, primitive: usize, barycentric: Vec2) -> Vec3 {
        interpolate(&self.normals, primitive, barycentric).normalize()
    }

    /// Vertex color at barycentric coordinate `barycentric` of triangle
    /// `primitive`.
    pub fn interpolate_color(&self, primitive: usize, barycentric: Vec2) -> Color {
        interpolate(&self.colors, primitive, barycentric)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn masks(&self) -> &[TriangleMask] {
        &self.masks
    }

    pub fn vertex_to_material(&self) -> &[u32] {
        &self.vertex_to_material
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }
}

#[inline]
fn interpolate(attribute: &[Vec3], primitive: usize, barycentric: Vec2) -> Vec3 {
    let base = primitive * 3;
    let w = 1.0 - barycentric.x - barycentric.y;
    attribute[base] * w + attribute[base + 1] * barycentric.x + attribute[base + 2] * barycentric.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MaterialType;

    fn grey() -> Material {
        Material::lambertian(Vec3::splat(0.5))
    }

    #[test]
    fn test_full_cube_counts() {
        let mut scene = Scene::new();
        let index = scene
            .create_cube(FaceMask::ALL, &Mat4::IDENTITY, false, TriangleMask::GEOMETRY, grey())
            .unwrap();

        assert_eq!(index, 0);
        assert_eq!(scene.vertices().len(), 36);
        assert_eq!(scene.normals().len(), 36);
        assert_eq!(scene.colors().len(), 36);
        assert_eq!(scene.masks().len(), 6 * 2);
        assert_eq!(scene.materials().len(), 1);
        assert_eq!(scene.vertex_to_material().len(), 36);
        assert!(scene.vertex_to_material().iter().all(|&m| m == 0));
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_single_face_appends_two_triangles() {
        let mut scene = Scene::new();
        scene
            .create_cube(FaceMask::POSITIVE_Y, &Mat4::IDENTITY, false, TriangleMask::LIGHT, grey())
            .unwrap();

        assert_eq!(scene.triangle_count(), 2);
        assert_eq!(scene.triangle_mask(0), TriangleMask::LIGHT);
        for v in scene.vertices() {
            assert_eq!(v.y, 0.5);
        }
    }

    #[test]
    fn test_outward_normals() {
        let mut scene = Scene::new();
        scene
            .create_cube(FaceMask::ALL, &Mat4::IDENTITY, false, TriangleMask::GEOMETRY, grey())
            .unwrap();

        for primitive in 0..scene.triangle_count() {
            let [v0, v1, v2] = scene.triangle(primitive);
            let center = (v0 + v1 + v2) / 3.0;
            let normal = scene.interpolate_normal(primitive, Vec2::new(0.3, 0.3));
            assert!(normal.dot(center) > 0.0, "triangle {primitive} normal points inward");
            assert!((normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_inward_normals() {
        let mut scene = Scene::new();
        scene
            .create_cube(FaceMask::ALL, &Mat4::IDENTITY, true, TriangleMask::GEOMETRY, grey())
            .unwrap();

        for primitive in 0..scene.triangle_count() {
            let [v0, v1, v2] = scene.triangle(primitive);
            let center = (v0 + v1 + v2) / 3.0;
            assert!(scene.interpolate_normal(primitive, Vec2::ZERO).dot(center) < 0.0);
        }
    }

    #[test]
    fn test_mirroring_transform_keeps_normals_outward() {
        let mut scene = Scene::new();
        let transform = Mat4::from_scale(Vec3::new(-2.0, 1.0, 1.0));
        scene
            .create_cube(FaceMask::ALL, &transform, false, TriangleMask::GEOMETRY, grey())
            .unwrap();

        for primitive in 0..scene.triangle_count() {
            let [v0, v1, v2] = scene.triangle(primitive);
            let center = (v0 + v1 + v2) / 3.0;
            assert!(scene.interpolate_normal(primitive, Vec2::ZERO).dot(center) > 0.0);
        }
    }

    #[test]
    fn test_transform_applied() {
        let mut scene = Scene::new();
        let transform = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
        scene
            .create_cube(FaceMask::NEGATIVE_Y, &transform, true, TriangleMask::GEOMETRY, grey())
            .unwrap();

        for v in scene.vertices() {
            assert!(v.y.abs() < 1e-6);
            assert!(v.x.abs() <= 1.0 + 1e-6 && v.z.abs() <= 1.0 + 1e-6);
        }
        // Floor of a room: normals face up, into the room.
        assert!((scene.interpolate_normal(0, Vec2::ZERO) - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_calls_are_additive() {
        let mut scene = Scene::new();
        scene
            .create_cube(FaceMask::NEGATIVE_X, &Mat4::IDENTITY, false, TriangleMask::GEOMETRY, grey())
            .unwrap();
        let before: Vec<Vec3> = scene.vertices().to_vec();

        let index = scene
            .create_cube(FaceMask::ALL, &Mat4::IDENTITY, false, TriangleMask::GLASS, Material::dielectric(1.5))
            .unwrap();

        assert_eq!(index, 1);
        assert_eq!(&scene.vertices()[..6], before.as_slice());
        assert_eq!(scene.triangle_count(), 2 + 12);
        assert_eq!(scene.material_index(0), 0);
        assert_eq!(scene.material_index(2), 1);
        assert_eq!(scene.material(13).kind, MaterialType::Dielectric);
        assert!(scene.vertex_to_material()[6..].iter().all(|&m| m == 1));
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_material() {
        let mut scene = Scene::new();
        let result = scene.create_cube(
            FaceMask::ALL,
            &Mat4::IDENTITY,
            false,
            TriangleMask::GLASS,
            Material::dielectric(-1.0),
        );

        assert!(matches!(result, Err(SceneError::InvalidMaterial { .. })));
        // Nothing was appended.
        assert_eq!(scene.triangle_count(), 0);
        assert!(scene.materials().is_empty());
    }

    #[test]
    fn test_rejects_degenerate_transform() {
        let mut scene = Scene::new();
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        let result = scene.create_cube(FaceMask::ALL, &flat, false, TriangleMask::GEOMETRY, grey());

        assert!(matches!(result, Err(SceneError::DegenerateTransform { .. })));
        assert!(scene.materials().is_empty());
    }

    #[test]
    fn test_interpolate_color_uses_albedo() {
        let mut scene = Scene::new();
        let red = Vec3::new(0.63, 0.065, 0.05);
        scene
            .create_cube(FaceMask::NEGATIVE_X, &Mat4::IDENTITY, true, TriangleMask::GEOMETRY, Material::lambertian(red))
            .unwrap();

        let color = scene.interpolate_color(1, Vec2::new(0.2, 0.5));
        assert!((color - red).length() < 1e-6);
    }
}
