//! Bounding Volume Hierarchy over scene triangles.
//!
//! A binary tree built by median split on the longest centroid axis. Each
//! node also carries the union of its triangles' masks, so subtrees a ray
//! mask cannot see are skipped without touching their bounds.

use lux_core::{RayMask, Scene, TriangleMask};
use lux_math::{Aabb, Interval, Ray, Vec3};

use crate::oracle::{Hit, IntersectionOracle};
use crate::triangle::intersect_triangle;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// Hits closer than this are treated as self-intersections.
const T_MIN: f32 = 1e-5;

/// BVH node - either a branch with two children or a leaf with primitives.
#[derive(Debug)]
enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
        mask: TriangleMask,
    },
    Leaf {
        primitives: Vec<u32>,
        bbox: Aabb,
        mask: TriangleMask,
    },
    Empty,
}

impl BvhNode {
    fn mask(&self) -> TriangleMask {
        match self {
            BvhNode::Branch { mask, .. } | BvhNode::Leaf { mask, .. } => *mask,
            BvhNode::Empty => TriangleMask::empty(),
        }
    }
}

/// Primitive reference used during construction.
struct BuildItem {
    primitive: u32,
    bbox: Aabb,
    centroid: Vec3,
}

/// CPU intersection oracle over a snapshot of a scene's triangles.
///
/// The BVH copies vertex positions and masks at build time; rebuild it after
/// appending geometry to the scene.
#[derive(Debug)]
pub struct TriangleBvh {
    triangles: Vec<[Vec3; 3]>,
    masks: Vec<TriangleMask>,
    root: BvhNode,
}

impl TriangleBvh {
    /// Build a BVH over every triangle in `scene`.
    pub fn build(scene: &Scene) -> Self {
        let count = scene.triangle_count();
        let triangles: Vec<[Vec3; 3]> = (0..count).map(|t| scene.triangle(t)).collect();
        let masks = scene.masks().to_vec();

        let items: Vec<BuildItem> = triangles
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let bbox = Aabb::from_triangle(v[0], v[1], v[2]);
                BuildItem {
                    primitive: i as u32,
                    bbox,
                    centroid: bbox.centroid(),
                }
            })
            .collect();

        let root = if items.is_empty() {
            BvhNode::Empty
        } else {
            Self::build_node(items, &masks)
        };

        log::debug!("Built triangle BVH over {} triangles", count);

        Self { triangles, masks, root }
    }

    /// Recursive BVH construction.
    fn build_node(mut items: Vec<BuildItem>, masks: &[TriangleMask]) -> BvhNode {
        let n = items.len();

        let bounds = items
            .iter()
            .fold(items[0].bbox, |acc, item| Aabb::surrounding(&acc, &item.bbox));
        let mask = items
            .iter()
            .fold(TriangleMask::empty(), |acc, item| acc | masks[item.primitive as usize]);

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                primitives: items.iter().map(|item| item.primitive).collect(),
                bbox: bounds,
                mask,
            };
        }

        let centroid_bounds = items.iter().fold(Aabb::EMPTY, |acc, item| {
            Aabb::surrounding(&acc, &Aabb::from_points(item.centroid, item.centroid))
        });
        let axis = centroid_bounds.longest_axis();

        items.sort_unstable_by(|a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let right_items = items.split_off(n / 2);
        let left = Self::build_node(items, masks);
        let right = Self::build_node(right_items, masks);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
            mask,
        }
    }

    /// Number of triangles in the snapshot.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn hit_node(&self, node: &BvhNode, ray: &Ray, mask: RayMask, ray_t: Interval, any: bool) -> Option<Hit> {
        if !mask.sees(node.mask()) {
            return None;
        }

        match node {
            BvhNode::Empty => None,

            BvhNode::Leaf { primitives, bbox, .. } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let mut closest: Option<Hit> = None;
                let mut max = ray_t.max;

                for &primitive in primitives {
                    if !mask.sees(self.masks[primitive as usize]) {
                        continue;
                    }
                    let interval = ray_t.with_max(max);
                    if let Some((distance, barycentric)) =
                        intersect_triangle(ray, &self.triangles[primitive as usize], interval)
                    {
                        max = distance;
                        closest = Some(Hit {
                            distance,
                            primitive,
                            barycentric,
                        });
                        if any {
                            break;
                        }
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, bbox, .. } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = self.hit_node(left, ray, mask, ray_t, any);
                if any && hit_left.is_some() {
                    return hit_left;
                }

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |h| h.distance);
                let hit_right = self.hit_node(right, ray, mask, ray_t.with_max(right_max), any);

                hit_right.or(hit_left)
            }
        }
    }
}

impl IntersectionOracle for TriangleBvh {
    fn intersect(&self, ray: &Ray, mask: RayMask, max_distance: f32) -> Option<Hit> {
        self.hit_node(&self.root, ray, mask, Interval::new(T_MIN, max_distance), false)
    }

    fn occluded(&self, ray: &Ray, mask: RayMask, max_distance: f32) -> bool {
        self.hit_node(&self.root, ray, mask, Interval::new(T_MIN, max_distance), true)
            .is_some()
    }
}
