//! Bounding Volume Hierarchy acceleration structure.
//!
//! An octree-style hierarchy over a fixed world cube. Surfaces are inserted
//! one at a time; a leaf that collects too many surfaces is bisected along all
//! three axes into eight children and its surfaces are pushed down into every
//! child they might overlap. Leaves store `SurfaceId`s into the scene arena,
//! so a surface straddling a cell boundary is referenced from several leaves.

use crate::surface::{Surface, SurfaceId};
use umbra_math::{Aabb, Interval, Ray, Vec3};

/// A leaf splits once it holds more than this many surfaces...
pub const LEAF_MAX_SIZE: usize = 5;

/// ...and its shortest side is still longer than this.
pub const MIN_CELL_SIZE: f32 = 0.1;

/// Side of the world cube covered by the root node, centered on the origin.
/// Geometry outside it is never found by queries.
pub const WORLD_SIZE: f32 = 200.0;

/// BVH node - either a branch with eight children or a leaf with surfaces.
#[derive(Debug)]
pub enum BvhNode {
    /// Interior node. Holds no surfaces directly.
    Branch {
        children: Box<[BvhNode; 8]>,
        bbox: Aabb,
    },
    /// Leaf node referencing surfaces in the scene arena.
    Leaf {
        surfaces: Vec<SurfaceId>,
        bbox: Aabb,
    },
}

/// Shape of a built hierarchy, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub leaves: usize,
    pub branches: usize,
    /// Total surface references across all leaves
    pub references: usize,
    pub max_depth: usize,
}

impl BvhNode {
    fn leaf(bbox: Aabb) -> Self {
        BvhNode::Leaf {
            surfaces: Vec::new(),
            bbox,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    fn insert(&mut self, id: SurfaceId, arena: &[Surface]) {
        let needs_split = match self {
            BvhNode::Leaf { surfaces, bbox } => {
                surfaces.push(id);
                surfaces.len() > LEAF_MAX_SIZE && bbox.size() > MIN_CELL_SIZE
            }
            BvhNode::Branch { children, .. } => {
                let surface = &arena[id.index()];
                for child in children.iter_mut() {
                    if surface.might_intersect(&child.bounding_box()) {
                        child.insert(id, arena);
                    }
                }
                false
            }
        };

        if needs_split {
            self.split(arena);
        }
    }

    /// Turn this leaf into a branch and redistribute its surfaces.
    fn split(&mut self, arena: &[Surface]) {
        let BvhNode::Leaf { surfaces, bbox } = self else {
            return;
        };
        let surfaces = std::mem::take(surfaces);
        let bbox = *bbox;

        *self = BvhNode::Branch {
            children: Box::new(bbox.octants().map(BvhNode::leaf)),
            bbox,
        };
        for id in surfaces {
            self.insert(id, arena);
        }
    }

    fn nearest(
        &self,
        ray: &Ray,
        inv_dir: Vec3,
        arena: &[Surface],
        best: &mut Option<(SurfaceId, f32)>,
    ) {
        match self {
            BvhNode::Leaf { surfaces, .. } => {
                for &id in surfaces {
                    if let Some(t) = arena[id.index()].intersect(ray) {
                        if best.map_or(true, |(_, closest)| t < closest) {
                            *best = Some((id, t));
                        }
                    }
                }
            }
            BvhNode::Branch { children, .. } => {
                // Every child the ray can still reach closer than the best hit
                // so far is visited; a hit in one cell never ends the search.
                for child in children.iter() {
                    let closest = best.map_or(f32::INFINITY, |(_, t)| t);
                    if child
                        .bounding_box()
                        .hit_inv(ray.origin, inv_dir, Interval::new(0.0, closest))
                    {
                        child.nearest(ray, inv_dir, arena, best);
                    }
                }
            }
        }
    }

    fn occluded(
        &self,
        ray: &Ray,
        inv_dir: Vec3,
        max_dist: f32,
        exclude: Option<SurfaceId>,
        arena: &[Surface],
    ) -> bool {
        match self {
            BvhNode::Leaf { surfaces, .. } => surfaces
                .iter()
                .filter(|&&id| Some(id) != exclude)
                .any(|&id| {
                    arena[id.index()]
                        .intersect(ray)
                        .is_some_and(|t| t < max_dist)
                }),
            BvhNode::Branch { children, .. } => children.iter().any(|child| {
                child
                    .bounding_box()
                    .hit_inv(ray.origin, inv_dir, Interval::new(0.0, max_dist))
                    && child.occluded(ray, inv_dir, max_dist, exclude, arena)
            }),
        }
    }

    fn collect_stats(&self, depth: usize, stats: &mut BvhStats) {
        stats.max_depth = stats.max_depth.max(depth);
        match self {
            BvhNode::Leaf { surfaces, .. } => {
                stats.leaves += 1;
                stats.references += surfaces.len();
            }
            BvhNode::Branch { children, .. } => {
                stats.branches += 1;
                for child in children.iter() {
                    child.collect_stats(depth + 1, stats);
                }
            }
        }
    }
}

/// Spatial index over a scene's surface arena.
///
/// The hierarchy only stores handles; every query takes the arena the
/// handles were inserted from.
#[derive(Debug)]
pub struct Bvh {
    root: BvhNode,
}

impl Bvh {
    /// Create an empty index covering the default world cube.
    pub fn new() -> Self {
        Self::with_bounds(Aabb::cube(WORLD_SIZE))
    }

    /// Create an empty index covering `bounds`.
    pub fn with_bounds(bounds: Aabb) -> Self {
        Self {
            root: BvhNode::leaf(bounds),
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.root.bounding_box()
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    /// Add `arena[id]` to the index, splitting leaves as they fill up.
    pub fn insert(&mut self, id: SurfaceId, arena: &[Surface]) {
        self.root.insert(id, arena);
    }

    /// Nearest surface hit by `ray`, with its distance.
    ///
    /// The ray is used as given; callers nudge the origin off the surface
    /// they are leaving.
    pub fn nearest(&self, ray: &Ray, arena: &[Surface]) -> Option<(SurfaceId, f32)> {
        let mut best = None;
        let inv_dir = ray.inv_direction();
        if self
            .root
            .bounding_box()
            .hit_inv(ray.origin, inv_dir, Interval::new(0.0, f32::INFINITY))
        {
            self.root.nearest(ray, inv_dir, arena, &mut best);
        }
        best
    }

    /// Whether any surface other than `exclude` is hit closer than `max_dist`.
    pub fn occluded(
        &self,
        ray: &Ray,
        max_dist: f32,
        exclude: Option<SurfaceId>,
        arena: &[Surface],
    ) -> bool {
        let inv_dir = ray.inv_direction();
        self.root
            .bounding_box()
            .hit_inv(ray.origin, inv_dir, Interval::new(0.0, max_dist))
            && self.root.occluded(ray, inv_dir, max_dist, exclude, arena)
    }

    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        self.root.collect_stats(0, &mut stats);
        stats
    }
}

impl Default for Bvh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Plane, Sphere, Triangle};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use umbra_core::Material;

    fn build(surfaces: &[Surface]) -> Bvh {
        let mut bvh = Bvh::new();
        for i in 0..surfaces.len() {
            bvh.insert(SurfaceId(i), surfaces);
        }
        bvh
    }

    fn brute_force(ray: &Ray, surfaces: &[Surface]) -> Option<(SurfaceId, f32)> {
        surfaces
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.intersect(ray).map(|t| (SurfaceId(i), t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn sphere_cluster() -> Vec<Surface> {
        (0..12)
            .map(|i| {
                let x = (i % 4) as f32 * 1.5 - 2.25;
                let y = (i / 4) as f32 * 1.5 - 1.5;
                Surface::new(Sphere::new(Vec3::new(x, y, -6.0), 0.6), Material::default())
            })
            .collect()
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = Bvh::new();
        assert!(matches!(bvh.root(), BvhNode::Leaf { surfaces, .. } if surfaces.is_empty()));
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(bvh.nearest(&ray, &[]).is_none());
    }

    #[test]
    fn test_bvh_single_sphere_stays_leaf() {
        let surfaces = vec![Surface::new(
            Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5),
            Material::default(),
        )];
        let bvh = build(&surfaces);

        assert!(matches!(bvh.root(), BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let (id, t) = bvh.nearest(&ray, &surfaces).unwrap();
        assert_eq!(id, SurfaceId(0));
        assert!((t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_splits_after_threshold() {
        let surfaces = sphere_cluster();
        let bvh = build(&surfaces[..LEAF_MAX_SIZE]);
        assert!(matches!(bvh.root(), BvhNode::Leaf { .. }));

        let bvh = build(&surfaces);
        let stats = bvh.stats();
        assert!(matches!(bvh.root(), BvhNode::Branch { .. }));
        assert!(stats.branches >= 1);
        assert_eq!(stats.leaves, stats.branches * 7 + 1);
        assert!(stats.references >= surfaces.len());
    }

    #[test]
    fn test_coincident_surfaces_stop_at_min_cell_size() {
        let surfaces: Vec<Surface> = (0..8)
            .map(|_| Surface::new(Sphere::new(Vec3::splat(0.3), 0.01), Material::default()))
            .collect();
        let bvh = build(&surfaces);
        let stats = bvh.stats();

        // 200 / 2^11 < 0.1, so subdivision has to stop by depth 11.
        assert!(stats.max_depth <= 11);
        let ray = Ray::new(Vec3::new(0.3, 0.3, 5.0), -Vec3::Z);
        assert!(bvh.nearest(&ray, &surfaces).is_some());
    }

    #[test]
    fn test_straddling_surface_is_referenced_by_several_leaves() {
        let mut surfaces = sphere_cluster();
        surfaces.push(Surface::new(Plane::new(0.0, 1.0, 0.0, 0.0), Material::default()));
        let bvh = build(&surfaces);
        let stats = bvh.stats();
        assert!(stats.references > surfaces.len());
    }

    #[test]
    fn test_bvh_matches_brute_force() {
        let mut surfaces = sphere_cluster();
        surfaces.push(Surface::new(Plane::new(0.0, 1.0, 0.0, 3.0), Material::default()));
        surfaces.push(Surface::new(
            Triangle::from_points(
                Vec3::new(-3.0, -2.0, -4.0),
                Vec3::new(3.0, -2.0, -4.0),
                Vec3::new(0.0, 2.5, -5.0),
            ),
            Material::default(),
        ));
        let bvh = build(&surfaces);
        assert!(matches!(bvh.root(), BvhNode::Branch { .. }));

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-2.0..4.0),
                rng.gen_range(-1.0..3.0),
            );
            let target = Vec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-9.0..-3.0),
            );
            let ray = Ray::new(origin, (target - origin).normalize());

            let expected = brute_force(&ray, &surfaces);
            let actual = bvh.nearest(&ray, &surfaces);
            match (expected, actual) {
                (None, None) => {}
                (Some((eid, et)), Some((aid, at))) => {
                    assert_eq!(eid, aid, "ray {:?}", ray);
                    assert!((et - at).abs() < 1e-4);
                }
                other => panic!("mismatch {:?} for ray {:?}", other, ray),
            }
        }
    }

    #[test]
    fn test_occluded_respects_distance_and_exclusion() {
        let surfaces = vec![Surface::new(
            Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0),
            Material::default(),
        )];
        let bvh = build(&surfaces);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        assert!(bvh.occluded(&ray, 10.0, None, &surfaces));
        assert!(!bvh.occluded(&ray, 3.0, None, &surfaces));
        assert!(!bvh.occluded(&ray, 10.0, Some(SurfaceId(0)), &surfaces));
    }

    #[test]
    fn test_geometry_outside_world_is_not_found() {
        let surfaces = vec![Surface::new(
            Sphere::new(Vec3::new(0.0, 0.0, -500.0), 1.0),
            Material::default(),
        )];
        let bvh = build(&surfaces);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -400.0), -Vec3::Z);
        assert!(bvh.nearest(&ray, &surfaces).is_none());
    }
}
