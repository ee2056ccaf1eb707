//! Screen-space-error driven quadtree refinement over all six cube faces.
//!
//! Each frame the manager walks the faces from the roots with an explicit
//! work stack, pruning tiles outside the frustum (and optionally below the
//! horizon) and refining tiles whose projected error is too large. A tile
//! that wants to refine for its screen-space error but has no visible child
//! is kept itself, so a visible region never ends up with no tile covering
//! it. A tile that only refines to reach `min_level` and has no visible
//! child is dropped instead, since its children tile the same area.

use std::collections::BTreeMap;

use tessera_config::QuadtreeConfig;
use tessera_cubesphere::{
    BoundingSphere, HorizonCuller, TileId, TileKey, compute_sse, geometric_error,
};
use tessera_geodesy::Ellipsoid;

use crate::{CameraState, LodError};

/// Distances below this (meters) are clamped so the error never divides by zero.
const MIN_DISTANCE: f64 = 0.1;

/// Counters gathered during one [`QuadtreeManager::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LodStats {
    /// Tiles popped from the work stack.
    pub visited: usize,
    /// Tiles rejected by the frustum.
    pub frustum_culled: usize,
    /// Tiles rejected by the horizon test.
    pub horizon_culled: usize,
    /// Refining tiles emitted because none of their children was visible.
    pub retained_parents: usize,
    /// Tiles coarser than `min_level` dropped because none of their children was visible.
    pub coarse_pruned: usize,
    /// Deepest level in the active set.
    pub max_level: u8,
}

/// Result of one update: the new active set and its difference to the previous one.
///
/// All three lists are in ascending [`TileKey`] order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LodUpdate {
    /// Tiles active now that were not active before.
    pub added: Vec<TileId>,
    /// Tiles active before that are not active now.
    pub removed: Vec<TileId>,
    /// Every tile active after this update.
    pub active: Vec<TileId>,
    /// Traversal counters.
    pub stats: LodStats,
}

impl LodUpdate {
    /// Whether the active set did not change.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Decides which tiles are active for a camera.
///
/// Holds only the configuration and the latest active set.
#[derive(Clone, Debug)]
pub struct QuadtreeManager {
    config: QuadtreeConfig,
    ellipsoid: Ellipsoid,
    active: BTreeMap<TileKey, TileId>,
}

impl QuadtreeManager {
    /// Create a manager, validating the configuration.
    pub fn new(config: QuadtreeConfig) -> Result<Self, LodError> {
        config.validate()?;
        let ellipsoid = Ellipsoid::scaled(config.planet_radius);
        Ok(Self {
            config,
            ellipsoid,
            active: BTreeMap::new(),
        })
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// The ellipsoid tile bounds are placed on.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Active tiles in key order.
    pub fn active(&self) -> impl Iterator<Item = TileId> + '_ {
        self.active.values().copied()
    }

    /// Number of active tiles.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether `tile` is in the active set.
    pub fn is_active(&self, tile: &TileId) -> bool {
        self.active.contains_key(&tile.key())
    }

    /// Forget the previous frame; the next update reports every tile as added.
    pub fn reset(&mut self) {
        self.active.clear();
    }

    /// Recompute the active set for `camera`.
    ///
    /// Invalid camera input is rejected with [`LodError::InvalidCamera`] and
    /// leaves the previous active set untouched.
    pub fn update(&mut self, camera: &CameraState) -> Result<LodUpdate, LodError> {
        if let Err(err) = camera.validate() {
            tracing::warn!(%err, "rejected camera state");
            return Err(err);
        }

        let horizon = self
            .config
            .horizon_culling
            .then(|| HorizonCuller::new(camera.position, self.config.planet_radius));

        let mut stats = LodStats::default();
        let mut next = BTreeMap::new();
        let mut stack: Vec<(TileId, BoundingSphere)> = Vec::with_capacity(64);

        for root in TileId::root_faces() {
            let bounds = BoundingSphere::from_tile(&root, &self.ellipsoid);
            if is_visible(&bounds, camera, horizon.as_ref(), &mut stats) {
                stack.push((root, bounds));
            }
        }

        while let Some((tile, bounds)) = stack.pop() {
            stats.visited += 1;

            if self.should_refine(&tile, &bounds, camera)
                && let Some(children) = tile.children()
            {
                let before = stack.len();
                for child in children {
                    let child_bounds = BoundingSphere::from_tile(&child, &self.ellipsoid);
                    if is_visible(&child_bounds, camera, horizon.as_ref(), &mut stats) {
                        stack.push((child, child_bounds));
                    }
                }
                if stack.len() > before {
                    continue;
                }
                // A tile refined only to reach `min_level` never stands in for its children.
                if tile.level() < self.config.min_level {
                    stats.coarse_pruned += 1;
                    continue;
                }
                stats.retained_parents += 1;
            }

            stats.max_level = stats.max_level.max(tile.level());
            next.insert(tile.key(), tile);
        }

        let added: Vec<TileId> = next
            .iter()
            .filter(|(key, _)| !self.active.contains_key(key))
            .map(|(_, tile)| *tile)
            .collect();
        let removed: Vec<TileId> = self
            .active
            .iter()
            .filter(|(key, _)| !next.contains_key(key))
            .map(|(_, tile)| *tile)
            .collect();

        self.active = next;

        tracing::debug!(
            active = self.active.len(),
            added = added.len(),
            removed = removed.len(),
            visited = stats.visited,
            frustum_culled = stats.frustum_culled,
            horizon_culled = stats.horizon_culled,
            retained_parents = stats.retained_parents,
            coarse_pruned = stats.coarse_pruned,
            max_level = stats.max_level,
            "lod update"
        );

        Ok(LodUpdate {
            added,
            removed,
            active: self.active.values().copied().collect(),
            stats,
        })
    }

    fn should_refine(&self, tile: &TileId, bounds: &BoundingSphere, camera: &CameraState) -> bool {
        let level = tile.level();
        if level >= self.config.max_level {
            return false;
        }
        if level < self.config.min_level {
            return true;
        }
        let distance = bounds.surface_distance(camera.position).max(MIN_DISTANCE);
        let sse = compute_sse(
            geometric_error(level, self.config.planet_radius),
            distance,
            camera.screen_height,
        );
        sse > self.config.sse_threshold
    }
}

fn is_visible(
    bounds: &BoundingSphere,
    camera: &CameraState,
    horizon: Option<&HorizonCuller>,
    stats: &mut LodStats,
) -> bool {
    if !camera.frustum.intersects_sphere(bounds.center, bounds.radius) {
        stats.frustum_culled += 1;
        return false;
    }
    if horizon.is_some_and(|h| h.is_below_horizon(bounds)) {
        stats.horizon_culled += 1;
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrustumPlanes, Plane};
    use glam::{DMat4, DVec3};
    use std::f64::consts::FRAC_PI_3;
    use tessera_cubesphere::CubeFace;

    const RADIUS: f64 = 6_378_137.0;
    const SCREEN_HEIGHT: f64 = 480.0;

    fn config() -> QuadtreeConfig {
        QuadtreeConfig {
            planet_radius: RADIUS,
            max_level: 14,
            min_level: 1,
            sse_threshold: 8.0,
            horizon_culling: false,
        }
    }

    fn look_at(eye: DVec3, dir: DVec3, up: DVec3, far: f64) -> CameraState {
        let view = DMat4::look_to_rh(eye, dir, up);
        let proj = DMat4::perspective_rh(FRAC_PI_3, 16.0 / 9.0, 1_000.0, far);
        CameraState::from_view_projection(eye, SCREEN_HEIGHT, &(proj * view))
    }

    /// 2000 km above the north pole axis, looking down, far plane at the horizon.
    fn polar_camera() -> CameraState {
        let eye = DVec3::new(0.0, 0.0, 8_378_137.0);
        let horizon = (eye.length_squared() - RADIUS * RADIUS).sqrt();
        look_at(eye, DVec3::NEG_Z, DVec3::Y, horizon)
    }

    fn equator_camera() -> CameraState {
        let eye = DVec3::new(8_378_137.0, 0.0, 0.0);
        let horizon = (eye.length_squared() - RADIUS * RADIUS).sqrt();
        look_at(eye, DVec3::NEG_X, DVec3::Z, horizon)
    }

    #[test]
    fn test_polar_scenario() {
        let mut manager = QuadtreeManager::new(config()).unwrap();
        let update = manager.update(&polar_camera()).unwrap();

        assert!(!update.active.is_empty());
        for tile in &update.active {
            assert!(tile.level() <= 14, "{tile} exceeds max level");
            assert_ne!(
                tile.face(),
                CubeFace::NegZ,
                "far-side tile {tile} should have been pruned"
            );
        }
        assert!(update.stats.coarse_pruned >= 1);
        let deepest_near = update
            .active
            .iter()
            .filter(|t| t.face() == CubeFace::PosZ)
            .map(TileId::level)
            .max()
            .unwrap_or(0);
        assert!(deepest_near > 1, "near face only reached level {deepest_near}");
        assert_eq!(update.stats.max_level, update.active.iter().map(TileId::level).max().unwrap());
    }

    #[test]
    fn test_repeated_update_is_stable() {
        let mut manager = QuadtreeManager::new(config()).unwrap();
        let camera = polar_camera();
        let first = manager.update(&camera).unwrap();
        let second = manager.update(&camera).unwrap();

        assert_eq!(first.active, second.active);
        assert!(second.is_unchanged(), "second update reported changes");
    }

    #[test]
    fn test_first_update_adds_everything() {
        let mut manager = QuadtreeManager::new(config()).unwrap();
        let update = manager.update(&polar_camera()).unwrap();
        assert_eq!(update.added, update.active);
        assert!(update.removed.is_empty());
        assert_eq!(manager.active_count(), update.active.len());
    }

    #[test]
    fn test_output_in_key_order() {
        let mut manager = QuadtreeManager::new(config()).unwrap();
        let update = manager.update(&polar_camera()).unwrap();
        assert!(update.active.windows(2).all(|w| w[0].key() < w[1].key()));
        assert!(manager.active().eq(update.active.iter().copied()));
    }

    #[test]
    fn test_raising_threshold_never_increases_active_count() {
        let camera = polar_camera();
        let mut previous = usize::MAX;
        for threshold in [8.0, 12.0, 16.0, 32.0, 64.0, 128.0, 1e6] {
            let mut manager = QuadtreeManager::new(QuadtreeConfig {
                sse_threshold: threshold,
                ..config()
            })
            .unwrap();
            let count = manager.update(&camera).unwrap().active.len();
            assert!(
                count <= previous,
                "threshold {threshold} produced {count} tiles, more than {previous}"
            );
            previous = count;
        }
    }

    /// A frustum that admits the PosZ root but none of its children.
    fn root_only_camera() -> (TileId, CameraState) {
        let ellipsoid = Ellipsoid::scaled(RADIUS);
        let root = TileId::root_faces()[CubeFace::PosZ.index() as usize];
        let root_bounds = BoundingSphere::from_tile(&root, &ellipsoid);
        let root_top = root_bounds.center.z + root_bounds.radius;
        let children_top = root
            .children()
            .unwrap()
            .iter()
            .map(|c| {
                let b = BoundingSphere::from_tile(c, &ellipsoid);
                b.center.z + b.radius
            })
            .fold(f64::MIN, f64::max);
        assert!(
            children_top < root_top,
            "children reach {children_top}, root reaches {root_top}"
        );

        // Keep only what reaches above the midpoint height.
        let cut = (children_top + root_top) * 0.5;
        let open = Plane::new(DVec3::X, 1e12);
        let frustum =
            FrustumPlanes::from_planes([open, open, open, open, open, Plane::new(DVec3::Z, -cut)]);
        let camera = CameraState {
            position: DVec3::new(0.0, 0.0, 2.0e7),
            screen_height: SCREEN_HEIGHT,
            frustum,
        };
        (root, camera)
    }

    #[test]
    fn test_parent_retained_when_children_culled() {
        let (root, camera) = root_only_camera();
        // Refinement here comes from the error metric alone.
        let mut manager = QuadtreeManager::new(QuadtreeConfig {
            min_level: 0,
            max_level: 3,
            ..config()
        })
        .unwrap();
        let update = manager.update(&camera).unwrap();

        assert_eq!(update.active, vec![root]);
        assert_eq!(update.stats.retained_parents, 1);
        assert_eq!(update.stats.coarse_pruned, 0);
        for child in root.children().unwrap() {
            assert!(!manager.is_active(&child), "{child} should not be active");
        }
    }

    #[test]
    fn test_tile_below_min_level_without_visible_children_is_dropped() {
        let (root, camera) = root_only_camera();
        let mut manager = QuadtreeManager::new(QuadtreeConfig {
            min_level: 1,
            max_level: 3,
            ..config()
        })
        .unwrap();
        let update = manager.update(&camera).unwrap();

        assert!(update.active.is_empty(), "got {:?}", update.active);
        assert!(!manager.is_active(&root));
        assert_eq!(update.stats.coarse_pruned, 1);
        assert_eq!(update.stats.retained_parents, 0);
    }

    #[test]
    fn test_active_tiles_intersect_frustum() {
        let mut manager = QuadtreeManager::new(config()).unwrap();
        let camera = equator_camera();
        let update = manager.update(&camera).unwrap();
        for tile in &update.active {
            let b = BoundingSphere::from_tile(tile, manager.ellipsoid());
            assert!(
                camera.frustum.intersects_sphere(b.center, b.radius),
                "{tile} is active but outside the frustum"
            );
        }
    }

    #[test]
    fn test_camera_move_reports_delta() {
        let mut manager = QuadtreeManager::new(config()).unwrap();
        let before = manager.update(&polar_camera()).unwrap();
        let after = manager.update(&equator_camera()).unwrap();

        assert!(!after.added.is_empty());
        assert!(!after.removed.is_empty());
        for tile in &after.added {
            assert!(!before.active.contains(tile), "{tile} was already active");
            assert!(after.active.contains(tile));
        }
        for tile in &after.removed {
            assert!(before.active.contains(tile));
            assert!(!after.active.contains(tile), "{tile} is still active");
        }
        assert!(after.added.windows(2).all(|w| w[0].key() < w[1].key()));
        assert!(after.removed.windows(2).all(|w| w[0].key() < w[1].key()));
        assert_eq!(
            before.active.len() + after.added.len() - after.removed.len(),
            after.active.len()
        );
    }

    #[test]
    fn test_horizon_culling_prunes_far_side() {
        let mut manager = QuadtreeManager::new(QuadtreeConfig {
            horizon_culling: true,
            ..config()
        })
        .unwrap();
        // Far plane well past the planet, so only the horizon can prune.
        let camera = look_at(
            DVec3::new(0.0, 0.0, 8_378_137.0),
            DVec3::NEG_Z,
            DVec3::Y,
            1.0e8,
        );
        let update = manager.update(&camera).unwrap();

        assert!(update.stats.horizon_culled > 0);
        for tile in &update.active {
            assert_ne!(tile.face(), CubeFace::NegZ, "{tile} is behind the horizon");
        }
    }

    #[test]
    fn test_invalid_camera_keeps_state() {
        let mut manager = QuadtreeManager::new(config()).unwrap();
        let camera = polar_camera();
        let first = manager.update(&camera).unwrap();

        let mut bad = camera.clone();
        bad.position.x = f64::NAN;
        assert!(matches!(manager.update(&bad), Err(LodError::InvalidCamera(_))));

        let mut bad = camera.clone();
        bad.screen_height = 0.0;
        assert!(matches!(manager.update(&bad), Err(LodError::InvalidCamera(_))));

        assert_eq!(manager.active_count(), first.active.len());
        assert!(manager.update(&camera).unwrap().is_unchanged());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = [
            QuadtreeConfig {
                max_level: TileId::MAX_LEVEL + 1,
                ..config()
            },
            QuadtreeConfig {
                min_level: 5,
                max_level: 4,
                ..config()
            },
            QuadtreeConfig {
                sse_threshold: 0.0,
                ..config()
            },
            QuadtreeConfig {
                planet_radius: f64::NAN,
                ..config()
            },
        ];
        for cfg in bad {
            assert!(
                matches!(QuadtreeManager::new(cfg.clone()), Err(LodError::InvalidConfig(_))),
                "{cfg:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_supported_level_matches_tile_key() {
        assert_eq!(TileId::MAX_LEVEL, QuadtreeConfig::MAX_SUPPORTED_LEVEL);
    }

    #[test]
    fn test_reset_reports_everything_added() {
        let mut manager = QuadtreeManager::new(config()).unwrap();
        let camera = polar_camera();
        manager.update(&camera).unwrap();
        manager.reset();
        assert_eq!(manager.active_count(), 0);

        let update = manager.update(&camera).unwrap();
        assert_eq!(update.added, update.active);
        assert!(update.removed.is_empty());
    }

    #[test]
    fn test_min_level_forces_refinement() {
        let mut manager = QuadtreeManager::new(QuadtreeConfig {
            min_level: 2,
            max_level: 2,
            ..config()
        })
        .unwrap();
        // Far away: error alone would never refine.
        let eye = DVec3::new(0.0, 0.0, 1.0e9);
        let update = manager
            .update(&look_at(eye, DVec3::NEG_Z, DVec3::Y, 2.0e9))
            .unwrap();
        let pos_z: Vec<_> = update
            .active
            .iter()
            .filter(|t| t.face() == CubeFace::PosZ)
            .collect();
        assert_eq!(pos_z.len(), 16);
        assert!(pos_z.iter().all(|t| t.level() == 2));
    }
}
