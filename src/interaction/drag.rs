//! Mouse dragging of the bat
//!
//! A press over the bat selects it. While selected, the cursor ray is cut
//! with the vertical drag plane and the hit point moves the bat: height
//! follows the cursor's height, and the cursor's horizontal offset moves the
//! bat along the table's long axis. Releasing the button drops the selection.

use glam::Vec3;
use hecs::Entity;

use super::ray::{Plane, Ray};

/// Selection and drag plane
#[derive(Debug, Clone)]
pub struct DragController {
    plane: Plane,
    selected: Option<Entity>,
}

impl DragController {
    /// Drag on the plane through the origin facing +Z
    pub fn new() -> Self {
        Self::with_plane(Plane::new(Vec3::Z, 0.0))
    }

    /// Drag on a custom plane
    pub fn with_plane(plane: Plane) -> Self {
        Self {
            plane,
            selected: None,
        }
    }

    /// Select an entity
    pub fn begin(&mut self, entity: Entity) {
        log::debug!("Drag started on {entity:?}");
        self.selected = Some(entity);
    }

    /// Drop the selection
    pub fn end(&mut self) {
        if let Some(entity) = self.selected.take() {
            log::debug!("Drag released on {entity:?}");
        }
    }

    /// Currently dragged entity
    pub fn selected(&self) -> Option<Entity> {
        self.selected
    }

    /// Where the selected object should move for a cursor ray
    ///
    /// Returns `None` when the ray misses the drag plane. The object's X is
    /// left untouched.
    pub fn target(&self, ray: &Ray, current: Vec3) -> Option<Vec3> {
        let hit = ray.intersect_plane(&self.plane)?;
        Some(Vec3::new(current.x, hit.y, -hit.x))
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_lifecycle() {
        let mut world = hecs::World::new();
        let bat = world.spawn(());

        let mut drag = DragController::new();
        assert_eq!(drag.selected(), None);
        drag.begin(bat);
        assert_eq!(drag.selected(), Some(bat));
        drag.end();
        assert_eq!(drag.selected(), None);
    }

    #[test]
    fn test_target_maps_plane_hit() {
        let drag = DragController::new();
        let ray = Ray::new(Vec3::new(0.0, 2.0, 4.0), Vec3::new(0.5, -0.25, -4.0));
        let hit = ray.intersect_plane(&Plane::new(Vec3::Z, 0.0)).unwrap();

        let target = drag.target(&ray, Vec3::new(0.6, 1.5, 1.5)).unwrap();
        assert_eq!(target.x, 0.6);
        assert!((target.y - hit.y).abs() < 1e-6);
        assert!((target.z + hit.x).abs() < 1e-6);
    }

    #[test]
    fn test_target_none_when_plane_missed() {
        let drag = DragController::new();
        let ray = Ray::new(Vec3::new(0.0, 2.0, 4.0), Vec3::Z);
        assert!(drag.target(&ray, Vec3::ZERO).is_none());
    }
}
