//! Render interface (C10, spec.md §6 "Provided to the renderer"; expanded
//! in the project's full specification §4.10).
//!
//! The renderer is an external collaborator (spec.md §1 "deliberately out
//! of scope"). This module is the one-way, read-only surface the core
//! exposes to it: per frame, for every entity with `RENDERABLE & TRANSFORM`,
//! its world matrix, mesh/material handles, and visibility flag. Nothing
//! produced by the renderer flows back into the core.

use signal_ecs::prelude::*;
use signal_math::Mat4;

/// One draw-relevant snapshot row. Mesh/material handles are opaque to the
/// core (spec.md §6); only the external asset registry gives them meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub entity: EntityId,
    pub world_matrix: Mat4,
    pub mesh_handle: u32,
    pub material_handle: u32,
    pub visible: bool,
}

/// Gather one frame's render items, slot-ascending (spec.md §4.2 iteration
/// order guarantee). Must be called after the transform-refresh pass
/// within the tick, or `world_matrix` may be stale by up to one tick.
pub fn gather_render_frame(world: &World) -> Vec<RenderItem> {
    world
        .entities_matching(ComponentBits::RENDERABLE | ComponentBits::TRANSFORM)
        .into_iter()
        .filter_map(|id| {
            let transform = world.get_transform(id)?;
            let renderable = world.get_renderable(id)?;
            Some(RenderItem {
                entity: id,
                world_matrix: transform.world_matrix,
                mesh_handle: renderable.mesh_handle,
                material_handle: renderable.material_handle,
                visible: renderable.visible,
            })
        })
        .collect()
}

/// Resolve a camera's view-projection matrix for the frame (spec.md §4.11
/// addition). `follow_target` is re-resolved every call, never cached
/// (spec.md §9 "Cyclic references"); an invalid/dead target falls back to
/// the camera entity's own transform.
pub fn camera_view_projection(world: &World, camera_entity: EntityId, aspect_ratio: f32) -> Option<Mat4> {
    let camera = world.get_camera(camera_entity)?;
    let camera_transform = world.get_transform(camera_entity)?;

    let eye = camera_transform.position;
    let target_position = if !camera.follow_target.is_invalid() && world.entity_is_alive(camera.follow_target) {
        world
            .get_transform(camera.follow_target)
            .map(|t| t.position)
            .unwrap_or(eye + signal_math::quaternion_rotate_vector(camera_transform.rotation, signal_math::Vec3::Z))
    } else {
        eye + signal_math::quaternion_rotate_vector(camera_transform.rotation, signal_math::Vec3::Z)
    };

    let view = signal_math::look_at(eye, target_position, signal_math::Vec3::Y);
    let projection = signal_math::perspective(camera.fov_y_radians, aspect_ratio, camera.near, camera.far);
    Some(projection * view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_math::Vec3;

    fn renderable_entity(world: &mut World) -> EntityId {
        let id = world.entity_create().unwrap();
        world
            .entity_add_component(id, ComponentBits::RENDERABLE | ComponentBits::TRANSFORM)
            .unwrap();
        id
    }

    #[test]
    fn gather_skips_non_renderable_entities() {
        let mut world = World::new();
        let renderable = renderable_entity(&mut world);
        let plain = world.entity_create().unwrap();
        world.entity_add_component(plain, ComponentBits::TRANSFORM).unwrap();

        let items = gather_render_frame(&world);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].entity, renderable);
    }

    #[test]
    fn gather_reports_visibility_and_handles() {
        let mut world = World::new();
        let id = renderable_entity(&mut world);
        {
            let renderable = world.get_renderable_mut(id).unwrap();
            renderable.mesh_handle = 7;
            renderable.material_handle = 3;
            renderable.visible = false;
        }
        let items = gather_render_frame(&world);
        assert_eq!(items[0].mesh_handle, 7);
        assert_eq!(items[0].material_handle, 3);
        assert!(!items[0].visible);
    }

    #[test]
    fn camera_without_follow_target_uses_own_transform() {
        let mut world = World::new();
        let id = world.entity_create().unwrap();
        world.entity_add_component(id, ComponentBits::CAMERA | ComponentBits::TRANSFORM).unwrap();
        world.get_transform_mut(id).unwrap().set_position(Vec3::new(0.0, 0.0, -5.0));
        let vp = camera_view_projection(&world, id, 16.0 / 9.0);
        assert!(vp.is_some());
    }
}
