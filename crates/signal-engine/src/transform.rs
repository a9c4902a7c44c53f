//! Transform-refresh pass (C3, spec.md §4.3).
//!
//! Recomputes `local_matrix`/`world_matrix` for every dirty transform and
//! clears the dirty flag. Systems reading matrices (camera, the render
//! interface) must run after this pass within a tick (spec.md §4.3).
//! Children inherit dirty propagation when a parent becomes dirty, even if
//! the child's own fields never changed -- a parent's new world matrix
//! still invalidates every descendant's cached composition.

use signal_ecs::prelude::*;

/// Longest parent chain the refresh will walk before giving up and
/// treating the entity as root. Guards against a cyclic `parent` chain
/// recursing forever (spec.md §9 "Cyclic references").
const MAX_PARENT_DEPTH: u32 = 64;

/// Run the transform-refresh pass over every entity with `TRANSFORM`
/// (spec.md §4.3). Parents are resolved by direct lookup, not a cached
/// back-pointer (spec.md §9 "Cyclic references"); an invalid or dead
/// `parent` falls back to treating the transform as root.
pub fn run_transform_refresh(world: &mut World) {
    let ids = world.entities_matching(ComponentBits::TRANSFORM);
    for id in ids {
        refresh_one(world, id, 0);
    }
}

/// Recompute `id`'s matrices if its own `dirty` flag is set, or if
/// resolving its parent recomputed *that* transform this tick (dirty
/// propagation). Returns whether `id`'s matrices were (re)computed, so a
/// caller higher in the chain knows whether it must also recompute.
///
/// Parents are resolved before children by walking up the chain
/// recursively, so composition always uses this tick's matrix rather than
/// one left over from before the parent moved -- independent of which
/// order `entities_matching` happens to hand the two entities back in.
fn refresh_one(world: &mut World, id: EntityId, depth: u32) -> bool {
    let Some(transform) = world.get_transform(id) else {
        return false;
    };
    let own_dirty = transform.dirty;
    let parent = transform.parent;
    let has_parent = !parent.is_invalid() && depth < MAX_PARENT_DEPTH && world.entity_is_alive(parent);

    let parent_recomputed = has_parent && refresh_one(world, parent, depth + 1);

    if !own_dirty && !parent_recomputed {
        return false;
    }

    let transform = world.get_transform(id).expect("entity still alive, just read above");
    let local_matrix = signal_math::trs(transform.position, transform.rotation, transform.scale);
    let world_matrix = if has_parent {
        world
            .get_transform(parent)
            .map(|p| p.world_matrix * local_matrix)
            .unwrap_or(local_matrix)
    } else {
        local_matrix
    };

    let transform = world.get_transform_mut(id).expect("entity still alive, just read above");
    transform.local_matrix = local_matrix;
    transform.world_matrix = world_matrix;
    transform.dirty = false;
    true
}
