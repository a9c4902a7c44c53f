//! SIGNAL ECS -- fixed-capacity, component-pool Entity-Component-System.
//!
//! Unlike a general-purpose archetype ECS, SIGNAL's component set is closed
//! (spec.md §3): ten recognised kinds, each with its own dense,
//! [`entity::MAX_ENTITIES`]-sized pool. Slot `i` of every pool corresponds to
//! entity slot `i`, so there is no hashmap indirection between an entity and
//! its components, and iteration over a system's required component set is
//! cache-linear and slot-ascending.
//!
//! # Quick start
//!
//! ```
//! use signal_ecs::prelude::*;
//!
//! let mut world = World::new();
//! let e = world.entity_create().unwrap();
//! world.entity_add_component(e, ComponentBits::TRANSFORM | ComponentBits::PHYSICS).unwrap();
//! assert!(world.get_transform(e).is_some());
//! assert!(world.get_physics(e).is_some());
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod components;
pub mod entity;
pub mod pool;
pub mod world;

// ---------------------------------------------------------------------------
// Error types (spec.md §7)
// ---------------------------------------------------------------------------

/// Errors produced by ECS operations. Mirrors the taxonomy in spec.md §7
/// for the rows that originate inside the ECS crate; physics-specific rows
/// (`NumericInstability`, `BudgetExceeded`) live in `signal-engine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// A stale or never-allocated `EntityId` was used where a live handle
    /// was required.
    #[error("entity does not exist (stale or never allocated)")]
    InvalidEntity,

    /// `entity_create` was called with `entity_count == MAX_ENTITIES`.
    #[error("world is at capacity ({} entities)", entity::MAX_ENTITIES)]
    WorldFull,

    /// Backing storage for a component pool could not be allocated
    /// (`World::try_new`). Fatal and surfaced at init time only -- nothing
    /// past construction allocates.
    #[error("failed to allocate component pool storage")]
    OutOfMemory,

    /// A pool/mask disagreement was detected (debug-build assertion target;
    /// release builds log and skip the offending entity).
    #[error("invariant violation: component mask and pool occupancy disagree")]
    InvariantViolation,
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::component::ComponentBits;
    pub use crate::components::*;
    pub use crate::entity::{EntityId, MAX_ENTITIES};
    pub use crate::world::World;
    pub use crate::SignalError;
}
