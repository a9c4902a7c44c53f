//! Scenario E (spec.md §8): mask/pool invariant under entity churn.
//!
//! Creates a batch of entities, adds random subsets of components, removes
//! components in random order, destroys half the entities, and asserts the
//! universal invariant (spec.md §8 property 1) holds after every step:
//! `mask_has(e, K) <=> pool_occupied(K, slot(e))`.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Pcg64Mcg;

use signal_ecs::prelude::*;

const CHURN_BITS: &[ComponentBits] = &[
    ComponentBits::TRANSFORM,
    ComponentBits::PHYSICS,
    ComponentBits::CONTROL_AUTHORITY,
    ComponentBits::THRUSTER_SYSTEM,
];

fn assert_mask_pool_agreement(world: &World, id: EntityId) {
    let mask = world.entity_mask(id).expect("entity should be alive");
    assert_eq!(mask.contains(ComponentBits::TRANSFORM), world.get_transform(id).is_some());
    assert_eq!(mask.contains(ComponentBits::PHYSICS), world.get_physics(id).is_some());
    assert_eq!(
        mask.contains(ComponentBits::CONTROL_AUTHORITY),
        world.get_control_authority(id).is_some()
    );
    assert_eq!(
        mask.contains(ComponentBits::THRUSTER_SYSTEM),
        world.get_thruster_system(id).is_some()
    );
}

#[test]
fn mask_pool_invariant_survives_random_churn() {
    let mut rng = Pcg64Mcg::new(0xC0FFEE_u128);
    let mut world = World::new();

    let ids: Vec<EntityId> = (0..100).map(|_| world.entity_create().unwrap()).collect();

    for &id in &ids {
        for &bit in CHURN_BITS {
            if rng.gen_bool(0.5) {
                world.entity_add_component(id, bit).unwrap();
            }
        }
        assert_mask_pool_agreement(&world, id);
    }

    let mut removal_order = CHURN_BITS.to_vec();
    removal_order.shuffle(&mut rng);
    for &id in &ids {
        for &bit in &removal_order {
            if rng.gen_bool(0.5) {
                world.entity_remove_component(id, bit).unwrap();
            }
            assert_mask_pool_agreement(&world, id);
        }
    }

    let mut to_destroy = ids.clone();
    to_destroy.shuffle(&mut rng);
    for &id in to_destroy.iter().take(ids.len() / 2) {
        world.entity_destroy(id);
        assert!(world.entity_mask(id).is_none());
        assert!(world.get_transform(id).is_none());
        assert!(world.get_physics(id).is_none());
    }

    for &id in ids.iter().skip(ids.len() / 2) {
        if world.entity_is_alive(id) {
            assert_mask_pool_agreement(&world, id);
        }
    }

    assert_eq!(world.entity_count(), ids.len() - ids.len() / 2);
}

#[test]
fn stale_handle_after_destroy_is_rejected_not_aliased() {
    let mut world = World::new();
    let a = world.entity_create().unwrap();
    world.entity_add_component(a, ComponentBits::PHYSICS).unwrap();
    world.entity_destroy(a);

    let b = world.entity_create().unwrap();
    assert_eq!(a.index(), b.index(), "test expects slot reuse");
    assert_ne!(a, b, "generation bump must change the handle");

    // The stale handle `a` must never be treated as referring to `b`'s data.
    assert!(world.get_physics(a).is_none());
    assert!(!world.entity_is_alive(a));
}
