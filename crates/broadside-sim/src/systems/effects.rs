//! Refresh each vessel's cached combat effects from its ledger.

use hecs::World;

use broadside_core::components::{CombatEffects, DamageLedger};

use crate::damage;

pub fn run(world: &mut World) {
    for (_entity, (ledger, fx)) in world.query_mut::<(&DamageLedger, &mut CombatEffects)>() {
        *fx = damage::recompute_effects(ledger);
    }
}
