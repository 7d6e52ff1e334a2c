//! Fire and flooding: burn burning compartments, let breaches take on
//! water, and founder vessels that flood completely.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use broadside_core::components::{DamageLedger, Hull};
use broadside_core::config::DamageConfig;
use broadside_core::constants::LARGE_EXPLOSION_RADIUS;
use broadside_core::enums::Lifecycle;
use broadside_core::events::EffectRequest;
use broadside_core::types::Position;

use crate::damage;

pub fn run(
    world: &mut World,
    config: &DamageConfig,
    rng: &mut ChaCha8Rng,
    effects: &mut Vec<EffectRequest>,
    dt: f64,
) {
    for (_entity, (hull, pos, ledger, lifecycle)) in
        world.query_mut::<(&Hull, &Position, &mut DamageLedger, &Lifecycle)>()
    {
        if ledger.sunk || *lifecycle != Lifecycle::Alive {
            continue;
        }

        for name in damage::burning(ledger) {
            let outcome = damage::apply_damage(
                ledger,
                Some(name.as_str()),
                config.fire_damage_per_sec * dt,
                config,
                rng,
            );
            if outcome.detonated {
                info!(vessel = %hull.id, compartment = %name, "fire reached the magazine");
                effects.push(EffectRequest::Explosion {
                    position: *pos,
                    radius: LARGE_EXPLOSION_RADIUS,
                });
                break;
            }
        }

        damage::apply_flooding(ledger, dt, config);
        if damage::check_foundering(ledger) {
            info!(vessel = %hull.id, "foundered");
        }
    }
}
