//! Target upkeep: drop locks on vessels that are gone and let AI gun
//! crews pick the nearest hostile in range.

use hecs::{Entity, World};
use tracing::debug;

use broadside_core::components::{FireControl, Hull, TargetSpec};
use broadside_core::enums::{Lifecycle, Side, VesselRole};
use broadside_core::types::{Position, VesselId};

use crate::roster::Roster;

/// An afloat vessel that may be targeted.
struct Contact {
    id: VesselId,
    position: Position,
    side: Side,
}

fn contacts(world: &World, roster: &Roster) -> Vec<Contact> {
    roster
        .ids()
        .iter()
        .filter_map(|id| {
            let entity = roster.resolve_afloat(world, *id).ok()?;
            let mut query = world
                .query_one::<(&Position, &VesselRole, &Lifecycle)>(entity)
                .ok()?;
            let (pos, role, lifecycle) = query.get()?;
            (*lifecycle == Lifecycle::Alive).then_some(Contact {
                id: *id,
                position: *pos,
                side: role.side(),
            })
        })
        .collect()
}

pub fn run(world: &mut World, roster: &Roster) {
    // Invalid targets: cleared, fire held.
    let mut invalid: Vec<Entity> = Vec::new();
    for (entity, (hull, fc)) in world.query::<(&Hull, &FireControl)>().iter() {
        if let Some(TargetSpec::Vessel { vessel }) = fc.target {
            if let Err(err) = roster.resolve_afloat(world, vessel) {
                debug!(vessel = %hull.id, %err, "target lost");
                invalid.push(entity);
            }
        }
    }
    for entity in invalid {
        if let Ok(mut fc) = world.get::<&mut FireControl>(entity) {
            fc.target = None;
            fc.fire_enabled = false;
        }
    }

    // Auto-engage for AI vessels with no target.
    let contacts = contacts(world, roster);
    for (_entity, (hull, pos, role, fc, lifecycle)) in
        world.query_mut::<(&Hull, &Position, &VesselRole, &mut FireControl, &Lifecycle)>()
    {
        if *role == VesselRole::Player
            || !fc.auto_engage
            || fc.target.is_some()
            || *lifecycle != Lifecycle::Alive
        {
            continue;
        }
        let hostile = role.side().opposing();
        let nearest = contacts
            .iter()
            .filter(|c| c.side == hostile && c.id != hull.id)
            .map(|c| (c, pos.range_to(&c.position)))
            .filter(|(_, range)| *range <= hull.max_range)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((contact, range)) = nearest {
            debug!(vessel = %hull.id, target = %contact.id, range, "engaging");
            fc.target = Some(TargetSpec::Vessel { vessel: contact.id });
            fc.fire_enabled = true;
        }
    }
}
