//! Stable vessel ids and their hecs entities.
//!
//! Stored in `SimulationEngine`, NOT as ECS components. Every cross
//! reference in the simulation holds a `VesselId` and resolves it here.

use std::collections::HashMap;

use hecs::{Entity, World};

use broadside_core::components::DamageLedger;
use broadside_core::error::LookupError;
use broadside_core::types::VesselId;

#[derive(Debug, Default)]
pub struct Roster {
    entities: HashMap<VesselId, Entity>,
    /// Live ids in spawn order.
    order: Vec<VesselId>,
    /// Removed ids, and whether each went down by sinking.
    retired: HashMap<VesselId, bool>,
    next_id: u32,
}

impl Roster {
    /// Hand out the next id. Ids start at 1 and are never reused.
    pub fn allocate(&mut self) -> VesselId {
        self.next_id += 1;
        VesselId(self.next_id)
    }

    pub fn insert(&mut self, id: VesselId, entity: Entity) {
        self.entities.insert(id, entity);
        self.order.push(id);
    }

    /// Entity for a live id.
    pub fn resolve(&self, id: VesselId) -> Result<Entity, LookupError> {
        self.entities
            .get(&id)
            .copied()
            .ok_or(LookupError::VesselNotFound(id))
    }

    /// Entity for a live id whose ledger is not sunk.
    pub fn resolve_afloat(&self, world: &World, id: VesselId) -> Result<Entity, LookupError> {
        let entity = self.resolve(id)?;
        match world.get::<&DamageLedger>(entity) {
            Ok(ledger) if ledger.sunk => Err(LookupError::VesselSunk(id)),
            Ok(_) => Ok(entity),
            Err(_) => Err(LookupError::VesselNotFound(id)),
        }
    }

    /// Drop an id from the live set. Returns its entity if it was live.
    pub fn retire(&mut self, id: VesselId, sank: bool) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.order.retain(|v| *v != id);
        self.retired.insert(id, sank);
        Some(entity)
    }

    /// `Some(sank)` for ids that have left the world.
    pub fn retired(&self, id: VesselId) -> Option<bool> {
        self.retired.get(&id).copied()
    }

    /// Live ids in spawn order.
    pub fn ids(&self) -> &[VesselId] {
        &self.order
    }
}
