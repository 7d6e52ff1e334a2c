//! Effect requests emitted by the simulation for rendering and audio.
//!
//! The core never draws or plays anything; it only asks.

use serde::{Deserialize, Serialize};

use crate::types::{Position, VesselId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectRequest {
    /// A turret fired.
    GunFired {
        vessel: VesselId,
        turret: u8,
        position: Position,
        angle: f64,
    },
    /// Shell or catastrophic explosion.
    Explosion { position: Position, radius: f64 },
    /// Shell fell into the sea.
    Splash { position: Position },
    /// Play the sinking cue for a vessel.
    SinkingAudio { vessel: VesselId },
}
