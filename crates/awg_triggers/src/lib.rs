//! AWG Triggers - Trigger State Machine
//!
//! This crate holds the simulator-independent half of trigger areas: which
//! entities are currently inside, which ones may enter, and which callbacks
//! fire on each transition. Overlap detection itself is done by the physics
//! crate, which feeds `enter`/`leave` calls from sensor contacts.
//!
//! # Features
//!
//! - Enter/Leave transitions with set semantics (no duplicate enters)
//! - Category, allow-list (by [`EntityKind`](awg_core::EntityKind)) and ignore-list filtering
//! - Fixed or anchored placement
//! - Callbacks receiving a caller-defined context (e.g. a command buffer)
//!
//! # Example
//!
//! ```ignore
//! use awg_triggers::prelude::*;
//!
//! let trigger: Trigger<()> = Trigger::new(id, TriggerPlacement::Fixed([0.0, 0.0]))
//!     .with_filter(TriggerFilter::new().allow_kind(EntityKind::Hero))
//!     .on_enter(|event, _| println!("{} entered", event.actor.id));
//! ```

pub mod events;
pub mod filter;
pub mod trigger;

pub mod prelude {
    pub use crate::events::{Actor, TriggerCallback, TriggerEvent, TriggerEventType, TriggerHandler};
    pub use crate::filter::TriggerFilter;
    pub use crate::trigger::{PlacementError, Trigger, TriggerPlacement};
}

pub use prelude::*;
