//! AWG Physics - Rapier 2D Platformer Core
//!
//! Physics world for a 2D platformer: bodies and shapes, collision filters,
//! per-object collision hooks and trigger areas, on top of Rapier 2D.
//!
//! # Features
//!
//! - Static, dynamic and kinematic bodies with polygon or circle shapes
//! - Category/mask/group collision filters
//! - Pre/post-solve collision hooks routed to the owning object
//! - Trigger areas (fixed or anchored) with enter/leave callbacks
//! - Deferred add/remove queues, flushed once per step
//! - Segment queries (thin and thick rays)
//! - Rigid and spring joints
//! - Fall damage for mortal objects
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                   PhysicsWorld                    │
//! │  ┌──────────┐  ┌──────────────┐  ┌─────────────┐  │
//! │  │ Registry │  │ PendingQueues│  │  Commands   │  │
//! │  └──────────┘  └──────────────┘  └─────────────┘  │
//! │  ┌─────────────────────────────────────────────┐  │
//! │  │     PhysicsPipeline + StepHooks (dispatch)  │  │
//! │  └─────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────┘
//!          │                 │                 │
//!          ▼                 ▼                 ▼
//!   ┌──────────────┐ ┌───────────────┐ ┌───────────┐
//!   │ PhysicObject │ │  Trigger<C>   │ │  Mortal   │
//!   │   (hooks)    │ │(awg_triggers) │ │  (hooks)  │
//!   └──────────────┘ └───────────────┘ └───────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use awg_physics::prelude::*;
//!
//! let mut world = PhysicsWorld::new(PhysicsConfig::default())?;
//!
//! let floor = world.spawn(ObjectDesc::polygon(
//!     [0.0, 0.0],
//!     rect_points(1000.0, 20.0, [0.0, 0.0]).to_vec(),
//!     PhysicProps::fixed(),
//! ))?;
//!
//! world.spawn_trigger(
//!     TriggerDesc::new([64.0, 64.0])
//!         .at([200.0, 40.0])
//!         .allow_kind(EntityKind::Hero)
//!         .on_enter(|event, _commands| println!("{} stepped in", event.actor.id)),
//! )?;
//!
//! world.step(1.0 / 60.0)?;
//! ```

pub mod body;
pub mod collider;
pub mod commands;
pub mod config;
mod dispatch;
pub mod error;
pub mod joint;
pub mod layers;
pub mod material;
pub mod mortal;
pub mod query;
pub mod queue;
pub mod registry;
pub mod trigger;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyKind, PhysicProps};
    pub use crate::collider::{rect_points, ObjectDesc, ShapeDesc};
    pub use crate::commands::{Command, Commands};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::layers::{CollisionCategory, CollisionFilter, TRIGGER_BITS};
    pub use crate::material::{CombineRule, PhysicsMaterial};
    pub use crate::mortal::{Mortal, SharedMortal};
    pub use crate::query::{PhysicsQuery, RayHit};
    pub use crate::queue::{PendingQueues, Primitive, PrimitiveRef};
    pub use crate::registry::{CollisionHooks, NullObject, PhysicObject, Registry};
    pub use crate::trigger::TriggerDesc;
    pub use crate::world::PhysicsWorld;
    pub use awg_core::{Contact, EntityKind, JointId, ObjectId};
    pub use awg_triggers::{Trigger, TriggerEvent, TriggerEventType, TriggerFilter};
}

pub use prelude::*;
