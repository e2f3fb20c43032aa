//! # awg_core - AWG Core
//!
//! Zero-dependency primitives shared by the physics and trigger crates:
//! - **Identity**: [`ObjectId`] / [`JointId`] handed out by an [`IdGenerator`]
//! - **Taxonomy**: [`EntityKind`], the closed set of game object kinds
//! - **Contacts**: [`Contact`], the data passed to collision hooks and triggers
//!
//! Nothing in here knows about the simulator. Ids are plain monotonically
//! increasing integers, so a stale id can never alias a newer object.

pub mod contact;
pub mod id;
pub mod kind;

pub use contact::*;
pub use id::*;
pub use kind::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::contact::Contact;
    pub use crate::id::{IdGenerator, JointId, ObjectId};
    pub use crate::kind::EntityKind;
}
