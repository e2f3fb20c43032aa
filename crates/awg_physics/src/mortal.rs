//! Health and fall damage

use crate::commands::Commands;
use crate::registry::CollisionHooks;
use awg_core::Contact;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Impacts below this fraction of the lethal velocity do no damage
pub const DAMAGE_THRESHOLD: f32 = 0.35;

/// Health component of a destructible object.
///
/// As collision hooks, a landing impulse turns into damage and death vanishes
/// the owning object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mortal {
    /// Current health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// Impulse that takes a full health bar, `None` for fall-proof objects
    pub lethal_fall_velocity: Option<f32>,
    dead: bool,
}

/// A [`Mortal`] shared between the game object and the physics world
pub type SharedMortal = Arc<Mutex<Mortal>>;

impl Mortal {
    /// Full health, immune to falls
    pub fn new(max_health: i32) -> Self {
        Self {
            health: max_health,
            max_health,
            lethal_fall_velocity: None,
            dead: false,
        }
    }

    /// Take fall damage
    pub fn with_lethal_fall_velocity(mut self, velocity: f32) -> Self {
        self.lethal_fall_velocity = (velocity > 0.0).then_some(velocity);
        self
    }

    /// Start with less than full health
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Damage a landing with this impulse would deal
    pub fn fall_damage(&self, impulse: f32) -> Option<i32> {
        let lethal = self.lethal_fall_velocity?;
        let ratio = (impulse / lethal).abs();
        if ratio < DAMAGE_THRESHOLD {
            return None;
        }
        Some((ratio * ratio * self.max_health as f32).round() as i32)
    }

    /// Apply a landing. Returns `true` if it killed.
    pub fn fall(&mut self, impulse: f32) -> bool {
        match self.fall_damage(impulse) {
            Some(damage) => self.take_damage(damage),
            None => false,
        }
    }

    /// Lose health. Returns `true` only on the hit that kills.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.dead {
            return false;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.dead = true;
        }
        self.dead
    }

    /// Still alive
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Wrap for sharing with the physics world
    pub fn shared(self) -> SharedMortal {
        Arc::new(Mutex::new(self))
    }
}

impl CollisionHooks for Mortal {
    fn post_collision_handle(&mut self, contact: &Contact, commands: &mut Commands) -> bool {
        let impulse = contact.impulse_magnitude();
        if self.fall(impulse) {
            log::debug!("{} died from a fall (impulse {impulse:.1})", contact.this);
            commands.vanish(contact.this);
        }
        true
    }
}

impl CollisionHooks for SharedMortal {
    fn post_collision_handle(&mut self, contact: &Contact, commands: &mut Commands) -> bool {
        self.lock().post_collision_handle(contact, commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use awg_core::ObjectId;

    #[test]
    fn test_fall_damage_formula() {
        let mortal = Mortal::new(200).with_lethal_fall_velocity(256.0);

        assert_eq!(mortal.fall_damage(80.0), None);
        // (128 / 256)^2 * 200
        assert_eq!(mortal.fall_damage(128.0), Some(50));
        assert_eq!(mortal.fall_damage(-256.0), Some(200));
    }

    #[test]
    fn test_immune() {
        let mut mortal = Mortal::new(10).with_lethal_fall_velocity(-1.0);
        assert_eq!(mortal.lethal_fall_velocity, None);
        assert!(!mortal.fall(1.0e6));
        assert_eq!(mortal.health, 10);
    }

    #[test]
    fn test_dies_once() {
        let mut mortal = Mortal::new(10);
        assert!(!mortal.take_damage(4));
        assert!(mortal.take_damage(6));
        assert!(!mortal.is_alive());
        assert!(!mortal.take_damage(1));
    }

    #[test]
    fn test_death_vanishes_owner() {
        let id = ObjectId::from_raw(3);
        let mut mortal = Mortal::new(32).with_lethal_fall_velocity(64.0);
        let mut commands = Commands::detached();

        let soft = Contact::new(id, None).with_impulse([0.0, 10.0]);
        mortal.post_collision_handle(&soft, &mut commands);
        assert!(commands.is_empty());

        let hard = Contact::new(id, None).with_impulse([0.0, 128.0]);
        mortal.post_collision_handle(&hard, &mut commands);
        assert!(matches!(commands.pending(), [Command::Vanish(v)] if *v == id));
    }

    #[test]
    fn test_shared() {
        let shared = Mortal::new(10).with_lethal_fall_velocity(10.0).shared();
        let mut hooks = shared.clone();
        let contact = Contact::new(ObjectId::from_raw(1), None).with_impulse([6.0, 8.0]);

        hooks.post_collision_handle(&contact, &mut Commands::detached());
        assert!(!shared.lock().is_alive());
    }
}
