//! Collision categories and filtering

use crate::error::{PhysicsError, Result};
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Named collision category. Each one is a single bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionCategory {
    /// Level geometry
    Obstacle,
    /// Things that take part in nothing
    NoCollision,
    /// Objects with health
    Mortal,
    /// Walking characters
    Character,
    /// The player
    Player,
    /// Light sources
    Light,
    /// Trigger areas
    Trigger,
    /// Particles
    Particle,
}

impl CollisionCategory {
    /// All categories, lowest bit first
    pub const ALL: [CollisionCategory; 8] = [
        Self::Obstacle,
        Self::NoCollision,
        Self::Mortal,
        Self::Character,
        Self::Player,
        Self::Light,
        Self::Trigger,
        Self::Particle,
    ];

    /// Bit of this category
    pub const fn bits(self) -> u32 {
        1 << self as u32
    }

    /// Name used in filter descriptions
    pub fn name(self) -> &'static str {
        match self {
            Self::Obstacle => "obstacle",
            Self::NoCollision => "no_collision",
            Self::Mortal => "mortal",
            Self::Character => "character",
            Self::Player => "player",
            Self::Light => "light",
            Self::Trigger => "trigger",
            Self::Particle => "particle",
        }
    }

    /// Look a category up by name
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| PhysicsError::UnknownCategory(name.to_string()))
    }

    /// Union of the bits of several names
    pub fn mask_of(names: &[&str]) -> Result<u32> {
        names
            .iter()
            .try_fold(0u32, |acc, name| Ok(acc | Self::from_name(name)?.bits()))
    }
}

/// Bits of the trigger category
pub const TRIGGER_BITS: u32 = CollisionCategory::Trigger.bits();

/// Shape filter: what a shape is, what it collides with and its group.
///
/// Two shapes collide when each one's categories intersect the other's mask
/// and they are not in the same non-zero group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionFilter {
    /// Shapes with the same non-zero group never collide
    pub group: u32,
    /// Categories this shape belongs to
    pub categories: u32,
    /// Categories this shape collides with
    pub mask: u32,
}

impl CollisionFilter {
    /// Belongs to everything, collides with everything
    pub const ALL: Self = Self {
        group: 0,
        categories: u32::MAX,
        mask: u32::MAX,
    };

    /// Collides with nothing
    pub const NONE: Self = Self {
        group: 0,
        categories: 0,
        mask: 0,
    };

    /// Create a new filter
    pub const fn new(categories: u32, mask: u32) -> Self {
        Self {
            group: 0,
            categories,
            mask,
        }
    }

    /// Build a filter from category names.
    ///
    /// Without `ignore` or `collide_with` the mask is all categories.
    /// `ignore` removes categories from that, `collide_with` replaces it
    /// (an empty `collide_with` collides with nothing). Giving both is an error.
    pub fn from_names(
        categories: &[&str],
        ignore: Option<&[&str]>,
        collide_with: Option<&[&str]>,
    ) -> Result<Self> {
        let categories = CollisionCategory::mask_of(categories)?;

        let mask = match (ignore, collide_with) {
            (Some(_), Some(_)) => return Err(PhysicsError::ConflictingFilterArgs),
            (Some(ignore), None) => u32::MAX & !CollisionCategory::mask_of(ignore)?,
            (None, Some(with)) => CollisionCategory::mask_of(with)?,
            (None, None) => u32::MAX,
        };

        Ok(Self::new(categories, mask))
    }

    /// Set the group
    pub fn with_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    /// Stop colliding with some categories
    pub fn add_ignore(mut self, categories: u32) -> Self {
        self.mask &= !categories;
        self
    }

    /// Collide with some categories again
    pub fn remove_ignore(mut self, categories: u32) -> Self {
        self.mask |= categories;
        self
    }

    /// Same group, non-zero
    pub fn same_group(&self, other: &CollisionFilter) -> bool {
        groups_exclude(self.group, other.group)
    }

    /// Check if two filters let their shapes collide
    pub fn can_collide(&self, other: &CollisionFilter) -> bool {
        !self.same_group(other)
            && (self.categories & other.mask) != 0
            && (other.categories & self.mask) != 0
    }

    /// Whether this filter marks a trigger
    pub fn is_trigger(&self) -> bool {
        self.categories & TRIGGER_BITS != 0
    }

    pub(crate) fn to_rapier(self) -> rapier::InteractionGroups {
        rapier::InteractionGroups::new(
            rapier::Group::from_bits_truncate(self.categories),
            rapier::Group::from_bits_truncate(self.mask),
        )
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::ALL
    }
}

/// Group rule shared by filters and the contact hooks
pub(crate) fn groups_exclude(a: u32, b: u32) -> bool {
    a != 0 && a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_bits() {
        assert_eq!(CollisionCategory::Obstacle.bits(), 1);
        assert_eq!(CollisionCategory::NoCollision.bits(), 2);
        assert_eq!(CollisionCategory::Mortal.bits(), 4);
        assert_eq!(CollisionCategory::Trigger.bits(), 64);
        assert_eq!(CollisionCategory::Particle.bits(), 128);
        assert_eq!(
            CollisionCategory::from_name("player").unwrap(),
            CollisionCategory::Player
        );
    }

    #[test]
    fn test_from_names() {
        let f = CollisionFilter::from_names(&["mortal", "character"], None, None).unwrap();
        assert_eq!(f.categories, 4 | 8);
        assert_eq!(f.mask, u32::MAX);

        let f = CollisionFilter::from_names(&["particle"], None, Some(&["obstacle"])).unwrap();
        assert_eq!(f.mask, 1);

        let f = CollisionFilter::from_names(&["character"], Some(&["light", "particle"]), None)
            .unwrap();
        assert_eq!(f.mask & 32, 0);
        assert_eq!(f.mask & 128, 0);
        assert_ne!(f.mask & 1, 0);

        let f = CollisionFilter::from_names(&["no_collision"], None, Some(&[])).unwrap();
        assert_eq!(f.mask, 0);
    }

    #[test]
    fn test_from_names_errors() {
        assert!(matches!(
            CollisionFilter::from_names(&["dragon"], None, None),
            Err(PhysicsError::UnknownCategory(name)) if name == "dragon"
        ));
        assert!(matches!(
            CollisionFilter::from_names(&["mortal"], Some(&["light"]), Some(&["obstacle"])),
            Err(PhysicsError::ConflictingFilterArgs)
        ));
        assert!(matches!(
            CollisionFilter::from_names(&["mortal"], Some(&["lava"]), None),
            Err(PhysicsError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_ignore_roundtrip() {
        let light = CollisionCategory::Light.bits();
        let f = CollisionFilter::ALL.add_ignore(light);
        assert_eq!(f.mask & light, 0);
        assert_eq!(f.remove_ignore(light), CollisionFilter::ALL);
    }

    #[test]
    fn test_can_collide() {
        let obstacle = CollisionFilter::new(1, u32::MAX);
        let particle = CollisionFilter::new(128, 1);
        let light = CollisionFilter::new(32, u32::MAX);

        assert!(obstacle.can_collide(&particle));
        assert!(!particle.can_collide(&light));
        assert!(!CollisionFilter::NONE.can_collide(&obstacle));
    }

    #[test]
    fn test_groups() {
        let a = CollisionFilter::ALL.with_group(3);
        let b = CollisionFilter::ALL.with_group(3);
        let c = CollisionFilter::ALL.with_group(4);
        assert!(!a.can_collide(&b));
        assert!(a.can_collide(&c));
        // Group zero means "no group"
        assert!(CollisionFilter::ALL.can_collide(&CollisionFilter::ALL));
    }
}
