//! Entity kinds

use std::fmt;

/// The closed set of game object kinds the physics core knows about.
///
/// Trigger allow-lists are expressed in these terms, so "which objects may
/// activate this trigger" is checked with a plain enum comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntityKind {
    /// Level geometry (rigid rectangles, terrain polygons)
    Geometry,
    /// Level geometry without collision response
    GeometrySensor,
    /// Walking characters (NPCs)
    Character,
    /// The player-controlled hero
    Hero,
    /// Throwable, breakable crate
    WoodenCrate,
    /// Heavy crate
    MetalCrate,
    /// Trigger area
    Trigger,
    /// Short-lived particle bodies
    Particle,
    /// Anything else
    #[default]
    Prop,
}

impl EntityKind {
    /// All kinds, in declaration order
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Geometry,
        EntityKind::GeometrySensor,
        EntityKind::Character,
        EntityKind::Hero,
        EntityKind::WoodenCrate,
        EntityKind::MetalCrate,
        EntityKind::Trigger,
        EntityKind::Particle,
        EntityKind::Prop,
    ];

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Geometry => "geometry",
            Self::GeometrySensor => "geometry_sensor",
            Self::Character => "character",
            Self::Hero => "hero",
            Self::WoodenCrate => "wooden_crate",
            Self::MetalCrate => "metal_crate",
            Self::Trigger => "trigger",
            Self::Particle => "particle",
            Self::Prop => "prop",
        }
    }

    /// Whether this kind walks around (characters and the hero)
    pub fn is_character(&self) -> bool {
        matches!(self, Self::Character | Self::Hero)
    }

    /// Whether a character can pick this kind up
    pub fn is_throwable(&self) -> bool {
        matches!(self, Self::WoodenCrate)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
