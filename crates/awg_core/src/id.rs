//! Object and joint identifiers

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a physics object (body + shape pair, or trigger).
///
/// Assigned once when the body is created and never reused, so a registry
/// lookup with a stale id simply misses instead of resolving to a newer object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Create an id from its raw value
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a joint between two objects
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JointId(u64);

impl JointId {
    /// Create an id from its raw value
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JointId({})", self.0)
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "j#{}", self.0)
    }
}

/// Monotonic id source.
///
/// Starts at 1: a raw value of 0 is what an untagged collider carries, so it
/// never names a real object.
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a new ID generator
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Generate the next object id
    pub fn next_object(&self) -> ObjectId {
        ObjectId(self.bump())
    }

    /// Generate the next joint id
    pub fn next_joint(&self) -> JointId {
        JointId(self.bump())
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }

    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("issued", &self.issued())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let gen = IdGenerator::new();
        let a = gen.next_object();
        let b = gen.next_object();
        assert!(b > a);
        assert_eq!(a.raw(), 1);
        assert_eq!(b.raw(), 2);
    }

    #[test]
    fn test_joints_share_the_counter() {
        let gen = IdGenerator::new();
        let obj = gen.next_object();
        let joint = gen.next_joint();
        assert_ne!(obj.raw(), joint.raw());
        assert_eq!(gen.issued(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(ObjectId::from_raw(7).to_string(), "#7");
        assert_eq!(format!("{:?}", JointId::from_raw(3)), "JointId(3)");
    }
}
