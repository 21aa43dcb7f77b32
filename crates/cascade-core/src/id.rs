//! Strongly-typed identifiers.
//!
//! All identifiers are opaque small integers distinguished by tag so an
//! index into one table cannot be used against another. "Null" ids are
//! expressed as `Option<Id>`, never as a reserved sentinel value.

use std::fmt;

use crate::collection::OpaqueId;

/// Identifies an action in the step pipeline.
///
/// Actions are registered before a run begins and assigned sequential
/// ids in insertion order. `ActionId(n)` is the n-th registered action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for ActionId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies an independent scheduling context (a "stream").
///
/// Each stream exclusively owns one track-slot state, one initializer
/// buffer, and one set of RNG states. Bounded by the configured
/// `max_streams`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(pub u32);

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for StreamId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a track slot within one stream's slot bank.
///
/// Bounded by the configured slot capacity. Slots are the unit of
/// parallel work: one slot holds at most one track at a time, and a
/// vacated slot is recycled for a new track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackSlotId(pub u32);

impl fmt::Display for TrackSlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for TrackSlotId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-(stream, event) track identity.
///
/// Issued monotonically as tracks are created and never reused within
/// an event; the parent id of a secondary is the producing track's id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for TrackId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies an event: one logically-independent set of primaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for EventId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a user-submitted primary within a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimaryId(pub u32);

impl fmt::Display for PrimaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for PrimaryId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a particle species in the particle table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u32);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for ParticleId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a discrete process attached to one particle species.
///
/// Process ids are local to the owning particle: `ProcessId(0)` of a
/// gamma and `ProcessId(0)` of an electron are unrelated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for ProcessId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a physics material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhysMatId(pub u32);

impl fmt::Display for PhysMatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for PhysMatId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a logical volume in the problem geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeId(pub u32);

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for VolumeId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies one placement (instance) of a volume in the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeInstanceId(pub u32);

impl fmt::Display for VolumeInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for VolumeInstanceId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a sensitive detector derived from the volume → detector map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DetectorId(pub u32);

impl fmt::Display for DetectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for DetectorId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies one entry in the auxiliary params/state registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuxId(pub u32);

impl fmt::Display for AuxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpaqueId for AuxId {
    fn from_index(i: usize) -> Self {
        Self(i as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}
