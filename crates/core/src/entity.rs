//! Identity of persisted records.

/// A record whose identity survives every change to its other fields.
pub trait Entity {
    /// Store-assigned identifier; cheap to copy and usable as a map key.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}
