//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// This is the "has-id" contract: generic collections index values by the id
/// the entity exposes instead of inspecting its concrete type.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
