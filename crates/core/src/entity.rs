//! Entities: things tracked by identity rather than by their attributes.

/// A domain object whose identity survives changes to its state.
///
/// A batch is still the same batch after lines are allocated against it;
/// only its [`Entity::Id`] decides that.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Same identity, regardless of any other state.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
