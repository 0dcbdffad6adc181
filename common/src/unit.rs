//! Marker types.

/// Marker type tagging the moment an entity was created.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type tagging the moment an entity was soft-deleted.
#[derive(Clone, Copy, Debug)]
pub struct Deletion;
