//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — they have no
/// identity of their own. `Currency` and a validated schedule window are the
/// canonical examples in this codebase; `ShootTask` is not one (it has an id).
///
/// To "modify" a value object, construct a new one. The trait bounds keep them
/// cheap to copy, comparable, and debuggable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
