//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. They are defined entirely by their
//! attribute values, so two value objects with the same values are equal and
//! interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**:
///
/// - **Value Object**: no identity (an order line for 2 x `SMALL-TABLE` on
///   order `o-1` equals any other such line)
/// - **Entity**: has identity (a batch is the same batch as long as its
///   reference matches, see [`crate::Entity`])
///
/// To "modify" a value object, build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Line {
///     sku: String,
///     quantity: i64,
/// }
///
/// impl ValueObject for Line {}
///
/// let a = Line { sku: "LAMP".to_string(), quantity: 1 };
/// let b = Line { sku: "LAMP".to_string(), quantity: 1 };
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
