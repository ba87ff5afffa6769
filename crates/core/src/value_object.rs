//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// with the same attributes are the same value. Opening balances, posting
/// rules, and tax breakups are value objects; ledgers and vouchers (which
/// have identity) are entities.
///
/// To "modify" a value object, construct a new one. The trait only requires
/// what that implies:
/// - **Clone**: values are cheap to copy around
/// - **PartialEq**: compared by attribute values
/// - **Debug**: inspectable in logs and tests
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
