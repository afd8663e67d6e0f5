use std::any::Any;

use crate::error::AccessError;
use crate::schema::{FieldDescriptor, TypeInfo};
use crate::value::Value;

/// Reflective access to the instance fields of a type.
///
/// Usually generated by `#[derive(Zoner)]`. Implementations dispatch on
/// `field.owner()`: descriptors declared by `Self` are resolved by
/// `field.slot()`, descriptors declared by a base type are forwarded to the
/// base member. Static fields never reach these methods.
pub trait Reflect: Any {
    /// Descriptor table of the runtime type.
    fn type_info(&self) -> &'static TypeInfo;

    fn get_field(&self, field: &FieldDescriptor) -> Result<Value, AccessError>;

    fn set_field(&mut self, field: &FieldDescriptor, value: Value) -> Result<(), AccessError>;
}

/// Static side of `Reflect`: the descriptor table without an instance.
pub trait Typed: Reflect + Sized {
    fn info() -> &'static TypeInfo;
}

/// Error for a descriptor that reached an instance it does not belong to.
pub fn foreign_field(owner: &TypeInfo, field: &FieldDescriptor) -> AccessError {
    AccessError::unknown_field(format!(
        "field '{}' of {} does not belong to {}",
        field.name(),
        field.owner_name(),
        owner.name()
    ))
}
