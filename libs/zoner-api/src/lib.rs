pub mod error;
pub mod leaf;
pub mod object;
pub mod reflect;
pub mod schema;
pub mod value;

pub use zoner_api_derive::Zoner;

pub use error::{AccessError, ErrorKind};
pub use leaf::is_leaf;
pub use object::{Object, Shared};
pub use reflect::{Reflect, Typed};
pub use schema::{
    Access, DeclaredType, FieldDescriptor, FieldMeta, Shape, TargetDecl, TypeInfo, TypeInfoBuilder,
};
pub use value::{Decimal, FromValue, Timestamp, ToValue, Value};
