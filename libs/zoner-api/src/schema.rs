use std::any::TypeId;

use crate::error::AccessError;
use crate::object::Object;
use crate::reflect::Typed;
use crate::value::Value;

/// Structural shape of a declared field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `T`
    Plain,
    /// `Option<T>`; the declared name is the inner `T`.
    Optional,
    /// `Vec<T>`, also behind `Option`.
    Sequence,
    /// `HashMap<String, V>`, `BTreeMap<String, V>`, also behind `Option`.
    Mapping,
}

/// Declared (static) type of a field, as written in the source struct.
///
/// `name` is the last path segment of the type (`"String"`, `"i64"`,
/// `"Shared"`), with `Option` unwrapped. `nested` points at the reflected
/// type carried by a `Shared<T>` member or by the `Shared<T>` elements of a
/// collection, when there is one.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredType {
    name: &'static str,
    shape: Shape,
    nested: Option<fn() -> &'static TypeInfo>,
}

impl DeclaredType {
    pub const fn new(name: &'static str, shape: Shape) -> Self {
        Self { name, shape, nested: None }
    }

    pub const fn plain(name: &'static str) -> Self {
        Self::new(name, Shape::Plain)
    }

    pub fn with_nested(mut self, nested: fn() -> &'static TypeInfo) -> Self {
        self.nested = Some(nested);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.shape, Shape::Sequence | Shape::Mapping)
    }

    pub fn nested(&self) -> Option<&'static TypeInfo> {
        self.nested.map(|f| f())
    }
}

/// Per-field mapping configuration.
///
/// Every element is optional; an empty string counts as not set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    /// Name of the target field to write (default: same name).
    pub rename: Option<String>,
    /// Cache key pulled into this field before conversion (default: field name).
    pub read_cache: Option<String>,
    /// Cache key this field's value is pushed under after conversion.
    pub write_cache: Option<String>,
    /// Suppress the target write; cache and hook processing still happen.
    pub skip: bool,
}

impl FieldMeta {
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn read_from(mut self, key: impl Into<String>) -> Self {
        self.read_cache = Some(key.into());
        self
    }

    pub fn cached_as(mut self, key: impl Into<String>) -> Self {
        self.write_cache = Some(key.into());
        self
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Target field name for a field called `field_name`.
    pub fn target_name<'a>(&'a self, field_name: &'a str) -> &'a str {
        non_empty(&self.rename).unwrap_or(field_name)
    }

    /// Cache key read into a field called `field_name`.
    pub fn read_key<'a>(&'a self, field_name: &'a str) -> &'a str {
        non_empty(&self.read_cache).unwrap_or(field_name)
    }

    pub fn write_key(&self) -> Option<&str> {
        non_empty(&self.write_cache)
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

pub type StaticGet = fn() -> Value;
pub type StaticSet = fn(Value) -> Result<(), AccessError>;

/// How a field's value is reached.
#[derive(Debug, Clone, Copy)]
pub enum Access {
    /// Through `Reflect::get_field` / `Reflect::set_field` on the instance.
    Instance,
    /// Type-level storage, independent of any instance.
    Static { get: StaticGet, set: StaticSet },
}

/// One field of one declaring type. Immutable once built.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    declared: DeclaredType,
    owner: TypeId,
    owner_name: &'static str,
    slot: usize,
    access: Access,
    meta: FieldMeta,
}

impl FieldDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared(&self) -> &DeclaredType {
        &self.declared
    }

    /// Identity of the declaring type.
    pub fn owner(&self) -> TypeId {
        self.owner
    }

    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    /// Declaration index within the declaring type.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn is_static(&self) -> bool {
        matches!(self.access, Access::Static { .. })
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    /// Read the current value from `instance` (ignored for statics).
    pub fn read(&self, instance: &Object) -> Result<Value, AccessError> {
        match self.access {
            Access::Static { get, .. } => Ok(get()),
            Access::Instance => instance.borrow()?.get_field(self),
        }
    }

    /// Overwrite the value on `instance` (ignored for statics).
    pub fn write(&self, instance: &Object, value: Value) -> Result<(), AccessError> {
        match self.access {
            Access::Static { set, .. } => set(value),
            Access::Instance => instance.borrow_mut()?.set_field(self, value),
        }
    }
}

/// Class-level association from a source type to the type it converts into.
#[derive(Debug, Clone, Copy)]
pub struct TargetDecl {
    info: fn() -> &'static TypeInfo,
    construct: fn() -> Result<Object, AccessError>,
}

impl TargetDecl {
    /// Target constructed through `Default`.
    pub fn of<T: Typed + Default>() -> Self {
        Self {
            info: T::info,
            construct: construct_default::<T>,
        }
    }

    pub fn new(
        info: fn() -> &'static TypeInfo,
        construct: fn() -> Result<Object, AccessError>,
    ) -> Self {
        Self { info, construct }
    }

    pub fn info(&self) -> &'static TypeInfo {
        (self.info)()
    }

    /// Zero-argument instance of the target type.
    pub fn instantiate(&self) -> Result<Object, AccessError> {
        (self.construct)()
    }
}

fn construct_default<T: Typed + Default>() -> Result<Object, AccessError> {
    Ok(Object::new(T::default()))
}

/// Descriptor table of one reflected type.
///
/// Built once per type (derive output caches it in a `OnceLock`) and shared
/// read-only afterwards.
#[derive(Debug)]
pub struct TypeInfo {
    name: &'static str,
    type_id: TypeId,
    fields: Vec<FieldDescriptor>,
    base: Option<fn() -> &'static TypeInfo>,
    target: Option<TargetDecl>,
}

impl TypeInfo {
    pub fn builder<T: 'static>(name: &'static str) -> TypeInfoBuilder {
        TypeInfoBuilder {
            info: TypeInfo {
                name,
                type_id: TypeId::of::<T>(),
                fields: Vec::new(),
                base: None,
                target: None,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fields declared by this type itself, in declaration order.
    pub fn own_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn base(&self) -> Option<&'static TypeInfo> {
        self.base.map(|f| f())
    }

    pub fn target(&self) -> Option<&TargetDecl> {
        self.target.as_ref()
    }

    /// Own fields first, then the base type's, recursively.
    ///
    /// Shadowed names are kept: a name can appear once per hierarchy level.
    pub fn all_fields(&self) -> Vec<&FieldDescriptor> {
        let mut out: Vec<&FieldDescriptor> = self.fields.iter().collect();
        let mut seen = vec![self.type_id];
        let mut level = self.base();
        while let Some(info) = level {
            // A hand-written table can name an ancestor as its own base.
            if seen.contains(&info.type_id) {
                break;
            }
            seen.push(info.type_id);
            out.extend(info.fields.iter());
            level = info.base();
        }
        out
    }

    /// First field called `name` in `all_fields` order.
    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.all_fields().into_iter().find(|f| f.name == name)
    }
}

/// Incremental construction of a `TypeInfo`.
pub struct TypeInfoBuilder {
    info: TypeInfo,
}

impl TypeInfoBuilder {
    fn push(mut self, name: &'static str, declared: DeclaredType, meta: FieldMeta, access: Access) -> Self {
        let slot = self.info.fields.len();
        self.info.fields.push(FieldDescriptor {
            name,
            declared,
            owner: self.info.type_id,
            owner_name: self.info.name,
            slot,
            access,
            meta,
        });
        self
    }

    /// Instance field; its slot is its position among all fields added so far.
    pub fn field(self, name: &'static str, declared: DeclaredType, meta: FieldMeta) -> Self {
        self.push(name, declared, meta, Access::Instance)
    }

    pub fn static_field(
        self,
        name: &'static str,
        declared: DeclaredType,
        meta: FieldMeta,
        get: StaticGet,
        set: StaticSet,
    ) -> Self {
        self.push(name, declared, meta, Access::Static { get, set })
    }

    pub fn base(mut self, base: fn() -> &'static TypeInfo) -> Self {
        self.info.base = Some(base);
        self
    }

    pub fn target(mut self, target: TargetDecl) -> Self {
        self.info.target = Some(target);
        self
    }

    /// Apply an external extension (e.g. a set of static fields).
    pub fn with(self, extend: impl FnOnce(Self) -> Self) -> Self {
        extend(self)
    }

    pub fn build(self) -> TypeInfo {
        self.info
    }
}
