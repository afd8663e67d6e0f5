use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::error::AccessError;
use crate::reflect::{Reflect, Typed};
use crate::schema::TypeInfo;
use crate::value::{FromValue, ToValue, Value};

/// Type-erased, shared handle to a reflected instance.
///
/// Two views of the same allocation: `inner` for reflective access,
/// `any` for typed downcasts back to `Shared<T>`. Cloning shares.
#[derive(Clone)]
pub struct Object {
    any: Rc<dyn Any>,
    inner: Rc<RefCell<dyn Reflect>>,
    info: &'static TypeInfo,
}

impl Object {
    pub fn new<T: Typed>(value: T) -> Self {
        Self::from_shared(&Shared::new(value))
    }

    pub fn from_shared<T: Typed>(shared: &Shared<T>) -> Self {
        let any: Rc<dyn Any> = shared.0.clone();
        let inner: Rc<RefCell<dyn Reflect>> = shared.0.clone();
        Self { any, inner, info: T::info() }
    }

    /// Typed handle to the same instance, if it is a `T`.
    pub fn downcast<T: Reflect>(&self) -> Option<Shared<T>> {
        self.any.clone().downcast::<RefCell<T>>().ok().map(Shared)
    }

    pub fn is<T: Reflect>(&self) -> bool {
        self.any.is::<RefCell<T>>()
    }

    /// Runtime type of the referenced instance.
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Allocation address; stable identity for the lifetime of the instance.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.any) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        self.addr() == other.addr()
    }

    pub fn borrow(&self) -> Result<Ref<'_, dyn Reflect>, AccessError> {
        self.inner
            .try_borrow()
            .map_err(|_| AccessError::busy(format!("instance of {} is mutably borrowed", self.type_name())))
    }

    pub fn borrow_mut(&self) -> Result<RefMut<'_, dyn Reflect>, AccessError> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| AccessError::busy(format!("instance of {} is already borrowed", self.type_name())))
    }

    fn type_name(&self) -> &'static str {
        self.type_info().name()
    }

    pub(crate) fn json_guarded(&self, path: &mut Vec<usize>) -> serde_json::Value {
        let info = self.type_info();
        let addr = self.addr();
        if path.contains(&addr) {
            return serde_json::Value::String(format!("<cycle {}>", info.name()));
        }
        path.push(addr);
        let mut map = serde_json::Map::new();
        for field in info.all_fields() {
            // Shadowed names: first match wins, same as target lookup.
            if field.is_static() || map.contains_key(field.name()) {
                continue;
            }
            let rendered = match field.read(self) {
                Ok(v) => v.json_guarded(path),
                Err(e) => serde_json::Value::String(format!("<{e}>")),
            };
            map.insert(field.name().to_string(), rendered);
        }
        path.pop();
        serde_json::Value::Object(map)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.type_info().name(), self.addr())
    }
}

impl ToValue for Object {
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }
}

impl FromValue for Object {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Object(obj) => Ok(obj),
            other => Err(AccessError::expected("object", &other)),
        }
    }
}

/// Typed, shared handle to a reflected instance, the field type for
/// composite members of a reflected struct.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Shared<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Typed> Shared<T> {
    pub fn to_object(&self) -> Object {
        Object::from_shared(self)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.borrow().fmt(f)
    }
}

/// Content equality.
impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl<T: Typed> ToValue for Shared<T> {
    fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }
}

impl<T: Typed> FromValue for Shared<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Object(obj) => obj.downcast::<T>().ok_or_else(|| {
                AccessError::type_mismatch(format!(
                    "expected {}, got {}",
                    T::info().name(),
                    obj.type_info().name()
                ))
            }),
            other => Err(AccessError::expected(T::info().name(), &other)),
        }
    }
}
