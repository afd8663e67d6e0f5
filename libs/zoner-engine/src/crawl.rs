use std::any::TypeId;

use serde::Deserialize;
use zoner_api::{is_leaf, DeclaredType, FieldDescriptor, Object, Value};

use crate::error::MapError;
use crate::logger::MapLogger;

/// When the crawler descends into a non-leaf field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Descend {
    /// Object values of non-collection fields.
    #[default]
    NonNull,
    /// Null values (entry/exit only, nothing to crawl) and collections.
    NullOrCollection,
    /// Object values, plus the object elements of collections.
    ObjectsAndCollections,
}

impl Descend {
    pub fn should_descend(self, declared: &DeclaredType, value: &Value) -> bool {
        let collection = declared.is_collection() || value.is_collection();
        let object = matches!(value, Value::Object(_));
        match self {
            Descend::NonNull => object && !collection,
            Descend::NullOrCollection => value.is_null() || collection,
            Descend::ObjectsAndCollections => object || (collection && !value.is_null()),
        }
    }

    /// Whether any value of this declared type could be descended into.
    pub fn may_descend(self, declared: &DeclaredType) -> bool {
        match self {
            Descend::NonNull => !declared.is_collection(),
            Descend::NullOrCollection => declared.is_collection(),
            Descend::ObjectsAndCollections => true,
        }
    }
}

/// Per-field callbacks driven by the crawler.
pub trait Visitor {
    /// Process one field; returns the value the rest of the traversal uses.
    fn visit(&mut self, field: &FieldDescriptor, value: Value, owner: &Object) -> Result<Value, MapError>;

    fn enter(&mut self, _field: &FieldDescriptor, _value: &Value) {}

    fn exit(&mut self, _field: &FieldDescriptor, _value: &Value) {}
}

/// Depth-first walker over an object graph.
///
/// Stateless between `crawl` calls apart from the active path, which holds
/// one `(address, type)` pair per instance currently being crawled.
pub struct Crawler<'l> {
    logger: &'l dyn MapLogger,
    include_statics: bool,
    descend: Descend,
    path: Vec<(usize, TypeId)>,
}

impl<'l> Crawler<'l> {
    pub fn new(logger: &'l dyn MapLogger) -> Self {
        Self {
            logger,
            include_statics: false,
            descend: Descend::default(),
            path: Vec::new(),
        }
    }

    pub fn include_statics(mut self, include: bool) -> Self {
        self.include_statics = include;
        self
    }

    pub fn descend(mut self, descend: Descend) -> Self {
        self.descend = descend;
        self
    }

    pub fn crawl<V: Visitor + ?Sized>(&mut self, instance: &Object, visitor: &mut V) -> Result<(), MapError> {
        let info = instance.type_info();
        let key = (instance.addr(), info.type_id());
        if self.path.contains(&key) {
            return Err(MapError::CycleDetected {
                type_name: info.name(),
                addr: instance.addr(),
                depth: self.path.len(),
            });
        }
        self.path.push(key);
        let result = self.crawl_fields(instance, visitor);
        self.path.pop();
        result
    }

    fn crawl_fields<V: Visitor + ?Sized>(&mut self, instance: &Object, visitor: &mut V) -> Result<(), MapError> {
        let info = instance.type_info();
        self.logger.log(format_args!("crawling {}", info.name()));

        for field in info.all_fields() {
            if field.is_static() && !self.include_statics {
                self.logger
                    .log(format_args!("static field {} is not processed", field.name()));
                continue;
            }

            let value = field
                .read(instance)
                .map_err(|cause| MapError::field_access(field, cause))?;
            self.logger.log(format_args!(
                "processing field {} {}",
                field.declared().name(),
                field.name()
            ));
            self.logger.verbose_log(format_args!("field value is"), &value);

            let value = visitor.visit(field, value, instance)?;

            if !is_leaf(field.declared()) && self.descend.should_descend(field.declared(), &value) {
                visitor.enter(field, &value);
                let result = self.descend_into(&value, visitor);
                visitor.exit(field, &value);
                result?;
            }
        }
        Ok(())
    }

    fn descend_into<V: Visitor + ?Sized>(&mut self, value: &Value, visitor: &mut V) -> Result<(), MapError> {
        match value {
            Value::Object(obj) => self.crawl(obj, visitor),
            Value::List(items) => {
                for item in items {
                    if let Value::Object(obj) = item {
                        self.crawl(obj, visitor)?;
                    }
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (_, item) in entries {
                    if let Value::Object(obj) = item {
                        self.crawl(obj, visitor)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
