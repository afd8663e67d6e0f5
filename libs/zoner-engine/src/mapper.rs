use std::fmt;

use zoner_api::{FieldDescriptor, Object, Shared, Typed, Value};

use crate::cache::ValueCache;
use crate::config::MapperConfig;
use crate::crawl::{Crawler, Descend, Visitor};
use crate::error::MapError;
use crate::logger::{MapLogger, TracingLogger};
use crate::plan;
use crate::processor::{NoopProcessor, Processor};
use crate::resolver::{FieldOverride, Resolver};

/// Fluent setup of a [`Mapper`].
pub struct MapperBuilder<'a> {
    logger: Box<dyn MapLogger + 'a>,
    processor: Box<dyn Processor + 'a>,
    cache: ValueCache,
    resolver: Resolver,
    include_statics: bool,
    descend: Descend,
    validate_plan: bool,
}

impl Default for MapperBuilder<'_> {
    fn default() -> Self {
        Self {
            logger: Box::new(TracingLogger::default()),
            processor: Box::new(NoopProcessor),
            cache: ValueCache::new(),
            resolver: Resolver::new(),
            include_statics: false,
            descend: Descend::default(),
            validate_plan: false,
        }
    }
}

impl<'a> MapperBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logger(mut self, logger: impl MapLogger + 'a) -> Self {
        self.logger = Box::new(logger);
        self
    }

    pub fn processor(mut self, processor: impl Processor + 'a) -> Self {
        self.processor = Box::new(processor);
        self
    }

    /// Seed the traversal cache, e.g. with the cache of a previous mapper.
    pub fn cache(mut self, cache: ValueCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn override_field(mut self, o: FieldOverride) -> Self {
        self.resolver.insert(o);
        self
    }

    /// Make static fields visible to the traversal (off by default).
    pub fn include_statics(mut self, include: bool) -> Self {
        self.include_statics = include;
        self
    }

    pub fn descend(mut self, descend: Descend) -> Self {
        self.descend = descend;
        self
    }

    /// Check every reachable source field against the target at bind time.
    pub fn validate_plan(mut self, validate: bool) -> Self {
        self.validate_plan = validate;
        self
    }

    /// Apply a loaded configuration: traversal flags, logging and field overrides.
    pub fn with_config(mut self, config: &MapperConfig) -> Self {
        self.include_statics = config.include_statics;
        self.descend = config.descend;
        self.validate_plan = config.validate_plan;
        self.logger = Box::new(TracingLogger::new(
            config.logging.enabled,
            config.logging.verbose,
        ));
        for o in &config.fields {
            self.resolver.insert(o.clone());
        }
        self
    }

    /// Bind `source`: resolve its target type and allocate the target.
    pub fn build(self, source: Object) -> Result<Mapper<'a>, MapError> {
        let source_info = source.type_info();
        self.logger.log(format_args!("binding mapper to {}", source_info.name()));

        // --- 1. Resolve target type ---
        let decl = self
            .resolver
            .target_type_for(source_info)
            .ok_or(MapError::NoTargetType {
                source_type: source_info.name(),
            })?;
        let target_info = decl.info();

        // --- 2. Instantiate ---
        let target = decl.instantiate().map_err(|cause| MapError::Construction {
            target_type: target_info.name(),
            source_type: source_info.name(),
            cause,
        })?;
        if target.type_info().type_id() != target_info.type_id() {
            return Err(MapError::TargetType {
                source_type: source_info.name(),
                expected: target_info.name(),
                actual: target.type_info().name(),
            });
        }

        // --- 3. Optional plan check ---
        if self.validate_plan {
            plan::validate(
                source_info,
                target_info,
                &self.resolver,
                self.include_statics,
                self.descend,
            )?;
        }

        Ok(Mapper {
            source,
            target,
            logger: self.logger,
            processor: self.processor,
            cache: self.cache,
            resolver: self.resolver,
            include_statics: self.include_statics,
            descend: self.descend,
            failed: false,
        })
    }

    pub fn build_from<T: Typed>(self, source: &Shared<T>) -> Result<Mapper<'a>, MapError> {
        self.build(source.to_object())
    }
}

/// One source instance bound to one freshly allocated target.
///
/// `convert` may be called repeatedly; each call re-crawls the source into
/// the same target with the cache left by the previous call.
pub struct Mapper<'a> {
    source: Object,
    target: Object,
    logger: Box<dyn MapLogger + 'a>,
    processor: Box<dyn Processor + 'a>,
    cache: ValueCache,
    resolver: Resolver,
    include_statics: bool,
    descend: Descend,
    failed: bool,
}

impl fmt::Debug for Mapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("cache", &self.cache)
            .field("include_statics", &self.include_statics)
            .field("descend", &self.descend)
            .field("failed", &self.failed)
            .finish()
    }
}

impl<'a> Mapper<'a> {
    pub fn builder() -> MapperBuilder<'a> {
        MapperBuilder::new()
    }

    /// Bind `source` with default settings.
    pub fn build(source: Object) -> Result<Self, MapError> {
        MapperBuilder::new().build(source)
    }

    /// Crawl the source and return the populated target.
    ///
    /// On error the target is left partially written and is withheld by
    /// [`Mapper::target`] until a later `convert` succeeds.
    pub fn convert(&mut self) -> Result<Object, MapError> {
        self.logger.log(format_args!(
            "converting {} into {}",
            self.source.type_info().name(),
            self.target.type_info().name()
        ));

        let mut writer = FieldWriter {
            target: &self.target,
            cache: &mut self.cache,
            resolver: &self.resolver,
            logger: &*self.logger,
            processor: &mut *self.processor,
        };
        let result = Crawler::new(&*self.logger)
            .include_statics(self.include_statics)
            .descend(self.descend)
            .crawl(&self.source, &mut writer);
        self.failed = result.is_err();
        result?;

        Ok(self.target.clone())
    }

    /// `convert`, then downcast the target to `T`.
    pub fn convert_into<T: Typed>(&mut self) -> Result<Shared<T>, MapError> {
        let target = self.convert()?;
        target.downcast::<T>().ok_or(MapError::TargetType {
            source_type: self.source.type_info().name(),
            expected: T::info().name(),
            actual: target.type_info().name(),
        })
    }

    pub fn source(&self) -> &Object {
        &self.source
    }

    /// The bound target, or `None` if the last `convert` failed.
    pub fn target(&self) -> Option<&Object> {
        (!self.failed).then_some(&self.target)
    }

    pub fn cache(&self) -> &ValueCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ValueCache {
        &mut self.cache
    }

    /// Release the cache so it can seed another mapper.
    pub fn into_cache(self) -> ValueCache {
        self.cache
    }
}

/// Per-field conversion step: cache fill, target write, cache write, hook.
struct FieldWriter<'w, 'a> {
    target: &'w Object,
    cache: &'w mut ValueCache,
    resolver: &'w Resolver,
    logger: &'w (dyn MapLogger + 'a),
    processor: &'w mut (dyn Processor + 'a),
}

impl Visitor for FieldWriter<'_, '_> {
    fn visit(&mut self, field: &FieldDescriptor, value: Value, owner: &Object) -> Result<Value, MapError> {
        let resolver = self.resolver;
        let meta = resolver.metadata_for(field);
        let mut value = value;

        // a. cache fill
        let read_key = meta.read_key(field.name());
        if let Some(cached) = self.cache.get(read_key).filter(|v| !v.is_null()) {
            let cached = cached.clone();
            self.logger.log(format_args!(
                "cache hit '{read_key}' for {}.{}",
                field.owner_name(),
                field.name()
            ));
            self.logger.verbose_log(format_args!("cached value is"), &cached);
            field
                .write(owner, cached.clone())
                .map_err(|cause| MapError::field_access(field, cause))?;
            value = cached;
        }

        // b. target write
        if meta.skip {
            self.logger.log(format_args!(
                "conversion of {}.{} skipped",
                field.owner_name(),
                field.name()
            ));
        } else {
            let name = meta.target_name(field.name());
            let target_info = self.target.type_info();
            let dest = target_info
                .field_named(name)
                .ok_or_else(|| MapError::MissingTargetField {
                    field: name.to_string(),
                    target_type: target_info.name(),
                    owner: field.owner_name(),
                    source_field: field.name(),
                })?;
            dest.write(self.target, value.clone())
                .map_err(|cause| MapError::field_access(dest, cause))?;
            self.logger
                .log(format_args!("set {}.{}", target_info.name(), dest.name()));
            self.logger.verbose_log(format_args!("value set is"), &value);
        }

        // c. cache write
        if let Some(key) = meta.write_key() {
            self.logger.log(format_args!(
                "caching {}.{} under '{key}'",
                field.owner_name(),
                field.name()
            ));
            self.cache.put(key, value.clone());
        }

        // d. hook
        self.processor.process(field, &value, self.target);

        Ok(value)
    }

    fn enter(&mut self, field: &FieldDescriptor, value: &Value) {
        self.processor.enter(field, value);
    }

    fn exit(&mut self, field: &FieldDescriptor, value: &Value) {
        self.processor.exit(field, value);
    }
}
