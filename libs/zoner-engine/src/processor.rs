use zoner_api::{FieldDescriptor, Object, Value};

/// User hook invoked once per visited field, after the engine's own work.
///
/// Purely observational from the engine's side; a processor may mutate the
/// target through the handle it is given.
pub trait Processor {
    fn process(&mut self, field: &FieldDescriptor, value: &Value, target: &Object);

    /// Called before the crawler descends into `field`'s value.
    fn enter(&mut self, _field: &FieldDescriptor, _value: &Value) {}

    /// Called after the descent into `field`'s value returns, on success or failure.
    fn exit(&mut self, _field: &FieldDescriptor, _value: &Value) {}
}

impl<P: Processor + ?Sized> Processor for &mut P {
    fn process(&mut self, field: &FieldDescriptor, value: &Value, target: &Object) {
        (**self).process(field, value, target)
    }

    fn enter(&mut self, field: &FieldDescriptor, value: &Value) {
        (**self).enter(field, value)
    }

    fn exit(&mut self, field: &FieldDescriptor, value: &Value) {
        (**self).exit(field, value)
    }
}

/// Default processor: does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProcessor;

impl Processor for NoopProcessor {
    fn process(&mut self, _field: &FieldDescriptor, _value: &Value, _target: &Object) {}
}

/// Closure adapter; see [`processor_fn`].
pub struct FnProcessor<F>(F);

impl<F> Processor for FnProcessor<F>
where
    F: FnMut(&FieldDescriptor, &Value, &Object),
{
    fn process(&mut self, field: &FieldDescriptor, value: &Value, target: &Object) {
        (self.0)(field, value, target)
    }
}

pub fn processor_fn<F>(f: F) -> FnProcessor<F>
where
    F: FnMut(&FieldDescriptor, &Value, &Object),
{
    FnProcessor(f)
}

/// One processed field and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Dotted field path from the source root, e.g. `emp.desc.company_id`.
    pub path: String,
    /// Type that declares the field.
    pub owner: &'static str,
}

/// Records the provenance of every processed field, using `enter`/`exit` to
/// maintain the path of composite fields currently being crawled.
#[derive(Debug, Default)]
pub struct ProvenanceProcessor {
    stack: Vec<&'static str>,
    records: Vec<Provenance>,
}

impl ProvenanceProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Provenance] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Provenance> {
        self.records
    }
}

impl Processor for ProvenanceProcessor {
    fn process(&mut self, field: &FieldDescriptor, _value: &Value, _target: &Object) {
        let mut path = self.stack.join(".");
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(field.name());
        self.records.push(Provenance {
            path,
            owner: field.owner_name(),
        });
    }

    fn enter(&mut self, field: &FieldDescriptor, _value: &Value) {
        self.stack.push(field.name());
    }

    fn exit(&mut self, _field: &FieldDescriptor, _value: &Value) {
        self.stack.pop();
    }
}
