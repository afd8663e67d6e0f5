pub mod cache;
pub mod config;
pub mod crawl;
pub mod error;
pub mod logger;
pub mod mapper;
pub mod plan;
pub mod processor;
pub mod resolver;

pub use cache::ValueCache;
pub use config::{LogConfig, MapperConfig};
pub use crawl::{Crawler, Descend, Visitor};
pub use error::MapError;
pub use logger::{MapLogger, NoopLogger, TracingLogger};
pub use mapper::{Mapper, MapperBuilder};
pub use processor::{
    processor_fn, FnProcessor, NoopProcessor, Processor, Provenance, ProvenanceProcessor,
};
pub use resolver::{FieldOverride, Resolver};
