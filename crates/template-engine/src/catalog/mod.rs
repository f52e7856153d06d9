//! Template catalog, built-in templates, and hot-swap handle

pub mod embedded;
pub mod handle;
pub mod registry;

pub use embedded::{builtin_catalog, builtin_templates};
pub use handle::CatalogHandle;
pub use registry::{CatalogBuilder, TemplateCatalog};
