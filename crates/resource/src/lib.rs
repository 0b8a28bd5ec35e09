//! Template resolvers for the taglet compiler.
//!
//! A resolver maps a logical template name to the ordered list of candidate
//! source paths across theme layers, most specific first, and reads them.
//!
//! ## Available Resolvers
//!
//! - [`ThemeResolver`]: Looks up `<theme dir>/<name>.<ext>` on the local filesystem
//! - [`InMemoryResolver`]: Same lookup rules over pre-populated in-memory sources

mod error;
mod memory;
mod resolver;
mod theme;

pub use error::ResourceError;
pub use memory::InMemoryResolver;
pub use resolver::{TemplateResolver, candidate_paths, load_layers};
pub use theme::ThemeResolver;
