pub mod definition_resolver;
pub mod generic;
pub mod name_normalizer;
pub mod path_resolver;
pub mod property_resolver;

pub use definition_resolver::resolve_definitions;
pub use generic::{DefinitionNameMapping, GenericType};
pub use path_resolver::{PathOptions, PathResolver};
pub use property_resolver::PropertyResolver;
