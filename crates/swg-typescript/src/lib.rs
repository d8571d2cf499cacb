pub mod emitters;
pub mod plugin;
pub mod type_mapper;

pub use plugin::{PLUGIN_ID, TypeScriptPlugin};
