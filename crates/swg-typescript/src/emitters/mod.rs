pub mod actions;
pub mod client;
pub mod definitions;

use minijinja::{AutoEscape, Environment};

pub const DEFINITIONS_TEMPLATE: &str = "definitions.ts.j2";
pub const ACTIONS_TEMPLATE: &str = "actions.ts.j2";
pub const CLIENT_TEMPLATE: &str = "client.ts.j2";
pub const INDEX_TEMPLATE: &str = "index.ts.j2";

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
fn escape_jsdoc(value: String) -> String {
    value.replace("*/", "*\\/")
}

/// Build the template environment shared by all emitters.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("escape_jsdoc", escape_jsdoc);
    env.add_template(
        DEFINITIONS_TEMPLATE,
        include_str!("../../templates/definitions.ts.j2"),
    )?;
    env.add_template(ACTIONS_TEMPLATE, include_str!("../../templates/actions.ts.j2"))?;
    env.add_template(CLIENT_TEMPLATE, include_str!("../../templates/client.ts.j2"))?;
    env.add_template(INDEX_TEMPLATE, include_str!("../../templates/index.ts.j2"))?;
    Ok(env)
}
