use minijinja::{Environment, context};

use super::{CLIENT_TEMPLATE, INDEX_TEMPLATE};

/// Emit `client.ts`: the shared `request` helper and its `configure` hook.
pub fn emit_client(env: &Environment<'_>, base_url: &str) -> Result<String, minijinja::Error> {
    let tmpl = env.get_template(CLIENT_TEMPLATE)?;
    tmpl.render(context! {
        base_url => base_url.trim_end_matches('/'),
    })
}

/// Emit `index.ts`, re-exporting the client, the definitions and every
/// action module.
pub fn emit_index(env: &Environment<'_>, modules: &[String]) -> Result<String, minijinja::Error> {
    let tmpl = env.get_template(INDEX_TEMPLATE)?;
    tmpl.render(context! { modules => modules })
}
