//! The core tag library.
//!
//! Tags emit Handlebars code that [`Renderer`](crate::Renderer) executes
//! against the render context. Attribute values that name a context path are
//! checked to be plain paths so that a value can never break out of the
//! mustache it is placed in. A tag with a missing or invalid required
//! attribute emits nothing.
//!
//! | Tag | Kind | Emits |
//! |-----|------|-------|
//! | `If var="p"` | block | `{{#if p}}…{{/if}}` |
//! | `Unless var="p"` | block | `{{#unless p}}…{{/unless}}` |
//! | `Each var="p"` | block | `{{#each p}}…{{/each}}` |
//! | `With var="p"` | block | `{{#with p}}…{{/with}}` |
//! | `Comment` | block | nothing |
//! | `Var name="p" [default="x"]` | value | `{{p}}` |
//! | `Text value="x"` | value | `x` |
//! | `Upper value="x"` / `Lower value="x"` | value | `X` / `x` |

use taglet_template_core::{Attributes, TagDefinition, TagRegistry};

/// Installs the core tags. Tags registered afterwards with the same name
/// override them.
pub fn register_core_tags(registry: &mut TagRegistry) {
    registry.extend(core_tags());
}

pub fn core_tags() -> Vec<TagDefinition> {
    vec![
        TagDefinition::block("If", |_, attrs, children| helper_block("if", attrs, children)),
        TagDefinition::block("Unless", |_, attrs, children| helper_block("unless", attrs, children)),
        TagDefinition::block("Each", |_, attrs, children| helper_block("each", attrs, children)),
        TagDefinition::block("With", |_, attrs, children| helper_block("with", attrs, children)),
        TagDefinition::block("Comment", |_, _, _| String::new()),
        TagDefinition::value("Var", |_, attrs, _| var(attrs)),
        TagDefinition::value("Text", |_, attrs, _| literal(attrs, |v| v.to_string())),
        TagDefinition::value("Upper", |_, attrs, _| literal(attrs, str::to_uppercase)),
        TagDefinition::value("Lower", |_, attrs, _| literal(attrs, str::to_lowercase)),
    ]
}

fn helper_block(helper: &str, attrs: &Attributes, children: &str) -> String {
    match context_path(attrs, "var") {
        Some(path) => format!("{{{{#{helper} {path}}}}}{children}{{{{/{helper}}}}}"),
        None => String::new(),
    }
}

fn var(attrs: &Attributes) -> String {
    let Some(path) = context_path(attrs, "name") else {
        return String::new();
    };
    match attrs.get("default") {
        Some(default) => format!(
            "{{{{#if {path}}}}}{{{{{path}}}}}{{{{else}}}}{}{{{{/if}}}}",
            escape_mustaches(default)
        ),
        None => format!("{{{{{path}}}}}"),
    }
}

fn literal(attrs: &Attributes, transform: impl Fn(&str) -> String) -> String {
    attrs
        .get("value")
        .map(|v| escape_mustaches(&transform(v)))
        .unwrap_or_default()
}

/// The attribute `key` if it is a plain Handlebars context path.
fn context_path<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a str> {
    let path = attrs.get(key)?;
    let plain = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '@' | '[' | ']'));
    if !plain {
        log::warn!("Ignoring invalid context path '{}' in attribute '{}'", path, key);
        return None;
    }
    Some(path)
}

/// Keeps literal text from being read as Handlebars expressions.
fn escape_mustaches(text: &str) -> String {
    text.replace("{{", "\\{{")
}
