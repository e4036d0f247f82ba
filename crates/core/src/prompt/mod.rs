//! Prompt template registry and substitution.
//!
//! Resolution of which template text to use (built-in vs per-user
//! override) happens in the database layer; everything here is pure:
//! the built-in catalog ([`templates`]), the genre strategy table
//! ([`genre`]), placeholder extraction, and strict substitution.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

pub mod genre;
pub mod templates;

pub use genre::{genre_strategy, GenreStrategy, GENRE_STRATEGIES};
pub use templates::{template_content, template_info, TemplateInfo, BUILTIN_TEMPLATES};

/// Regex pattern matching `{placeholder}` tokens in template text.
pub const PLACEHOLDER_PATTERN: &str = r"\{[a-zA-Z_][a-zA-Z0-9_.]*\}";

/// Compiled regex for `{placeholder}` extraction. Compiled once, reused forever.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

/// Directive appended after a writing style block so the model emits
/// bare chapter prose.
const STYLE_OUTPUT_DIRECTIVE: &str = "请直接输出章节正文内容，不要包含章节标题和其他说明文字。";

/// Extract all `{placeholder}` tokens from a template string.
///
/// Returns a de-duplicated, sorted list of placeholder names (without
/// braces). Escaped `{{`/`}}` braces never produce a token.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut placeholders: Vec<String> = PLACEHOLDER_RE
        .find_iter(template)
        .map(|m| {
            let s = m.as_str();
            s[1..s.len() - 1].to_string()
        })
        .collect();
    placeholders.sort();
    placeholders.dedup();
    placeholders
}

/// Substitute `{placeholder}` slots in `template` from `params`.
///
/// Strict: every placeholder the template references must be present in
/// the parameter map or the call fails with
/// [`CoreError::MissingParameter`] naming the absent key. Extra
/// parameters are ignored. `{{` and `}}` emit literal braces.
///
/// When `params` carries a `genre` value and no explicit
/// `genre_strategy`, the matching strategy block is derived via
/// [`genre_strategy`] and injected under that key before substitution,
/// so genre-aware templates can reference `{genre_strategy}` without
/// the caller computing it.
pub fn render_template(
    template: &str,
    params: &HashMap<String, String>,
) -> Result<String, CoreError> {
    if let Some(genre) = params.get("genre") {
        if !params.contains_key("genre_strategy") {
            let mut with_strategy = params.clone();
            with_strategy.insert(
                "genre_strategy".to_string(),
                genre_strategy(genre).to_string(),
            );
            return substitute(template, &with_strategy);
        }
    }
    substitute(template, params)
}

fn substitute(template: &str, params: &HashMap<String, String>) -> Result<String, CoreError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(CoreError::Validation(format!(
                                "Unterminated placeholder: {{{name}"
                            )))
                        }
                    }
                }
                match params.get(&name) {
                    Some(value) => out.push_str(value),
                    None => return Err(CoreError::MissingParameter(name)),
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Append a writing style block and the output directive to a base
/// prompt.
pub fn apply_style(base_prompt: &str, style_content: &str) -> String {
    format!("{base_prompt}\n\n{style_content}\n\n{STYLE_OUTPUT_DIRECTIVE}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
