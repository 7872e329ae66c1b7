use std::sync::LazyLock;

use regex::{Captures, Regex};

// `{{ env.NAME }}` with an optional `| default("value")`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\)\s*)?\}\}"#).expect("must be valid regex")
});

/// Substitute environment placeholders in raw config text
///
/// Comment lines are copied through untouched so a commented-out secret
/// does not have to be set.
pub fn expand_env(input: &str) -> anyhow::Result<String> {
    let mut lines = Vec::new();

    for line in input.split('\n') {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
        } else {
            lines.push(expand_line(line)?);
        }
    }

    Ok(lines.join("\n"))
}

fn expand_line(line: &str) -> anyhow::Result<String> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in PLACEHOLDER.captures_iter(line) {
        let Some(whole) = captures.get(0) else { continue };
        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&captures)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

fn resolve(captures: &Captures<'_>) -> anyhow::Result<String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(name) = key.strip_prefix("env.").filter(|n| !n.is_empty() && !n.contains('.')) else {
        anyhow::bail!("unsupported placeholder `{key}`, expected `env.NAME`");
    };

    match (std::env::var(name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => anyhow::bail!("environment variable `{name}` is not set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_unchanged() {
        let input = "max_turns = 4\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_variables() {
        temp_env::with_vars([("DT_KEY", Some("sk-1")), ("DT_URL", Some("http://x"))], || {
            let out = expand_env("api_key = \"{{ env.DT_KEY }}\"\nbase_url = \"{{env.DT_URL}}\"").unwrap();
            assert_eq!(out, "api_key = \"sk-1\"\nbase_url = \"http://x\"");
        });
    }

    #[test]
    fn missing_variable_names_it() {
        temp_env::with_var_unset("DT_ABSENT", || {
            let err = expand_env("api_key = \"{{ env.DT_ABSENT }}\"").unwrap_err();
            assert!(err.to_string().contains("DT_ABSENT"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("DT_OPTIONAL", || {
            let out = expand_env("x = \"{{ env.DT_OPTIONAL | default(\"fallback\") }}\"").unwrap();
            assert_eq!(out, "x = \"fallback\"");
        });
        temp_env::with_var("DT_OPTIONAL", Some("set"), || {
            let out = expand_env("x = \"{{ env.DT_OPTIONAL | default(\"fallback\") }}\"").unwrap();
            assert_eq!(out, "x = \"set\"");
        });
    }

    #[test]
    fn comments_are_not_expanded() {
        temp_env::with_var_unset("DT_ABSENT", || {
            let input = "  # api_key = \"{{ env.DT_ABSENT }}\"\nmax_turns = 2";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }

    #[test]
    fn other_scopes_rejected() {
        let err = expand_env("x = \"{{ vault.KEY }}\"").unwrap_err();
        assert!(err.to_string().contains("vault.KEY"));
    }
}
