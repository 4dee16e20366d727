//! Plugin source unit format
//!
//! A source unit is a TOML file. Evaluating it builds the routes it
//! declares; the top-level `router` table is the exported routing
//! capability.
//!
//! ```toml
//! [plugin]
//! description = "Echo commands"
//!
//! [[router.commands]]
//! command = "echo"
//! description = "Repeat the arguments"
//! reply = "{{args}}"
//!
//! [[router.messages]]
//! pattern = "^hello"
//! reply = "Hi {{sender}}!"
//!
//! [[router.commands]]
//! command = "uptime"
//! exec = "uptime.sh"
//! timeout_secs = 5
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use super::loader::PluginLoadError;
use crate::dispatch::{Action, CommandRoute, ExecHandler, Launcher, MessageRoute, Router};

/// Default timeout for exec handlers
const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(10);

/// Top level of a source unit
#[derive(Debug, Deserialize)]
struct PluginSource {
    #[serde(default)]
    plugin: PluginMeta,
    router: Option<toml::Value>,
}

/// Optional `[plugin]` metadata table
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginMeta {
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_true")]
    enabled: bool,
}

impl Default for PluginMeta {
    fn default() -> Self {
        Self {
            description: None,
            enabled: true,
        }
    }
}

/// Shape the exported `router` must have
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RouterSpec {
    #[serde(default)]
    commands: Vec<CommandSpec>,
    #[serde(default)]
    messages: Vec<MessageSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandSpec {
    command: String,
    #[serde(default)]
    description: String,
    reply: Option<String>,
    exec: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MessageSpec {
    pattern: String,
    #[serde(default = "default_true")]
    case_insensitive: bool,
    reply: Option<String>,
    exec: Option<String>,
    timeout_secs: Option<u64>,
}

/// Action fields shared by command and message routes
struct ActionSpec {
    reply: Option<String>,
    exec: Option<String>,
    timeout_secs: Option<u64>,
}

impl From<&mut CommandSpec> for ActionSpec {
    fn from(spec: &mut CommandSpec) -> Self {
        Self {
            reply: spec.reply.take(),
            exec: spec.exec.take(),
            timeout_secs: spec.timeout_secs,
        }
    }
}

impl From<&mut MessageSpec> for ActionSpec {
    fn from(spec: &mut MessageSpec) -> Self {
        Self {
            reply: spec.reply.take(),
            exec: spec.exec.take(),
            timeout_secs: spec.timeout_secs,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Result of evaluating a source unit
#[derive(Debug)]
pub enum Evaluated {
    /// The unit exported a router
    Router(Router),
    /// The unit is valid but exports nothing to route
    Skipped(String),
}

/// Evaluate a source unit's text
///
/// `base_dir` resolves relative `exec` paths; `namespace` becomes the
/// router's namespace.
///
/// # Errors
///
/// Returns error if the text is not valid TOML, the `router` export has the
/// wrong shape, or a route cannot be built
pub fn evaluate(
    text: &str,
    base_dir: &Path,
    namespace: &str,
) -> Result<Evaluated, PluginLoadError> {
    let source: PluginSource = toml::from_str(text)?;

    if !source.plugin.enabled {
        return Ok(Evaluated::Skipped("disabled".to_string()));
    }

    let Some(export) = source.router else {
        return Ok(Evaluated::Skipped("no router exported".to_string()));
    };

    let spec: RouterSpec = export
        .try_into()
        .map_err(|e: toml::de::Error| PluginLoadError::InvalidExport(e.message().to_string()))?;

    let mut router = Router::new(namespace);
    if let Some(description) = source.plugin.description {
        router = router.with_description(description);
    }

    let mut seen = HashSet::new();
    for mut command in spec.commands {
        let name = normalize_command(&command.command)?;
        if !seen.insert(name.clone()) {
            return Err(PluginLoadError::Evaluate(format!(
                "duplicate command /{name}"
            )));
        }

        router.add_command(CommandRoute {
            action: build_action(ActionSpec::from(&mut command), base_dir, &format!("/{name}"))?,
            command: name,
            description: command.description,
        });
    }

    for mut message in spec.messages {
        let pattern = if message.case_insensitive {
            Regex::new(&format!("(?i){}", message.pattern))
        } else {
            Regex::new(&message.pattern)
        }
        .map_err(|e| {
            PluginLoadError::Evaluate(format!("invalid pattern {:?}: {e}", message.pattern))
        })?;

        router.add_message(MessageRoute {
            action: build_action(ActionSpec::from(&mut message), base_dir, &message.pattern)?,
            pattern,
        });
    }

    Ok(Evaluated::Router(router))
}

/// Strip a leading slash and check the command name
fn normalize_command(raw: &str) -> Result<String, PluginLoadError> {
    let name = raw.trim().trim_start_matches('/');

    if name.is_empty() || name.len() > 32 {
        return Err(PluginLoadError::Evaluate(format!(
            "command name {raw:?} must be 1-32 characters"
        )));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PluginLoadError::Evaluate(format!(
            "command name {raw:?} may only contain letters, digits and underscores"
        )));
    }

    Ok(name.to_ascii_lowercase())
}

/// Build a route action, requiring exactly one of `reply` or `exec`
fn build_action(spec: ActionSpec, base_dir: &Path, route: &str) -> Result<Action, PluginLoadError> {
    match (spec.reply, spec.exec) {
        (Some(reply), None) => Ok(Action::Reply(reply)),
        (None, Some(exec)) => {
            let path = std::fs::canonicalize(base_dir.join(&exec)).map_err(|e| {
                PluginLoadError::Evaluate(format!("{route}: handler {exec:?} not found: {e}"))
            })?;
            if !path.is_file() {
                return Err(PluginLoadError::Evaluate(format!(
                    "{route}: handler {} is not a file",
                    path.display()
                )));
            }
            let launcher = Launcher::for_path(&path)
                .map_err(|e| PluginLoadError::Evaluate(format!("{route}: {e}")))?;

            Ok(Action::Exec(ExecHandler {
                path,
                launcher,
                timeout: spec
                    .timeout_secs
                    .map_or(DEFAULT_EXEC_TIMEOUT, Duration::from_secs),
            }))
        }
        (Some(_), Some(_)) => Err(PluginLoadError::Evaluate(format!(
            "{route}: set either reply or exec, not both"
        ))),
        (None, None) => Err(PluginLoadError::Evaluate(format!(
            "{route}: missing reply or exec"
        ))),
    }
}
