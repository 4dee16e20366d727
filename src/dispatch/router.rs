//! Routers produced by plugins

use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;

use super::Update;
use super::executor::Launcher;

/// What a route does when it matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Reply with a template (`{{args}}`, `{{sender}}`, `{{text}}`)
    Reply(String),
    /// Run an external handler and reply with its stdout
    Exec(ExecHandler),
}

/// External handler program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecHandler {
    /// Canonical path to the handler, resolved when the plugin loads
    pub path: PathBuf,
    /// How the handler is started
    pub launcher: Launcher,
    /// Maximum run time
    pub timeout: Duration,
}

/// Route matched by a `/command`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRoute {
    /// Command name without the leading slash
    pub command: String,
    /// Description shown in command menus
    pub description: String,
    /// Action to run
    pub action: Action,
}

/// Route matched by a regex over plain message text
#[derive(Debug, Clone)]
pub struct MessageRoute {
    /// Compiled pattern
    pub pattern: Regex,
    /// Action to run
    pub action: Action,
}

impl PartialEq for MessageRoute {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.as_str() == other.pattern.as_str() && self.action == other.action
    }
}

impl Eq for MessageRoute {}

/// Routing capability exported by a plugin
///
/// A router is an ordered set of command and message routes under a
/// namespace. It is opaque to the loader and only becomes meaningful once
/// included into a [`super::DispatchEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    namespace: String,
    description: Option<String>,
    commands: Vec<CommandRoute>,
    messages: Vec<MessageRoute>,
}

/// A route selected for an update
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    /// Router that owns the route
    pub router: &'a Router,
    /// Action to run
    pub action: &'a Action,
    /// Command arguments, or the full text for message routes
    pub args: &'a str,
}

impl Router {
    /// Create an empty router under a namespace (e.g. `plugins.echo`)
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            description: None,
            commands: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Set the human-readable description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a command route
    pub fn add_command(&mut self, route: CommandRoute) {
        self.commands.push(route);
    }

    /// Append a message route
    pub fn add_message(&mut self, route: MessageRoute) {
        self.messages.push(route);
    }

    /// Namespace this router was loaded under
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Command routes in declaration order
    #[must_use]
    pub fn commands(&self) -> &[CommandRoute] {
        &self.commands
    }

    /// Message routes in declaration order
    #[must_use]
    pub fn messages(&self) -> &[MessageRoute] {
        &self.messages
    }

    /// Whether the router has no routes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.messages.is_empty()
    }

    /// Find the command route for an update, if it is a command
    #[must_use]
    pub fn match_command<'a>(&'a self, update: &'a Update) -> Option<RouteMatch<'a>> {
        let (name, args) = parse_command(&update.text)?;
        self.commands
            .iter()
            .find(|route| route.command.eq_ignore_ascii_case(name))
            .map(|route| RouteMatch {
                router: self,
                action: &route.action,
                args,
            })
    }

    /// Find the first message route whose pattern matches the update text
    #[must_use]
    pub fn match_message<'a>(&'a self, update: &'a Update) -> Option<RouteMatch<'a>> {
        self.messages
            .iter()
            .find(|route| route.pattern.is_match(&update.text))
            .map(|route| RouteMatch {
                router: self,
                action: &route.action,
                args: update.text.as_str(),
            })
    }
}

/// Split `/name@bot args` into `("name", "args")`
#[must_use]
pub fn parse_command(text: &str) -> Option<(&str, &str)> {
    let rest = text.trim_start().strip_prefix('/')?;
    let (head, args) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(head, args)| (head, args.trim()));
    let name = head.split_once('@').map_or(head, |(name, _)| name);

    if name.is_empty() {
        return None;
    }

    Some((name, args))
}

/// Expand template variables in a reply
#[must_use]
pub fn expand_reply(template: &str, update: &Update, args: &str) -> String {
    template
        .replace("{{args}}", args)
        .replace("{{sender}}", &update.sender)
        .replace("{{text}}", &update.text)
}
