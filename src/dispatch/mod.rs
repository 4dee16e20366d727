//! Dispatch of incoming updates to plugin routers
//!
//! The dispatch engine is the consumer of plugin output: every loaded
//! [`Router`] is included once, in load order, and updates are matched
//! against the included routers in that same order.

mod executor;
mod router;

pub use executor::{Launcher, execute_handler};
pub use router::{
    Action, CommandRoute, ExecHandler, MessageRoute, RouteMatch, Router, expand_reply,
    parse_command,
};

use serde::Serialize;

use crate::{Error, Result};

/// An incoming chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Update {
    /// Chat the message was sent in
    pub chat_id: i64,
    /// Sender display name
    pub sender: String,
    /// Message text
    pub text: String,
}

/// Bot command for command menus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotCommand {
    /// Command name without the leading slash
    pub command: String,
    /// Description
    pub description: String,
}

/// Anything routers can be merged into
pub trait DispatchEngine {
    /// Include a router; routers included earlier take precedence
    fn include_router(&mut self, router: Router);
}

/// Minimal in-process dispatch engine
#[derive(Debug, Default)]
pub struct Dispatcher {
    routers: Vec<Router>,
}

impl DispatchEngine for Dispatcher {
    fn include_router(&mut self, router: Router) {
        tracing::debug!(
            namespace = %router.namespace(),
            commands = router.commands().len(),
            messages = router.messages().len(),
            "included router"
        );
        self.routers.push(router);
    }
}

impl Dispatcher {
    /// Create an empty dispatcher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher with routers included in order
    #[must_use]
    pub fn with_routers(routers: impl IntoIterator<Item = Router>) -> Self {
        let mut dispatcher = Self::new();
        for router in routers {
            dispatcher.include_router(router);
        }
        dispatcher
    }

    /// Included routers in order
    #[must_use]
    pub fn routers(&self) -> &[Router] {
        &self.routers
    }

    /// Commands from every router, first occurrence wins
    #[must_use]
    pub fn commands(&self) -> Vec<BotCommand> {
        let mut commands: Vec<BotCommand> = Vec::new();
        for route in self.routers.iter().flat_map(Router::commands) {
            if commands
                .iter()
                .any(|c| c.command.eq_ignore_ascii_case(&route.command))
            {
                continue;
            }
            commands.push(BotCommand {
                command: route.command.clone(),
                description: route.description.clone(),
            });
        }
        commands
    }

    /// Select the route for an update
    ///
    /// Command routes are tried across all routers before any message
    /// route, so a plugin's catch-all pattern cannot shadow another
    /// plugin's command.
    #[must_use]
    pub fn resolve<'a>(&'a self, update: &'a Update) -> Option<RouteMatch<'a>> {
        self.routers
            .iter()
            .find_map(|router| router.match_command(update))
            .or_else(|| {
                self.routers
                    .iter()
                    .find_map(|router| router.match_message(update))
            })
    }

    /// Handle an update and return the reply, if any
    ///
    /// # Errors
    ///
    /// Returns error if an exec handler fails or times out
    pub async fn handle(&self, update: &Update) -> Result<Option<String>> {
        let Some(matched) = self.resolve(update) else {
            tracing::trace!(chat_id = update.chat_id, "no route matched");
            return Ok(None);
        };

        tracing::debug!(
            namespace = %matched.router.namespace(),
            chat_id = update.chat_id,
            "route matched"
        );

        match matched.action {
            Action::Reply(template) => Ok(Some(expand_reply(template, update, matched.args))),
            Action::Exec(handler) => {
                execute_handler(handler, matched.router.namespace(), update, matched.args)
                    .await
                    .map_err(|e| Error::Dispatch(format!("{}: {e}", matched.router.namespace())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    fn update(text: &str) -> Update {
        Update {
            chat_id: 7,
            sender: "bob".to_string(),
            text: text.to_string(),
        }
    }

    fn reply_command(namespace: &str, command: &str, reply: &str) -> Router {
        let mut router = Router::new(namespace);
        router.add_command(CommandRoute {
            command: command.to_string(),
            description: format!("{command} command"),
            action: Action::Reply(reply.to_string()),
        });
        router
    }

    #[tokio::test]
    async fn first_included_router_wins() {
        let dispatcher = Dispatcher::with_routers([
            reply_command("plugins.a", "ping", "pong from a"),
            reply_command("plugins.b", "ping", "pong from b"),
        ]);

        let reply = dispatcher.handle(&update("/ping")).await.unwrap();
        assert_eq!(reply.as_deref(), Some("pong from a"));
        assert_eq!(dispatcher.commands().len(), 1);
    }

    #[tokio::test]
    async fn commands_take_precedence_over_patterns() {
        let mut catch_all = Router::new("plugins.a_catch_all");
        catch_all.add_message(MessageRoute {
            pattern: Regex::new(".*").unwrap(),
            action: Action::Reply("caught".to_string()),
        });

        let dispatcher =
            Dispatcher::with_routers([catch_all, reply_command("plugins.b", "help", "help text")]);

        let reply = dispatcher.handle(&update("/help")).await.unwrap();
        assert_eq!(reply.as_deref(), Some("help text"));

        let reply = dispatcher.handle(&update("anything")).await.unwrap();
        assert_eq!(reply.as_deref(), Some("caught"));
    }

    #[tokio::test]
    async fn unmatched_update_has_no_reply() {
        let dispatcher = Dispatcher::with_routers([reply_command("plugins.a", "ping", "pong")]);
        assert!(dispatcher.handle(&update("hello")).await.unwrap().is_none());
    }
}
