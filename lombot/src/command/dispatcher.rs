use super::*;

use async_trait::async_trait;
use std::collections::HashMap;

/// A command handler function.
pub type CommandHandler = fn(&mut CommandContext<'_>, &[&str]) -> CommandResult;

/// A command handler registration, submitted to `inventory` by each handler module.
pub struct CommandRegistration
{
    pub(super) command: &'static str,
    pub(super) handler: CommandHandler,
}

inventory::collect!(CommandRegistration);

/// Routes chat messages to their handlers: `!command` messages to the
/// registered command, and any web links to [`LinkTitles`].
pub struct CommandRouter
{
    handlers: HashMap<String, CommandHandler>,
    links: LinkTitles,
    config: RouterConfig,
}

impl CommandRouter
{
    /// Construct a `CommandRouter`.
    ///
    /// Handlers are populated via compile-time registration.
    pub fn new(config: RouterConfig) -> Result<Self, reqwest::Error>
    {
        let mut handlers = HashMap::new();

        for reg in inventory::iter::<CommandRegistration>
        {
            handlers.insert(reg.command.to_ascii_lowercase(), reg.handler);
        }

        let links = LinkTitles::new(config.fetch_timeout)?;

        Ok(Self { handlers, links, config })
    }

    /// Names of all registered commands.
    pub fn commands(&self) -> impl Iterator<Item = &str>
    {
        self.handlers.keys().map(String::as_str)
    }

    fn run_command(&self, ctx: &mut CommandContext<'_>, command_line: &str)
    {
        let mut words = command_line.split_whitespace();
        let command = match words.next()
        {
            Some(command) => command,
            None => return,
        };
        let args: Vec<&str> = words.collect();

        match self.handlers.get(&command.to_ascii_lowercase())
        {
            Some(handler) =>
            {
                if let Err(e) = handler(ctx, &args)
                {
                    tracing::debug!(command, error = %e, "Command failed");
                    ctx.notice(e.to_string());
                }
            }
            None =>
            {
                tracing::debug!(command, sender = ctx.sender, "Unknown command");
            }
        }
    }
}

#[async_trait]
impl MessageRouter for CommandRouter
{
    async fn route(&self, message: &ChatMessage<'_>, session: &SessionView<'_>, replies: &mut Replies)
    {
        let mut ctx = CommandContext::new(message, session, &self.config, replies);

        if let Some(command_line) = message.text.strip_prefix('!')
        {
            self.run_command(&mut ctx, command_line);
        }

        self.links.announce(&mut ctx, message.text).await;
    }
}
