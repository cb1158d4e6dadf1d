use crate::*;

/// Everything a command handler gets to see.
pub struct CommandContext<'a>
{
    /// The nickname that issued the command
    pub sender: &'a str,
    /// The channel, or the sender for private messages
    pub target: &'a str,
    pub session: &'a SessionView<'a>,
    pub config: &'a RouterConfig,
    replies: &'a mut Replies,
}

impl<'a> CommandContext<'a>
{
    pub fn new(message: &ChatMessage<'a>,
               session: &'a SessionView<'a>,
               config: &'a RouterConfig,
               replies: &'a mut Replies) -> Self
    {
        Self {
            sender: message.sender,
            target: message.target,
            session,
            config,
            replies,
        }
    }

    /// Reply to wherever the command came from.
    pub fn notice(&mut self, text: impl AsRef<str>)
    {
        self.replies.notice(self.target, text.as_ref());
    }
}
