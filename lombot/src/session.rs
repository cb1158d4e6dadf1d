use crate::*;

use async_trait::async_trait;

use irc_transport::{Transport, TransportFault};
use tokio::io::{AsyncRead, AsyncWrite};

/// Where a [`Session`] is in its lifecycle.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum SessionState
{
    /// Connected, but the registration lines haven't been sent yet
    Registering,
    /// Registered and processing messages
    Active,
    /// The transport has failed; the session can't be used further
    Closed,
}

/// A chat message delivered to the bot, either in its channel or privately.
#[derive(Debug,Clone,Copy)]
pub struct ChatMessage<'a>
{
    /// The nickname that sent the message
    pub sender: &'a str,
    /// Where replies should go: the channel, or the sender for private messages
    pub target: &'a str,
    /// The message text
    pub text: &'a str,
}

/// Read-only state a router can consult while handling a message.
#[derive(Debug,Clone,Copy)]
pub struct SessionView<'a>
{
    pub nickname: &'a str,
    pub channel: &'a str,
    pub roster: &'a Roster,
}

/// Lines queued for sending in response to a chat message.
#[derive(Debug,Default)]
pub struct Replies
{
    lines: Vec<String>,
}

impl Replies
{
    /// Queue a raw protocol line.
    pub fn send(&mut self, line: impl Into<String>)
    {
        self.lines.push(line.into());
    }

    /// Queue a `NOTICE` to `target`.
    pub fn notice(&mut self, target: &str, text: &str)
    {
        self.send(format!("NOTICE {} :{}", target, text));
    }

    pub fn into_lines(self) -> Vec<String>
    {
        self.lines
    }
}

/// Something that acts on chat messages.
///
/// Routers are awaited inside the session's dispatch loop, so the roster they
/// see reflects every line processed before the message, and nothing else is
/// read until they return. Any replies they queue are sent before the next
/// line is read.
#[async_trait]
pub trait MessageRouter: Send + Sync
{
    async fn route(&self, message: &ChatMessage<'_>, session: &SessionView<'_>, replies: &mut Replies);
}

#[async_trait]
impl<R: MessageRouter + ?Sized> MessageRouter for &R
{
    async fn route(&self, message: &ChatMessage<'_>, session: &SessionView<'_>, replies: &mut Replies)
    {
        (**self).route(message, session, replies).await
    }
}

/// The protocol state for one connection: registration, keepalive replies,
/// channel membership, and routing of chat messages.
pub struct Session<'a, S, R: ?Sized>
{
    transport: Transport<S>,
    config: &'a SessionConfig,
    router: &'a R,
    roster: Roster,
    nickname: String,
    welcomed: bool,
    state: SessionState,
}

impl<'a, S, R> Session<'a, S, R>
    where S: AsyncRead + AsyncWrite + Unpin,
          R: MessageRouter + ?Sized
{
    pub fn new(transport: Transport<S>, config: &'a SessionConfig, router: &'a R) -> Self
    {
        Self {
            transport,
            config,
            router,
            roster: Roster::new(),
            nickname: config.nickname.clone(),
            welcomed: false,
            state: SessionState::Registering,
        }
    }

    pub fn state(&self) -> SessionState
    {
        self.state
    }

    /// The nickname currently in use, which may differ from the configured one
    /// if that was taken.
    pub fn nickname(&self) -> &str
    {
        &self.nickname
    }

    pub fn roster(&self) -> &Roster
    {
        &self.roster
    }

    pub fn view(&self) -> SessionView<'_>
    {
        SessionView {
            nickname: &self.nickname,
            channel: &self.config.channel,
            roster: &self.roster,
        }
    }

    /// Send the nickname, user registration and channel join.
    pub async fn register(&mut self) -> Result<(), TransportFault>
    {
        let nick = format!("NICK {}", self.nickname);
        let user = format!("USER {} 0 * :{}", self.config.username, self.config.username);
        let join = format!("JOIN {}", self.config.channel);

        for line in [nick, user, join]
        {
            self.send(&line).await?;
        }

        self.state = SessionState::Active;
        Ok(())
    }

    /// Process lines until the transport fails.
    pub async fn run(&mut self) -> TransportFault
    {
        loop
        {
            if let Err(fault) = self.process_next().await
            {
                tracing::debug!(%fault, "Session ended");
                self.state = SessionState::Closed;
                return fault;
            }
        }
    }

    /// Wait for one line and dispatch it. Returns without doing anything if
    /// no line arrived within the transport's wait window.
    pub async fn process_next(&mut self) -> Result<(), TransportFault>
    {
        match self.transport.receive().await?
        {
            Some(line) => self.dispatch(&line).await,
            None => Ok(()),
        }
    }

    /// Act on a single received line.
    pub async fn dispatch(&mut self, line: &str) -> Result<(), TransportFault>
    {
        let msg = Message::parse(line);

        match msg.command()
        {
            "PING" =>
            {
                let arg = if msg.tokens[0] == "PING"
                {
                    msg.arg(1)
                }
                else
                {
                    msg.arg(2)
                };
                let pong = if arg.is_empty()
                {
                    "PONG".to_string()
                }
                else
                {
                    format!("PONG {}", arg)
                };
                self.send(&pong).await?;
            }
            "PRIVMSG" => self.handle_privmsg(&msg).await?,
            "001" =>
            {
                self.welcomed = true;
                tracing::info!(nickname = %self.nickname, server = %msg.origin, "Registered");
            }
            "433" if !self.welcomed =>
            {
                self.nickname.push('_');
                tracing::info!(nickname = %self.nickname, "Nickname in use, retrying");
                let nick = format!("NICK {}", self.nickname);
                self.send(&nick).await?;
            }
            "353" =>
            {
                // :server 353 <me> <type> <channel> :<names...>
                if msg.tokens.len() < 6
                {
                    tracing::debug!(line, "Ignoring short names reply");
                }
                else if msg.arg(4).eq_ignore_ascii_case(&self.config.channel)
                {
                    let names = msg.text_from(5);
                    self.roster.merge_names(names.split(' '));
                }
            }
            "JOIN" =>
            {
                if !self.is_self(&msg.origin)
                {
                    self.roster.insert(&msg.origin);
                }
            }
            "PART" | "QUIT" =>
            {
                self.roster.remove(&msg.origin);
            }
            "KICK" =>
            {
                if msg.target.eq_ignore_ascii_case(&self.config.channel)
                {
                    self.roster.remove(msg.arg(3));
                }
            }
            "NICK" if !msg.target.is_empty() =>
            {
                if self.is_self(&msg.origin)
                {
                    self.nickname = msg.target.clone();
                }
                self.roster.remove(&msg.origin);
                self.roster.insert(&msg.target);
            }
            _ => {}
        }

        Ok(())
    }

    async fn handle_privmsg(&mut self, msg: &Message) -> Result<(), TransportFault>
    {
        if msg.tokens.len() < 4 || msg.origin.is_empty()
        {
            return Ok(());
        }

        let target = if self.is_self(&msg.target)
        {
            msg.origin.as_str()
        }
        else if msg.target.eq_ignore_ascii_case(&self.config.channel)
        {
            msg.target.as_str()
        }
        else
        {
            return Ok(());
        };

        let text = msg.text_from(3);
        let chat = ChatMessage {
            sender: &msg.origin,
            target,
            text: &text,
        };

        let mut replies = Replies::default();
        self.router.route(&chat, &self.view(), &mut replies).await;

        for line in replies.into_lines()
        {
            self.send(&line).await?;
        }
        Ok(())
    }

    fn is_self(&self, nick: &str) -> bool
    {
        nick.eq_ignore_ascii_case(&self.nickname)
    }

    async fn send(&mut self, line: &str) -> Result<(), TransportFault>
    {
        let result = self.transport.send(line).await;
        if result.is_err()
        {
            self.state = SessionState::Closed;
        }
        result
    }
}
