#![allow(dead_code)]

use lombot::*;

use irc_transport::Transport;
use async_trait::async_trait;
use std::{sync::Mutex, time::Duration};
use tokio::{
    io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream},
    time::timeout,
};

pub const GREETING: &[u8] = b":irc.example.net NOTICE * :*** Looking up your hostname\r\n";

pub fn test_config() -> SessionConfig
{
    SessionConfig {
        server: "irc.example.net".to_string(),
        port: 6667,
        nickname: "lombot".to_string(),
        username: "lombot".to_string(),
        channel: "#chan".to_string(),
        idle_timeout: Duration::from_secs(10),
    }
}

/// One routed message, as the router saw it.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct Routed
{
    pub sender: String,
    pub target: String,
    pub text: String,
    pub roster: Vec<String>,
}

/// Records every message routed to it, and answers `echo` with a notice.
#[derive(Default)]
pub struct RecordingRouter
{
    pub seen: Mutex<Vec<Routed>>,
}

#[async_trait]
impl MessageRouter for RecordingRouter
{
    async fn route(&self, message: &ChatMessage<'_>, session: &SessionView<'_>, replies: &mut Replies)
    {
        let mut roster: Vec<String> = session.roster.iter().map(str::to_string).collect();
        roster.sort();

        self.seen.lock().unwrap().push(Routed {
            sender: message.sender.to_string(),
            target: message.target.to_string(),
            text: message.text.to_string(),
            roster,
        });

        if message.text == "echo"
        {
            replies.notice(message.target, "echo");
        }
    }
}

/// A stream pair with the server greeting already sent.
pub async fn greeted_pair() -> (DuplexStream, DuplexStream)
{
    let (client, mut server) = duplex(4096);
    server.write_all(GREETING).await.unwrap();
    (client, server)
}

pub async fn connected(config: &SessionConfig) -> (Transport<DuplexStream>, DuplexStream)
{
    let (client, server) = greeted_pair().await;
    let transport = Transport::handshake(client, config.idle_timeout).await.unwrap();
    (transport, server)
}

/// Everything the client has written so far.
pub async fn written(server: &mut DuplexStream) -> String
{
    let mut out = Vec::new();
    let mut buf = [0u8; 1024];
    while let Ok(Ok(len)) = timeout(Duration::from_millis(1), server.read(&mut buf)).await
    {
        if len == 0
        {
            break;
        }
        out.extend_from_slice(&buf[..len]);
    }
    String::from_utf8(out).unwrap()
}
