use crate::*;

use async_trait::async_trait;
use irc_transport::{Transport, TransportFault};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};

/// Establishes new connections for the [`Supervisor`].
#[async_trait]
pub trait Connector
{
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn connect(&self, config: &SessionConfig) -> Result<Transport<Self::Stream>, TransportFault>;
}

/// Connects over plain TCP.
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector
{
    type Stream = TcpStream;

    async fn connect(&self, config: &SessionConfig) -> Result<Transport<TcpStream>, TransportFault>
    {
        Transport::connect(&config.server, config.port, config.idle_timeout).await
    }
}

/// Keeps a session running for as long as the process lives.
///
/// Each cycle builds a fresh transport and session, runs until the
/// connection fails for any reason, then throws both away. There is no
/// backoff and no limit on attempts.
pub struct Supervisor<C, R>
{
    config: SessionConfig,
    connector: C,
    router: R,
}

impl<C, R> Supervisor<C, R>
    where C: Connector,
          R: MessageRouter
{
    pub fn new(config: SessionConfig, connector: C, router: R) -> Self
    {
        Self {
            config,
            connector,
            router,
        }
    }

    pub fn config(&self) -> &SessionConfig
    {
        &self.config
    }

    /// Connect, register, and run one session to completion, returning the
    /// fault that ended it.
    #[tracing::instrument(skip_all, fields(server = %self.config.server, port = self.config.port))]
    pub async fn run_cycle(&self) -> TransportFault
    {
        tracing::info!("Connecting");

        let transport = match self.connector.connect(&self.config).await
        {
            Ok(transport) => transport,
            Err(fault) => return fault,
        };

        let mut session = Session::new(transport, &self.config, &self.router);
        if let Err(fault) = session.register().await
        {
            return fault;
        }

        session.run().await
    }

    /// Run sessions forever, reconnecting after every failure.
    pub async fn run(&self)
    {
        loop
        {
            let fault = self.run_cycle().await;
            tracing::warn!(%fault, "Connection lost, reconnecting");
        }
    }
}
