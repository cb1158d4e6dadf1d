use lombot::{config::LoggingConfig, *};

use std::{path::PathBuf, time::Duration};
use structopt::StructOpt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug,StructOpt)]
#[structopt(rename_all = "kebab")]
struct Opts
{
    /// Server to connect to
    #[structopt(short, long, default_value = "irc.libera.chat")]
    server: String,

    /// Port to connect to
    #[structopt(short, long, default_value = "6667")]
    port: u16,

    /// Seconds of silence from the server after which to reconnect
    #[structopt(short, long, default_value = "240")]
    timeout: u64,

    /// Username to register with
    #[structopt(short, long, default_value = "lombot")]
    username: String,

    /// Nickname to use; defaults to the username
    #[structopt(short, long)]
    nickname: Option<String>,

    /// Directory in which to keep quote files
    #[structopt(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Seconds to spend fetching a linked page before giving up
    #[structopt(long, default_value = "15")]
    fetch_timeout: u64,

    /// Logging config file location
    #[structopt(long)]
    log_config: Option<PathBuf>,

    /// Channel to join
    channel: String,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error>
{
    let opts = Opts::from_args();
    if opts.timeout < 2
    {
        anyhow::bail!("timeout must be at least two seconds");
    }

    let log_config = match &opts.log_config
    {
        Some(path) => LoggingConfig::load_file(path)?,
        None => LoggingConfig::default(),
    };
    build_subscriber(log_config)?.init();

    let config = SessionConfig {
        server: opts.server,
        port: opts.port,
        nickname: opts.nickname.unwrap_or_else(|| opts.username.clone()),
        username: opts.username,
        channel: opts.channel,
        idle_timeout: Duration::from_secs(opts.timeout),
    };
    let router = CommandRouter::new(RouterConfig {
        data_dir: opts.data_dir,
        fetch_timeout: Duration::from_secs(opts.fetch_timeout),
    })?;

    tracing::info!(?config, "Starting");
    let supervisor = Supervisor::new(config, TcpConnector, router);

    tokio::select! {
        _ = supervisor.run() => {}
        res = tokio::signal::ctrl_c() =>
        {
            res?;
            tracing::info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
