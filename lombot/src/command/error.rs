use thiserror::Error;

/// An error that may occur while handling a chat command.
///
/// These never leave the router; each is reported back to the channel or
/// user the command came from, using its `Display` text.
#[derive(Debug,Error)]
pub enum CommandError
{
    /// The arguments didn't fit the command; carries the usage string
    #[error("SYNTAX: {0}")]
    Syntax(&'static str),
    #[error("NO QUOTES AVAILABLE")]
    NoQuotes,
    #[error("THERE'S NO QUOTE OF THAT INDEX")]
    NoSuchQuote,
    #[error("TROUBLE WITH QUOTE STORAGE: {0}")]
    Storage(#[from] std::io::Error),
    #[error("TROUBLE FOLLOWING URL: {0}")]
    Fetch(#[from] reqwest::Error),
}
