//! Chat commands.
//!
//! Messages beginning with `!` are treated as commands: the first word names
//! the handler, the rest are its arguments. Handlers are registered at compile
//! time through `inventory`; to add one, create a module under `handlers` and
//! submit a [`CommandRegistration`] for it.
//!
//! Independently of commands, every web link in a message is followed and its
//! page title announced.

use crate::*;

mod error;
pub use error::*;

mod context;
pub use context::*;

mod dispatcher;
pub use dispatcher::*;

mod link_titles;
pub use link_titles::*;

/// A convenience definition for the result type returned from command handlers
pub type CommandResult = Result<(), CommandError>;

mod handlers
{
    use super::*;

    mod quote;
}
