use super::*;

use rand::Rng;
use sha1::{Digest, Sha1};
use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::PathBuf,
};

inventory::submit!(CommandRegistration {
    command: "addquote",
    handler: handle_addquote,
});

inventory::submit!(CommandRegistration {
    command: "quote",
    handler: handle_quote,
});

/// Quotes are kept per target, one per line, after a header line.
fn quote_file(ctx: &CommandContext<'_>) -> PathBuf
{
    let hash = Sha1::digest(ctx.target.as_bytes());
    ctx.config
        .data_dir
        .join(format!("quotes_{}", hex::encode(hash)))
}

fn read_quotes(ctx: &CommandContext<'_>) -> Result<Vec<String>, CommandError>
{
    match fs::read_to_string(quote_file(ctx))
    {
        Ok(contents) => Ok(contents.lines().skip(1).map(str::to_string).collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

fn handle_addquote(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult
{
    if args.is_empty()
    {
        return Err(CommandError::Syntax("!addquote <text>"));
    }

    let path = quote_file(ctx);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if file.metadata()?.len() == 0
    {
        writeln!(file, "QUOTES FOR {}:", ctx.target)?;
    }
    writeln!(file, "{}", args.join(" "))?;
    drop(file);

    let count = read_quotes(ctx)?.len();
    tracing::info!(to = ctx.target, sender = ctx.sender, count, "Added quote");
    ctx.notice(format!("ADDED QUOTE #{}", count));
    Ok(())
}

fn handle_quote(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandResult
{
    const USAGE: &str = "!quote [int]";

    let requested = match args
    {
        [] => None,
        [index] if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) =>
        {
            Some(index.parse::<usize>().map_err(|_| CommandError::NoSuchQuote)?)
        }
        _ => return Err(CommandError::Syntax(USAGE)),
    };

    let quotes = read_quotes(ctx)?;
    if quotes.is_empty()
    {
        return Err(CommandError::NoQuotes);
    }

    let index = match requested
    {
        Some(n) if n == 0 || n > quotes.len() => return Err(CommandError::NoSuchQuote),
        Some(n) => n - 1,
        None => rand::thread_rng().gen_range(0..quotes.len()),
    };

    ctx.notice(format!("QUOTE #{}: {}", index + 1, quotes[index]));
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use pretty_assertions::assert_eq;

    struct Harness
    {
        dir: tempfile::TempDir,
        roster: Roster,
    }

    impl Harness
    {
        fn new() -> Self
        {
            Self {
                dir: tempfile::tempdir().unwrap(),
                roster: Roster::new(),
            }
        }

        fn run(&self, target: &str, handler: CommandHandler, args: &[&str]) -> (CommandResult, Vec<String>)
        {
            let config = RouterConfig {
                data_dir: self.dir.path().to_owned(),
                fetch_timeout: std::time::Duration::from_secs(15),
            };
            let session = SessionView {
                nickname: "lombot",
                channel: "#chan",
                roster: &self.roster,
            };
            let message = ChatMessage {
                sender: "alice",
                target,
                text: "",
            };
            let mut replies = Replies::default();
            let result = {
                let mut ctx = CommandContext::new(&message, &session, &config, &mut replies);
                handler(&mut ctx, args)
            };
            (result, replies.into_lines())
        }
    }

    #[test]
    fn add_and_fetch()
    {
        let h = Harness::new();

        let (result, replies) = h.run("#chan", handle_addquote, &["first", "quote"]);
        assert!(result.is_ok());
        assert_eq!(replies, vec!["NOTICE #chan :ADDED QUOTE #1"]);

        let (_, replies) = h.run("#chan", handle_addquote, &["second"]);
        assert_eq!(replies, vec!["NOTICE #chan :ADDED QUOTE #2"]);

        let (_, replies) = h.run("#chan", handle_quote, &["1"]);
        assert_eq!(replies, vec!["NOTICE #chan :QUOTE #1: first quote"]);

        let (_, replies) = h.run("#chan", handle_quote, &["2"]);
        assert_eq!(replies, vec!["NOTICE #chan :QUOTE #2: second"]);
    }

    #[test]
    fn file_has_header()
    {
        let h = Harness::new();
        h.run("#chan", handle_addquote, &["hello"]).0.unwrap();

        let name = format!("quotes_{}", hex::encode(Sha1::digest(b"#chan")));
        let contents = fs::read_to_string(h.dir.path().join(name)).unwrap();
        assert_eq!(contents, "QUOTES FOR #chan:\nhello\n");
    }

    #[test]
    fn random_quote()
    {
        let h = Harness::new();
        h.run("#chan", handle_addquote, &["only", "one"]).0.unwrap();

        let (result, replies) = h.run("#chan", handle_quote, &[]);
        assert!(result.is_ok());
        assert_eq!(replies, vec!["NOTICE #chan :QUOTE #1: only one"]);
    }

    #[test]
    fn quotes_are_per_target()
    {
        let h = Harness::new();
        h.run("#chan", handle_addquote, &["channel quote"]).0.unwrap();

        let (result, _) = h.run("bob", handle_quote, &[]);
        assert!(matches!(result, Err(CommandError::NoQuotes)));
    }

    #[test]
    fn bad_arguments()
    {
        let h = Harness::new();

        assert!(matches!(
            h.run("#chan", handle_addquote, &[]).0,
            Err(CommandError::Syntax(_))
        ));
        assert!(matches!(
            h.run("#chan", handle_quote, &["x"]).0,
            Err(CommandError::Syntax(_))
        ));
        assert!(matches!(
            h.run("#chan", handle_quote, &["-1"]).0,
            Err(CommandError::Syntax(_))
        ));
        assert!(matches!(
            h.run("#chan", handle_quote, &["1", "2"]).0,
            Err(CommandError::Syntax(_))
        ));
    }

    #[test]
    fn out_of_range()
    {
        let h = Harness::new();
        h.run("#chan", handle_addquote, &["hello"]).0.unwrap();

        for index in ["0", "2", "99999999999999999999999"]
        {
            assert!(matches!(
                h.run("#chan", handle_quote, &[index]).0,
                Err(CommandError::NoSuchQuote)
            ));
        }
    }
}
