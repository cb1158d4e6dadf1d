/// A tokenised line received from the server.
///
/// Tokens are split on single spaces, so runs of spaces yield empty tokens
/// and the text argument keeps its leading `:`. Nothing about the line is
/// validated; fields that can't be derived are left empty, and callers should
/// treat an empty `origin` or `target` as unknown.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct Message
{
    /// The line as received, without its terminator
    pub raw: String,
    /// The space-separated tokens of the line
    pub tokens: Vec<String>,
    /// The nickname (or server name) from the prefix, if there is one
    pub origin: String,
    /// The nickname or channel from the third token, if there is one
    pub target: String,
}

impl Message
{
    pub fn parse(raw: &str) -> Self
    {
        let tokens: Vec<String> = raw.split(' ').map(str::to_string).collect();

        let origin = tokens[0]
            .strip_prefix(':')
            .map(identity)
            .unwrap_or_default()
            .to_string();

        let target = match tokens.get(2)
        {
            Some(token) => identity(token.strip_prefix(':').unwrap_or(token)).to_string(),
            None => String::new(),
        };

        Self {
            raw: raw.to_string(),
            tokens,
            origin,
            target,
        }
    }

    /// The command name: the second token, or the first for unprefixed lines
    /// such as `PING`.
    pub fn command(&self) -> &str
    {
        if self.tokens[0].starts_with(':')
        {
            self.arg(1)
        }
        else
        {
            &self.tokens[0]
        }
    }

    /// The token at `index`, or an empty string if the line is shorter.
    pub fn arg(&self, index: usize) -> &str
    {
        self.tokens.get(index).map(String::as_str).unwrap_or_default()
    }

    /// Tokens from `index` onwards rejoined, with one leading `:` removed.
    pub fn text_from(&self, index: usize) -> String
    {
        match self.tokens.get(index..)
        {
            Some(rest) if !rest.is_empty() =>
            {
                let text = rest.join(" ");
                match text.strip_prefix(':')
                {
                    Some(stripped) => stripped.to_string(),
                    None => text,
                }
            }
            _ => String::new(),
        }
    }
}

/// The part of a `nick!user@host` mask before the user or host.
fn identity(mask: &str) -> &str
{
    match mask.find(|c: char| c == '!' || c == '@')
    {
        Some(end) => &mask[..end],
        None => mask,
    }
}
