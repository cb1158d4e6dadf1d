use super::*;

use std::time::Duration;

/// Pages are read at most this far while looking for a title.
const MAX_BODY_LEN: usize = 256 * 1024;

/// Links beyond this many in one message are ignored.
pub const MAX_LINKS_PER_MESSAGE: usize = 3;

/// Announces the page title of every web link posted in chat.
pub struct LinkTitles
{
    client: reqwest::Client,
}

impl LinkTitles
{
    pub fn new(fetch_timeout: Duration) -> Result<Self, reqwest::Error>
    {
        let client = reqwest::Client::builder().timeout(fetch_timeout).build()?;
        Ok(Self { client })
    }

    /// Fetch each link in `text` in turn and report its title, or why there
    /// isn't one, as a notice.
    pub async fn announce(&self, ctx: &mut CommandContext<'_>, text: &str)
    {
        for url in find_links(text).into_iter().take(MAX_LINKS_PER_MESSAGE)
        {
            match self.fetch_title(url).await
            {
                Ok(Some(title)) => ctx.notice(format!("PAGE TITLE: {}", title)),
                Ok(None) => ctx.notice("PAGE HAS NO TITLE TAG"),
                Err(e) =>
                {
                    tracing::debug!(url, error = %e, "Could not follow link");
                    ctx.notice(e.to_string());
                }
            }
        }
    }

    async fn fetch_title(&self, url: &str) -> Result<Option<String>, CommandError>
    {
        let mut response = self.client.get(url).send().await?;

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await?
        {
            body.extend_from_slice(&chunk);
            if body.len() >= MAX_BODY_LEN || has_title_end(&body)
            {
                break;
            }
        }

        Ok(extract_title(&String::from_utf8_lossy(&body)))
    }
}

/// Every `http://` or `https://` link in `text`, each running up to the next
/// whitespace or `>`.
pub fn find_links(text: &str) -> Vec<&str>
{
    let mut links = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("http")
    {
        let candidate = &rest[start..];
        let scheme_len = if candidate.starts_with("https://")
        {
            "https://".len()
        }
        else if candidate.starts_with("http://")
        {
            "http://".len()
        }
        else
        {
            rest = &candidate["http".len()..];
            continue;
        };

        let end = candidate.find(|c: char| c.is_whitespace() || c == '>').unwrap_or(candidate.len());
        if end > scheme_len
        {
            links.push(&candidate[..end]);
        }
        rest = &candidate[end.max(scheme_len)..];
    }

    links
}

fn has_title_end(body: &[u8]) -> bool
{
    body.windows(7).any(|window| window.eq_ignore_ascii_case(b"</title"))
}

/// The text of the first `<title>` element, with entities decoded and
/// whitespace collapsed. An empty title counts as none.
pub fn extract_title(html: &str) -> Option<String>
{
    // Lowercasing ASCII keeps every byte offset valid in the original.
    let lower = html.to_ascii_lowercase();

    let mut from = 0;
    let tag_end = loop
    {
        let open = from + lower[from..].find("<title")?;
        let after = open + "<title".len();
        match lower.as_bytes().get(after)
        {
            Some(b'>' | b' ' | b'\t' | b'\r' | b'\n') => break after,
            _ => from = after,
        }
    };

    let content_start = tag_end + lower[tag_end..].find('>')? + 1;
    let content_end = content_start + lower[content_start..].find("</title")?;

    let title = decode_entities(&html[content_start..content_end]);
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

    if title.is_empty()
    {
        None
    }
    else
    {
        Some(title)
    }
}

fn decode_entities(text: &str) -> String
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&')
    {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&rest[1..end]).map(|c| (c, end)));
        match decoded
        {
            Some((c, end)) =>
            {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None =>
            {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char>
{
    match name
    {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ =>
        {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(|c: char| c == 'x' || c == 'X')
            {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
