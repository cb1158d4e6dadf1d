use std::collections::VecDeque;

const TERMINATOR: &[u8] = b"\r\n";

/// The most unterminated input held at once. Anything beyond this belongs to
/// a line that could never be sent legitimately, and is thrown away up to the
/// next terminator.
pub const MAX_PENDING_LEN: usize = 8192;

/// Splits a stream of received byte chunks into protocol lines.
///
/// Bytes that have not yet been terminated by CR-LF are held undecoded, so a
/// multi-byte character or a terminator split across two reads is handled
/// the same as if it had arrived in one piece. Complete lines are decoded as
/// UTF-8 where possible, falling back to Latin-1 for lines that aren't valid
/// UTF-8.
#[derive(Debug,Default)]
pub struct LineFramer
{
    partial: Vec<u8>,
    lines: VecDeque<String>,
    overlong: bool,
}

impl LineFramer
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Append a received chunk, queueing every line it completes.
    ///
    /// Returns the number of bytes thrown away because they belonged to a line
    /// longer than [`MAX_PENDING_LEN`].
    pub fn feed(&mut self, chunk: &[u8]) -> usize
    {
        // A terminator may straddle the previous chunk boundary, so resume the
        // search one byte before the new data.
        let mut search_from = self.partial.len().saturating_sub(TERMINATOR.len() - 1);
        self.partial.extend_from_slice(chunk);

        let mut line_start = 0;
        while let Some(offset) = find_terminator(&self.partial[search_from..])
        {
            let line_end = search_from + offset;
            if self.overlong
            {
                self.overlong = false;
            }
            else
            {
                self.lines.push_back(decode_line(&self.partial[line_start..line_end]));
            }
            line_start = line_end + TERMINATOR.len();
            search_from = line_start;
        }
        self.partial.drain(..line_start);

        if self.partial.len() > MAX_PENDING_LEN
        {
            // Keep a possible half terminator so the end of the line is still seen.
            let discard = self.partial.len() - (TERMINATOR.len() - 1);
            self.partial.drain(..discard);
            self.overlong = true;
            discard
        }
        else
        {
            0
        }
    }

    /// Take the oldest complete line, if there is one.
    pub fn next_line(&mut self) -> Option<String>
    {
        self.lines.pop_front()
    }

    /// Whether any complete lines are waiting to be taken.
    pub fn has_lines(&self) -> bool
    {
        !self.lines.is_empty()
    }

    /// Bytes received after the last terminator.
    pub fn pending(&self) -> &[u8]
    {
        &self.partial
    }
}

fn find_terminator(haystack: &[u8]) -> Option<usize>
{
    haystack.windows(TERMINATOR.len()).position(|window| window == TERMINATOR)
}

fn decode_line(bytes: &[u8]) -> String
{
    match std::str::from_utf8(bytes)
    {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use pretty_assertions::assert_eq;

    const STREAM: &[u8] =
        b":srv NOTICE * :hello\r\n\r\nPING :srv\r\n:a!b@c PRIVMSG #chan :caf\xc3\xa9\r\ntrailing";

    fn drain(framer: &mut LineFramer) -> Vec<String>
    {
        std::iter::from_fn(|| framer.next_line()).collect()
    }

    #[test]
    fn whole_stream()
    {
        let mut framer = LineFramer::new();
        framer.feed(STREAM);

        assert_eq!(
            drain(&mut framer),
            vec![
                ":srv NOTICE * :hello",
                "",
                "PING :srv",
                ":a!b@c PRIVMSG #chan :café",
            ]
        );
        assert_eq!(framer.pending(), b"trailing");
    }

    #[test]
    fn chunking_does_not_matter()
    {
        let mut whole = LineFramer::new();
        whole.feed(STREAM);
        let expected = drain(&mut whole);

        for chunk_size in 1..STREAM.len()
        {
            let mut framer = LineFramer::new();
            let mut lines = Vec::new();
            for chunk in STREAM.chunks(chunk_size)
            {
                framer.feed(chunk);
                lines.extend(drain(&mut framer));
            }
            assert_eq!(lines, expected, "chunk size {}", chunk_size);
            assert_eq!(framer.pending(), whole.pending());
        }
    }

    #[test]
    fn reconstructs_input()
    {
        let mut framer = LineFramer::new();
        for chunk in STREAM.chunks(3)
        {
            framer.feed(chunk);
        }

        let mut rebuilt = Vec::new();
        while let Some(line) = framer.next_line()
        {
            rebuilt.extend_from_slice(line.as_bytes());
            rebuilt.extend_from_slice(TERMINATOR);
        }
        rebuilt.extend_from_slice(framer.pending());

        assert_eq!(rebuilt, STREAM);
    }

    #[test]
    fn split_terminator()
    {
        let mut framer = LineFramer::new();
        framer.feed(b"PING :a\r");
        assert!(!framer.has_lines());
        framer.feed(b"\nPING :b\r\n");

        assert_eq!(drain(&mut framer), vec!["PING :a", "PING :b"]);
        assert!(framer.pending().is_empty());
    }

    #[test]
    fn bare_newline_is_not_a_terminator()
    {
        let mut framer = LineFramer::new();
        framer.feed(b"one\ntwo\r\n");

        assert_eq!(drain(&mut framer), vec!["one\ntwo"]);
    }

    #[test]
    fn latin1_fallback()
    {
        let mut framer = LineFramer::new();
        framer.feed(b":a!b@c PRIVMSG #chan :caf\xe9\r\n");

        assert_eq!(framer.next_line().as_deref(), Some(":a!b@c PRIVMSG #chan :café"));
    }

    #[test]
    fn empty_queue()
    {
        let mut framer = LineFramer::new();
        assert_eq!(framer.next_line(), None);
        framer.feed(b"");
        assert_eq!(framer.next_line(), None);
    }

    #[test]
    fn unterminated_flood_is_bounded()
    {
        let mut framer = LineFramer::new();
        let chunk = [b'x'; 1024];
        let mut discarded = 0;

        for _ in 0..10_000
        {
            discarded += framer.feed(&chunk);
            assert!(framer.pending().len() <= MAX_PENDING_LEN);
        }

        assert!(discarded >= 10_000 * 1024 - MAX_PENDING_LEN);
        assert!(!framer.has_lines());
    }

    #[test]
    fn overlong_line_is_dropped_whole()
    {
        let mut framer = LineFramer::new();
        framer.feed(b"PING :before\r\n");
        framer.feed(&[b'x'; MAX_PENDING_LEN + 100]);
        framer.feed(b"xxx\r");
        framer.feed(b"\nPING :after\r\n");

        assert_eq!(drain(&mut framer), vec!["PING :before", "PING :after"]);
        assert!(framer.pending().is_empty());
    }
}
