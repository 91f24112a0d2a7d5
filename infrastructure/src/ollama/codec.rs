//! Incremental decoding of the newline-delimited JSON response stream
//!
//! The generation endpoint answers with one JSON object per line. Transport
//! chunks can split a line anywhere, so the parser buffers bytes and only
//! decodes once a full terminator has been observed. One parser instance
//! serves one request; a fresh instance per session guarantees no buffered
//! bytes leak across sessions.

use serde::Deserialize;

/// One decoded line from the response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedChunk {
    /// A text delta: `{"response": "...", "done": false}`.
    Delta(String),
    /// The terminal marker: `{"done": true}`, with any trailing text the
    /// final line carried.
    Done { trailing: Option<String> },
    /// A line that failed to decode. Non-fatal: parsing continues with the
    /// next line.
    Malformed { reason: String },
}

#[derive(Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    done: bool,
}

/// Append-only line decoder.
///
/// `buf` accumulates everything fed so far; `cursor` marks the byte after
/// the last processed terminator and never moves backward.
#[derive(Debug, Default)]
pub struct ChunkParser {
    buf: Vec<u8>,
    cursor: usize,
}

impl ChunkParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed newly arrived bytes, returning the chunks completed by them.
    ///
    /// The resulting event sequence is independent of how the byte stream
    /// was split across calls.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<ParsedChunk> {
        self.buf.extend_from_slice(bytes);

        let mut out = Vec::new();
        while let Some(offset) = self.buf[self.cursor..].iter().position(|&b| b == b'\n') {
            let line_end = self.cursor + offset;
            let line = &self.buf[self.cursor..line_end];
            let line = match line.last() {
                Some(b'\r') => &line[..line.len() - 1],
                _ => line,
            };
            if !line.is_empty() {
                out.push(Self::decode_line(line));
            }
            self.cursor = line_end + 1;
        }
        out
    }

    /// Bytes buffered past the last terminator (an incomplete line).
    pub fn pending(&self) -> usize {
        self.buf.len() - self.cursor
    }

    fn decode_line(line: &[u8]) -> ParsedChunk {
        match serde_json::from_slice::<GenerateChunk>(line) {
            Ok(chunk) if chunk.done => ParsedChunk::Done {
                trailing: chunk.response.filter(|s| !s.is_empty()),
            },
            Ok(chunk) => ParsedChunk::Delta(chunk.response.unwrap_or_default()),
            Err(e) => ParsedChunk::Malformed {
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut ChunkParser, input: &str) -> Vec<ParsedChunk> {
        parser.feed(input.as_bytes())
    }

    #[test]
    fn decodes_delta_and_terminal_lines() {
        let mut parser = ChunkParser::new();
        let events = feed_all(
            &mut parser,
            "{\"response\":\"Hel\",\"done\":false}\n{\"done\":true}\n",
        );
        assert_eq!(
            events,
            vec![
                ParsedChunk::Delta("Hel".to_string()),
                ParsedChunk::Done { trailing: None },
            ]
        );
    }

    #[test]
    fn chunking_boundaries_do_not_change_the_event_sequence() {
        let stream = "{\"response\":\"a\",\"done\":false}\n\
                      {\"response\":\"b\",\"done\":false}\n\
                      {\"done\":true}\n";

        let mut whole = ChunkParser::new();
        let all_at_once = whole.feed(stream.as_bytes());

        // One byte at a time
        let mut dribble = ChunkParser::new();
        let mut one_by_one = Vec::new();
        for byte in stream.as_bytes() {
            one_by_one.extend(dribble.feed(&[*byte]));
        }
        assert_eq!(all_at_once, one_by_one);

        // Split mid-line
        let mut split = ChunkParser::new();
        let mut by_halves = Vec::new();
        let (head, tail) = stream.as_bytes().split_at(17);
        by_halves.extend(split.feed(head));
        by_halves.extend(split.feed(tail));
        assert_eq!(all_at_once, by_halves);
    }

    #[test]
    fn partial_line_is_held_until_its_terminator_arrives() {
        let mut parser = ChunkParser::new();
        assert!(parser.feed(b"{\"response\":\"par").is_empty());
        assert!(parser.pending() > 0);
        let events = parser.feed(b"tial\",\"done\":false}\n");
        assert_eq!(events, vec![ParsedChunk::Delta("partial".to_string())]);
        assert_eq!(parser.pending(), 0);
    }

    #[test]
    fn one_malformed_line_does_not_drop_or_reorder_the_rest() {
        let mut parser = ChunkParser::new();
        let events = feed_all(
            &mut parser,
            "{\"response\":\"ok\",\"done\":false}\nnot json at all\n{\"response\":\"still\",\"done\":false}\n{\"done\":true}\n",
        );
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], ParsedChunk::Delta("ok".to_string()));
        assert!(matches!(events[1], ParsedChunk::Malformed { .. }));
        assert_eq!(events[2], ParsedChunk::Delta("still".to_string()));
        assert_eq!(events[3], ParsedChunk::Done { trailing: None });
    }

    #[test]
    fn terminal_line_may_carry_trailing_text() {
        let mut parser = ChunkParser::new();
        let events = feed_all(&mut parser, "{\"response\":\"end.\",\"done\":true}\n");
        assert_eq!(
            events,
            vec![ParsedChunk::Done {
                trailing: Some("end.".to_string())
            }]
        );
    }

    #[test]
    fn crlf_lines_decode_like_lf_lines() {
        let mut parser = ChunkParser::new();
        let events = feed_all(
            &mut parser,
            "{\"response\":\"x\",\"done\":false}\r\n{\"done\":true}\r\n",
        );
        assert_eq!(
            events,
            vec![
                ParsedChunk::Delta("x".to_string()),
                ParsedChunk::Done { trailing: None },
            ]
        );
    }

    #[test]
    fn blank_lines_produce_no_events() {
        let mut parser = ChunkParser::new();
        let events = feed_all(&mut parser, "\n\r\n{\"done\":true}\n");
        assert_eq!(events, vec![ParsedChunk::Done { trailing: None }]);
    }

    #[test]
    fn delta_without_response_field_is_empty_text() {
        let mut parser = ChunkParser::new();
        let events = feed_all(&mut parser, "{\"done\":false}\n");
        assert_eq!(events, vec![ParsedChunk::Delta(String::new())]);
    }

    #[test]
    fn fresh_parser_holds_no_prior_bytes() {
        let mut first = ChunkParser::new();
        first.feed(b"{\"response\":\"left");
        // A new session gets a new parser; the unfinished line is gone.
        let mut second = ChunkParser::new();
        assert_eq!(second.pending(), 0);
        let events = second.feed(b"{\"done\":true}\n");
        assert_eq!(events, vec![ParsedChunk::Done { trailing: None }]);
    }
}
