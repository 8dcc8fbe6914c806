//! `.po` stream reading and parsing
//!
//! [`PoReader`] is fed raw bytes in arbitrary chunks, splits them into
//! lines and drives a four-state machine over the directives it sees.
//! Finished entries are flushed into the catalog being built.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::unquote::{is_quoted, unquote};
use super::{Catalog, Metadata};
use crate::error::{Error, Result};

/// Chunk size used when pumping a byte source through the reader.
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// What the reader is currently accumulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReaderState {
    /// Between entries.
    #[default]
    Init,
    /// After `msgctxt`, continuation lines extend the context.
    ReadingContext,
    /// After `msgid`, continuation lines extend the message id.
    ReadingId,
    /// After `msgstr`, continuation lines extend the translation.
    ReadingValue,
}

#[derive(Debug, Clone, Copy)]
enum Directive {
    Context,
    Id,
    Value,
}

const DIRECTIVES: [(&str, Directive); 3] = [
    ("msgctxt", Directive::Context),
    ("msgid", Directive::Id),
    ("msgstr", Directive::Value),
];

/// Incremental `.po` parser.
///
/// In strict mode malformed lines and repeated message ids are errors; in
/// lenient mode (the default) malformed lines are skipped and later
/// duplicates overwrite earlier ones.
///
/// # Example
///
/// ```
/// use pocatalog::formats::po::PoReader;
///
/// let mut reader = PoReader::strict();
/// reader.feed(b"msgid \"Hello\"\nmsg")?;
/// reader.feed(b"str \"Bonjour\"\n")?;
/// let catalog = reader.finish()?;
/// assert_eq!(catalog.get("Hello"), Some("Bonjour"));
/// # Ok::<(), pocatalog::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct PoReader {
    strict: bool,
    catalog: Catalog,
    raw_header: Option<String>,
    /// Bytes of the current, not yet terminated line
    pending: Vec<u8>,
    context: String,
    key: String,
    value: String,
    with_context: bool,
    state: ReaderState,
    /// Lines processed so far
    line: usize,
    /// Line on which the in-flight entry started
    entry_line: usize,
    /// A directive of the in-flight entry has been seen
    in_entry: bool,
}

impl PoReader {
    /// Create a lenient reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a strict reader.
    #[must_use]
    pub fn strict() -> Self {
        Self::new().with_strict(true)
    }

    /// Set strict mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Current state of the line state machine.
    #[must_use]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Number of complete lines processed so far.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Whether an entry is partially read and not yet flushed.
    #[must_use]
    pub fn has_pending_entry(&self) -> bool {
        !(self.context.is_empty() && self.key.is_empty() && self.value.is_empty())
    }

    /// Feed a chunk of input.
    ///
    /// Chunks may split lines (and UTF-8 sequences) anywhere; incomplete
    /// lines are buffered until their newline arrives or [`decode`] is called.
    ///
    /// Returns the number of bytes consumed, which is always `data.len()`
    /// on success.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`Error::Syntax`] or [`Error::DuplicateKey`]
    /// for the first offending line in the chunk.
    ///
    /// [`decode`]: PoReader::decode
    pub fn feed(&mut self, data: &[u8]) -> Result<usize> {
        let mut rest = data;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.pending.extend_from_slice(&rest[..pos]);
            rest = &rest[pos + 1..];
            self.process_pending()?;
        }
        self.pending.extend_from_slice(rest);
        Ok(data.len())
    }

    /// Pump a byte source through [`feed`](PoReader::feed) until EOF.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if reading fails, or any error from `feed`.
    pub fn read_from<R: Read>(&mut self, mut source: R) -> Result<u64> {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => return Ok(total),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.feed(&buf[..n])?;
            total += n as u64;
        }
    }

    /// Finish the stream and move the parsed catalog into `target`.
    ///
    /// Processes an unterminated last line, flushes the in-flight entry and
    /// builds the metadata from the header block. The reader is left empty
    /// and can be fed again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NilTarget`] if `target` is `None`, or a strict-mode
    /// parse error raised by the final line or flush.
    pub fn decode(&mut self, target: Option<&mut Catalog>) -> Result<()> {
        let target = target.ok_or(Error::NilTarget)?;
        if !self.pending.is_empty() {
            self.process_pending()?;
        }
        if self.has_open_entry() {
            self.flush_entry()?;
        }
        self.reset_entry();

        let mut catalog = std::mem::take(&mut self.catalog);
        if let Some(raw) = self.raw_header.take() {
            catalog.metadata = Metadata::from_header(&raw);
        }
        *target = catalog;
        Ok(())
    }

    /// Finish the stream and return the parsed catalog.
    ///
    /// # Errors
    ///
    /// Same as [`decode`](PoReader::decode).
    pub fn finish(mut self) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        self.decode(Some(&mut catalog))?;
        Ok(catalog)
    }

    fn process_pending(&mut self) -> Result<()> {
        let raw = std::mem::take(&mut self.pending);
        self.line += 1;
        let text = String::from_utf8_lossy(&raw);
        self.read_line(text.trim())
    }

    fn read_line(&mut self, line: &str) -> Result<()> {
        if line.is_empty() {
            if self.state == ReaderState::ReadingValue && !self.value.is_empty() {
                return self.flush_entry();
            }
            self.state = ReaderState::Init;
            return Ok(());
        }

        if line.starts_with('#') {
            return Ok(());
        }

        if line.starts_with('"') {
            if self.state == ReaderState::Init {
                return self.reject();
            }
            return self.append_payload(line);
        }

        let Some((directive, payload)) = split_directive(line) else {
            return self.reject();
        };

        match directive {
            Directive::Context => {
                self.close_entry()?;
                self.begin_entry();
                self.with_context = true;
                self.state = ReaderState::ReadingContext;
            }
            Directive::Id => {
                self.close_entry()?;
                self.begin_entry();
                self.state = ReaderState::ReadingId;
            }
            Directive::Value => {
                self.begin_entry();
                self.state = ReaderState::ReadingValue;
            }
        }
        self.append_payload(payload)
    }

    /// An id or a translation has been read for the in-flight entry.
    ///
    /// A context alone does not count: `msgid` after `msgctxt` continues
    /// the same entry, also across a blank line.
    fn has_open_entry(&self) -> bool {
        !(self.key.is_empty() && self.value.is_empty())
    }

    /// A new `msgctxt`/`msgid` ends the entry before it, translated or not.
    fn close_entry(&mut self) -> Result<()> {
        if self.has_open_entry() {
            return self.flush_entry();
        }
        if !self.has_pending_entry() {
            // only rejected directives so far
            self.in_entry = false;
        }
        Ok(())
    }

    fn begin_entry(&mut self) {
        if !self.in_entry {
            self.entry_line = self.line;
            self.in_entry = true;
        }
    }

    fn append_payload(&mut self, token: &str) -> Result<()> {
        if !is_quoted(token) {
            return self.reject();
        }
        let decoded = match unquote(token) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::trace!("Undecodable string on line {}: {}", self.line, e);
                return self.reject();
            }
        };
        match self.state {
            ReaderState::ReadingContext => self.context.push_str(&decoded),
            ReaderState::ReadingId => self.key.push_str(&decoded),
            ReaderState::ReadingValue => self.value.push_str(&decoded),
            ReaderState::Init => {}
        }
        Ok(())
    }

    fn reject(&self) -> Result<()> {
        if self.strict {
            Err(Error::Syntax { line: self.line })
        } else {
            Ok(())
        }
    }

    fn reset_entry(&mut self) {
        self.context.clear();
        self.key.clear();
        self.value.clear();
        self.with_context = false;
        self.in_entry = false;
        self.state = ReaderState::Init;
    }

    fn flush_entry(&mut self) -> Result<()> {
        let context = std::mem::take(&mut self.context);
        let key = std::mem::take(&mut self.key);
        let value = std::mem::take(&mut self.value);
        let with_context = std::mem::replace(&mut self.with_context, false);
        self.in_entry = false;
        self.state = ReaderState::Init;

        if with_context {
            let scope = self.catalog.context.entry(context).or_default();
            if scope.contains_key(&key) {
                if self.strict {
                    return Err(Error::DuplicateKey { key, line: self.entry_line });
                }
                tracing::trace!("Overwriting duplicate context entry '{}' (line {})", key, self.entry_line);
            }
            scope.insert(key, value);
        } else if key.is_empty() {
            if self.raw_header.is_some() {
                if self.strict {
                    return Err(Error::DuplicateKey { key, line: self.entry_line });
                }
                tracing::trace!("Overwriting duplicate header (line {})", self.entry_line);
            }
            self.raw_header = Some(value);
        } else {
            if self.catalog.entries.contains_key(&key) {
                if self.strict {
                    return Err(Error::DuplicateKey { key, line: self.entry_line });
                }
                tracing::trace!("Overwriting duplicate entry '{}' (line {})", key, self.entry_line);
            }
            self.catalog.entries.insert(key, value);
        }
        Ok(())
    }
}

/// Split `msgid "..."` into the directive and its payload.
///
/// A keyword only matches when whitespace follows it, so `msgid_plural`
/// and `msgstr[0]` are not recognized.
fn split_directive(line: &str) -> Option<(Directive, &str)> {
    DIRECTIVES.iter().find_map(|&(keyword, directive)| {
        line.strip_prefix(keyword)
            .filter(|rest| rest.starts_with(char::is_whitespace))
            .map(|rest| (directive, rest.trim_start()))
    })
}

/// Parse `.po` data from bytes
///
/// # Errors
///
/// In strict mode, returns [`Error::Syntax`] or [`Error::DuplicateKey`].
/// Lenient parsing never fails.
pub fn parse_bytes(data: &[u8], strict: bool) -> Result<Catalog> {
    let mut reader = PoReader::new().with_strict(strict);
    reader.feed(data)?;
    reader.finish()
}

/// Parse `.po` data from a string
///
/// # Errors
///
/// Same as [`parse_bytes`].
pub fn parse_str(text: &str, strict: bool) -> Result<Catalog> {
    parse_bytes(text.as_bytes(), strict)
}

/// Parse `.po` data from any byte source
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, plus the errors of [`parse_bytes`].
pub fn parse_reader<R: Read>(source: R, strict: bool) -> Result<Catalog> {
    let mut reader = PoReader::new().with_strict(strict);
    reader.read_from(source)?;
    reader.finish()
}

/// Read a `.po` file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, plus the
/// errors of [`parse_bytes`].
pub fn read_po<P: AsRef<Path>>(path: P, strict: bool) -> Result<Catalog> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_bytes(&buffer, strict)
}

/// Leniently parse `data` into `target`
///
/// # Errors
///
/// Returns [`Error::NilTarget`] if `target` is `None`.
pub fn unmarshal(data: &[u8], target: Option<&mut Catalog>) -> Result<()> {
    let mut reader = PoReader::new();
    reader.feed(data)?;
    reader.decode(target)
}
