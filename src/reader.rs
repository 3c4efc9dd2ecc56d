//! A feature file reader.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::{self};
use std::iter;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::parser;
use crate::parser::Parser;

/// The new line character.
const NEW_LINE: char = '\n';

/// The carriage return character.
const CARRIAGE_RETURN: char = '\r';

/// The file extension that marks gzip-compressed input.
const GZIP_EXTENSION: &str = "gz";

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A parse error.
    Parse(parser::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Parse(err) => write!(f, "parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A feature file reader: a thin adapter that turns any [`BufRead`] into
/// the stream of stripped lines a [`Parser`] consumes.
#[derive(Debug)]
pub struct Reader<T>(T)
where
    T: BufRead;

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a feature file reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"##gff-version 3\nchr1\t.\texon\t1\t2\t.\t+\t.\tID=x";
    /// let reader = featurefile::Reader::new(&data[..]);
    /// ```
    pub fn new(inner: T) -> Self {
        Self::from(inner)
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Gets a mutable reference to the inner reader.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.0
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Reads a raw, textual line from the underlying reader, stripping
    /// the trailing newline (and carriage return, if present).
    ///
    /// Returns the number of bytes consumed: zero signals end of input.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    ///
    /// let data = b"##gff-version 3\nchr1";
    /// let mut reader = featurefile::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 16);
    /// assert_eq!(buffer, "##gff-version 3");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 4);
    /// assert_eq!(buffer, "chr1");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 0);
    ///
    /// # Ok::<(), io::Error>(())
    /// ```
    pub fn read_line_raw(&mut self, buffer: &mut String) -> io::Result<usize> {
        read_line(self.inner_mut(), buffer)
    }

    /// Returns an iterator over the stripped lines in the underlying
    /// reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"##gff-version 3\nchr1\t.\texon\t1\t2\t.\t+\t.\tID=x";
    /// let mut reader = featurefile::Reader::new(&data[..]);
    ///
    /// let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(lines.len(), 2);
    ///
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn lines(&mut self) -> impl Iterator<Item = io::Result<String>> + '_ {
        let mut buffer = String::new();

        iter::from_fn(move || match self.read_line_raw(&mut buffer) {
            Ok(0) => None,
            Ok(_) => Some(Ok(buffer.clone())),
            Err(e) => Some(Err(e)),
        })
    }

    /// Drives a [`Parser`] over every remaining line and signals end of
    /// input, returning the number of lines fed.
    ///
    /// Recoverable problems stay recorded inside the parser; only a
    /// halted parse (or an I/O failure) surfaces here.
    ///
    /// # Examples
    ///
    /// ```
    /// use featurefile::feature::Block;
    /// use featurefile::parser::Parser;
    ///
    /// let data = b"##gff-version 3\n\
    /// ##sequence-region chr1 1 1000\n\
    /// chr1\thavana\texon\t10\t20\t.\t+\t.\tID=exon1\n";
    ///
    /// let mut reader = featurefile::Reader::new(&data[..]);
    /// let mut parser = Parser::builder().build();
    ///
    /// assert_eq!(reader.feed(&mut parser)?, 3);
    ///
    /// let mut block = Block::new("chr1");
    /// assert_eq!(parser.take_features(&mut block)?, 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn feed(&mut self, parser: &mut Parser) -> Result<usize, Error> {
        let mut buffer = String::new();
        let mut fed = 0;

        loop {
            let read = self.read_line_raw(&mut buffer).map_err(Error::Io)?;

            if read == 0 {
                parser.finish().map_err(Error::Parse)?;
                return Ok(fed);
            }

            parser.parse_line(&buffer).map_err(Error::Parse)?;
            fed += 1;
        }
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self(inner)
    }
}

/// Opens a feature file from a path, decoding gzip transparently for
/// `.gz` paths.
///
/// # Examples
///
/// ```no_run
/// let mut reader = featurefile::reader::open("annotations.gff3.gz")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn open<P>(path: P) -> io::Result<Reader<Box<dyn BufRead>>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)?;

    let inner: Box<dyn BufRead> = match path.extension() {
        Some(extension) if extension == GZIP_EXTENSION => {
            Box::new(BufReader::new(GzDecoder::new(file)))
        }
        _ => Box::new(BufReader::new(file)),
    };

    Ok(Reader::new(inner))
}

/// Reads a line from a buffered reader into `buffer`, stripping the
/// line terminator but reporting the full number of bytes consumed.
fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    match reader.read_line(buffer) {
        Ok(0) => Ok(0),
        Ok(n) => {
            if buffer.ends_with(NEW_LINE) {
                buffer.pop();

                if buffer.ends_with(CARRIAGE_RETURN) {
                    buffer.pop();
                }
            }

            Ok(n)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::feature::Block;

    #[test]
    fn test_read_line() {
        let data = b"hello\r\nworld!";
        let mut cursor = io::Cursor::new(data);

        let mut buffer = String::new();
        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "hello");
        assert_eq!(len, 7);

        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "world!");
        assert_eq!(len, 6);
    }

    #[test]
    fn test_feed() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"##gff-version 3\n\
            ##sequence-region chr1 1 1000\n\
            chr1\thavana\texon\t10\t20\t.\t+\t.\tID=exon1\n\
            chr1\thavana\texon\t30\t40\t.\t+\t.\tID=exon2\n";

        let mut reader = Reader::new(&data[..]);
        let mut parser = Parser::builder().build();

        assert_eq!(reader.feed(&mut parser)?, 4);
        assert!(parser.terminated());

        let mut block = Block::new("chr1");
        assert_eq!(parser.take_features(&mut block)?, 2);

        Ok(())
    }

    #[test]
    fn test_feed_propagates_halts() {
        let data = b"chr1\thavana\texon\t10\t20\t.\t+\t.\tID=exon1\n";

        let mut reader = Reader::new(&data[..]);
        let mut parser = Parser::builder().stop_on_error(true).build();

        let err = reader.feed(&mut parser).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_lines_handles_missing_trailing_newline() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"# one\n# two";
        let mut reader = Reader::new(&data[..]);

        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(lines, vec!["# one".to_string(), "# two".to_string()]);

        Ok(())
    }
}
