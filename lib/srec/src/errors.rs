use std::fmt;
use std::io;

/// Any of the errors that can come out of decoding a stream of records.
#[derive(Debug)]
pub enum Error {
    /// The underlying reader failed before a whole line could be fetched.
    Io(io::Error),

    /// A line failed structural validation. Decoding does not try to recover
    /// past one of these: once a length mismatch is seen, address offsets
    /// cannot be trusted anymore.
    Record(MalformedRecord),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "{}", err),
            Error::Record(err) => write!(f, "{}", err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<MalformedRecord> for Error {
    fn from(err: MalformedRecord) -> Self {
        Error::Record(err)
    }
}

/// A record which does not follow the structure mandated by the format: bad
/// marker, unrecognized type digit, a count field that disagrees with the
/// actual length, or a field which is not made of hex digits. The offending
/// record is kept around so callers can report it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRecord {
    pub line: usize,
    pub record: String,
    pub message: String,
}

impl std::error::Error for MalformedRecord {}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} in '{}' (line {})",
            self.message,
            self.record,
            self.line + 1
        )
    }
}

/// Notice about a data record whose trailing checksum does not match the one
/// computed from its contents. This is a warning rather than an error: files
/// produced by sloppy tools are still imported, with the declared payload
/// taken at face value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecksumMismatch {
    pub line: usize,
    pub record: String,

    /// The checksum computed over the record's contents.
    pub expected: u8,

    /// The checksum the record itself declares.
    pub found: u8,
}

impl fmt::Display for ChecksumMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "bad checksum (expecting {:02X}, found {:02X}) in '{}' (line {})",
            self.expected,
            self.found,
            self.record,
            self.line + 1
        )
    }
}
