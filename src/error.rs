use core::fmt;

/// Errors returned while encoding or decoding wire data, or by the transceiver.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A length field or a segment identifier held a value this stack does not recognize.
    ///
    /// This indicates a protocol violation; the frame that produced it must be discarded.
    InvalidValue,

    /// Unexpectedly reached the end of a buffer while reading or writing.
    ///
    /// Returned when the caller tries to fit too much data into a fixed-size buffer, and also
    /// when decoding runs past the end of the received bytes.
    Eof,

    /// Parsing didn't consume the entire buffer.
    IncompleteParse,

    /// The underlying transceiver reported a hardware failure on transmit or receive.
    Hardware,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::InvalidValue => "invalid value for field",
            Error::Eof => "end of buffer",
            Error::IncompleteParse => "excess data in buffer",
            Error::Hardware => "transceiver hardware error",
        })
    }
}

/// Outcome of a blocking receive operation.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecvError {
    /// No segment arrived within the caller's timeout.
    Timeout,
    /// The transceiver or decoder reported an unrecoverable error.
    Link(Error),
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecvError::Timeout => f.write_str("receive timed out"),
            RecvError::Link(e) => write!(f, "{}", e),
        }
    }
}

impl From<Error> for RecvError {
    fn from(e: Error) -> Self {
        RecvError::Link(e)
    }
}

/// Outcome of a message transmission.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TxError {
    /// A segment went unacknowledged for `ATTEMPT_LIMIT` attempts in a row.
    ReachedAttemptLimit,
    /// The transceiver or decoder reported an unrecoverable error.
    Link(Error),
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxError::ReachedAttemptLimit => f.write_str("reached retry attempt limit"),
            TxError::Link(e) => write!(f, "{}", e),
        }
    }
}

impl From<Error> for TxError {
    fn from(e: Error) -> Self {
        TxError::Link(e)
    }
}
