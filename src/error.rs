use thiserror::Error;

/// Errors raised by the driver, generic over the transport's own error type `E`.
///
/// Transport failures carry the register address they happened on, where there is one.
///
/// The transport error is kept in a `cause` field and is not reported through
/// [`std::error::Error::source`].  Transports only have to give a `Debug` error, and
/// `embedded-hal` bus errors usually implement nothing more, so the message formats the cause
/// with `{:?}` instead.  Use [`Error::cause`] to get at it.
#[derive(Error, Debug)]
pub enum Error<E> {
    /// Device index outside `0..=7`.  Detected before any I/O.
    #[error("device index {0} out of range (0..=7)")]
    InvalidAddress(u8),

    /// Pin number outside `0..=15`.  Detected before any I/O.
    #[error("pin {0} out of range (0..=15)")]
    InvalidPin(u8),

    /// The transport could not be opened.  Nothing is retained.
    #[error("failed to open transport to 0x{address:02x} on bus {bus}: {cause:?}")]
    TransportOpen { address: u8, bus: u8, cause: E },

    /// Resetting the registers right after opening failed.  The transport has been closed.
    #[error("failed to initialise device 0x{address:02x} at register 0x{register:02x}: {cause:?}")]
    DeviceInit { address: u8, register: u8, cause: E },

    /// A register read or write failed.
    #[error("transport error at register 0x{register:02x}: {cause:?}")]
    Transport { register: u8, cause: E },

    /// Closing the transport reported an error.  The transport is released regardless.
    #[error("failed to close transport: {cause:?}")]
    Close { cause: E },

    /// No interrupt flag is set on either port.
    #[error("no interrupt pending")]
    NoInterruptPending,
}

impl<E> Error<E> {
    /// Register address the failure happened on, if any.
    pub fn register(&self) -> Option<u8> {
        match self {
            Error::DeviceInit { register, .. } | Error::Transport { register, .. } => {
                Some(*register)
            }
            _ => None,
        }
    }

    /// Error reported by the transport, if the failure came from it.
    pub fn cause(&self) -> Option<&E> {
        match self {
            Error::TransportOpen { cause, .. }
            | Error::DeviceInit { cause, .. }
            | Error::Transport { cause, .. }
            | Error::Close { cause } => Some(cause),
            _ => None,
        }
    }
}

impl<E: core::fmt::Debug> embedded_hal::digital::Error for Error<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
