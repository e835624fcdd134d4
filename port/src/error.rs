use core::fmt::{Display, Formatter};

/// Invalid geometry, pin or bus setup. Fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    EmptyGeometry,
    UnsupportedPixelFormat(u8),
    UnsupportedBusWidth(u8),
    ZeroClock,
    ZeroPeriod,
    StripHeight { strip_height: u16, panel_height: u16 },
    TransferTooLarge { required: usize, max: usize },
    PinConflict(u8),
    SharedChipSelect(u8),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::EmptyGeometry => write!(f, "panel geometry has a zero dimension"),
            ConfigError::UnsupportedPixelFormat(bits) => {
                write!(f, "{bits} bits per pixel is not supported")
            }
            ConfigError::UnsupportedBusWidth(bits) => {
                write!(f, "{bits} bit commands/parameters are not supported")
            }
            ConfigError::ZeroClock => write!(f, "bus clock must be non-zero"),
            ConfigError::ZeroPeriod => write!(f, "cycle period must be non-zero"),
            ConfigError::StripHeight {
                strip_height,
                panel_height,
            } => write!(
                f,
                "strip height {strip_height} does not fit a panel of height {panel_height}"
            ),
            ConfigError::TransferTooLarge { required, max } => write!(
                f,
                "frame buffer needs {required} bytes, transport allows {max}"
            ),
            ConfigError::PinConflict(pin) => write!(f, "GPIO{pin} is assigned twice"),
            ConfigError::SharedChipSelect(pin) => {
                write!(f, "touch and LCD share chip-select GPIO{pin}")
            }
        }
    }
}

/// Unexpected device response during the init handshake. Fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    UnexpectedId { register: u8, value: u8 },
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ProtocolError::UnexpectedId { register, value } => write!(
                f,
                "unexpected device id 0x{value:02X} in register 0x{register:02X}"
            ),
        }
    }
}

/// Error of a port or binding operation, `E` is the transport's bus error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    Configuration(ConfigError),
    Transport(E),
    Protocol(ProtocolError),
}

impl<E> Error<E> {
    /// Startup can not continue after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Transport(_))
    }

    pub fn map_transport<F, T>(self, f: F) -> Error<T>
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Error::Configuration(e) => Error::Configuration(e),
            Error::Transport(e) => Error::Transport(f(e)),
            Error::Protocol(e) => Error::Protocol(e),
        }
    }
}

impl<E> From<ConfigError> for Error<E> {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(error)
    }
}

impl<E> From<ProtocolError> for Error<E> {
    fn from(error: ProtocolError) -> Self {
        Self::Protocol(error)
    }
}

impl<E: core::fmt::Debug> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Configuration(e) => write!(f, "configuration error: {e}"),
            Error::Transport(e) => write!(f, "transport error: {e:?}"),
            Error::Protocol(e) => write!(f, "protocol error: {e}"),
        }
    }
}
