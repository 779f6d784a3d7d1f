// The error type wraps a private kind enum so variants can be added without
// breaking downstream matches. The internal crate reports `&'static str`
// messages; those are wrapped by `Error::internal_adhoc` when they surface
// here (after our own validation they indicate a bug rather than bad input).

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The underlying internal error type
#[non_exhaustive]
#[derive(Clone, Debug)]
enum ErrorKind {
    /// An error in the search configuration (thresholds, period, cell-size
    /// hints, worker count); raised before any grid is built
    Config(ConfigError),
    /// An error raised by a non-finite input coordinate
    Domain(DomainError),
    /// An error raised by a coordinate that falls outside the periodic box
    Geometry(GeometryError),
    /// An error raised by an input array that is not shaped `(3, n)`
    Shape(ShapeError),
    /// A wrapper around the stringly errors of `pairmatrix_internal`
    InternalAdHoc(InternalAdHocError),
}

// define constructor methods for Error
impl Error {
    /// produce an error describing a rejected configuration value
    pub(crate) fn config(what: String) -> Self {
        Error {
            kind: ErrorKind::Config(ConfigError { what }),
        }
    }

    /// produce an error identifying a non-finite coordinate
    pub(crate) fn domain(set: u8, index: usize, axis: char, value: f64) -> Self {
        Error {
            kind: ErrorKind::Domain(DomainError {
                set,
                index,
                axis,
                value,
            }),
        }
    }

    /// produce an error identifying a coordinate outside the periodic box
    pub(crate) fn geometry(set: u8, index: usize, axis: char, value: f64, period: f64) -> Self {
        Error {
            kind: ErrorKind::Geometry(GeometryError {
                set,
                index,
                axis,
                value,
                period,
            }),
        }
    }

    /// produce an error describing a misshapen input array
    pub(crate) fn shape(set: u8, rows: usize, cols: usize) -> Self {
        Error {
            kind: ErrorKind::Shape(ShapeError { set, rows, cols }),
        }
    }

    /// wraps an internal error string
    pub(crate) fn internal_adhoc(message: &'static str) -> Self {
        Error {
            kind: ErrorKind::InternalAdHoc(InternalAdHocError(message)),
        }
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.kind.fmt(f)
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::Config(ref err) => err.fmt(f),
            ErrorKind::Domain(ref err) => err.fmt(f),
            ErrorKind::Geometry(ref err) => err.fmt(f),
            ErrorKind::Shape(ref err) => err.fmt(f),
            ErrorKind::InternalAdHoc(ref err) => err.fmt(f),
        }
    }
}

/// An error in the search configuration
#[derive(Clone, Debug)]
struct ConfigError {
    what: String,
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid configuration: {}", self.what)
    }
}

/// An error raised by a non-finite input coordinate
#[derive(Clone, Debug)]
struct DomainError {
    set: u8,
    index: usize,
    axis: char,
    value: f64,
}

impl std::error::Error for DomainError {}

impl core::fmt::Display for DomainError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "point {} of set {} has non-finite {}-coordinate {}",
            self.index, self.set, self.axis, self.value
        )
    }
}

/// An error raised by a coordinate that falls outside the periodic box
#[derive(Clone, Debug)]
struct GeometryError {
    set: u8,
    index: usize,
    axis: char,
    value: f64,
    period: f64,
}

impl std::error::Error for GeometryError {}

impl core::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "point {} of set {} has {}-coordinate {} outside the periodic \
             range [0, {})",
            self.index, self.set, self.axis, self.value, self.period
        )
    }
}

/// An error raised by an input array that is not shaped `(3, n)`
#[derive(Clone, Debug)]
struct ShapeError {
    set: u8,
    rows: usize,
    cols: usize,
}

impl std::error::Error for ShapeError {}

impl core::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "point set {} has shape ({}, {}); expected 3 rows (x, y, z)",
            self.set, self.rows, self.cols
        )
    }
}

/// A wrapper around the string errors of `pairmatrix_internal`
#[derive(Clone)]
struct InternalAdHocError(&'static str);

impl std::error::Error for InternalAdHocError {}

impl core::fmt::Display for InternalAdHocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::fmt::Debug for InternalAdHocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.0, f)
    }
}
