#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # edi-energy-parser
//!
//! Parser for MSCONS and APERAK interchanges of the German energy market.
//!
//! The parser discovers the service characters, splits the payload into
//! segments, converts every segment into a typed record and attaches it to
//! the segment group it belongs to. The result is an
//! [`Interchange`](edi_energy_model::Interchange) tree.
//!
//! ## Example Usage
//!
//! ```rust
//! let text = "UNA:+.? '\
//! UNB+UNOC:3+9900259000002:500+9900357000004:500+200426:1151+ABC4711'\
//! UNH+1+APERAK:D:07B:UN:2.1e'\
//! BGM+313+MSI5422'\
//! ERC+Z10'\
//! UNT+4+1'\
//! UNZ+1+ABC4711'";
//!
//! let interchange = edi_energy_parser::parse(text, None).unwrap();
//! assert_eq!(interchange.nachrichten.len(), 1);
//! ```

pub mod config;
pub mod context;
pub mod converters;
pub mod handlers;
pub mod parser;
pub mod resolvers;
pub mod syntax;

pub use config::{ConversionErrorPolicy, ParserConfig};
pub use context::{InterchangeState, ParsingContext};
pub use converters::{ConversionContext, ConverterFactory, SegmentConverter};
pub use handlers::{HandlerFactory, SegmentHandler};
pub use parser::EdifactParser;
pub use resolvers::{GroupStateResolver, get_resolver};
pub use syntax::Separators;

use edi_energy_model::{Interchange, MessageType, SegmentType};
use thiserror::Error;

/// Errors that can occur when parsing an interchange
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed framing: missing terminator, dangling release character,
    /// empty input
    #[error("Syntax error at line {line_number}: {message}")]
    Syntax {
        line_number: usize,
        message: String,
        value: Option<String>,
    },

    /// A component is missing, not numeric where it must be, or carries
    /// an unknown code
    #[error("Conversion error in {segment_type} segment at line {line_number}: {message}")]
    FieldConversion {
        line_number: usize,
        segment_type: SegmentType,
        /// Message type the segment was converted for, if already known
        message_type: Option<MessageType>,
        message: String,
        value: Option<String>,
    },

    /// A segment appears where the interchange structure does not allow it
    #[error("Structural error at line {line_number}: {message}")]
    Structural {
        line_number: usize,
        segment_type: Option<SegmentType>,
        message: String,
        value: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    FieldConversion,
    Structural,
    Config,
}

impl Error {
    /// Build a syntax error at the given line
    pub fn syntax(line_number: usize, message: impl Into<String>, value: Option<String>) -> Self {
        Self::Syntax {
            line_number,
            message: message.into(),
            value,
        }
    }

    /// Build a structural error for a segment at the given line
    pub fn structural(
        line_number: usize,
        segment_type: Option<SegmentType>,
        message: impl Into<String>,
    ) -> Self {
        Self::Structural {
            line_number,
            segment_type,
            message: message.into(),
            value: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::FieldConversion { .. } => ErrorKind::FieldConversion,
            Self::Structural { .. } => ErrorKind::Structural,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// 1-based segment line, 0 for configuration errors
    pub fn line_number(&self) -> usize {
        match self {
            Self::Syntax { line_number, .. }
            | Self::FieldConversion { line_number, .. }
            | Self::Structural { line_number, .. } => *line_number,
            Self::Config(_) => 0,
        }
    }

    pub fn segment_type(&self) -> Option<SegmentType> {
        match self {
            Self::FieldConversion { segment_type, .. } => Some(*segment_type),
            Self::Structural { segment_type, .. } => *segment_type,
            Self::Syntax { .. } | Self::Config(_) => None,
        }
    }

    /// The offending token, if one could be isolated
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Syntax { value, .. }
            | Self::FieldConversion { value, .. }
            | Self::Structural { value, .. } => value.as_deref(),
            Self::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parse `text` with the default configuration, stopping after
/// `max_lines_to_parse` segments when a limit is given.
pub fn parse(text: &str, max_lines_to_parse: Option<usize>) -> Result<Interchange> {
    EdifactParser::new().parse_with_limit(text, max_lines_to_parse)
}
