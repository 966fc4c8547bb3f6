#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # edi-energy-model
//!
//! Typed segment records and message trees for MSCONS and APERAK
//! interchanges as exchanged in the German energy market.
//!
//! The tree is rooted at [`Interchange`], which owns its messages; each
//! message owns its segment group instances, and each group instance owns
//! its segments and nested groups.

/// MSCONS message tree and segment groups.
pub mod mscons;
/// APERAK message tree and segment groups.
pub mod aperak;
/// Interchange root, message enum and envelope validation.
pub mod interchange;
/// Segment records and composite sub-records.
pub mod segments;
/// Segment, message type and segment group identifiers.
pub mod types;

pub use aperak::{AperakNachricht, AperakSg1, AperakSg2, AperakSg3, AperakSg4, AperakSg5};
pub use interchange::{
    EdifactMessage, Interchange, UnbekannteNachricht, validate_interchange, validate_message,
};
pub use mscons::{
    MsconsNachricht, MsconsSg1, MsconsSg10, MsconsSg2, MsconsSg3, MsconsSg5, MsconsSg6,
    MsconsSg7, MsconsSg8, MsconsSg9,
};
pub use segments::*;
pub use types::{MessageType, SegmentGroup, SegmentType, UnknownMessageType};

use thiserror::Error;

/// Errors raised when checking a parsed interchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Envelope error: {0}")]
    Envelope(String),
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
