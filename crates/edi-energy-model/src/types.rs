//! Identifiers shared by the model and the parser: segment kinds, message
//! types and segment groups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Segment kinds known to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentType {
    /// Service string advice
    Una,
    /// Interchange header
    Unb,
    /// Message header
    Unh,
    /// Beginning of message
    Bgm,
    /// Date/time/period
    Dtm,
    /// Name and address
    Nad,
    /// Reference
    Rff,
    /// Contact information
    Cta,
    /// Communication contact
    Com,
    /// Place/location identification
    Loc,
    /// Line item
    Lin,
    /// Additional product id
    Pia,
    /// Quantity
    Qty,
    /// Status
    Sts,
    /// Characteristic/class id
    Cci,
    /// Section control
    Uns,
    /// Application error information
    Erc,
    /// Free text
    Ftx,
    /// Message trailer
    Unt,
    /// Interchange trailer
    Unz,
}

impl SegmentType {
    /// All segment kinds, in no particular order
    pub const ALL: [SegmentType; 20] = [
        SegmentType::Una,
        SegmentType::Unb,
        SegmentType::Unh,
        SegmentType::Bgm,
        SegmentType::Dtm,
        SegmentType::Nad,
        SegmentType::Rff,
        SegmentType::Cta,
        SegmentType::Com,
        SegmentType::Loc,
        SegmentType::Lin,
        SegmentType::Pia,
        SegmentType::Qty,
        SegmentType::Sts,
        SegmentType::Cci,
        SegmentType::Uns,
        SegmentType::Erc,
        SegmentType::Ftx,
        SegmentType::Unt,
        SegmentType::Unz,
    ];

    /// Look up a segment kind by its three-letter tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// The three-letter tag as it appears on the wire
    pub fn tag(self) -> &'static str {
        match self {
            SegmentType::Una => "UNA",
            SegmentType::Unb => "UNB",
            SegmentType::Unh => "UNH",
            SegmentType::Bgm => "BGM",
            SegmentType::Dtm => "DTM",
            SegmentType::Nad => "NAD",
            SegmentType::Rff => "RFF",
            SegmentType::Cta => "CTA",
            SegmentType::Com => "COM",
            SegmentType::Loc => "LOC",
            SegmentType::Lin => "LIN",
            SegmentType::Pia => "PIA",
            SegmentType::Qty => "QTY",
            SegmentType::Sts => "STS",
            SegmentType::Cci => "CCI",
            SegmentType::Uns => "UNS",
            SegmentType::Erc => "ERC",
            SegmentType::Ftx => "FTX",
            SegmentType::Unt => "UNT",
            SegmentType::Unz => "UNZ",
        }
    }

    /// Segments that never belong to a segment group
    pub fn is_interchange_level(self) -> bool {
        matches!(
            self,
            SegmentType::Una
                | SegmentType::Unb
                | SegmentType::Unh
                | SegmentType::Bgm
                | SegmentType::Unt
                | SegmentType::Unz
        )
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Message types the parser has group rules for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    /// Metered services consumption report
    Mscons,
    /// Application error and acknowledgement
    Aperak,
}

impl MessageType {
    /// Identifier as carried in UNH
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Mscons => "MSCONS",
            MessageType::Aperak => "APERAK",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a UNH advertises a message type without group rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessageType(pub String);

impl fmt::Display for UnknownMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown message type '{}'", self.0)
    }
}

impl std::error::Error for UnknownMessageType {}

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MSCONS" => Ok(MessageType::Mscons),
            "APERAK" => Ok(MessageType::Aperak),
            other => Err(UnknownMessageType(other.to_string())),
        }
    }
}

/// Segment group numbers as defined by the message implementation guides.
///
/// The meaning of a number depends on the message type; absence of a
/// group (`None` at use sites) marks interchange- and message-level
/// segments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SegmentGroup {
    Sg1,
    Sg2,
    Sg3,
    Sg4,
    Sg5,
    Sg6,
    Sg7,
    Sg8,
    Sg9,
    Sg10,
    Sg11,
    Sg12,
}

impl SegmentGroup {
    /// Group number, 1-based
    pub fn number(self) -> u8 {
        match self {
            SegmentGroup::Sg1 => 1,
            SegmentGroup::Sg2 => 2,
            SegmentGroup::Sg3 => 3,
            SegmentGroup::Sg4 => 4,
            SegmentGroup::Sg5 => 5,
            SegmentGroup::Sg6 => 6,
            SegmentGroup::Sg7 => 7,
            SegmentGroup::Sg8 => 8,
            SegmentGroup::Sg9 => 9,
            SegmentGroup::Sg10 => 10,
            SegmentGroup::Sg11 => 11,
            SegmentGroup::Sg12 => 12,
        }
    }
}

impl fmt::Display for SegmentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SG{}", self.number())
    }
}
