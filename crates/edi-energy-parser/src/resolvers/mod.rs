//! Group-state resolvers
//!
//! A resolver decides which segment group a segment belongs to, given the
//! group of the previous segment. `None` is the "no group" value used for
//! interchange- and message-level segments.

mod aperak;
mod mscons;

use crate::context::ParsingContext;
use edi_energy_model::{MessageType, SegmentGroup, SegmentType};
use tracing::warn;

/// Segment group rules of one message type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStateResolver {
    Mscons,
    Aperak,
}

impl GroupStateResolver {
    pub fn for_message_type(message_type: MessageType) -> Self {
        match message_type {
            MessageType::Mscons => Self::Mscons,
            MessageType::Aperak => Self::Aperak,
        }
    }

    pub fn message_type(self) -> MessageType {
        match self {
            Self::Mscons => MessageType::Mscons,
            Self::Aperak => MessageType::Aperak,
        }
    }

    /// Group of `segment_type` when the previous segment was in `current`
    pub fn resolve(
        self,
        segment_type: SegmentType,
        current: Option<SegmentGroup>,
        ctx: &ParsingContext,
    ) -> Option<SegmentGroup> {
        match self {
            Self::Mscons => mscons::resolve(segment_type, current, ctx),
            Self::Aperak => aperak::resolve(segment_type, current, ctx),
        }
    }
}

/// Resolver for the message type named in UNH. Unknown types get no
/// resolver and a warning; their segments keep the current group.
pub fn get_resolver(nachrichtentyp: &str) -> Option<GroupStateResolver> {
    match nachrichtentyp.parse::<MessageType>() {
        Ok(message_type) => Some(GroupStateResolver::for_message_type(message_type)),
        Err(e) => {
            warn!(message_type = nachrichtentyp, "{e}, segments stay at interchange level");
            None
        }
    }
}

/// Resolution used when no resolver applies
pub fn pass_through(current: Option<SegmentGroup>) -> Option<SegmentGroup> {
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_message_types() {
        assert_eq!(get_resolver("MSCONS"), Some(GroupStateResolver::Mscons));
        assert_eq!(get_resolver("APERAK"), Some(GroupStateResolver::Aperak));
        assert_eq!(
            GroupStateResolver::for_message_type(MessageType::Aperak).message_type(),
            MessageType::Aperak
        );
    }

    #[test]
    fn test_unknown_message_type_has_no_resolver() {
        assert_eq!(get_resolver("UNKNOWN"), None);
        assert_eq!(get_resolver("mscons"), None);
    }

    #[test]
    fn test_pass_through_keeps_group() {
        assert_eq!(pass_through(Some(SegmentGroup::Sg4)), Some(SegmentGroup::Sg4));
        assert_eq!(pass_through(None), None);
    }
}
