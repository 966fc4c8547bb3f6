//! Per-parse mutable state
//!
//! The context owns the interchange under construction. Open messages and
//! open segment group instances are tracked as indices into their parent
//! collections; an index is cleared when its message or parent group is
//! closed, so later segments can never reach a closed instance.

use crate::syntax::Separators;
use edi_energy_model::{
    AperakNachricht, AperakSg1, AperakSg2, AperakSg3, AperakSg4, AperakSg5, EdifactMessage,
    Interchange, MessageType, MsconsNachricht, MsconsSg1, MsconsSg10, MsconsSg2, MsconsSg3,
    MsconsSg5, MsconsSg6, MsconsSg7, MsconsSg8, MsconsSg9, SegmentGroup, SegmentType,
};

/// Position in the interchange/message nesting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterchangeState {
    BeforeInterchange,
    InterchangeOpen,
    MessageOpen,
    InterchangeClosed,
}

impl InterchangeState {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Self::BeforeInterchange => "before the interchange header",
            Self::InterchangeOpen => "outside of a message",
            Self::MessageOpen => "inside a message",
            Self::InterchangeClosed => "after the interchange trailer",
        }
    }
}

/// Open MSCONS group instances, as indices into the parent collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MsconsCursor {
    pub sg1: Option<usize>,
    pub sg2: Option<usize>,
    pub sg3: Option<usize>,
    pub sg5: Option<usize>,
    pub sg6: Option<usize>,
    pub sg7: Option<usize>,
    pub sg8: Option<usize>,
    pub sg9: Option<usize>,
    pub sg10: Option<usize>,
}

/// Open APERAK group instances, as indices into the parent collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AperakCursor {
    pub sg1: Option<usize>,
    pub sg2: Option<usize>,
    pub sg3: Option<usize>,
    pub sg4: Option<usize>,
    pub sg5: Option<usize>,
}

/// Group pointers of the message type being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCursor {
    /// No message open, or a message without group rules
    Initial,
    Mscons(MsconsCursor),
    Aperak(AperakCursor),
}

/// State of one parse call
#[derive(Debug, Clone)]
pub struct ParsingContext {
    /// Interchange being built
    pub interchange: Interchange,
    /// Service characters of this interchange
    pub separators: Separators,
    /// Type of the open message; `None` before UNH and for unknown types
    pub message_type: Option<MessageType>,
    /// Index of the open message in `interchange.nachrichten`
    pub current_message: Option<usize>,
    pub current_segment_group: Option<SegmentGroup>,
    pub last_segment_type: Option<SegmentType>,
    pub state: InterchangeState,
    cursor: GroupCursor,
    segments_in_message: usize,
}

impl ParsingContext {
    /// Context used before the first UNH
    pub fn new(separators: Separators) -> Self {
        Self {
            interchange: Interchange::new(),
            separators,
            message_type: None,
            current_message: None,
            current_segment_group: None,
            last_segment_type: None,
            state: InterchangeState::BeforeInterchange,
            cursor: GroupCursor::Initial,
            segments_in_message: 0,
        }
    }

    /// Append `message` to the interchange and make it the open message.
    /// The group pointers switch to the message's type.
    pub fn begin_message(&mut self, mut message: EdifactMessage) {
        self.message_type = message.message_type();
        self.cursor = match self.message_type {
            Some(MessageType::Mscons) => GroupCursor::Mscons(MsconsCursor::default()),
            Some(MessageType::Aperak) => GroupCursor::Aperak(AperakCursor::default()),
            None => GroupCursor::Initial,
        };
        message.set_gezaehlte_segmente(1);
        self.interchange.nachrichten.push(message);
        self.current_message = Some(self.interchange.nachrichten.len() - 1);
        self.current_segment_group = None;
        self.segments_in_message = 1;
        self.state = InterchangeState::MessageOpen;
    }

    /// Close the open message; clears the message and all group pointers
    pub fn close_message(&mut self) {
        let counted = self.segments_in_message;
        if let Some(message) = self.current_message_mut() {
            message.set_gezaehlte_segmente(counted);
        }
        self.current_message = None;
        self.message_type = None;
        self.cursor = GroupCursor::Initial;
        self.current_segment_group = None;
        self.segments_in_message = 0;
        self.state = InterchangeState::InterchangeOpen;
    }

    pub fn is_message_open(&self) -> bool {
        self.current_message.is_some()
    }

    /// Count one more segment towards the open message. The message's
    /// `gezaehlte_segmente` follows along, so a message cut off before its
    /// UNT still reports what was read.
    pub fn count_segment(&mut self) {
        if self.is_message_open() {
            self.segments_in_message += 1;
            let counted = self.segments_in_message;
            if let Some(message) = self.current_message_mut() {
                message.set_gezaehlte_segmente(counted);
            }
        }
    }

    pub fn segments_in_message(&self) -> usize {
        self.segments_in_message
    }

    pub fn cursor(&self) -> GroupCursor {
        self.cursor
    }

    pub fn into_interchange(self) -> Interchange {
        self.interchange
    }

    pub fn current_message(&self) -> Option<&EdifactMessage> {
        self.interchange.nachrichten.get(self.current_message?)
    }

    pub fn current_message_mut(&mut self) -> Option<&mut EdifactMessage> {
        self.interchange.nachrichten.get_mut(self.current_message?)
    }

    // ------------------------------------------------------------------
    // MSCONS
    // ------------------------------------------------------------------

    pub fn mscons(&self) -> Option<&MsconsNachricht> {
        match self.current_message()? {
            EdifactMessage::Mscons(message) => Some(message),
            _ => None,
        }
    }

    pub fn mscons_mut(&mut self) -> Option<&mut MsconsNachricht> {
        match self.current_message_mut()? {
            EdifactMessage::Mscons(message) => Some(message),
            _ => None,
        }
    }

    pub fn mscons_cursor(&self) -> Option<MsconsCursor> {
        match self.cursor {
            GroupCursor::Mscons(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn mscons_cursor_mut(&mut self) -> Option<&mut MsconsCursor> {
        match &mut self.cursor {
            GroupCursor::Mscons(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn mscons_sg1_mut(&mut self) -> Option<&mut MsconsSg1> {
        let index = self.mscons_cursor()?.sg1?;
        self.mscons_mut()?.sg1_referenzen.get_mut(index)
    }

    pub fn mscons_sg2_mut(&mut self) -> Option<&mut MsconsSg2> {
        let index = self.mscons_cursor()?.sg2?;
        self.mscons_mut()?.sg2_marktpartner.get_mut(index)
    }

    pub fn mscons_sg3_mut(&mut self) -> Option<&mut MsconsSg3> {
        let index = self.mscons_cursor()?.sg3?;
        self.mscons_sg2_mut()?.sg3_kontaktinformationen.get_mut(index)
    }

    pub fn mscons_sg5_mut(&mut self) -> Option<&mut MsconsSg5> {
        let index = self.mscons_cursor()?.sg5?;
        self.mscons_mut()?.sg5_lieferanschrift.get_mut(index)
    }

    pub fn mscons_sg6_mut(&mut self) -> Option<&mut MsconsSg6> {
        let index = self.mscons_cursor()?.sg6?;
        self.mscons_sg5_mut()?.sg6_messlokation.get_mut(index)
    }

    pub fn mscons_sg7_mut(&mut self) -> Option<&mut MsconsSg7> {
        let index = self.mscons_cursor()?.sg7?;
        self.mscons_sg6_mut()?.sg7_referenzen.get_mut(index)
    }

    pub fn mscons_sg8_mut(&mut self) -> Option<&mut MsconsSg8> {
        let index = self.mscons_cursor()?.sg8?;
        self.mscons_sg6_mut()?.sg8_merkmale.get_mut(index)
    }

    pub fn mscons_sg9_mut(&mut self) -> Option<&mut MsconsSg9> {
        let index = self.mscons_cursor()?.sg9?;
        self.mscons_sg6_mut()?.sg9_positionsdaten.get_mut(index)
    }

    pub fn mscons_sg10_mut(&mut self) -> Option<&mut MsconsSg10> {
        let index = self.mscons_cursor()?.sg10?;
        self.mscons_sg9_mut()?.sg10_mengen.get_mut(index)
    }

    // ------------------------------------------------------------------
    // APERAK
    // ------------------------------------------------------------------

    pub fn aperak(&self) -> Option<&AperakNachricht> {
        match self.current_message()? {
            EdifactMessage::Aperak(message) => Some(message),
            _ => None,
        }
    }

    pub fn aperak_mut(&mut self) -> Option<&mut AperakNachricht> {
        match self.current_message_mut()? {
            EdifactMessage::Aperak(message) => Some(message),
            _ => None,
        }
    }

    pub fn aperak_cursor(&self) -> Option<AperakCursor> {
        match self.cursor {
            GroupCursor::Aperak(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn aperak_cursor_mut(&mut self) -> Option<&mut AperakCursor> {
        match &mut self.cursor {
            GroupCursor::Aperak(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn aperak_sg1_mut(&mut self) -> Option<&mut AperakSg1> {
        let index = self.aperak_cursor()?.sg1?;
        self.aperak_mut()?.sg1_referenzen.get_mut(index)
    }

    pub fn aperak_sg2_mut(&mut self) -> Option<&mut AperakSg2> {
        let index = self.aperak_cursor()?.sg2?;
        self.aperak_mut()?.sg2_marktpartner.get_mut(index)
    }

    pub fn aperak_sg3_mut(&mut self) -> Option<&mut AperakSg3> {
        let index = self.aperak_cursor()?.sg3?;
        self.aperak_sg2_mut()?.sg3_kontaktinformationen.get_mut(index)
    }

    /// The open SG4 (error description) instance
    pub fn current_sg4(&self) -> Option<&AperakSg4> {
        let index = self.aperak_cursor()?.sg4?;
        self.aperak()?.sg4_fehler_beschreibung.get(index)
    }

    pub fn aperak_sg4_mut(&mut self) -> Option<&mut AperakSg4> {
        let index = self.aperak_cursor()?.sg4?;
        self.aperak_mut()?.sg4_fehler_beschreibung.get_mut(index)
    }

    pub fn aperak_sg5_mut(&mut self) -> Option<&mut AperakSg5> {
        let index = self.aperak_cursor()?.sg5?;
        self.aperak_sg4_mut()?.sg5_fehlerreferenzen.get_mut(index)
    }
}
