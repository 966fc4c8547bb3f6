//! Segment handlers
//!
//! A handler pairs a converter with an attach function. Handling a segment
//! checks the handler's precondition, converts the elements and places the
//! record at its slot in the interchange tree. Message type specific
//! handlers exist for the body segments whose placement depends on the
//! segment group.

mod aperak;
mod envelope;
mod mscons;

use crate::context::ParsingContext;
use crate::converters::{ConversionContext, ConverterFactory, SegmentConverter};
use crate::{Error, Result};
use edi_energy_model::{MessageType, Segment, SegmentGroup, SegmentType};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Placement failure of a converted segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachError(pub String);

impl AttachError {
    pub(crate) fn unexpected(segment_type: SegmentType) -> Self {
        Self(format!("Handler cannot attach a {segment_type} segment"))
    }

    pub(crate) fn missing_parent(segment_type: SegmentType, group: Option<SegmentGroup>) -> Self {
        match group {
            Some(group) => Self(format!(
                "{segment_type} segment in {group} has no open parent group instance"
            )),
            None => Self(format!("{segment_type} segment outside of an open message")),
        }
    }

    pub(crate) fn misplaced(segment_type: SegmentType, group: Option<SegmentGroup>) -> Self {
        match group {
            Some(group) => Self(format!("{segment_type} segment is not allowed in {group}")),
            None => Self(format!("{segment_type} segment is not allowed at message level")),
        }
    }
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Places a converted segment into the context
pub type AttachFn =
    fn(Segment, Option<SegmentGroup>, &mut ParsingContext) -> std::result::Result<(), AttachError>;

/// Condition a context must meet before a handler runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    Always,
    /// A message is open, of any type
    OpenMessage,
    /// A message of the given type is open
    OpenMessageOf(MessageType),
}

/// Converter plus attach step for one segment type
pub struct SegmentHandler {
    converter: Arc<dyn SegmentConverter>,
    precondition: Precondition,
    attach: AttachFn,
}

impl SegmentHandler {
    pub fn new(
        converter: Arc<dyn SegmentConverter>,
        precondition: Precondition,
        attach: AttachFn,
    ) -> Self {
        Self {
            converter,
            precondition,
            attach,
        }
    }

    pub fn segment_type(&self) -> SegmentType {
        self.converter.segment_type()
    }

    pub fn can_handle(&self, ctx: &ParsingContext) -> bool {
        match self.precondition {
            Precondition::Always => true,
            Precondition::OpenMessage => ctx.is_message_open(),
            Precondition::OpenMessageOf(message_type) => {
                ctx.is_message_open() && ctx.message_type == Some(message_type)
            }
        }
    }

    /// Convert `elements` and attach the record. Does nothing when the
    /// context does not meet the handler's precondition.
    pub fn handle(
        &self,
        line_number: usize,
        elements: &[&str],
        current_group: Option<SegmentGroup>,
        ctx: &mut ParsingContext,
    ) -> Result<()> {
        if !self.can_handle(ctx) {
            debug!(
                line_number,
                segment = %self.segment_type(),
                "handler precondition not met, segment ignored"
            );
            return Ok(());
        }

        let separators = ctx.separators;
        let conversion = ConversionContext {
            line_number,
            last_segment_type: ctx.last_segment_type,
            current_group,
            message_type: ctx.message_type,
            separators: &separators,
        };
        let segment = self.converter.convert(elements, &conversion)?;

        (self.attach)(segment, current_group, ctx).map_err(|e| Error::Structural {
            line_number,
            segment_type: Some(self.segment_type()),
            message: e.0,
            value: None,
        })
    }
}

/// Lookup of handlers by segment type and message type
pub struct HandlerFactory {
    defaults: HashMap<SegmentType, SegmentHandler>,
    overrides: HashMap<(SegmentType, MessageType), SegmentHandler>,
}

impl HandlerFactory {
    /// Handlers wired to the converters of `converters`
    pub fn new(converters: &ConverterFactory) -> Self {
        let mut factory = Self {
            defaults: HashMap::new(),
            overrides: HashMap::new(),
        };

        let defaults: [(SegmentType, Precondition, AttachFn); 6] = [
            (SegmentType::Una, Precondition::Always, envelope::attach_una),
            (SegmentType::Unb, Precondition::Always, envelope::attach_unb),
            (SegmentType::Unh, Precondition::Always, envelope::attach_unh),
            (SegmentType::Bgm, Precondition::OpenMessage, envelope::attach_bgm),
            (SegmentType::Unt, Precondition::OpenMessage, envelope::attach_unt),
            (SegmentType::Unz, Precondition::Always, envelope::attach_unz),
        ];
        for (segment_type, precondition, attach) in defaults {
            if let Some(converter) = converters.get_converter(segment_type, None) {
                factory.defaults.insert(
                    segment_type,
                    SegmentHandler::new(Arc::clone(converter), precondition, attach),
                );
            }
        }

        for (message_type, handlers) in [
            (MessageType::Mscons, mscons::HANDLERS.as_slice()),
            (MessageType::Aperak, aperak::HANDLERS.as_slice()),
        ] {
            for &(segment_type, attach) in handlers {
                if let Some(converter) = converters.get_converter(segment_type, Some(message_type))
                {
                    factory.overrides.insert(
                        (segment_type, message_type),
                        SegmentHandler::new(
                            Arc::clone(converter),
                            Precondition::OpenMessageOf(message_type),
                            attach,
                        ),
                    );
                }
            }
        }

        factory
    }

    /// Override for `(segment_type, message_type)` if one exists,
    /// otherwise the default handler
    pub fn get_handler(
        &self,
        segment_type: SegmentType,
        message_type: Option<MessageType>,
    ) -> Option<&SegmentHandler> {
        message_type
            .and_then(|m| self.overrides.get(&(segment_type, m)))
            .or_else(|| self.defaults.get(&segment_type))
    }
}

impl Default for HandlerFactory {
    fn default() -> Self {
        Self::new(&ConverterFactory::new())
    }
}
