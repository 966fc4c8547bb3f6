//! Attach rules for interchange and message frame segments

use super::AttachError;
use crate::context::{InterchangeState, ParsingContext};
use edi_energy_model::{EdifactMessage, Segment, SegmentGroup};

pub(super) fn attach_una(
    segment: Segment,
    _group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Una(una) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.interchange.una_service_string_advice = Some(una);
    Ok(())
}

pub(super) fn attach_unb(
    segment: Segment,
    _group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Unb(unb) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.interchange.unb_nutzdaten_kopfsegment = Some(unb);
    ctx.state = InterchangeState::InterchangeOpen;
    Ok(())
}

/// Opens a new message of the type named in the header
pub(super) fn attach_unh(
    segment: Segment,
    _group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Unh(unh) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.begin_message(EdifactMessage::from_header(unh));
    Ok(())
}

pub(super) fn attach_bgm(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Bgm(bgm) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.current_message_mut()
        .ok_or_else(|| AttachError::missing_parent(segment_type, group))?
        .set_bgm(bgm);
    Ok(())
}

/// Stores the trailer and closes the message
pub(super) fn attach_unt(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Unt(unt) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.current_message_mut()
        .ok_or_else(|| AttachError::missing_parent(segment_type, group))?
        .set_unt(unt);
    ctx.close_message();
    Ok(())
}

pub(super) fn attach_unz(
    segment: Segment,
    _group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Unz(unz) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.interchange.unz_nutzdaten_endsegment = Some(unz);
    ctx.state = InterchangeState::InterchangeClosed;
    Ok(())
}
