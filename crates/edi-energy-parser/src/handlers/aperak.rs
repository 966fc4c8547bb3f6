//! APERAK attach rules

use super::{AttachError, AttachFn};
use crate::context::ParsingContext;
use edi_energy_model::{
    AperakSg1, AperakSg2, AperakSg3, AperakSg4, AperakSg5, Segment, SegmentGroup, SegmentType,
};

pub(super) static HANDLERS: [(SegmentType, AttachFn); 7] = [
    (SegmentType::Dtm, attach_dtm),
    (SegmentType::Rff, attach_rff),
    (SegmentType::Nad, attach_nad),
    (SegmentType::Cta, attach_cta),
    (SegmentType::Com, attach_com),
    (SegmentType::Erc, attach_erc),
    (SegmentType::Ftx, attach_ftx),
];

fn attach_dtm(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Dtm(dtm) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };

    let slot = match group {
        None => ctx.aperak_mut().map(|m| &mut m.dtm_nachrichtendatum),
        Some(SegmentGroup::Sg1) => ctx.aperak_sg1_mut().map(|g| &mut g.dtm_referenzdatum),
        Some(SegmentGroup::Sg5) => ctx.aperak_sg5_mut().map(|g| &mut g.dtm_referenzdatum),
        Some(_) => return Err(AttachError::misplaced(segment_type, group)),
    };
    slot.ok_or_else(|| AttachError::missing_parent(segment_type, group))?
        .push(dtm);
    Ok(())
}

fn attach_rff(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Rff(rff) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    let missing = || AttachError::missing_parent(segment_type, group);

    match group {
        Some(SegmentGroup::Sg1) => {
            let message = ctx.aperak_mut().ok_or_else(missing)?;
            message.sg1_referenzen.push(AperakSg1 {
                rff_referenzangaben: rff,
                dtm_referenzdatum: Vec::new(),
            });
            let index = message.sg1_referenzen.len() - 1;
            ctx.aperak_cursor_mut().ok_or_else(missing)?.sg1 = Some(index);
        }
        Some(SegmentGroup::Sg5) => {
            let sg4 = ctx.aperak_sg4_mut().ok_or_else(missing)?;
            sg4.sg5_fehlerreferenzen.push(AperakSg5 {
                rff_referenzangaben: rff,
                dtm_referenzdatum: Vec::new(),
            });
            let index = sg4.sg5_fehlerreferenzen.len() - 1;
            ctx.aperak_cursor_mut().ok_or_else(missing)?.sg5 = Some(index);
        }
        _ => return Err(AttachError::misplaced(segment_type, group)),
    }
    Ok(())
}

fn attach_nad(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Nad(nad) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    let missing = || AttachError::missing_parent(segment_type, group);

    let message = ctx.aperak_mut().ok_or_else(missing)?;
    message.sg2_marktpartner.push(AperakSg2 {
        nad_marktpartner: nad,
        sg3_kontaktinformationen: Vec::new(),
    });
    let index = message.sg2_marktpartner.len() - 1;
    let cursor = ctx.aperak_cursor_mut().ok_or_else(missing)?;
    cursor.sg2 = Some(index);
    cursor.sg3 = None;
    Ok(())
}

fn attach_cta(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Cta(cta) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    let missing = || AttachError::missing_parent(segment_type, group);

    let sg2 = ctx.aperak_sg2_mut().ok_or_else(missing)?;
    sg2.sg3_kontaktinformationen.push(AperakSg3 {
        cta_ansprechpartner: cta,
        com_kommunikationsverbindung: Vec::new(),
    });
    let index = sg2.sg3_kontaktinformationen.len() - 1;
    ctx.aperak_cursor_mut().ok_or_else(missing)?.sg3 = Some(index);
    Ok(())
}

fn attach_com(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Com(com) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.aperak_sg3_mut()
        .ok_or_else(|| AttachError::missing_parent(segment_type, group))?
        .com_kommunikationsverbindung
        .push(com);
    Ok(())
}

/// Every ERC starts a new error description
fn attach_erc(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Erc(erc) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    let missing = || AttachError::missing_parent(segment_type, group);

    let message = ctx.aperak_mut().ok_or_else(missing)?;
    message.sg4_fehler_beschreibung.push(AperakSg4::new(erc));
    let index = message.sg4_fehler_beschreibung.len() - 1;
    let cursor = ctx.aperak_cursor_mut().ok_or_else(missing)?;
    cursor.sg4 = Some(index);
    cursor.sg5 = None;
    Ok(())
}

fn attach_ftx(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Ftx(ftx) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.aperak_sg4_mut()
        .ok_or_else(|| AttachError::missing_parent(segment_type, group))?
        .ftx_zusatzinformationen = Some(ftx);
    Ok(())
}
