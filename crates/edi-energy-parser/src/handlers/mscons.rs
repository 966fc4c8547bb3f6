//! MSCONS attach rules
//!
//! Group instances are opened by their trigger segment (RFF for SG1/SG7,
//! NAD for SG2/SG5, CTA for SG3, LOC for SG6, CCI for SG8, LIN for SG9,
//! QTY for SG10). Opening an instance closes all instances nested below
//! its level.

use super::{AttachError, AttachFn};
use crate::context::ParsingContext;
use edi_energy_model::{
    MsconsSg1, MsconsSg10, MsconsSg2, MsconsSg3, MsconsSg5, MsconsSg6, MsconsSg7, MsconsSg8,
    MsconsSg9, Segment, SegmentGroup, SegmentType,
};

pub(super) static HANDLERS: [(SegmentType, AttachFn); 12] = [
    (SegmentType::Dtm, attach_dtm),
    (SegmentType::Rff, attach_rff),
    (SegmentType::Nad, attach_nad),
    (SegmentType::Cta, attach_cta),
    (SegmentType::Com, attach_com),
    (SegmentType::Uns, attach_uns),
    (SegmentType::Loc, attach_loc),
    (SegmentType::Cci, attach_cci),
    (SegmentType::Lin, attach_lin),
    (SegmentType::Pia, attach_pia),
    (SegmentType::Qty, attach_qty),
    (SegmentType::Sts, attach_sts),
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
        None => ctx.mscons_mut().map(|m| &mut m.dtm_nachrichtendatum),
        Some(SegmentGroup::Sg1) => ctx.mscons_sg1_mut().map(|g| &mut g.dtm_referenzdatum),
        Some(SegmentGroup::Sg6) => ctx.mscons_sg6_mut().map(|g| &mut g.dtm_zeitraum),
        Some(SegmentGroup::Sg7) => ctx.mscons_sg7_mut().map(|g| &mut g.dtm_referenzdatum),
        Some(SegmentGroup::Sg8) => ctx.mscons_sg8_mut().map(|g| &mut g.dtm_gueltigkeit),
        Some(SegmentGroup::Sg10) => ctx.mscons_sg10_mut().map(|g| &mut g.dtm_messzeitraum),
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
            let message = ctx.mscons_mut().ok_or_else(missing)?;
            message.sg1_referenzen.push(MsconsSg1 {
                rff_referenzangaben: rff,
                dtm_referenzdatum: Vec::new(),
            });
            let index = message.sg1_referenzen.len() - 1;
            ctx.mscons_cursor_mut().ok_or_else(missing)?.sg1 = Some(index);
        }
        Some(SegmentGroup::Sg7) => {
            let sg6 = ctx.mscons_sg6_mut().ok_or_else(missing)?;
            sg6.sg7_referenzen.push(MsconsSg7 {
                rff_referenzangaben: rff,
                dtm_referenzdatum: Vec::new(),
            });
            let index = sg6.sg7_referenzen.len() - 1;
            ctx.mscons_cursor_mut().ok_or_else(missing)?.sg7 = Some(index);
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

    let message = ctx.mscons_mut().ok_or_else(missing)?;
    match group {
        Some(SegmentGroup::Sg2) => {
            message.sg2_marktpartner.push(MsconsSg2 {
                nad_marktpartner: nad,
                sg3_kontaktinformationen: Vec::new(),
            });
            let index = message.sg2_marktpartner.len() - 1;
            let cursor = ctx.mscons_cursor_mut().ok_or_else(missing)?;
            cursor.sg2 = Some(index);
            cursor.sg3 = None;
        }
        Some(SegmentGroup::Sg5) => {
            message.sg5_lieferanschrift.push(MsconsSg5 {
                nad_name_und_adresse: nad,
                sg6_messlokation: Vec::new(),
            });
            let index = message.sg5_lieferanschrift.len() - 1;
            let cursor = ctx.mscons_cursor_mut().ok_or_else(missing)?;
            cursor.sg5 = Some(index);
            cursor.sg6 = None;
            cursor.sg7 = None;
            cursor.sg8 = None;
            cursor.sg9 = None;
            cursor.sg10 = None;
        }
        _ => return Err(AttachError::misplaced(segment_type, group)),
    }
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

    let sg2 = ctx.mscons_sg2_mut().ok_or_else(missing)?;
    sg2.sg3_kontaktinformationen.push(MsconsSg3 {
        cta_ansprechpartner: cta,
        com_kommunikationsverbindung: Vec::new(),
    });
    let index = sg2.sg3_kontaktinformationen.len() - 1;
    ctx.mscons_cursor_mut().ok_or_else(missing)?.sg3 = Some(index);
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
    ctx.mscons_sg3_mut()
        .ok_or_else(|| AttachError::missing_parent(segment_type, group))?
        .com_kommunikationsverbindung
        .push(com);
    Ok(())
}

fn attach_uns(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Uns(uns) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.mscons_mut()
        .ok_or_else(|| AttachError::missing_parent(segment_type, group))?
        .uns_abschnitts_kontrollsegment = Some(uns);
    Ok(())
}

fn attach_loc(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Loc(loc) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    let missing = || AttachError::missing_parent(segment_type, group);

    let sg5 = ctx.mscons_sg5_mut().ok_or_else(missing)?;
    sg5.sg6_messlokation.push(MsconsSg6 {
        loc_lokation: loc,
        dtm_zeitraum: Vec::new(),
        sg7_referenzen: Vec::new(),
        sg8_merkmale: Vec::new(),
        sg9_positionsdaten: Vec::new(),
    });
    let index = sg5.sg6_messlokation.len() - 1;
    let cursor = ctx.mscons_cursor_mut().ok_or_else(missing)?;
    cursor.sg6 = Some(index);
    cursor.sg7 = None;
    cursor.sg8 = None;
    cursor.sg9 = None;
    cursor.sg10 = None;
    Ok(())
}

/// CCI opens an SG8 characteristic, or is a characteristic of the open
/// SG10 quantity
fn attach_cci(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Cci(cci) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    let missing = || AttachError::missing_parent(segment_type, group);

    match group {
        Some(SegmentGroup::Sg8) => {
            let sg6 = ctx.mscons_sg6_mut().ok_or_else(missing)?;
            sg6.sg8_merkmale.push(MsconsSg8 {
                cci_merkmal: cci,
                dtm_gueltigkeit: Vec::new(),
            });
            let index = sg6.sg8_merkmale.len() - 1;
            ctx.mscons_cursor_mut().ok_or_else(missing)?.sg8 = Some(index);
        }
        Some(SegmentGroup::Sg10) => {
            ctx.mscons_sg10_mut()
                .ok_or_else(missing)?
                .cci_merkmale
                .push(cci);
        }
        _ => return Err(AttachError::misplaced(segment_type, group)),
    }
    Ok(())
}

fn attach_lin(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Lin(lin) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    let missing = || AttachError::missing_parent(segment_type, group);

    let sg6 = ctx.mscons_sg6_mut().ok_or_else(missing)?;
    sg6.sg9_positionsdaten.push(MsconsSg9 {
        lin_lfd_position: lin,
        pia_produktidentifikation: Vec::new(),
        sg10_mengen: Vec::new(),
    });
    let index = sg6.sg9_positionsdaten.len() - 1;
    let cursor = ctx.mscons_cursor_mut().ok_or_else(missing)?;
    cursor.sg9 = Some(index);
    cursor.sg10 = None;
    Ok(())
}

fn attach_pia(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Pia(pia) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.mscons_sg9_mut()
        .ok_or_else(|| AttachError::missing_parent(segment_type, group))?
        .pia_produktidentifikation
        .push(pia);
    Ok(())
}

fn attach_qty(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Qty(qty) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    let missing = || AttachError::missing_parent(segment_type, group);

    let sg9 = ctx.mscons_sg9_mut().ok_or_else(missing)?;
    sg9.sg10_mengen.push(MsconsSg10 {
        qty_mengenangaben: qty,
        dtm_messzeitraum: Vec::new(),
        sts_status: Vec::new(),
        cci_merkmale: Vec::new(),
    });
    let index = sg9.sg10_mengen.len() - 1;
    ctx.mscons_cursor_mut().ok_or_else(missing)?.sg10 = Some(index);
    Ok(())
}

fn attach_sts(
    segment: Segment,
    group: Option<SegmentGroup>,
    ctx: &mut ParsingContext,
) -> Result<(), AttachError> {
    let segment_type = segment.segment_type();
    let Segment::Sts(sts) = segment else {
        return Err(AttachError::unexpected(segment_type));
    };
    ctx.mscons_sg10_mut()
        .ok_or_else(|| AttachError::missing_parent(segment_type, group))?
        .sts_status
        .push(sts);
    Ok(())
}
