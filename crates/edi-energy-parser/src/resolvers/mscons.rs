//! MSCONS segment group order
//!
//! ```text
//! UNH BGM DTM* SG1(RFF DTM*)* SG2(NAD SG3(CTA COM*)*)*
//! UNS SG5(NAD SG6(LOC DTM* SG7(RFF DTM*)* SG8(CCI DTM*)*
//!     SG9(LIN PIA* SG10(QTY DTM* STS* CCI*)*)*)*)*
//! UNT
//! ```

use crate::context::ParsingContext;
use edi_energy_model::{SegmentGroup, SegmentType};

/// Whether the detail section (after UNS) has been entered
fn in_detail_section(current: Option<SegmentGroup>, ctx: &ParsingContext) -> bool {
    let uns_seen = ctx
        .mscons()
        .is_some_and(|m| m.uns_abschnitts_kontrollsegment.is_some());
    uns_seen || current.is_some_and(|group| group >= SegmentGroup::Sg5)
}

pub(super) fn resolve(
    segment_type: SegmentType,
    current: Option<SegmentGroup>,
    ctx: &ParsingContext,
) -> Option<SegmentGroup> {
    match segment_type {
        SegmentType::Una
        | SegmentType::Unb
        | SegmentType::Unh
        | SegmentType::Bgm
        | SegmentType::Uns
        | SegmentType::Unt
        | SegmentType::Unz => None,
        SegmentType::Rff if in_detail_section(current, ctx) => Some(SegmentGroup::Sg7),
        SegmentType::Rff => Some(SegmentGroup::Sg1),
        SegmentType::Nad if in_detail_section(current, ctx) => Some(SegmentGroup::Sg5),
        SegmentType::Nad => Some(SegmentGroup::Sg2),
        SegmentType::Cta | SegmentType::Com => Some(SegmentGroup::Sg3),
        SegmentType::Loc => Some(SegmentGroup::Sg6),
        SegmentType::Cci => match current {
            Some(SegmentGroup::Sg9 | SegmentGroup::Sg10) => Some(SegmentGroup::Sg10),
            _ => Some(SegmentGroup::Sg8),
        },
        SegmentType::Lin | SegmentType::Pia => Some(SegmentGroup::Sg9),
        SegmentType::Qty | SegmentType::Sts => Some(SegmentGroup::Sg10),
        SegmentType::Dtm | SegmentType::Erc | SegmentType::Ftx => current,
    }
}
