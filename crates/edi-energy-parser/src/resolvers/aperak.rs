//! APERAK segment group order
//!
//! ```text
//! UNH BGM DTM* SG1(RFF DTM*)* SG2(NAD SG3(CTA COM*)*)*
//! SG4(ERC FTX SG5(RFF DTM*)*)*
//! UNT
//! ```

use crate::context::ParsingContext;
use edi_energy_model::{SegmentGroup, SegmentType};

pub(super) fn resolve(
    segment_type: SegmentType,
    current: Option<SegmentGroup>,
    _ctx: &ParsingContext,
) -> Option<SegmentGroup> {
    match segment_type {
        SegmentType::Una
        | SegmentType::Unb
        | SegmentType::Unh
        | SegmentType::Bgm
        | SegmentType::Unt
        | SegmentType::Unz => None,
        // an RFF inside an error description references the faulty message
        SegmentType::Rff => match current {
            Some(SegmentGroup::Sg4 | SegmentGroup::Sg5) => Some(SegmentGroup::Sg5),
            _ => Some(SegmentGroup::Sg1),
        },
        SegmentType::Nad => Some(SegmentGroup::Sg2),
        SegmentType::Cta | SegmentType::Com => Some(SegmentGroup::Sg3),
        SegmentType::Erc | SegmentType::Ftx => Some(SegmentGroup::Sg4),
        _ => current,
    }
}
