//! MSCONS message tree
//!
//! ```text
//! UNH BGM DTM* SG1* SG2* UNS SG5* UNT
//! SG1  RFF DTM*
//! SG2  NAD SG3*
//! SG3  CTA COM*
//! SG5  NAD SG6*
//! SG6  LOC DTM* SG7* SG8* SG9*
//! SG7  RFF DTM*
//! SG8  CCI DTM*
//! SG9  LIN PIA* SG10*
//! SG10 QTY DTM* STS* CCI*
//! ```

use crate::segments::{
    BgmSegment, CciSegment, ComSegment, CtaSegment, DtmSegment, LinSegment, LocSegment,
    NadSegment, PiaSegment, QtySegment, RffSegment, StsSegment, UnhSegment, UnsSegment,
    UntSegment,
};
use serde::{Deserialize, Serialize};

/// A metering data message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsconsNachricht {
    pub unh_nachrichtenkopfsegment: UnhSegment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_beginn_der_nachricht: Option<BgmSegment>,
    #[serde(default)]
    pub dtm_nachrichtendatum: Vec<DtmSegment>,
    #[serde(default)]
    pub sg1_referenzen: Vec<MsconsSg1>,
    #[serde(default)]
    pub sg2_marktpartner: Vec<MsconsSg2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uns_abschnitts_kontrollsegment: Option<UnsSegment>,
    #[serde(default)]
    pub sg5_lieferanschrift: Vec<MsconsSg5>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unt_nachrichtenendsegment: Option<UntSegment>,
    /// Segments observed between UNH and UNT, both inclusive
    #[serde(skip)]
    pub gezaehlte_segmente: usize,
}

impl MsconsNachricht {
    /// Start an empty message for the given header
    pub fn new(unh: UnhSegment) -> Self {
        Self {
            unh_nachrichtenkopfsegment: unh,
            bgm_beginn_der_nachricht: None,
            dtm_nachrichtendatum: Vec::new(),
            sg1_referenzen: Vec::new(),
            sg2_marktpartner: Vec::new(),
            uns_abschnitts_kontrollsegment: None,
            sg5_lieferanschrift: Vec::new(),
            unt_nachrichtenendsegment: None,
            gezaehlte_segmente: 0,
        }
    }
}

/// SG1 - reference (e.g. check identifier)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsconsSg1 {
    pub rff_referenzangaben: RffSegment,
    #[serde(default)]
    pub dtm_referenzdatum: Vec<DtmSegment>,
}

/// SG2 - market partner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsconsSg2 {
    pub nad_marktpartner: NadSegment,
    #[serde(default)]
    pub sg3_kontaktinformationen: Vec<MsconsSg3>,
}

/// SG3 - contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsconsSg3 {
    pub cta_ansprechpartner: CtaSegment,
    #[serde(default)]
    pub com_kommunikationsverbindung: Vec<ComSegment>,
}

/// SG5 - delivery party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsconsSg5 {
    pub nad_name_und_adresse: NadSegment,
    #[serde(default)]
    pub sg6_messlokation: Vec<MsconsSg6>,
}

/// SG6 - metering point with its period boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsconsSg6 {
    pub loc_lokation: LocSegment,
    #[serde(default)]
    pub dtm_zeitraum: Vec<DtmSegment>,
    #[serde(default)]
    pub sg7_referenzen: Vec<MsconsSg7>,
    #[serde(default)]
    pub sg8_merkmale: Vec<MsconsSg8>,
    #[serde(default)]
    pub sg9_positionsdaten: Vec<MsconsSg9>,
}

/// SG7 - metering point reference (e.g. meter number)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsconsSg7 {
    pub rff_referenzangaben: RffSegment,
    #[serde(default)]
    pub dtm_referenzdatum: Vec<DtmSegment>,
}

/// SG8 - metering point characteristic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsconsSg8 {
    pub cci_merkmal: CciSegment,
    #[serde(default)]
    pub dtm_gueltigkeit: Vec<DtmSegment>,
}

/// SG9 - line item identifying the measured quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsconsSg9 {
    pub lin_lfd_position: LinSegment,
    #[serde(default)]
    pub pia_produktidentifikation: Vec<PiaSegment>,
    #[serde(default)]
    pub sg10_mengen: Vec<MsconsSg10>,
}

/// SG10 - measured value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsconsSg10 {
    pub qty_mengenangaben: QtySegment,
    #[serde(default)]
    pub dtm_messzeitraum: Vec<DtmSegment>,
    #[serde(default)]
    pub sts_status: Vec<StsSegment>,
    #[serde(default)]
    pub cci_merkmale: Vec<CciSegment>,
}
