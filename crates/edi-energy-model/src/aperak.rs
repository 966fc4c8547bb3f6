//! APERAK message tree
//!
//! ```text
//! UNH BGM DTM* SG1* SG2* SG4* UNT
//! SG1  RFF DTM*
//! SG2  NAD SG3*
//! SG3  CTA COM*
//! SG4  ERC FTX? SG5*
//! SG5  RFF DTM*
//! ```

use crate::segments::{
    BgmSegment, ComSegment, CtaSegment, DtmSegment, ErcSegment, FtxSegment, NadSegment,
    RffSegment, UnhSegment, UntSegment,
};
use serde::{Deserialize, Serialize};

/// An application error or acknowledgement message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AperakNachricht {
    pub unh_nachrichtenkopfsegment: UnhSegment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_beginn_der_nachricht: Option<BgmSegment>,
    #[serde(default)]
    pub dtm_nachrichtendatum: Vec<DtmSegment>,
    #[serde(default)]
    pub sg1_referenzen: Vec<AperakSg1>,
    #[serde(default)]
    pub sg2_marktpartner: Vec<AperakSg2>,
    #[serde(default)]
    pub sg4_fehler_beschreibung: Vec<AperakSg4>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unt_nachrichtenendsegment: Option<UntSegment>,
    /// Segments observed between UNH and UNT, both inclusive
    #[serde(skip)]
    pub gezaehlte_segmente: usize,
}

impl AperakNachricht {
    /// Start an empty message for the given header
    pub fn new(unh: UnhSegment) -> Self {
        Self {
            unh_nachrichtenkopfsegment: unh,
            bgm_beginn_der_nachricht: None,
            dtm_nachrichtendatum: Vec::new(),
            sg1_referenzen: Vec::new(),
            sg2_marktpartner: Vec::new(),
            sg4_fehler_beschreibung: Vec::new(),
            unt_nachrichtenendsegment: None,
            gezaehlte_segmente: 0,
        }
    }
}

/// SG1 - reference to the acknowledged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AperakSg1 {
    pub rff_referenzangaben: RffSegment,
    #[serde(default)]
    pub dtm_referenzdatum: Vec<DtmSegment>,
}

/// SG2 - market partner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AperakSg2 {
    pub nad_marktpartner: NadSegment,
    #[serde(default)]
    pub sg3_kontaktinformationen: Vec<AperakSg3>,
}

/// SG3 - contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AperakSg3 {
    pub cta_ansprechpartner: CtaSegment,
    #[serde(default)]
    pub com_kommunikationsverbindung: Vec<ComSegment>,
}

/// SG4 - one reported application error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AperakSg4 {
    pub erc_error_code: ErcSegment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftx_zusatzinformationen: Option<FtxSegment>,
    #[serde(default)]
    pub sg5_fehlerreferenzen: Vec<AperakSg5>,
}

impl AperakSg4 {
    pub fn new(erc_error_code: ErcSegment) -> Self {
        Self {
            erc_error_code,
            ftx_zusatzinformationen: None,
            sg5_fehlerreferenzen: Vec::new(),
        }
    }
}

/// SG5 - reference locating the error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AperakSg5 {
    pub rff_referenzangaben: RffSegment,
    #[serde(default)]
    pub dtm_referenzdatum: Vec<DtmSegment>,
}
