//! Interchange root and envelope validation (UNB/UNZ, UNH/UNT)

use crate::aperak::AperakNachricht;
use crate::mscons::MsconsNachricht;
use crate::segments::{BgmSegment, UnaSegment, UnbSegment, UnhSegment, UntSegment, UnzSegment};
use crate::types::MessageType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outermost envelope holding all messages of one transmission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Interchange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub una_service_string_advice: Option<UnaSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unb_nutzdaten_kopfsegment: Option<UnbSegment>,
    #[serde(default)]
    pub nachrichten: Vec<EdifactMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unz_nutzdaten_endsegment: Option<UnzSegment>,
}

impl Interchange {
    /// Create an empty interchange
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the envelope invariants, see [`validate_interchange`]
    pub fn validate(&self) -> Result<()> {
        validate_interchange(self)
    }
}

/// A message whose type has no group rules; only its frame is kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbekannteNachricht {
    pub unh_nachrichtenkopfsegment: UnhSegment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_beginn_der_nachricht: Option<BgmSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unt_nachrichtenendsegment: Option<UntSegment>,
    #[serde(skip)]
    pub gezaehlte_segmente: usize,
}

/// One message of an interchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nachrichtentyp")]
pub enum EdifactMessage {
    #[serde(rename = "MSCONS")]
    Mscons(MsconsNachricht),
    #[serde(rename = "APERAK")]
    Aperak(AperakNachricht),
    #[serde(rename = "UNBEKANNT")]
    Unbekannt(UnbekannteNachricht),
}

impl EdifactMessage {
    /// Start an empty message of the type announced by `unh`
    pub fn from_header(unh: UnhSegment) -> Self {
        match unh.message_type() {
            Some(MessageType::Mscons) => Self::Mscons(MsconsNachricht::new(unh)),
            Some(MessageType::Aperak) => Self::Aperak(AperakNachricht::new(unh)),
            None => Self::Unbekannt(UnbekannteNachricht {
                unh_nachrichtenkopfsegment: unh,
                bgm_beginn_der_nachricht: None,
                unt_nachrichtenendsegment: None,
                gezaehlte_segmente: 0,
            }),
        }
    }

    pub fn message_type(&self) -> Option<MessageType> {
        match self {
            Self::Mscons(_) => Some(MessageType::Mscons),
            Self::Aperak(_) => Some(MessageType::Aperak),
            Self::Unbekannt(_) => None,
        }
    }

    pub fn unh(&self) -> &UnhSegment {
        match self {
            Self::Mscons(m) => &m.unh_nachrichtenkopfsegment,
            Self::Aperak(m) => &m.unh_nachrichtenkopfsegment,
            Self::Unbekannt(m) => &m.unh_nachrichtenkopfsegment,
        }
    }

    pub fn bgm(&self) -> Option<&BgmSegment> {
        match self {
            Self::Mscons(m) => m.bgm_beginn_der_nachricht.as_ref(),
            Self::Aperak(m) => m.bgm_beginn_der_nachricht.as_ref(),
            Self::Unbekannt(m) => m.bgm_beginn_der_nachricht.as_ref(),
        }
    }

    pub fn set_bgm(&mut self, bgm: BgmSegment) {
        match self {
            Self::Mscons(m) => m.bgm_beginn_der_nachricht = Some(bgm),
            Self::Aperak(m) => m.bgm_beginn_der_nachricht = Some(bgm),
            Self::Unbekannt(m) => m.bgm_beginn_der_nachricht = Some(bgm),
        }
    }

    pub fn unt(&self) -> Option<&UntSegment> {
        match self {
            Self::Mscons(m) => m.unt_nachrichtenendsegment.as_ref(),
            Self::Aperak(m) => m.unt_nachrichtenendsegment.as_ref(),
            Self::Unbekannt(m) => m.unt_nachrichtenendsegment.as_ref(),
        }
    }

    pub fn set_unt(&mut self, unt: UntSegment) {
        match self {
            Self::Mscons(m) => m.unt_nachrichtenendsegment = Some(unt),
            Self::Aperak(m) => m.unt_nachrichtenendsegment = Some(unt),
            Self::Unbekannt(m) => m.unt_nachrichtenendsegment = Some(unt),
        }
    }

    /// Number of segments seen for this message, UNH and UNT included
    pub fn gezaehlte_segmente(&self) -> usize {
        match self {
            Self::Mscons(m) => m.gezaehlte_segmente,
            Self::Aperak(m) => m.gezaehlte_segmente,
            Self::Unbekannt(m) => m.gezaehlte_segmente,
        }
    }

    pub fn set_gezaehlte_segmente(&mut self, anzahl: usize) {
        match self {
            Self::Mscons(m) => m.gezaehlte_segmente = anzahl,
            Self::Aperak(m) => m.gezaehlte_segmente = anzahl,
            Self::Unbekannt(m) => m.gezaehlte_segmente = anzahl,
        }
    }
}

/// Validate an interchange: UNZ present, counter and reference match
/// UNB, and every message passes [`validate_message`].
pub fn validate_interchange(interchange: &Interchange) -> Result<()> {
    let unz = interchange
        .unz_nutzdaten_endsegment
        .as_ref()
        .ok_or_else(|| Error::Envelope("Missing UNZ segment".to_string()))?;

    if let Some(unb) = &interchange.unb_nutzdaten_kopfsegment {
        if unb.datenaustauschreferenz != unz.datenaustauschreferenz {
            return Err(Error::Envelope(format!(
                "Interchange control reference mismatch: UNB='{}', UNZ='{}'",
                unb.datenaustauschreferenz, unz.datenaustauschreferenz
            )));
        }
    }

    if unz.datenaustauschzaehler != interchange.nachrichten.len() {
        return Err(Error::Envelope(format!(
            "Message count mismatch: UNZ says {}, actual count is {}",
            unz.datenaustauschzaehler,
            interchange.nachrichten.len()
        )));
    }

    for (i, message) in interchange.nachrichten.iter().enumerate() {
        validate_message(message)
            .map_err(|e| Error::Envelope(format!("Message {} validation failed: {}", i + 1, e)))?;
    }

    debug!(
        messages = interchange.nachrichten.len(),
        "interchange envelope is consistent"
    );
    Ok(())
}

/// Validate a message: UNT present, reference matches UNH, segment count
/// matches the segments actually seen.
pub fn validate_message(message: &EdifactMessage) -> Result<()> {
    let unt = message
        .unt()
        .ok_or_else(|| Error::Envelope("Missing UNT segment".to_string()))?;
    let unh = message.unh();

    if unt.nachrichten_referenznummer != unh.nachrichten_referenznummer {
        return Err(Error::Envelope(format!(
            "Message reference mismatch: UNH='{}', UNT='{}'",
            unh.nachrichten_referenznummer, unt.nachrichten_referenznummer
        )));
    }

    if unt.anzahl_der_segmente_in_einer_nachricht != message.gezaehlte_segmente() {
        return Err(Error::Envelope(format!(
            "Segment count mismatch: UNT says {}, actual count is {} (including UNH/UNT)",
            unt.anzahl_der_segmente_in_einer_nachricht,
            message.gezaehlte_segmente()
        )));
    }

    Ok(())
}
