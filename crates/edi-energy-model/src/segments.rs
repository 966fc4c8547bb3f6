//! Typed segment records
//!
//! One record per segment kind plus sub-records for the composite data
//! elements they carry. Optional components that are absent on the wire
//! are `None` and are omitted when serialized.

use crate::types::{MessageType, SegmentType};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// UNA - Service String Advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnaSegment {
    pub komponententrennzeichen: char,
    pub datenelementtrennzeichen: char,
    pub dezimalzeichen: char,
    pub freigabezeichen: char,
    pub reserviert: char,
    pub segmentendezeichen: char,
}

impl Default for UnaSegment {
    fn default() -> Self {
        Self {
            komponententrennzeichen: ':',
            datenelementtrennzeichen: '+',
            dezimalzeichen: '.',
            freigabezeichen: '?',
            reserviert: ' ',
            segmentendezeichen: '\'',
        }
    }
}

/// Syntax identifier (S001)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxBezeichner {
    /// e.g. "UNOC"
    pub syntax_kennung: String,
    pub syntax_versionsnummer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dienstcodeliste_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zeichensatz_kodierung: Option<String>,
}

/// Interchange sender or recipient (S002/S003)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Beteiligter {
    /// Market partner id, usually a 13-digit code
    pub beteiligter_bezeichnung: String,
    /// Code list the id belongs to (e.g. "500", "14")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teilnehmerbezeichnung_qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interne_kennung: Option<String>,
}

/// Date and time of preparation (S004)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatumUhrzeit {
    /// YYMMDD or CCYYMMDD
    pub datum: String,
    /// HHMM
    pub uhrzeit: String,
}

impl DatumUhrzeit {
    /// Interpret date and time; both the 6 and 8 digit date forms are accepted
    pub fn zeitpunkt(&self) -> Option<NaiveDateTime> {
        let combined = format!("{}{}", self.datum, self.uhrzeit);
        let pattern = match self.datum.len() {
            6 => "%y%m%d%H%M",
            8 => "%Y%m%d%H%M",
            _ => return None,
        };
        NaiveDateTime::parse_from_str(&combined, pattern).ok()
    }
}

/// UNB - Interchange Header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbSegment {
    pub syntax_bezeichner: SyntaxBezeichner,
    pub absender: Beteiligter,
    pub empfaenger: Beteiligter,
    pub datum_uhrzeit_der_erstellung: DatumUhrzeit,
    /// Interchange control reference, repeated in UNZ
    pub datenaustauschreferenz: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenz_passwort: Option<String>,
    /// e.g. "TL", "VL" in the German energy market
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anwendungsreferenz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verarbeitungsprioritaet_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bestaetigungsanforderung: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kommunikationsvereinbarung_id: Option<String>,
    /// "1" marks a test interchange
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testkennzeichen: Option<String>,
}

/// Message identifier (S009)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NachrichtenKennung {
    /// Raw message type, e.g. "MSCONS"
    pub nachrichtentyp: String,
    pub versionsnummer: String,
    pub freigabenummer: String,
    pub verwaltende_organisation: String,
    /// Association assigned code, e.g. "2.4c"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anwendungscode: Option<String>,
}

/// UNH - Message Header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnhSegment {
    pub nachrichten_referenznummer: String,
    pub nachrichten_kennung: NachrichtenKennung,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allgemeine_zuordnungsreferenz: Option<String>,
}

impl UnhSegment {
    /// The message type, if it is one with group rules
    pub fn message_type(&self) -> Option<MessageType> {
        self.nachrichten_kennung.nachrichtentyp.parse().ok()
    }
}

/// BGM - Beginning of Message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgmSegment {
    pub dokumentenname_code: String,
    pub dokumentennummer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nachrichtenfunktion_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antwortart_code: Option<String>,
}

/// DTM - Date/Time/Period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtmSegment {
    /// e.g. "137" document date, "163"/"164" period start/end
    pub datum_uhrzeit_qualifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum_uhrzeit_wert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum_uhrzeit_format_code: Option<String>,
}

impl DtmSegment {
    /// Interpret the value according to its format code.
    ///
    /// `102` (CCYYMMDD) and `203` (CCYYMMDDHHMM) carry no offset and are
    /// read as UTC. `303` (CCYYMMDDHHMMZZZ) carries a signed hour offset.
    pub fn zeitpunkt(&self) -> Option<DateTime<FixedOffset>> {
        let wert = self.datum_uhrzeit_wert.as_deref()?;
        let utc = FixedOffset::east_opt(0)?;
        match self.datum_uhrzeit_format_code.as_deref()? {
            "102" => {
                let datum = NaiveDate::parse_from_str(wert, "%Y%m%d").ok()?;
                datum
                    .and_hms_opt(0, 0, 0)?
                    .and_local_timezone(utc)
                    .single()
            }
            "203" => NaiveDateTime::parse_from_str(wert, "%Y%m%d%H%M")
                .ok()?
                .and_local_timezone(utc)
                .single(),
            "303" => {
                if wert.len() != 15 || !wert.is_ascii() {
                    return None;
                }
                let (lokal, versatz) = wert.split_at(12);
                if !versatz.starts_with(['+', '-']) {
                    return None;
                }
                let stunden: i32 = versatz.parse().ok()?;
                let offset = FixedOffset::east_opt(stunden * 3600)?;
                NaiveDateTime::parse_from_str(lokal, "%Y%m%d%H%M")
                    .ok()?
                    .and_local_timezone(offset)
                    .single()
            }
            _ => None,
        }
    }
}

/// Party identification details (C082)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifikationDesBeteiligten {
    pub beteiligter_identifikation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeliste_code: Option<String>,
    /// e.g. "9" (GS1), "293" (BDEW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verantwortliche_stelle_code: Option<String>,
}

/// Party name (C080)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameDesBeteiligten {
    pub zeilen: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_code: Option<String>,
}

/// NAD - Name and Address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NadSegment {
    /// e.g. "MS" sender, "MR" recipient, "DP" delivery party
    pub beteiligter_qualifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifikation_des_beteiligten: Option<IdentifikationDesBeteiligten>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_und_anschrift: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_des_beteiligten: Option<NameDesBeteiligten>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strasse_und_hausnummer: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postleitzahl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laendercode: Option<String>,
}

/// RFF - Reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RffSegment {
    pub referenz_qualifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenz_identifikation: Option<String>,
}

/// Department or employee details (C056)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbteilungOderBearbeiter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abteilung_oder_bearbeiter_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abteilung_oder_bearbeiter: Option<String>,
}

/// CTA - Contact Information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaSegment {
    /// e.g. "IC" information contact
    pub funktion_des_ansprechpartners_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abteilung_oder_bearbeiter: Option<AbteilungOderBearbeiter>,
}

/// COM - Communication Contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComSegment {
    pub kommunikationsadresse_identifikation: String,
    /// e.g. "TE" telephone, "EM" e-mail
    pub kommunikationsadresse_qualifier: String,
}

/// Location identification (C517)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ortsangabe {
    /// Metering point id or market location id
    pub ortsangabe_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeliste_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verantwortliche_stelle_code: Option<String>,
}

/// LOC - Place/Location Identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocSegment {
    /// e.g. "172" metering point
    pub ortsangabe_qualifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ortsangabe: Option<Ortsangabe>,
}

/// LIN - Line Item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinSegment {
    pub positionsnummer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aktion_code: Option<String>,
}

/// Item number identification (C212)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarenLeistungsnummer {
    /// OBIS code or article number, e.g. "1-1:1.8.1"
    pub produkt_leistungsnummer: String,
    /// e.g. "SRW" (OBIS), "Z09"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_der_produkt_leistungsnummer_code: Option<String>,
}

/// PIA - Additional Product Id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiaSegment {
    pub produkt_erzeugnisnummer_qualifier: String,
    pub waren_leistungsnummer: WarenLeistungsnummer,
}

/// QTY - Quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QtySegment {
    /// e.g. "220" metered quantity
    pub menge_qualifier: String,
    /// Decimal value, read with the interchange's decimal mark
    pub menge: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masseinheit_code: Option<String>,
}

/// Status reason (C556)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statusanlass {
    pub statusanlass_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeliste_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verantwortliche_stelle_code: Option<String>,
}

/// STS - Status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StsSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuskategorie_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statusanlass: Option<Statusanlass>,
}

/// Characteristic description (C240)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merkmalsbeschreibung {
    pub merkmal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeliste_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verantwortliche_stelle_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merkmal: Option<String>,
}

/// CCI - Characteristic/Class Id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CciSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub klassentyp_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub massangaben_qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merkmalsbeschreibung: Option<Merkmalsbeschreibung>,
}

/// Section identifier carried by UNS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Abschnittskennung {
    /// Header/detail separation
    #[serde(rename = "D")]
    Detailabschnitt,
    /// Detail/summary separation
    #[serde(rename = "S")]
    Summenabschnitt,
}

impl Abschnittskennung {
    /// Parse the coded form ("D" or "S")
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "D" => Some(Self::Detailabschnitt),
            "S" => Some(Self::Summenabschnitt),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detailabschnitt => "D",
            Self::Summenabschnitt => "S",
        }
    }
}

/// UNS - Section Control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsSegment {
    pub abschnittskennung_codiert: Abschnittskennung,
}

/// Application error detail (C901)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anwendungsfehler {
    /// e.g. "Z10", "Z29"
    pub anwendungsfehler_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeliste_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verantwortliche_stelle_code: Option<String>,
}

/// ERC - Application Error Information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErcSegment {
    pub fehlercode: Anwendungsfehler,
}

/// FTX - Free Text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FtxSegment {
    /// e.g. "ABO" (discrepancy), "Z02"
    pub textbezug_qualifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textfunktion_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textreferenz: Option<String>,
    /// First (mandatory) text component of C108
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freier_text_m: Option<String>,
    /// Remaining (conditional) text components of C108, concatenated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freier_text_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprache_code: Option<String>,
}

/// UNT - Message Trailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntSegment {
    /// Segment count including UNH and UNT
    pub anzahl_der_segmente_in_einer_nachricht: usize,
    pub nachrichten_referenznummer: String,
}

/// UNZ - Interchange Trailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnzSegment {
    /// Number of messages in the interchange
    pub datenaustauschzaehler: usize,
    pub datenaustauschreferenz: String,
}

/// Any converted segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segment", rename_all = "UPPERCASE")]
pub enum Segment {
    Una(UnaSegment),
    Unb(UnbSegment),
    Unh(UnhSegment),
    Bgm(BgmSegment),
    Dtm(DtmSegment),
    Nad(NadSegment),
    Rff(RffSegment),
    Cta(CtaSegment),
    Com(ComSegment),
    Loc(LocSegment),
    Lin(LinSegment),
    Pia(PiaSegment),
    Qty(QtySegment),
    Sts(StsSegment),
    Cci(CciSegment),
    Uns(UnsSegment),
    Erc(ErcSegment),
    Ftx(FtxSegment),
    Unt(UntSegment),
    Unz(UnzSegment),
}

impl Segment {
    /// The kind of this record
    pub fn segment_type(&self) -> SegmentType {
        match self {
            Segment::Una(_) => SegmentType::Una,
            Segment::Unb(_) => SegmentType::Unb,
            Segment::Unh(_) => SegmentType::Unh,
            Segment::Bgm(_) => SegmentType::Bgm,
            Segment::Dtm(_) => SegmentType::Dtm,
            Segment::Nad(_) => SegmentType::Nad,
            Segment::Rff(_) => SegmentType::Rff,
            Segment::Cta(_) => SegmentType::Cta,
            Segment::Com(_) => SegmentType::Com,
            Segment::Loc(_) => SegmentType::Loc,
            Segment::Lin(_) => SegmentType::Lin,
            Segment::Pia(_) => SegmentType::Pia,
            Segment::Qty(_) => SegmentType::Qty,
            Segment::Sts(_) => SegmentType::Sts,
            Segment::Cci(_) => SegmentType::Cci,
            Segment::Uns(_) => SegmentType::Uns,
            Segment::Erc(_) => SegmentType::Erc,
            Segment::Ftx(_) => SegmentType::Ftx,
            Segment::Unt(_) => SegmentType::Unt,
            Segment::Unz(_) => SegmentType::Unz,
        }
    }
}
