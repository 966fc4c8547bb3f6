//! Converters for message body segments

use super::{
    ConversionContext, Elements, FieldError, SegmentConverter, parse_decimal, part,
    required_part,
};
use edi_energy_model::{
    AbteilungOderBearbeiter, Anwendungsfehler, BgmSegment, CciSegment, ComSegment, CtaSegment,
    DtmSegment, ErcSegment, FtxSegment, IdentifikationDesBeteiligten, LinSegment, LocSegment,
    Merkmalsbeschreibung, NadSegment, NameDesBeteiligten, Ortsangabe, PiaSegment, QtySegment,
    RffSegment, Segment, SegmentType, Statusanlass, StsSegment, WarenLeistungsnummer,
};

/// Components with trailing empty ones removed, `None` if nothing is left
fn lines(mut components: Vec<String>) -> Option<Vec<String>> {
    while components.last().is_some_and(String::is_empty) {
        components.pop();
    }
    (!components.is_empty()).then_some(components)
}

/// BGM - Beginning of Message
pub struct BgmConverter;

impl SegmentConverter for BgmConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Bgm
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        Ok(Segment::Bgm(BgmSegment {
            dokumentenname_code: elements.required(1, "dokumentenname_code")?,
            dokumentennummer: elements.required(2, "dokumentennummer")?,
            nachrichtenfunktion_code: elements.optional(3),
            antwortart_code: elements.optional(4),
        }))
    }
}

/// DTM - Date/Time/Period, value kept as written
pub struct DtmConverter;

impl SegmentConverter for DtmConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Dtm
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let components = elements.components(1);
        Ok(Segment::Dtm(DtmSegment {
            datum_uhrzeit_qualifier: required_part(&components, 0, "datum_uhrzeit_qualifier")?,
            datum_uhrzeit_wert: part(&components, 1),
            datum_uhrzeit_format_code: part(&components, 2),
        }))
    }
}

/// NAD - Name and Address
pub struct NadConverter;

impl SegmentConverter for NadConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Nad
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let identifikation = elements.components(2);
        let identifikation_des_beteiligten = match part(&identifikation, 0) {
            Some(beteiligter_identifikation) => Some(IdentifikationDesBeteiligten {
                beteiligter_identifikation,
                codeliste_code: part(&identifikation, 1),
                verantwortliche_stelle_code: part(&identifikation, 2),
            }),
            None => None,
        };

        let mut name = elements.components(4);
        let format_code = part(&name, 5);
        name.truncate(5);
        let name_des_beteiligten = match (lines(name), format_code) {
            (None, None) => None,
            (zeilen, format_code) => Some(NameDesBeteiligten {
                zeilen: zeilen.unwrap_or_default(),
                format_code,
            }),
        };

        Ok(Segment::Nad(NadSegment {
            beteiligter_qualifier: elements.required(1, "beteiligter_qualifier")?,
            identifikation_des_beteiligten,
            name_und_anschrift: lines(elements.components(3)),
            name_des_beteiligten,
            strasse_und_hausnummer: lines(elements.components(5)),
            ort: elements.optional(6),
            region_code: elements.optional(7),
            postleitzahl: elements.optional(8),
            laendercode: elements.optional(9),
        }))
    }
}

/// RFF - Reference
pub struct RffConverter;

impl SegmentConverter for RffConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Rff
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let components = elements.components(1);
        Ok(Segment::Rff(RffSegment {
            referenz_qualifier: required_part(&components, 0, "referenz_qualifier")?,
            referenz_identifikation: part(&components, 1),
        }))
    }
}

/// CTA - Contact Information
pub struct CtaConverter;

impl SegmentConverter for CtaConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Cta
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let bearbeiter = elements.components(2);
        let abteilung_oder_bearbeiter = match (part(&bearbeiter, 0), part(&bearbeiter, 1)) {
            (None, None) => None,
            (code, name) => Some(AbteilungOderBearbeiter {
                abteilung_oder_bearbeiter_code: code,
                abteilung_oder_bearbeiter: name,
            }),
        };

        Ok(Segment::Cta(CtaSegment {
            funktion_des_ansprechpartners_code: elements
                .required(1, "funktion_des_ansprechpartners_code")?,
            abteilung_oder_bearbeiter,
        }))
    }
}

/// COM - Communication Contact
pub struct ComConverter;

impl SegmentConverter for ComConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Com
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let components = elements.components(1);
        Ok(Segment::Com(ComSegment {
            kommunikationsadresse_identifikation: required_part(
                &components,
                0,
                "kommunikationsadresse_identifikation",
            )?,
            kommunikationsadresse_qualifier: required_part(
                &components,
                1,
                "kommunikationsadresse_qualifier",
            )?,
        }))
    }
}

/// LOC - Place/Location Identification
pub struct LocConverter;

impl SegmentConverter for LocConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Loc
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let components = elements.components(2);
        let ortsangabe = part(&components, 0).map(|ortsangabe_code| Ortsangabe {
            ortsangabe_code,
            codeliste_code: part(&components, 1),
            verantwortliche_stelle_code: part(&components, 2),
        });

        Ok(Segment::Loc(LocSegment {
            ortsangabe_qualifier: elements.required(1, "ortsangabe_qualifier")?,
            ortsangabe,
        }))
    }
}

/// LIN - Line Item
pub struct LinConverter;

impl SegmentConverter for LinConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Lin
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        Ok(Segment::Lin(LinSegment {
            positionsnummer: elements.required(1, "positionsnummer")?,
            aktion_code: elements.optional(2),
        }))
    }
}

/// PIA - Additional Product Id
pub struct PiaConverter;

impl SegmentConverter for PiaConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Pia
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let nummer = elements.components(2);
        Ok(Segment::Pia(PiaSegment {
            produkt_erzeugnisnummer_qualifier: elements
                .required(1, "produkt_erzeugnisnummer_qualifier")?,
            waren_leistungsnummer: WarenLeistungsnummer {
                produkt_leistungsnummer: required_part(&nummer, 0, "produkt_leistungsnummer")?,
                art_der_produkt_leistungsnummer_code: part(&nummer, 1),
            },
        }))
    }
}

/// QTY - Quantity; the amount is read with the interchange decimal mark
pub struct QtyConverter;

impl SegmentConverter for QtyConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Qty
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let components = elements.components(1);
        let menge = required_part(&components, 1, "menge")?;
        Ok(Segment::Qty(QtySegment {
            menge_qualifier: required_part(&components, 0, "menge_qualifier")?,
            menge: parse_decimal(&menge, ctx.separators.decimal, "menge")?,
            masseinheit_code: part(&components, 2),
        }))
    }
}

/// STS - Status
pub struct StsConverter;

impl SegmentConverter for StsConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Sts
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let anlass = elements.components(3);
        let statusanlass = part(&anlass, 0).map(|statusanlass_code| Statusanlass {
            statusanlass_code,
            codeliste_code: part(&anlass, 1),
            verantwortliche_stelle_code: part(&anlass, 2),
        });

        Ok(Segment::Sts(StsSegment {
            statuskategorie_code: elements.optional(1),
            status_code: elements.optional(2),
            statusanlass,
        }))
    }
}

/// CCI - Characteristic/Class Id
pub struct CciConverter;

impl SegmentConverter for CciConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Cci
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let beschreibung = elements.components(3);
        let merkmalsbeschreibung = part(&beschreibung, 0).map(|merkmal_code| Merkmalsbeschreibung {
            merkmal_code,
            codeliste_code: part(&beschreibung, 1),
            verantwortliche_stelle_code: part(&beschreibung, 2),
            merkmal: part(&beschreibung, 3),
        });

        Ok(Segment::Cci(CciSegment {
            klassentyp_code: elements.optional(1),
            massangaben_qualifier: elements.optional(2),
            merkmalsbeschreibung,
        }))
    }
}

/// ERC - Application Error Information
pub struct ErcConverter;

impl SegmentConverter for ErcConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Erc
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let components = elements.components(1);
        Ok(Segment::Erc(ErcSegment {
            fehlercode: Anwendungsfehler {
                anwendungsfehler_code: required_part(&components, 0, "anwendungsfehler_code")?,
                codeliste_code: part(&components, 1),
                verantwortliche_stelle_code: part(&components, 2),
            },
        }))
    }
}

/// FTX - Free Text.
///
/// The first component of the text composite becomes `freier_text_m`; the
/// remaining components are concatenated into `freier_text_c`.
pub struct FtxConverter;

impl SegmentConverter for FtxConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Ftx
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let text = elements.components(4);
        let freier_text_m = part(&text, 0);
        let freier_text_c = text
            .get(1..)
            .map(<[String]>::concat)
            .filter(|c| !c.is_empty());

        Ok(Segment::Ftx(FtxSegment {
            textbezug_qualifier: elements.required(1, "textbezug_qualifier")?,
            textfunktion_code: elements.optional(2),
            textreferenz: elements.optional(3),
            freier_text_m,
            freier_text_c,
            sprache_code: elements.optional(5),
        }))
    }
}
