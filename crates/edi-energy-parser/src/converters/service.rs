//! Converters for service segments: UNA, UNB, UNH, UNS, UNT, UNZ

use super::{ConversionContext, Elements, FieldError, SegmentConverter, part, required_part};
use edi_energy_model::{
    Abschnittskennung, Beteiligter, DatumUhrzeit, NachrichtenKennung, Segment, SegmentType,
    SyntaxBezeichner, UnaSegment, UnbSegment, UnhSegment, UnsSegment, UntSegment, UnzSegment,
};

/// UNA; element 1 carries the six service characters unsplit
pub struct UnaConverter;

impl SegmentConverter for UnaConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Una
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let advice = elements
            .raw(1)
            .ok_or_else(|| FieldError::missing("service_string_advice"))?;
        let chars: Vec<char> = advice.chars().collect();
        let &[component, element, decimal, release, reserved, segment] = chars.as_slice() else {
            return Err(FieldError::invalid(
                "service_string_advice",
                advice,
                "exactly 6 service characters",
            ));
        };

        Ok(Segment::Una(UnaSegment {
            komponententrennzeichen: component,
            datenelementtrennzeichen: element,
            dezimalzeichen: decimal,
            freigabezeichen: release,
            reserviert: reserved,
            segmentendezeichen: segment,
        }))
    }
}

fn beteiligter(components: &[String], field: &str) -> Result<Beteiligter, FieldError> {
    Ok(Beteiligter {
        beteiligter_bezeichnung: required_part(components, 0, field)?,
        teilnehmerbezeichnung_qualifier: part(components, 1),
        interne_kennung: part(components, 2),
    })
}

/// UNB - Interchange Header
pub struct UnbConverter;

impl SegmentConverter for UnbConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Unb
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let syntax = elements.components(1);
        let syntax_bezeichner = SyntaxBezeichner {
            syntax_kennung: required_part(&syntax, 0, "syntax_kennung")?,
            syntax_versionsnummer: required_part(&syntax, 1, "syntax_versionsnummer")?,
            dienstcodeliste_version: part(&syntax, 2),
            zeichensatz_kodierung: part(&syntax, 3),
        };

        let absender = beteiligter(&elements.components(2), "absender")?;
        let empfaenger = beteiligter(&elements.components(3), "empfaenger")?;

        let erstellung = elements.components(4);
        let datum_uhrzeit_der_erstellung = DatumUhrzeit {
            datum: required_part(&erstellung, 0, "datum")?,
            uhrzeit: required_part(&erstellung, 1, "uhrzeit")?,
        };

        Ok(Segment::Unb(UnbSegment {
            syntax_bezeichner,
            absender,
            empfaenger,
            datum_uhrzeit_der_erstellung,
            datenaustauschreferenz: elements.required(5, "datenaustauschreferenz")?,
            referenz_passwort: elements.optional(6),
            anwendungsreferenz: elements.optional(7),
            verarbeitungsprioritaet_code: elements.optional(8),
            bestaetigungsanforderung: elements.optional(9),
            kommunikationsvereinbarung_id: elements.optional(10),
            testkennzeichen: elements.optional(11),
        }))
    }
}

/// UNH - Message Header
pub struct UnhConverter;

impl SegmentConverter for UnhConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Unh
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let kennung = elements.components(2);
        Ok(Segment::Unh(UnhSegment {
            nachrichten_referenznummer: elements.required(1, "nachrichten_referenznummer")?,
            nachrichten_kennung: NachrichtenKennung {
                nachrichtentyp: required_part(&kennung, 0, "nachrichtentyp")?,
                versionsnummer: required_part(&kennung, 1, "versionsnummer")?,
                freigabenummer: required_part(&kennung, 2, "freigabenummer")?,
                verwaltende_organisation: required_part(&kennung, 3, "verwaltende_organisation")?,
                anwendungscode: part(&kennung, 4),
            },
            allgemeine_zuordnungsreferenz: elements.optional(3),
        }))
    }
}

/// UNS - Section Control
pub struct UnsConverter;

impl SegmentConverter for UnsConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Uns
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let code = elements.required(1, "abschnittskennung_codiert")?;
        let abschnittskennung_codiert = Abschnittskennung::from_code(&code).ok_or_else(|| {
            FieldError::invalid("abschnittskennung_codiert", &code, "'D' or 'S'")
        })?;
        Ok(Segment::Uns(UnsSegment {
            abschnittskennung_codiert,
        }))
    }
}

/// UNT - Message Trailer
pub struct UntConverter;

impl SegmentConverter for UntConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Unt
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        Ok(Segment::Unt(UntSegment {
            anzahl_der_segmente_in_einer_nachricht: elements
                .count(1, "anzahl_der_segmente_in_einer_nachricht")?,
            nachrichten_referenznummer: elements.required(2, "nachrichten_referenznummer")?,
        }))
    }
}

/// UNZ - Interchange Trailer
pub struct UnzConverter;

impl SegmentConverter for UnzConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Unz
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        _ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        Ok(Segment::Unz(UnzSegment {
            datenaustauschzaehler: elements.count(1, "datenaustauschzaehler")?,
            datenaustauschreferenz: elements.required(2, "datenaustauschreferenz")?,
        }))
    }
}
