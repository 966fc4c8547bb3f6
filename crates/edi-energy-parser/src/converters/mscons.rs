//! MSCONS specific converters

use super::{ConversionContext, DtmConverter, Elements, FieldError, SegmentConverter};
use edi_energy_model::{Segment, SegmentType};

/// DTM for MSCONS. Stricter than the default converter used for APERAK:
/// values with format code 102, 203 or 303 must denote a real point in
/// time, since they delimit metering periods.
pub struct StrictDtmConverter;

const CHECKED_FORMATS: [&str; 3] = ["102", "203", "303"];

impl SegmentConverter for StrictDtmConverter {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Dtm
    }

    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        ctx: &ConversionContext<'_>,
    ) -> Result<Segment, FieldError> {
        let segment = DtmConverter.convert_internal(elements, ctx)?;
        if let Segment::Dtm(dtm) = &segment {
            let checked = dtm
                .datum_uhrzeit_format_code
                .as_deref()
                .is_some_and(|format| CHECKED_FORMATS.contains(&format));
            if checked && dtm.zeitpunkt().is_none() {
                let wert = dtm.datum_uhrzeit_wert.as_deref().unwrap_or_default();
                return Err(FieldError::invalid(
                    "datum_uhrzeit_wert",
                    wert,
                    "a date matching its format code",
                ));
            }
        }
        Ok(segment)
    }
}
