//! Segment converters
//!
//! A converter turns the raw elements of one segment into a typed
//! [`Segment`] record. Elements arrive split on the element separator with
//! their release sequences intact; components are split and unescaped
//! here, so a released separator inside a composite survives as data.
//!
//! Converters are looked up through the [`ConverterFactory`], which checks
//! message type specific overrides before the defaults.

mod body;
mod mscons;
mod service;

pub use body::{
    BgmConverter, CciConverter, ComConverter, CtaConverter, DtmConverter, ErcConverter,
    FtxConverter, LinConverter, LocConverter, NadConverter, PiaConverter, QtyConverter,
    RffConverter, StsConverter,
};
pub use mscons::StrictDtmConverter;
pub use service::{
    UnaConverter, UnbConverter, UnhConverter, UnsConverter, UntConverter, UnzConverter,
};

use crate::syntax::Separators;
use crate::{Error, Result};
use edi_energy_model::{MessageType, Segment, SegmentGroup, SegmentType};
use std::collections::HashMap;
use std::sync::Arc;

/// Where in the stream a segment is being converted
#[derive(Debug, Clone, Copy)]
pub struct ConversionContext<'a> {
    /// 1-based segment line
    pub line_number: usize,
    pub last_segment_type: Option<SegmentType>,
    pub current_group: Option<SegmentGroup>,
    /// Type of the open message, `None` outside messages
    pub message_type: Option<MessageType>,
    pub separators: &'a Separators,
}

impl<'a> ConversionContext<'a> {
    /// Context for a segment outside any message and group
    pub fn new(line_number: usize, separators: &'a Separators) -> Self {
        Self {
            line_number,
            last_segment_type: None,
            current_group: None,
            message_type: None,
            separators,
        }
    }
}

/// Failure inside a converter, before line and segment are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub message: String,
    pub value: Option<String>,
}

impl FieldError {
    pub fn missing(field: &str) -> Self {
        Self {
            message: format!("Missing required field '{field}'"),
            value: None,
        }
    }

    pub fn invalid(field: &str, value: &str, expected: &str) -> Self {
        Self {
            message: format!("Invalid value for '{field}': expected {expected}"),
            value: Some(value.to_string()),
        }
    }
}

/// Converts raw segment elements into a typed record
pub trait SegmentConverter: Send + Sync {
    /// The segment kind this converter produces
    fn segment_type(&self) -> SegmentType;

    /// Build the record; `elements.raw(0)` is the segment tag
    fn convert_internal(
        &self,
        elements: &Elements<'_>,
        ctx: &ConversionContext<'_>,
    ) -> std::result::Result<Segment, FieldError>;

    /// Convert `elements`, attaching line, segment and message type to any
    /// failure
    fn convert(&self, elements: &[&str], ctx: &ConversionContext<'_>) -> Result<Segment> {
        let elements = Elements::new(elements, ctx.separators);
        self.convert_internal(&elements, ctx)
            .map_err(|e| Error::FieldConversion {
                line_number: ctx.line_number,
                segment_type: self.segment_type(),
                message_type: ctx.message_type,
                message: e.message,
                value: e.value,
            })
    }
}

/// Raw elements of one segment with access helpers
#[derive(Debug, Clone, Copy)]
pub struct Elements<'a> {
    raw: &'a [&'a str],
    separators: &'a Separators,
}

impl<'a> Elements<'a> {
    pub fn new(raw: &'a [&'a str], separators: &'a Separators) -> Self {
        Self { raw, separators }
    }

    /// Number of elements including the tag
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The element at `index` as it appeared on the wire, `None` when
    /// missing or empty
    pub fn raw(&self, index: usize) -> Option<&'a str> {
        self.raw.get(index).copied().filter(|e| !e.is_empty())
    }

    /// Unescaped components of the element at `index`; empty when the
    /// element is missing
    pub fn components(&self, index: usize) -> Vec<String> {
        self.raw(index)
            .map(|element| self.separators.split_components(element))
            .unwrap_or_default()
    }

    /// First component of the element at `index`
    pub fn optional(&self, index: usize) -> Option<String> {
        let element = self.raw(index)?;
        let first = self
            .separators
            .split_raw(element, self.separators.component)
            .into_iter()
            .next()?;
        Some(self.separators.unescape(first)).filter(|c| !c.is_empty())
    }

    pub fn required(&self, index: usize, field: &str) -> std::result::Result<String, FieldError> {
        self.optional(index).ok_or_else(|| FieldError::missing(field))
    }

    /// Non-negative integer at `index`
    pub fn count(&self, index: usize, field: &str) -> std::result::Result<usize, FieldError> {
        let text = self.required(index, field)?;
        parse_count(&text, field)
    }
}

/// Component `index` of a split composite, `None` when missing or empty
pub fn part(components: &[String], index: usize) -> Option<String> {
    components.get(index).filter(|c| !c.is_empty()).cloned()
}

pub fn required_part(
    components: &[String],
    index: usize,
    field: &str,
) -> std::result::Result<String, FieldError> {
    part(components, index).ok_or_else(|| FieldError::missing(field))
}

/// Digits only; signs and blanks are rejected
pub fn parse_count(text: &str, field: &str) -> std::result::Result<usize, FieldError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::invalid(field, text, "a non-negative integer"));
    }
    text.parse()
        .map_err(|_| FieldError::invalid(field, text, "a non-negative integer"))
}

/// Decimal number written with `decimal_mark`, e.g. `4250,5` for `,`
pub fn parse_decimal(
    text: &str,
    decimal_mark: char,
    field: &str,
) -> std::result::Result<f64, FieldError> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut marks = 0;
    let mut digit_count = 0;
    for c in digits.chars() {
        if c == decimal_mark {
            marks += 1;
        } else if c.is_ascii_digit() {
            digit_count += 1;
        } else {
            return Err(FieldError::invalid(field, text, "a decimal number"));
        }
    }
    if marks > 1 || digit_count == 0 {
        return Err(FieldError::invalid(field, text, "a decimal number"));
    }

    text.replace(decimal_mark, ".")
        .parse()
        .map_err(|_| FieldError::invalid(field, text, "a decimal number"))
}

/// Lookup of converters by segment type and message type
pub struct ConverterFactory {
    defaults: HashMap<SegmentType, Arc<dyn SegmentConverter>>,
    overrides: HashMap<(SegmentType, MessageType), Arc<dyn SegmentConverter>>,
}

impl ConverterFactory {
    /// Factory with a default converter for every segment type
    pub fn new() -> Self {
        let mut factory = Self {
            defaults: HashMap::new(),
            overrides: HashMap::new(),
        };

        factory.register(Arc::new(UnaConverter));
        factory.register(Arc::new(UnbConverter));
        factory.register(Arc::new(UnhConverter));
        factory.register(Arc::new(BgmConverter));
        factory.register(Arc::new(DtmConverter));
        factory.register(Arc::new(NadConverter));
        factory.register(Arc::new(RffConverter));
        factory.register(Arc::new(CtaConverter));
        factory.register(Arc::new(ComConverter));
        factory.register(Arc::new(LocConverter));
        factory.register(Arc::new(LinConverter));
        factory.register(Arc::new(PiaConverter));
        factory.register(Arc::new(QtyConverter));
        factory.register(Arc::new(StsConverter));
        factory.register(Arc::new(CciConverter));
        factory.register(Arc::new(UnsConverter));
        factory.register(Arc::new(ErcConverter));
        factory.register(Arc::new(FtxConverter));
        factory.register(Arc::new(UntConverter));
        factory.register(Arc::new(UnzConverter));

        factory.register_override(MessageType::Mscons, Arc::new(StrictDtmConverter));

        factory
    }

    /// Register `converter` as the default for its segment type
    pub fn register(&mut self, converter: Arc<dyn SegmentConverter>) {
        self.defaults.insert(converter.segment_type(), converter);
    }

    /// Register `converter` for its segment type within `message_type`
    pub fn register_override(
        &mut self,
        message_type: MessageType,
        converter: Arc<dyn SegmentConverter>,
    ) {
        self.overrides
            .insert((converter.segment_type(), message_type), converter);
    }

    /// Override for `(segment_type, message_type)` if one exists,
    /// otherwise the default converter
    pub fn get_converter(
        &self,
        segment_type: SegmentType,
        message_type: Option<MessageType>,
    ) -> Option<&Arc<dyn SegmentConverter>> {
        message_type
            .and_then(|m| self.overrides.get(&(segment_type, m)))
            .or_else(|| self.defaults.get(&segment_type))
    }
}

impl Default for ConverterFactory {
    fn default() -> Self {
        Self::new()
    }
}
