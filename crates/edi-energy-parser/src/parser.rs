//! Interchange parser
//!
//! Drives one parse: discovers the service characters, walks the segment
//! stream, checks each segment against the interchange nesting, resolves
//! its segment group and hands it to the matching handler.

use crate::config::{ConversionErrorPolicy, ParserConfig};
use crate::context::{InterchangeState, ParsingContext};
use crate::converters::ConverterFactory;
use crate::handlers::HandlerFactory;
use crate::resolvers::{self, GroupStateResolver, get_resolver};
use crate::syntax::Separators;
use crate::{Error, ErrorKind, Result};
use edi_energy_model::{Interchange, SegmentType};
use tracing::{debug, info, warn};

/// Parser for MSCONS and APERAK interchanges
pub struct EdifactParser {
    config: ParserConfig,
    handlers: HandlerFactory,
}

impl EdifactParser {
    /// Parser with the default configuration
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            handlers: HandlerFactory::new(&ConverterFactory::new()),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `text` into an interchange
    pub fn parse(&self, text: &str) -> Result<Interchange> {
        self.parse_with_limit(text, self.config.max_lines_to_parse)
    }

    /// Parse at most `max_lines_to_parse` segments of `text`; the UNA
    /// counts as the first one. Without a limit the configured one applies.
    pub fn parse_with_limit(
        &self,
        text: &str,
        max_lines_to_parse: Option<usize>,
    ) -> Result<Interchange> {
        let limit = max_lines_to_parse.or(self.config.max_lines_to_parse);
        let text = text.trim_start_matches('\u{feff}').trim_start();
        if text.is_empty() {
            return Err(Error::syntax(1, "Empty input", None));
        }

        let (separators, una) = Separators::detect(text);
        if una.is_none() && text.starts_with("UNA") {
            return Err(Error::syntax(
                1,
                "Incomplete UNA service string advice",
                Some(text.chars().take(9).collect()),
            ));
        }
        debug!(?separators, una = una.is_some(), "service characters");

        let mut run = ParseRun {
            handlers: &self.handlers,
            policy: self.config.on_conversion_error,
            ctx: ParsingContext::new(separators),
            resolver: None,
            line_number: 0,
        };

        let mut body = text;
        if let Some(una) = una {
            body = &text[una.len()..];
            if limit.is_some_and(|max| max == 0) {
                info!(max_lines_to_parse = 0, "line limit reached, parsing stopped");
                return Ok(run.ctx.into_interchange());
            }
            run.line_number = 1;
            run.process(SegmentType::Una, &["UNA", &una[3..]], una)?;
        }

        for raw in separators.segments(body) {
            let line_number = run.line_number + 1;
            if limit.is_some_and(|max| line_number > max) {
                info!(
                    max_lines_to_parse = limit,
                    "line limit reached, parsing stopped"
                );
                break;
            }
            let raw = raw.map_err(|issue| Error::Syntax {
                line_number,
                message: issue.message,
                value: issue.value,
            })?;
            run.line_number = line_number;

            let elements = separators.split_raw(raw, separators.element);
            let tag = elements.first().copied().unwrap_or_default();
            let Some(segment_type) = SegmentType::from_tag(tag) else {
                warn!(line_number, tag, "unknown segment skipped");
                run.ctx.count_segment();
                continue;
            };
            run.process(segment_type, &elements, raw)?;
        }

        let segments = run.line_number;
        let interchange = run.ctx.into_interchange();
        if self.config.validate_envelopes {
            interchange.validate().map_err(|e| Error::Structural {
                line_number: segments,
                segment_type: None,
                message: e.to_string(),
                value: None,
            })?;
        }

        info!(
            segments,
            messages = interchange.nachrichten.len(),
            "interchange parsed"
        );
        Ok(interchange)
    }
}

impl Default for EdifactParser {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single `parse` call
struct ParseRun<'a> {
    handlers: &'a HandlerFactory,
    policy: ConversionErrorPolicy,
    ctx: ParsingContext,
    resolver: Option<GroupStateResolver>,
    line_number: usize,
}

impl ParseRun<'_> {
    fn process(&mut self, segment_type: SegmentType, elements: &[&str], raw: &str) -> Result<()> {
        let line_number = self.line_number;
        self.check_structure(segment_type, raw)?;
        self.ctx.count_segment();

        let group = if segment_type.is_interchange_level() {
            None
        } else {
            let current = self.ctx.current_segment_group;
            match self.resolver {
                Some(resolver) => resolver.resolve(segment_type, current, &self.ctx),
                None => resolvers::pass_through(current),
            }
        };

        let handlers = self.handlers;
        match handlers.get_handler(segment_type, self.ctx.message_type) {
            Some(handler) => {
                if let Err(e) = handler.handle(line_number, elements, group, &mut self.ctx) {
                    if !self.skips(&e, segment_type) {
                        return Err(e);
                    }
                    warn!(line_number, segment = %segment_type, error = %e, "segment skipped");
                }
            }
            None => match self.ctx.message_type {
                Some(message_type) => warn!(
                    line_number,
                    segment = %segment_type,
                    %message_type,
                    "segment not allowed in message, skipped"
                ),
                // bodies of unknown message types were reported with their UNH
                None => debug!(line_number, segment = %segment_type, "no handler for segment"),
            },
        }

        match segment_type {
            SegmentType::Unh => {
                self.resolver = self
                    .ctx
                    .current_message()
                    .and_then(|m| get_resolver(&m.unh().nachrichten_kennung.nachrichtentyp));
            }
            SegmentType::Unt => self.resolver = None,
            _ => {}
        }

        self.ctx.last_segment_type = Some(segment_type);
        self.ctx.current_segment_group = group;
        Ok(())
    }

    /// Conversion failures of body segments may be skipped; frame segments
    /// always abort
    fn skips(&self, error: &Error, segment_type: SegmentType) -> bool {
        let frame = matches!(
            segment_type,
            SegmentType::Una
                | SegmentType::Unb
                | SegmentType::Unh
                | SegmentType::Unt
                | SegmentType::Unz
        );
        self.policy == ConversionErrorPolicy::SkipSegment
            && error.kind() == ErrorKind::FieldConversion
            && !frame
    }

    fn check_structure(&self, segment_type: SegmentType, raw: &str) -> Result<()> {
        let state = self.ctx.state;
        let allowed = match (state, segment_type) {
            (_, SegmentType::Una) => {
                self.line_number == 1 && state == InterchangeState::BeforeInterchange
            }
            (InterchangeState::BeforeInterchange, SegmentType::Unb | SegmentType::Unh)
            | (InterchangeState::InterchangeOpen, SegmentType::Unh | SegmentType::Unz) => true,
            (
                InterchangeState::MessageOpen,
                SegmentType::Unb | SegmentType::Unh | SegmentType::Unz,
            ) => false,
            (InterchangeState::MessageOpen, _) => true,
            _ => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(Error::Structural {
                line_number: self.line_number,
                segment_type: Some(segment_type),
                message: format!(
                    "{segment_type} segment is not allowed {}",
                    state.describe()
                ),
                value: Some(raw.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edi_energy_model::EdifactMessage;

    const APERAK: &str = "UNA:+.? '\
UNB+UNOC:3+9900259000002:500+9900357000004:500+200426:1151+ABC4711'\
UNH+1+APERAK:D:07B:UN:2.1e'\
BGM+313+MSI5422'\
ERC+Z10'\
UNT+4+1'\
UNZ+1+ABC4711'";

    #[test]
    fn test_parse_minimal_aperak() {
        let interchange = EdifactParser::new().parse(APERAK).unwrap();
        assert!(interchange.una_service_string_advice.is_some());
        assert_eq!(interchange.nachrichten.len(), 1);
        let EdifactMessage::Aperak(message) = &interchange.nachrichten[0] else {
            panic!("expected APERAK");
        };
        assert_eq!(message.sg4_fehler_beschreibung.len(), 1);
        assert_eq!(message.gezaehlte_segmente, 4);
    }

    #[test]
    fn test_without_una_uses_default_separators() {
        let text = APERAK.trim_start_matches("UNA:+.? '");
        let interchange = EdifactParser::new().parse(text).unwrap();
        assert!(interchange.una_service_string_advice.is_none());
        assert_eq!(interchange.nachrichten.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let err = EdifactParser::new().parse("  \r\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.line_number(), 1);
    }

    #[test]
    fn test_incomplete_una() {
        let err = EdifactParser::new().parse("UNA:+.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.value(), Some("UNA:+."));
    }

    #[test]
    fn test_line_limit() {
        let interchange = EdifactParser::new()
            .parse_with_limit(APERAK, Some(4))
            .unwrap();
        assert!(interchange.unb_nutzdaten_kopfsegment.is_some());
        assert_eq!(interchange.nachrichten.len(), 1);
        assert!(interchange.nachrichten[0].bgm().is_some());
        assert!(interchange.nachrichten[0].unt().is_none());
        assert!(interchange.unz_nutzdaten_endsegment.is_none());

        let interchange = EdifactParser::new()
            .parse_with_limit(APERAK, Some(0))
            .unwrap();
        assert_eq!(interchange, Interchange::new());
    }

    #[test]
    fn test_segment_after_unz() {
        let text = format!("{APERAK}UNH+2+APERAK:D:07B:UN:2.1e'");
        let err = EdifactParser::new().parse(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(err.line_number(), 8);
        assert!(err.to_string().contains("after the interchange trailer"));
    }

    #[test]
    fn test_missing_terminator_reports_line() {
        let text = APERAK.trim_end_matches('\'');
        let err = EdifactParser::new().parse(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.line_number(), 7);
        assert_eq!(err.value(), Some("UNZ+1+ABC4711"));
    }
}
