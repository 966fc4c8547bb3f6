//! Parser behaviour on edge cases: limits, structure, policies, custom
//! service characters

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use edi_energy_model::{EdifactMessage, SegmentType};
use edi_energy_parser::{ConversionErrorPolicy, EdifactParser, ErrorKind, ParserConfig, parse};
use tempfile::NamedTempFile;

const MSCONS_SAMPLE: &str = include_str!("fixtures/mscons_sample.edi");

/// Log output collected from a `tracing_subscriber::fmt` writer
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_captured_logs<T>(level: tracing::Level, f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(level)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    (result, output)
}

fn aperak(body: &str, segment_count: usize) -> String {
    format!(
        "UNA:+.? '\n\
         UNB+UNOC:3+9900357000004:500+9900259000002:500+200426:1151+REF1'\n\
         UNH+1+APERAK:D:07B:UN:2.1e'\n\
         BGM+313+DOC1'\n\
         {body}\
         UNT+{segment_count}+1'\n\
         UNZ+1+REF1'\n"
    )
}

#[test]
fn test_truncation_at_line_limit() {
    let interchange = parse(MSCONS_SAMPLE, Some(12)).unwrap();

    assert_eq!(interchange.nachrichten.len(), 1);
    assert!(interchange.unz_nutzdaten_endsegment.is_none());
    let EdifactMessage::Mscons(message) = &interchange.nachrichten[0] else {
        panic!("expected MSCONS");
    };
    // line 12 is the NAD+DP that opens the first delivery address
    assert_eq!(message.sg5_lieferanschrift.len(), 1);
    assert!(message.sg5_lieferanschrift[0].sg6_messlokation.is_empty());
    assert!(message.unt_nachrichtenendsegment.is_none());
    // UNH at line 3 up to the NAD at line 12
    assert_eq!(message.gezaehlte_segmente, 10);
}

#[test]
fn test_configured_limit_applies() {
    let parser = EdifactParser::with_config(ParserConfig::new().max_lines_to_parse(2));
    let interchange = parser.parse(MSCONS_SAMPLE).unwrap();
    assert!(interchange.unb_nutzdaten_kopfsegment.is_some());
    assert!(interchange.nachrichten.is_empty());
}

#[test]
fn test_body_segment_before_message_header() {
    let text = "UNB+UNOC:3+A:500+B:500+200426:1151+R'DTM+137:20200426:102'";
    let err = parse(text, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.line_number(), 2);
    assert_eq!(err.segment_type(), Some(SegmentType::Dtm));
    assert_eq!(err.value(), Some("DTM+137:20200426:102"));
}

#[test]
fn test_nested_message_header() {
    let text = aperak("UNH+2+APERAK:D:07B:UN:2.1e'\n", 4);
    let err = parse(&text, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.line_number(), 5);
}

#[test]
fn test_unknown_segment_is_skipped_and_counted() {
    let text = aperak("XYZ+1'\nERC+Z10'\n", 5);
    let parser = EdifactParser::with_config(ParserConfig::new().validate_envelopes(true));
    let interchange = parser.parse(&text).unwrap();

    let EdifactMessage::Aperak(message) = &interchange.nachrichten[0] else {
        panic!("expected APERAK");
    };
    assert_eq!(message.sg4_fehler_beschreibung.len(), 1);
    assert_eq!(message.gezaehlte_segmente, 5);
}

#[test]
fn test_unknown_segment_is_logged_as_warning() {
    let text = aperak("XYZ+1'\nERC+Z10'\n", 5);
    let (result, logs) = with_captured_logs(tracing::Level::WARN, || parse(&text, None));

    assert!(result.is_ok());
    assert!(logs.contains("WARN"));
    assert!(logs.contains("unknown segment skipped"));
    assert!(logs.contains("XYZ"));
}

#[test]
fn test_segment_without_handler_in_message_is_skipped_with_warning() {
    let text = "UNA:+.? '\n\
UNB+UNOC:3+A:500+B:500+200426:1151+R'\n\
UNH+1+MSCONS:D:04B:UN:2.4c'\n\
BGM+7+MSI1+9'\n\
FTX+ABO+++Hinweis'\n\
UNS+D'\n\
NAD+DP'\n\
UNT+6+1'\n\
UNZ+1+R'\n";
    let parser = EdifactParser::with_config(ParserConfig::new().validate_envelopes(true));
    let (result, logs) = with_captured_logs(tracing::Level::WARN, || parser.parse(text));
    let interchange = result.unwrap();

    let EdifactMessage::Mscons(message) = &interchange.nachrichten[0] else {
        panic!("expected MSCONS");
    };
    assert_eq!(message.gezaehlte_segmente, 6);
    assert!(message.uns_abschnitts_kontrollsegment.is_some());
    assert_eq!(message.sg5_lieferanschrift.len(), 1);

    assert!(logs.contains("WARN"));
    assert!(logs.contains("segment not allowed in message, skipped"));
    assert!(logs.contains("FTX"));
    assert!(logs.contains("line_number=5"));
}

#[test]
fn test_unknown_message_type_is_logged_as_warning() {
    let text = "UNB+UNOC:3+A:500+B:500+200426:1151+R'\
UNH+1+UTILMD:D:11A:UN:5.2'\
UNT+2+1'\
UNZ+1+R'";
    let (result, logs) = with_captured_logs(tracing::Level::WARN, || parse(text, None));

    assert_eq!(result.unwrap().nachrichten.len(), 1);
    assert!(logs.contains("WARN"));
    assert!(logs.contains("UTILMD"));
    assert!(logs.contains("segments stay at interchange level"));
}

#[test]
fn test_parse_summary_is_logged_at_info() {
    let text = aperak("ERC+Z10'\n", 4);
    let (result, logs) = with_captured_logs(tracing::Level::INFO, || parse(&text, None));

    assert!(result.is_ok());
    let summary = logs
        .lines()
        .find(|line| line.contains("interchange parsed"))
        .expect("summary should be logged");
    assert!(summary.contains("INFO"));
    assert!(summary.contains("messages=1"));
}

#[test]
fn test_unknown_message_type_keeps_frame() {
    let text = "UNB+UNOC:3+A:500+B:500+200426:1151+R'\
UNH+1+UTILMD:D:11A:UN:5.2'\
BGM+E01+DOC1'\
IDE+24+1'\
LOC+172+DE0001'\
UNT+5+1'\
UNZ+1+R'";
    let interchange = parse(text, None).unwrap();

    assert_eq!(interchange.nachrichten.len(), 1);
    let EdifactMessage::Unbekannt(message) = &interchange.nachrichten[0] else {
        panic!("expected an unknown message");
    };
    assert_eq!(message.unh_nachrichtenkopfsegment.nachrichten_kennung.nachrichtentyp, "UTILMD");
    assert!(message.bgm_beginn_der_nachricht.is_some());
    assert!(message.unt_nachrichtenendsegment.is_some());
    assert_eq!(message.gezaehlte_segmente, 5);
    assert!(interchange.validate().is_ok());
}

#[test]
fn test_custom_service_characters() {
    let text = "UNA*=,# ~\n\
UNB=UNOC*3=9900259000002*500=9900357000004*500=200426*1151=R~\n\
UNH=1=MSCONS*D*04B*UN*2.4c~\n\
BGM=7=MSI#=1=9~\n\
UNS=D~\n\
NAD=DP~\n\
LOC=172=DE0001~\n\
LIN=1~\n\
QTY=220*4250,125~\n\
UNT=8=1~\n\
UNZ=1=R~\n";
    let interchange = parse(text, None).unwrap();

    let una = interchange.una_service_string_advice.as_ref().unwrap();
    assert_eq!(una.dezimalzeichen, ',');
    assert_eq!(una.segmentendezeichen, '~');

    let EdifactMessage::Mscons(message) = &interchange.nachrichten[0] else {
        panic!("expected MSCONS");
    };
    assert_eq!(
        message.bgm_beginn_der_nachricht.as_ref().unwrap().dokumentennummer,
        "MSI=1"
    );
    let menge = &message.sg5_lieferanschrift[0].sg6_messlokation[0].sg9_positionsdaten[0]
        .sg10_mengen[0]
        .qty_mengenangaben;
    assert!((menge.menge - 4250.125).abs() < f64::EPSILON);
}

#[test]
fn test_conversion_error_aborts_by_default() {
    let text = aperak("DTM+137:20200426:102'\nERC'\n", 5);
    let err = parse(&text, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldConversion);
    assert_eq!(err.segment_type(), Some(SegmentType::Erc));
    assert_eq!(err.line_number(), 6);
}

#[test]
fn test_skip_segment_policy() {
    let text = aperak("ERC'\nERC+Z29'\n", 5);
    let parser = EdifactParser::with_config(
        ParserConfig::new().on_conversion_error(ConversionErrorPolicy::SkipSegment),
    );
    let interchange = parser.parse(&text).unwrap();

    let EdifactMessage::Aperak(message) = &interchange.nachrichten[0] else {
        panic!("expected APERAK");
    };
    assert_eq!(message.sg4_fehler_beschreibung.len(), 1);
    assert_eq!(
        message.sg4_fehler_beschreibung[0].erc_error_code.fehlercode.anwendungsfehler_code,
        "Z29"
    );
}

#[test]
fn test_skip_segment_policy_keeps_frame_errors() {
    let text = aperak("", 3).replace("UNZ+1+REF1", "UNZ+one+REF1");
    let parser = EdifactParser::with_config(
        ParserConfig::new().on_conversion_error(ConversionErrorPolicy::SkipSegment),
    );
    let err = parser.parse(&text).unwrap_err();
    assert_eq!(err.segment_type(), Some(SegmentType::Unz));
}

#[test]
fn test_envelope_validation() {
    let text = aperak("ERC+Z10'\n", 9);
    assert!(parse(&text, None).is_ok());

    let parser = EdifactParser::with_config(ParserConfig::new().validate_envelopes(true));
    let err = parser.parse(&text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("Segment count mismatch"));
}

#[test]
fn test_mscons_rejects_impossible_period() {
    let text = MSCONS_SAMPLE.replacen("DTM+163:202003312200", "DTM+163:202003322200", 1);
    let err = parse(&text, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldConversion);
    assert_eq!(err.line_number(), 14);
}

#[test]
fn test_aperak_keeps_unchecked_dates() {
    let text = aperak("DTM+137:20200432:102'\nERC+Z10'\n", 5);
    let interchange = parse(&text, None).unwrap();

    let EdifactMessage::Aperak(message) = &interchange.nachrichten[0] else {
        panic!("expected APERAK");
    };
    let dtm = &message.dtm_nachrichtendatum[0];
    assert_eq!(dtm.datum_uhrzeit_wert.as_deref(), Some("20200432"));
    assert!(dtm.zeitpunkt().is_none());
}

#[test]
fn test_config_file_drives_parser() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"max_lines_to_parse: 3\nvalidate_envelopes: false\n")
        .unwrap();

    let config = ParserConfig::from_file(file.path()).unwrap();
    let interchange = EdifactParser::with_config(config).parse(MSCONS_SAMPLE).unwrap();
    assert_eq!(interchange.nachrichten.len(), 1);
    assert!(interchange.nachrichten[0].bgm().is_none());
}
