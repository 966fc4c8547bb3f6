//! Parsing the bundled MSCONS and APERAK sample interchanges

use edi_energy_model::{Abschnittskennung, EdifactMessage, validate_message};
use edi_energy_parser::{EdifactParser, ParserConfig, parse};

const APERAK_SAMPLE: &str = include_str!("fixtures/aperak_sample.edi");
const MSCONS_SAMPLE: &str = include_str!("fixtures/mscons_sample.edi");

#[test]
fn test_aperak_sample_counter_and_messages() {
    let interchange = parse(APERAK_SAMPLE, None).unwrap();

    let unz = interchange.unz_nutzdaten_endsegment.as_ref().unwrap();
    assert_eq!(unz.datenaustauschzaehler, 1);
    assert_eq!(interchange.nachrichten.len(), 1);
    assert!(interchange.validate().is_ok());
}

#[test]
fn test_aperak_sample_tree() {
    let interchange = parse(APERAK_SAMPLE, None).unwrap();

    let unb = interchange.unb_nutzdaten_kopfsegment.as_ref().unwrap();
    assert_eq!(unb.absender.beteiligter_bezeichnung, "9900357000004");
    assert_eq!(unb.anwendungsreferenz.as_deref(), Some("TL"));

    let EdifactMessage::Aperak(message) = &interchange.nachrichten[0] else {
        panic!("expected an APERAK message");
    };
    assert_eq!(message.unh_nachrichtenkopfsegment.nachrichten_referenznummer, "MSI5422ER");
    assert_eq!(
        message.bgm_beginn_der_nachricht.as_ref().unwrap().dokumentenname_code,
        "313"
    );

    let nachrichtendatum = &message.dtm_nachrichtendatum[0];
    assert_eq!(
        nachrichtendatum.zeitpunkt().unwrap().to_rfc3339(),
        "2020-04-26T11:51:00+00:00"
    );

    assert_eq!(message.sg1_referenzen.len(), 1);
    assert_eq!(message.sg1_referenzen[0].rff_referenzangaben.referenz_qualifier, "ACE");
    assert_eq!(message.sg1_referenzen[0].dtm_referenzdatum.len(), 1);

    assert_eq!(message.sg2_marktpartner.len(), 2);
    let absender = &message.sg2_marktpartner[1];
    assert_eq!(absender.nad_marktpartner.beteiligter_qualifier, "MS");
    let kontakt = &absender.sg3_kontaktinformationen[0];
    assert_eq!(
        kontakt
            .cta_ansprechpartner
            .abteilung_oder_bearbeiter
            .as_ref()
            .unwrap()
            .abteilung_oder_bearbeiter
            .as_deref(),
        Some("Frau Muster")
    );
    assert_eq!(kontakt.com_kommunikationsverbindung[0].kommunikationsadresse_qualifier, "TE");

    assert_eq!(message.sg4_fehler_beschreibung.len(), 1);
    let fehler = &message.sg4_fehler_beschreibung[0];
    assert_eq!(fehler.erc_error_code.fehlercode.anwendungsfehler_code, "Z10");
    let ftx = fehler.ftx_zusatzinformationen.as_ref().unwrap();
    assert_eq!(ftx.freier_text_m.as_deref(), Some("DE00056266802AO6G56M11SN51G21M24S"));
    assert_eq!(ftx.freier_text_c.as_deref(), Some("201204181115+00:303"));
    assert_eq!(fehler.sg5_fehlerreferenzen.len(), 1);
    assert_eq!(
        fehler.sg5_fehlerreferenzen[0]
            .rff_referenzangaben
            .referenz_identifikation
            .as_deref(),
        Some("MSI5422")
    );

    let unt = message.unt_nachrichtenendsegment.as_ref().unwrap();
    assert_eq!(unt.anzahl_der_segmente_in_einer_nachricht, 14);
    assert_eq!(message.gezaehlte_segmente, 14);
}

#[test]
fn test_mscons_sample_counter_and_messages() {
    let interchange = parse(MSCONS_SAMPLE, None).unwrap();

    let unz = interchange.unz_nutzdaten_endsegment.as_ref().unwrap();
    assert_eq!(unz.datenaustauschzaehler, 2);
    assert_eq!(interchange.nachrichten.len(), 2);
}

#[test]
fn test_mscons_sample_envelopes_are_consistent() {
    let interchange = parse(MSCONS_SAMPLE, None).unwrap();
    for message in &interchange.nachrichten {
        validate_message(message).unwrap();
        assert_eq!(
            message.unt().unwrap().nachrichten_referenznummer,
            message.unh().nachrichten_referenznummer
        );
    }

    let strict = EdifactParser::with_config(ParserConfig::new().validate_envelopes(true));
    assert!(strict.parse(MSCONS_SAMPLE).is_ok());
}

#[test]
fn test_mscons_sample_tree() {
    let interchange = parse(MSCONS_SAMPLE, None).unwrap();

    let EdifactMessage::Mscons(first) = &interchange.nachrichten[0] else {
        panic!("expected an MSCONS message");
    };
    assert_eq!(first.sg1_referenzen.len(), 1);
    assert_eq!(first.sg2_marktpartner.len(), 2);
    assert_eq!(first.sg2_marktpartner[0].sg3_kontaktinformationen.len(), 1);
    assert_eq!(
        first.uns_abschnitts_kontrollsegment.as_ref().unwrap().abschnittskennung_codiert,
        Abschnittskennung::Detailabschnitt
    );

    assert_eq!(first.sg5_lieferanschrift.len(), 1);
    let lieferanschrift = &first.sg5_lieferanschrift[0];
    assert_eq!(lieferanschrift.nad_name_und_adresse.beteiligter_qualifier, "DP");

    let messlokation = &lieferanschrift.sg6_messlokation[0];
    assert_eq!(
        messlokation.loc_lokation.ortsangabe.as_ref().unwrap().ortsangabe_code,
        "DE00014545768S0000000000000003054"
    );
    assert_eq!(messlokation.dtm_zeitraum.len(), 2);
    assert_eq!(messlokation.sg7_referenzen.len(), 1);
    assert_eq!(messlokation.sg7_referenzen[0].rff_referenzangaben.referenz_qualifier, "MG");

    let position = &messlokation.sg9_positionsdaten[0];
    assert_eq!(
        position.pia_produktidentifikation[0]
            .waren_leistungsnummer
            .produkt_leistungsnummer,
        "1-1:1.8.1"
    );
    let menge = &position.sg10_mengen[0];
    assert!((menge.qty_mengenangaben.menge - 4250.0).abs() < f64::EPSILON);
    assert_eq!(menge.dtm_messzeitraum.len(), 2);
    assert_eq!(menge.sts_status.len(), 1);

    let EdifactMessage::Mscons(second) = &interchange.nachrichten[1] else {
        panic!("expected an MSCONS message");
    };
    assert!(second.sg1_referenzen.is_empty());
    let messlokation = &second.sg5_lieferanschrift[0].sg6_messlokation[0];
    assert_eq!(messlokation.sg8_merkmale.len(), 1);
    let mengen = &messlokation.sg9_positionsdaten[0].sg10_mengen;
    assert_eq!(mengen.len(), 2);
    assert_eq!(mengen[1].qty_mengenangaben.menge_qualifier, "67");
    assert!((mengen[1].qty_mengenangaben.menge - 12.25).abs() < f64::EPSILON);
}

#[test]
fn test_sample_serializes_to_json() {
    let interchange = parse(MSCONS_SAMPLE, None).unwrap();
    let json = serde_json::to_value(&interchange).unwrap();

    assert_eq!(json["nachrichten"][0]["nachrichtentyp"], "MSCONS");
    assert_eq!(
        json["unz_nutzdaten_endsegment"]["datenaustauschreferenz"],
        "MSC4711"
    );
    assert_eq!(
        json["nachrichten"][0]["uns_abschnitts_kontrollsegment"]["abschnittskennung_codiert"],
        "D"
    );
}

#[test]
fn test_crlf_line_breaks() {
    let text = MSCONS_SAMPLE.replace('\n', "\r\n");
    let interchange = parse(&text, None).unwrap();
    assert_eq!(interchange.nachrichten.len(), 2);
}
