use huffman_text::{decode, encode, encode_with, Container, Error, HeaderKind, Options, Strategy};

#[test]
fn aaabbc_codes_and_round_trip() {
    let (container, stats) = encode("aaabbc").unwrap();
    let table = container.code_table();

    let len = |c| table.get(c).unwrap().len();
    assert_eq!(len('a'), 1);
    assert_eq!(len('b'), 2);
    assert_eq!(len('c'), 2);

    let b = table.get('b').unwrap();
    let c = table.get('c').unwrap();
    assert_eq!(b[..1], c[..1]);
    assert_ne!(b[1], c[1]);

    assert_eq!(stats.symbol_count, 6);
    assert_eq!(stats.distinct_symbols, 3);

    let parsed = Container::parse(&container.serialize().unwrap()).unwrap();
    assert_eq!(decode(&parsed, Strategy::Table).unwrap(), "aaabbc");
    assert_eq!(decode(&parsed, Strategy::Tree).unwrap(), "aaabbc");
}

#[test]
fn tree_rendering_of_worked_example() {
    let (container, _) = encode("aaabbc").unwrap();
    let rendered = container.tree().unwrap().to_string();

    assert!(rendered.starts_with("Root: (:6):\n"));
    assert!(rendered.contains("L-0- (a:3):0"));
    assert!(rendered.contains("R-1- (b:2):11"));
}

#[test]
fn table_only_container_survives_persistence() {
    let options = Options::default().with_header(HeaderKind::Table);
    let (container, _) = encode_with("she sells sea shells", &options).unwrap();
    let parsed = Container::parse(&container.serialize().unwrap()).unwrap();

    assert!(parsed.tree().is_none());
    assert!(matches!(decode(&parsed, Strategy::Tree), Err(Error::UnavailableTree)));
    assert_eq!(decode(&parsed, Strategy::Table).unwrap(), "she sells sea shells");
}

#[test]
fn dropped_payload_byte_is_detected() {
    let (container, _) = encode("abracadabra, abracadabra").unwrap();
    let mut bytes = container.serialize().unwrap();
    bytes.pop();

    let parsed = Container::parse(&bytes).unwrap();
    for strategy in [Strategy::Table, Strategy::Tree] {
        let err = decode(&parsed, strategy).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStream { .. } | Error::CorruptContainer { .. }
        ));
    }
}

#[test]
fn tampered_header_is_corrupt() {
    let (container, _) = encode("hello world").unwrap();
    let mut bytes = container.serialize().unwrap();
    bytes[9] ^= 0xff;

    assert!(matches!(
        Container::parse(&bytes),
        Err(Error::CorruptContainer { .. })
    ));
}
