//! Integration tests for tabsniff

use std::io::Write;
use tabsniff::{
    Configuration, Document, Error, Reader, SampleLimits, Sniffer, Table, Writer,
    detect_configuration, encoding_for_label, parse, serialize,
};
use tempfile::NamedTempFile;

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_detect_comma_delimited() {
    let data = b"name,age,city\nAlice,30,New York\nBob,25,Los Angeles\nCharlie,35,Chicago\n";
    let config = detect_configuration(data);

    assert_eq!(config.separator_char(), ',');
    assert!(config.first_row_as_header);

    let table = parse(data, &config);
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.max_column_count(), 3);
    assert_eq!(table.row(0), Some(&strings(&["name", "age", "city"])[..]));
}

#[test]
fn test_detect_tab_delimited() {
    let data = b"name\tage\tcity\nAlice\t30\tNew York\nBob\t25\tLos Angeles\n";
    let config = detect_configuration(data);

    assert_eq!(config.separator_char(), '\t');
    assert!(config.first_row_as_header);
}

#[test]
fn test_detect_semicolon_delimited() {
    let data = b"name;age;city\nAlice;30;New York\nBob;25;Los Angeles\n";
    assert_eq!(detect_configuration(data).separator_char(), ';');
}

#[test]
fn test_detect_pipe_delimited() {
    let data = b"name|age|city\nAlice|30|New York\nBob|25|Los Angeles\n";
    assert_eq!(detect_configuration(data).separator_char(), '|');
}

#[test]
fn test_detect_quoted_semicolons() {
    let data = b"name;age\n\"Alice\";30\n\"Bob\";25";
    let config = detect_configuration(data);

    assert_eq!(config.separator_char(), ';');
    assert_eq!(config.quote_char(), '"');

    let report = Sniffer::new().detect_report(data);
    let best = report.best_score().unwrap();
    let header_off = &report.candidates[best.index - 1];
    assert!(!header_off.configuration.first_row_as_header);
    assert!(best.score >= header_off.score);
}

#[test]
fn test_detect_single_quoted() {
    let data = b"'name','value'\n'hello, world','123'\n'test','456'\n";
    let config = detect_configuration(data);

    assert_eq!(config.separator_char(), ',');
    assert_eq!(config.quote_char(), '\'');
    assert_eq!(
        parse(data, &config).row(1),
        Some(&strings(&["hello, world", "123"])[..])
    );
}

#[test]
fn test_detect_no_header() {
    let data = b"1,2,3\n4,5,6\n7,8,9\n10,11,12\n";
    let config = detect_configuration(data);

    assert_eq!(config.separator_char(), ',');
    assert!(!config.first_row_as_header);
}

#[test]
fn test_detect_windows_line_endings() {
    let data = b"name,age\r\nAlice,30\r\nBob,25\r\n";
    let config = detect_configuration(data);

    assert_eq!(config.separator_char(), ',');
    assert_eq!(parse(data, &config).max_column_count(), 2);
}

#[test]
fn test_detect_utf8_bom() {
    let data = b"\xef\xbb\xbfname,age\nAlice,30\n";
    let config = detect_configuration(data);

    assert_eq!(config.encoding, encoding_rs::UTF_8);
    assert_eq!(parse(data, &config).cell(0, 0), Some("name"));
}

#[test]
fn test_detect_is_deterministic() {
    let data = b"a;b,c\n1;2,3\n4;5,6\n";
    let first = detect_configuration(data);
    for _ in 0..5 {
        assert_eq!(detect_configuration(data), first);
    }
}

#[test]
fn test_forced_separator() {
    let data = b"a;b;c\n1;2;3\n";

    let mut sniffer = Sniffer::new();
    sniffer.separator(',');

    assert_eq!(sniffer.detect(data).separator_char(), ',');
}

#[test]
fn test_forced_encoding() {
    let data = b"name,drink\nAnna,caf\xe9\n";
    let mut sniffer = Sniffer::new();
    sniffer.encoding(encoding_rs::WINDOWS_1252);

    let config = sniffer.detect(data);
    assert_eq!(config.encoding, encoding_rs::WINDOWS_1252);
    assert_eq!(parse(data, &config).cell(1, 1), Some("café"));
}

#[test]
fn test_small_sample_limits() {
    let data = b"a|b|c\n1|2|3\n4|5|6\n7|8|9\n";
    let mut sniffer = Sniffer::new();
    sniffer.sample_limits(SampleLimits::new(100, 2, 2, 1));

    assert_eq!(sniffer.detect(data).separator_char(), '|');
}

#[test]
fn test_empty_input() {
    let config = detect_configuration(b"");
    assert_eq!(config, Configuration::default());

    let table = parse(b"", &config);
    assert_eq!(table.rows(), &[strings(&[""])]);
    assert_eq!(serialize(&table, &config).unwrap(), b"");
}

#[test]
fn test_crlf_lf_equivalence() {
    let config = Configuration::default();
    assert_eq!(parse(b"a,b\r\nc,d", &config), parse(b"a,b\nc,d", &config));
    assert_eq!(
        parse(b"a,b\r\nc,d", &config).rows(),
        &[strings(&["a", "b"]), strings(&["c", "d"])]
    );
}

#[test]
fn test_quoting_necessity() {
    let writer = Writer::new(&Configuration::default());
    assert_eq!(writer.write_field("a,b"), "\"a,b\"");
    assert_eq!(writer.write_field("hello"), "hello");
}

#[test]
fn test_escape_round_trip() {
    let config = Configuration::default();
    let writer = Writer::new(&config);
    let written = writer.write_field("He said \"hi\"");
    assert_eq!(written, "\"He said \"\"hi\"\"\"");

    let mut reader = Reader::from_text(&written, &config);
    assert_eq!(reader.read_row(), Some(strings(&["He said \"hi\""])));
}

#[test]
fn test_round_trip_law() {
    let table = Table::from_rows(vec![
        strings(&["id", "text", "note"]),
        strings(&["1", "comma, inside", "quote \" inside"]),
        strings(&["2", " leading space", "back\\slash\\"]),
        strings(&["3", "multi\nline", ""]),
        strings(&["4"]),
        strings(&[""]),
    ]);

    for config in [
        Configuration::default(),
        Configuration::new().with_separator(';').with_escape('\\'),
        Configuration::new().with_separator('\t').with_quote('\''),
        Configuration::new().with_separator('|').with_encoding(encoding_rs::WINDOWS_1252),
        Configuration::new().with_encoding(encoding_rs::UTF_16LE),
        Configuration::new().with_separator('§').with_encoding(encoding_rs::UTF_16BE),
    ] {
        let bytes = serialize(&table, &config).unwrap();
        let parsed = parse(&bytes, &config);
        assert_eq!(
            parsed.normalized_rows(),
            table.normalized_rows(),
            "round trip under {config}"
        );
    }
}

#[test]
fn test_serialize_unrepresentable() {
    let table = Table::from_rows(vec![strings(&["ok", "日本"])]);
    let config = Configuration::new().with_encoding(encoding_rs::WINDOWS_1252);

    let err = serialize(&table, &config).unwrap_err();
    assert!(matches!(err, Error::Unrepresentable { row: 0, column: 1, .. }));
}

#[test]
fn test_structural_edit_bounds() {
    let mut table = parse(b"a,b\nc,d\ne,f", &Configuration::default());
    let before = table.clone();

    assert!(!table.delete_row(99));
    assert_eq!(table, before);

    assert!(table.add_column(None));
    assert_eq!(table.max_column_count(), 3);
    assert!(table.rows().iter().all(|row| row.len() == 3 && row[2].is_empty()));
}

#[test]
fn test_edit_then_serialize() {
    let config = Configuration::default();
    let mut table = parse(b"a,b\n1,2", &config);

    table.add_row(None);
    table.update_cell(2, 3, "x");
    table.delete_column(0);

    assert_eq!(serialize(&table, &config).unwrap(), b"b\n2\n,,x");
}

#[test]
fn test_delete_column_then_round_trip() {
    let config = Configuration::default();
    let mut table = Table::from_rows(vec![strings(&["a", "b"]), strings(&["c"])]);
    table.delete_column(0);

    let bytes = serialize(&table, &config).unwrap();
    assert_eq!(bytes, b"b\n\"\"");

    let parsed = parse(&bytes, &config);
    assert_eq!(parsed.row_count(), 2);
    assert_eq!(parsed.normalized_rows(), table.normalized_rows());
}

#[test]
fn test_document_open_and_save() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "name;city").unwrap();
    writeln!(temp_file, "Alice;\"Paris; France\"").unwrap();
    writeln!(temp_file, "Bob;Berlin").unwrap();
    temp_file.flush().unwrap();

    let mut doc = Document::open(temp_file.path()).unwrap();
    assert_eq!(doc.configuration().separator_char(), ';');
    assert_eq!(doc.table().cell(1, 1), Some("Paris; France"));

    doc.set_configuration(Configuration::default());
    let out = NamedTempFile::new().unwrap();
    doc.save(out.path()).unwrap();

    let saved = std::fs::read(out.path()).unwrap();
    assert_eq!(saved, b"name,city\nAlice,Paris; France\nBob,Berlin");
}

#[test]
fn test_detect_path() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "x\ty\n1\t2\n3\t4").unwrap();
    temp_file.flush().unwrap();

    let config = Sniffer::new().detect_path(temp_file.path()).unwrap();
    assert_eq!(config.separator_char(), '\t');
}

#[test]
fn test_open_missing_file() {
    let result = Document::open("/nonexistent/path/to/table.csv");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_persisted_configuration() {
    let config = Configuration::new()
        .with_encoding(encoding_for_label("latin1").unwrap())
        .with_separator(';')
        .with_decimal_mark(',')
        .with_header(true);

    let json = config.to_json().unwrap();
    assert_eq!(Configuration::from_json(&json).unwrap(), config);
}

#[test]
fn test_paste_remapping() {
    let config = Configuration::default();
    let mut reader = Reader::new(b"a,b,c\n", &config);
    let row = reader.read_row_for_pasting(&[3, 1, 0], 2).unwrap();
    assert_eq!(row, strings(&["c", "b", ""]));
}
