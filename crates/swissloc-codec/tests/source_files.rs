//! Reads Windows-1252 extract files from disk and packs them.

use std::fs;

use swissloc_codec::{pack_source, unpack, SourceEncoding, SourceTables};

const MASTER: &[u8] = b"00;20240115;48213\r\n\
01;1234;261;20;8001;00;8001;Z\xfcrich;Z\xfcrich;ZH;1;0;1234;19880301;800100;Y\r\n\
01;1301;6621;20;1201;00;1201;Gen\xe8ve;Gen\xe8ve;GE;2;0;1301;19880301;120100;Y\r\n\
02;1234;1;2;3;Zurigo;Zurigo\r\n\
03;261;Z\xfcrich;ZH;261\r\n\
03;6621;Gen\xe8ve;GE;6621\r\n\
04;trailer\r\n";

const COMMUNITY_ZIPS: &[u8] = b"1,ZH,112,Bezirk Z\xfcrich,261,Z\xfcrich,Z\xfcrich,8001,0,x\n\
1,GE,2500,Canton de Gen\xe8ve,6621,Gen\xe8ve,Gen\xe8ve,1201,0,x\n";

const DISTRICTS: &[u8] = b"ZH,112,Bezirk Z\xfcrich\nGE,2500,Canton de Gen\xe8ve\n";

#[test]
fn read_decode_pack_unpack() {
    let dir = tempfile::tempdir().unwrap();
    let master = dir.path().join("post.txt");
    let com = dir.path().join("communities.csv");
    let dist = dir.path().join("districts.csv");
    fs::write(&master, MASTER).unwrap();
    fs::write(&com, COMMUNITY_ZIPS).unwrap();
    fs::write(&dist, DISTRICTS).unwrap();

    let tables = SourceTables::read(&master, &com, &dist, SourceEncoding::Windows1252).unwrap();
    assert_eq!(tables.zip_details.len(), 2);
    assert_eq!(tables.communities[1][2], "Genève");

    let rows = unpack(&pack_source(&tables).unwrap()).unwrap();
    assert_eq!(rows.random_code, 48213);
    assert_eq!(rows.zip_details[0].name, "Zürich");
    assert_eq!(rows.zip_details[1].code, 1201);
    assert_eq!(rows.zip_names[0].name, "Zurigo");
    assert_eq!(rows.districts[1].name, "Canton de Genève");
    assert_eq!(rows.community_zips[1].community_number, 6621);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    let err = SourceTables::read(&missing, &missing, &missing, SourceEncoding::Utf8).unwrap_err();
    assert!(matches!(err, swissloc_core::SwissLocError::Io(_)));
}
