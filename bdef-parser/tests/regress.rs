use bdef_parser::BoardMap;
use std::path::PathBuf;

#[rstest::rstest]
fn regress(#[files("tests/data/*.h")] header: PathBuf) {
    let _ = env_logger::try_init();
    let map = bdef_parser::parse_from_file(&header).unwrap();

    assert!(!map.boards.is_empty());
    for entry in map.boards.iter() {
        // Every board is also a plain definition with the same value, and
        // resolves back to its own name.
        assert_eq!(map.definitions[&entry.name], entry.address);
        assert_eq!(map.board_name(entry.address), Some(entry.name.as_str()));
    }
}

#[rstest::rstest]
fn regress_json_roundtrip(#[files("tests/data/*.h")] header: PathBuf) {
    let map = bdef_parser::parse_from_file(&header).unwrap();

    let out = std::env::temp_dir().join(format!(
        "bdef-regress-{}.json",
        header.file_stem().unwrap().to_string_lossy()
    ));
    map.save_to_file(&out).unwrap();
    let loaded = BoardMap::load_from_file(&out).unwrap();
    assert_eq!(map, loaded);
}

#[test]
fn sample_boards() {
    let source = std::fs::read_to_string("tests/data/sample_boards.h").unwrap();
    let path = PathBuf::from("tests/data/sample_boards.h");
    let (res, warnings) = bdef_parser::parser::parse_with_warnings(&path, &source);
    let map = res.unwrap();

    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    // 4 masters + 4 board types + 7 node IDs + 12 board addresses; the
    // include guard carries no value.
    assert_eq!(map.definitions.len(), 27);
    assert_eq!(map.boards.len(), 12);

    assert_eq!(map.definitions["NID_SAFETY"], 0x017F);
    assert_eq!(map.definitions["NID_PROT04_00_S"], 0x0204);
    assert_eq!(map.definitions["MA0_SAFETY"], 0x017F_0000);
    assert_eq!(map.definitions["MA0_PROT04_00_S"], 0x0204_0000);
    assert_eq!(map.definitions["MA0_MOTOR_00"], 0x0310_0000);
    assert_eq!(map.definitions["MA1_SAFETY"], 0x417F_0000);
    assert_eq!(map.definitions["MA1_MOTOR_00"], 0x4310_0000);
    assert_eq!(map.definitions["MA0_BROADCAST"], 0x0000_0000);
    assert_eq!(map.definitions["MA1_BROADCAST"], 0x4000_0000);

    assert_eq!(
        map.masters(),
        ecatmap::MasterSet::MASTER0 | ecatmap::MasterSet::MASTER1
    );

    insta::assert_snapshot!(map.format_address(0x0310_0000), @"MA0_MOTOR_00(03100000)");
    insta::assert_snapshot!(map.format_address(0x0204_0000), @"MA0_PROT04_00_S(02040000)");
    insta::assert_snapshot!(map.format_address(0xDEAD_0000), @"DEAD0000");
}

#[test]
fn template_matches_ecatmap_boards() {
    // The shipped header template and the ecatmap::boards constants are two
    // renditions of the same map and must agree.
    let map = bdef_parser::parse_from_file("tests/data/sample_boards.h").unwrap();

    assert_eq!(map.boards.len(), ecatmap::boards::ALL.len());
    for (name, addr) in ecatmap::boards::ALL.iter() {
        assert_eq!(map.definitions[*name], addr.raw(), "mismatch for {name}");
    }
}

#[test]
fn multiple_headers_share_one_namespace() {
    let files = [
        PathBuf::from("tests/data/sample_boards.h"),
        PathBuf::from("tests/data/four_masters.h"),
    ];
    let (res, warnings) = bdef_parser::parse_files(&files);
    let map = res.unwrap();

    // The two headers re-define the shared master/type/node constants; those
    // come back as redefinition warnings and nothing else.
    assert!(!warnings.is_empty());
    assert!(warnings
        .iter()
        .all(|w| matches!(w, bdef_parser::Warning::Redefinition { .. })));

    // 12 boards from the sample, 4 new ones from the extension.
    assert_eq!(map.boards.len(), 16);
    assert_eq!(map.board_name(0x817F_0000), Some("MA2_SAFETY"));
    assert_eq!(map.board_name(0xC208_0000), Some("MA3_PROT08_00"));
    assert_eq!(map.masters(), ecatmap::MasterSet::all());
}
