use bdef_parser::Warning;

#[test]
fn undefined_symbol() {
    let source = r#"
#define MA0_MYSTERY ((0x0 << 30) | (NID_MYSTERY * 0x10000))
"#;

    let path = std::path::PathBuf::from(format!("{}", file!()));
    let (res, warnings) = bdef_parser::parser::parse_with_warnings(&path, source);
    let map = res.unwrap();
    for warning in warnings.iter() {
        eprintln!("{}", warning);
    }
    assert_eq!(
        warnings,
        vec![Warning::UndefinedSymbol {
            name: "MA0_MYSTERY".to_owned(),
            symbol: "NID_MYSTERY".to_owned(),
        }]
    );
    // The unresolvable board is left out of the map.
    assert!(map.boards.is_empty());
    assert!(!map.definitions.contains_key("MA0_MYSTERY"));
}

#[test]
fn duplicate_board_address() {
    let source = r#"
#define NID_MOTOR_00 0x0310
#define MA0_MOTOR_00 ((0x0 << 30) | (NID_MOTOR_00 * 0x10000))
#define MA0_MOTOR_XX ((0x0 << 30) | (NID_MOTOR_00 * 0x10000))
"#;

    let path = std::path::PathBuf::from(format!("{}", file!()));
    let (res, warnings) = bdef_parser::parser::parse_with_warnings(&path, source);
    let map = res.unwrap();
    for warning in warnings.iter() {
        eprintln!("{}", warning);
    }
    assert_eq!(
        warnings,
        vec![Warning::DuplicateAddress {
            name: "MA0_MOTOR_XX".to_owned(),
            existing: "MA0_MOTOR_00".to_owned(),
            address: 0x0310_0000,
        }]
    );
    // Both entries stay in the map, lookup resolves to the first.
    assert_eq!(map.boards.len(), 2);
    assert_eq!(map.board_name(0x0310_0000), Some("MA0_MOTOR_00"));
}

#[test]
fn redefinition_last_wins() {
    let source = r#"
#define NID_MOTOR_00 0x0310
#define NID_MOTOR_00 0x0311
"#;

    let path = std::path::PathBuf::from(format!("{}", file!()));
    let (res, warnings) = bdef_parser::parser::parse_with_warnings(&path, source);
    let map = res.unwrap();
    assert_eq!(
        warnings,
        vec![Warning::Redefinition {
            name: "NID_MOTOR_00".to_owned(),
        }]
    );
    assert_eq!(map.definitions["NID_MOTOR_00"], 0x0311);
}

#[test]
fn recursive_definitions() {
    let source = r#"
#define NID_A NID_B
#define NID_B NID_A
"#;

    let path = std::path::PathBuf::from(format!("{}", file!()));
    let (res, warnings) = bdef_parser::parser::parse_with_warnings(&path, source);
    let map = res.unwrap();
    for warning in warnings.iter() {
        eprintln!("{}", warning);
    }
    assert_eq!(warnings.len(), 2);
    assert!(warnings
        .iter()
        .all(|w| matches!(w, Warning::RecursiveDefinition { .. })));
    assert!(map.definitions.is_empty());
}

#[test]
fn division_by_zero() {
    let source = r#"
#define VALUE 1 / 0
"#;

    let path = std::path::PathBuf::from(format!("{}", file!()));
    let (res, warnings) = bdef_parser::parser::parse_with_warnings(&path, source);
    let map = res.unwrap();
    assert_eq!(
        warnings,
        vec![Warning::DivisionByZero {
            name: "VALUE".to_owned(),
        }]
    );
    assert!(map.definitions.is_empty());
}
