//! Parser for EtherCAT board definition header files.
//!
//! Board definition headers assign symbolic names to node IDs and board
//! addresses through C preprocessor constants.  This crate evaluates those
//! constant expressions and derives a [`BoardMap`] from them, so log
//! addresses can be resolved back to board names.

use std::collections::BTreeMap;
use std::path::Path;

pub mod parser;

/// Board definitions derived from one or more header files.
#[derive(Debug, PartialEq, Eq, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BoardMap {
    /// All resolvable definitions, name to evaluated value.
    pub definitions: BTreeMap<String, u32>,
    /// Named board addresses (`MA<n>_...` definitions), in definition order.
    pub boards: Vec<BoardEntry>,
}

/// One named board address.
#[derive(Debug, PartialEq, Eq, Clone, serde::Serialize, serde::Deserialize)]
pub struct BoardEntry {
    pub name: String,
    /// Serialized as 8-digit uppercase hex, e.g. `"02040000"`.
    #[serde(with = "hex_address")]
    pub address: u32,
}

impl BoardEntry {
    pub fn board_address(&self) -> ecatmap::BoardAddress {
        ecatmap::BoardAddress::from_raw(self.address)
    }
}

impl BoardMap {
    /// Board name for a log address.  If two boards collide on one address,
    /// the first definition wins.
    pub fn board_name(&self, address: u32) -> Option<&str> {
        self.boards
            .iter()
            .find(|e| e.address == address)
            .map(|e| e.name.as_str())
    }

    /// Format an address for display: `MA0_MOTOR_00(03100000)`, or the bare
    /// hex digits when no board is defined at that address.
    pub fn format_address(&self, address: u32) -> String {
        match self.board_name(address) {
            Some(name) => format!("{}({:08X})", name, address),
            None => format!("{:08X}", address),
        }
    }

    /// Which masters the mapped boards live under.
    pub fn masters(&self) -> ecatmap::MasterSet {
        let mut set = ecatmap::MasterSet::empty();
        for entry in self.boards.iter() {
            set |= entry.board_address().master().bit();
        }
        set
    }

    /// Persist the map as JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, file: P) -> std::io::Result<()> {
        let f = std::fs::File::create(file.as_ref())?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(f), self)?;
        Ok(())
    }

    /// Load a map previously written by [`BoardMap::save_to_file`].
    pub fn load_from_file<P: AsRef<Path>>(file: P) -> std::io::Result<BoardMap> {
        let f = std::fs::File::open(file.as_ref())?;
        let map = serde_json::from_reader(std::io::BufReader::new(f))?;
        Ok(map)
    }
}

mod hex_address {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(address: &u32, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&format!("{:08X}", address))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
        let s = String::deserialize(de)?;
        let digits = s.trim_start_matches("0x").trim_start_matches("0X");
        u32::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
    }
}

/// Hard parse failure.  Recoverable oddities are reported as [`Warning`]s
/// instead.
#[derive(Debug)]
pub enum ParseError {
    /// Source does not match the header grammar (rendered with file path).
    Syntax(String),
    Io(std::io::Error),
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Syntax(msg) => write!(f, "{}", msg),
            ParseError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Syntax(_) => None,
            ParseError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Diagnostic emitted while deriving the board map.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Warning {
    /// A name was defined more than once; the later definition wins.
    Redefinition { name: String },
    /// A definition references a symbol that no parsed header defines.
    UndefinedSymbol { name: String, symbol: String },
    /// A definition (transitively) references itself.
    RecursiveDefinition { name: String },
    /// A definition divides by zero.
    DivisionByZero { name: String },
    /// Two boards resolve to the same address.  The addressing scheme does
    /// not detect this at runtime; colliding boards silently alias.
    DuplicateAddress {
        name: String,
        existing: String,
        address: u32,
    },
}

impl core::fmt::Display for Warning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Warning::Redefinition { name } => {
                write!(f, "definition of `{}` overrides an earlier definition", name)
            }
            Warning::UndefinedSymbol { name, symbol } => {
                write!(f, "cannot resolve `{}`: `{}` is not defined", name, symbol)
            }
            Warning::RecursiveDefinition { name } => {
                write!(f, "cannot resolve `{}`: definition is recursive", name)
            }
            Warning::DivisionByZero { name } => {
                write!(f, "cannot resolve `{}`: division by zero", name)
            }
            Warning::DuplicateAddress {
                name,
                existing,
                address,
            } => {
                write!(
                    f,
                    "board `{}` has the same address ({:08X}) as `{}`",
                    name, address, existing
                )
            }
        }
    }
}

/// Parse a single board definition header.
///
/// Warnings are forwarded to the `log` facade; use
/// [`parser::parse_with_warnings`] to inspect them programmatically.
pub fn parse_from_file<P: AsRef<Path>>(file: P) -> Result<BoardMap, ParseError> {
    use std::io::Read;

    let mut f = std::fs::File::open(file.as_ref())?;
    let mut source_bytes = Vec::new();
    f.read_to_end(&mut source_bytes)?;
    let source = String::from_utf8_lossy(&source_bytes);

    parser::parse(file.as_ref(), &source)
}

/// Parse several headers into one board map.
///
/// All files share a single namespace: definitions from one file may
/// reference definitions from any other, regardless of order.
pub fn parse_files<P: AsRef<Path>>(files: &[P]) -> (Result<BoardMap, ParseError>, Vec<Warning>) {
    use std::io::Read;

    let mut defines = Vec::new();
    for file in files {
        let mut source_bytes = Vec::new();
        let res = std::fs::File::open(file.as_ref())
            .and_then(|mut f| f.read_to_end(&mut source_bytes));
        if let Err(e) = res {
            return (Err(e.into()), Vec::new());
        }
        let source = String::from_utf8_lossy(&source_bytes);

        match parser::scan(file.as_ref(), &source) {
            Ok(mut d) => defines.append(&mut d),
            Err(e) => return (Err(e), Vec::new()),
        }
    }

    let (map, warnings) = parser::evaluate(defines);
    (Ok(map), warnings)
}
