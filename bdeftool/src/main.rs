use console::style;
use gumdrop::Options;
use std::path::PathBuf;

#[derive(Debug, Options)]
struct BdefToolOptions {
    help: bool,

    #[options(command)]
    command: Option<BdefToolCommand>,
}

#[derive(Debug, Options)]
enum BdefToolCommand {
    /// Dump the parsed board definitions as a Rust structure.
    Dump(DumpOptions),
    /// Print the board address table.
    Boards(BoardsOptions),
    /// Resolve log addresses to board names.
    Lookup(LookupOptions),
    /// Export the parsed board map as JSON.
    Export(ExportOptions),
}

#[derive(Debug, Options)]
struct DumpOptions {
    help: bool,

    /// Paths to the board definition headers.
    #[options(free)]
    header_paths: Vec<PathBuf>,
}

#[derive(Debug, Options)]
struct BoardsOptions {
    help: bool,

    /// Paths to the board definition headers.
    #[options(free)]
    header_paths: Vec<PathBuf>,
}

#[derive(Debug, Options)]
struct LookupOptions {
    help: bool,

    /// Paths to the board definition headers.
    #[options(free)]
    header_paths: Vec<PathBuf>,

    /// Address to resolve (hex); may be given multiple times.
    /// Without it, addresses are prompted for interactively.
    #[options(short = "a", meta = "ADDR")]
    address: Vec<String>,
}

#[derive(Debug, Options)]
struct ExportOptions {
    help: bool,

    /// Paths to the board definition headers.
    #[options(free)]
    header_paths: Vec<PathBuf>,

    /// Output JSON file.
    #[options(short = "o", required, meta = "FILE")]
    output: PathBuf,
}

fn main() {
    let args = BdefToolOptions::parse_args_default_or_exit();
    match args.command {
        Some(BdefToolCommand::Dump(args)) => {
            let map = parse_headers(&args.header_paths);
            println!("{:#?}", map);
        }
        Some(BdefToolCommand::Boards(args)) => {
            let map = parse_headers(&args.header_paths);
            run_boards(&map);
        }
        Some(BdefToolCommand::Lookup(args)) => {
            let map = parse_headers(&args.header_paths);
            run_lookup(&map, &args.address);
        }
        Some(BdefToolCommand::Export(args)) => {
            let map = parse_headers(&args.header_paths);
            if let Err(e) = map.save_to_file(&args.output) {
                eprintln!("{}: {}", style("Error").red().bold(), e);
                std::process::exit(1);
            }
            println!(
                "Exported {} definitions ({} boards) to {}",
                map.definitions.len(),
                map.boards.len(),
                args.output.display()
            );
        }
        None => {
            eprintln!("No subcommand specified, try --help.");
            std::process::exit(1);
        }
    }
}

fn parse_headers(paths: &[PathBuf]) -> bdef_parser::BoardMap {
    if paths.is_empty() {
        eprintln!("No board definition headers given.");
        std::process::exit(1);
    }

    let (res, warnings) = bdef_parser::parse_files(paths);
    for warning in warnings.iter() {
        eprintln!("{}: {}", style("Warning").yellow().bold(), warning);
    }
    match res {
        Ok(map) => map,
        Err(e) => {
            eprintln!("{}: {}", style("Error").red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run_boards(map: &bdef_parser::BoardMap) {
    println!("{}", style("Board addresses:").bold());
    for entry in map.boards.iter() {
        let addr = entry.board_address();
        let node = addr.node_id();
        if addr.is_broadcast() {
            println!(
                "  {:08X}  {:<20} master {}  broadcast",
                entry.address,
                entry.name,
                addr.master().index()
            );
        } else {
            match node.board_type() {
                Some(board_type) => println!(
                    "  {:08X}  {:<20} master {}  {:?} board, instance 0x{:02X}",
                    entry.address,
                    entry.name,
                    addr.master().index(),
                    board_type,
                    node.instance()
                ),
                None => println!(
                    "  {:08X}  {:<20} master {}  unknown board type 0x{:02X}",
                    entry.address,
                    entry.name,
                    addr.master().index(),
                    node.raw() >> 8
                ),
            }
        }
    }
    println!();
    println!("{} {:?}", style("Masters in use:").bold(), map.masters());
}

fn run_lookup(map: &bdef_parser::BoardMap, addresses: &[String]) {
    fn parse_address(text: &str) -> Option<u32> {
        let text = text.trim();
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        u32::from_str_radix(digits, 16).ok()
    }

    if !addresses.is_empty() {
        for text in addresses {
            match parse_address(text) {
                Some(address) => println!("{}", map.format_address(address)),
                None => {
                    eprintln!("{}: not a valid address: {}", style("Error").red().bold(), text);
                    std::process::exit(1);
                }
            }
        }
        return;
    }

    // Interactive mode: resolve addresses until an empty input.
    loop {
        let value: String = dialoguer::Input::new()
            .with_prompt("Log address")
            .allow_empty(true)
            .validate_with(|inp: &String| -> Result<(), &str> {
                if inp.trim().is_empty() || parse_address(inp).is_some() {
                    Ok(())
                } else {
                    Err("not a valid address")
                }
            })
            .interact()
            .unwrap();

        let Some(address) = parse_address(&value) else {
            break;
        };
        println!("{}", map.format_address(address));
    }
}
