//! plyio CLI - inspect and re-encode PLY files.

use plyio::file::{transcode_file, PlyFileReader};
use plyio::format::{detect_format, Encoding};
use std::env;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "info" | "i" => {
            let Some(path) = filtered_args.get(1) else {
                usage_error("missing file argument", "plyio info <file.ply> [--json]");
            };
            let json = filtered_args[2..].iter().any(|&s| s == "--json" || s == "-j");
            cmd_info(path, json)
        }

        "convert" | "c" => {
            let (Some(input), Some(output)) = (filtered_args.get(1), filtered_args.get(2)) else {
                usage_error(
                    "missing file arguments",
                    "plyio convert <in.ply> <out.ply> [--ascii|--binary] [--mmap]",
                );
            };
            let flags = &filtered_args[3..];
            let encoding = if flags.contains(&"--ascii") {
                Some(Encoding::Ascii)
            } else if flags.contains(&"--binary") {
                Some(Encoding::BinaryLittleEndian)
            } else {
                None
            };
            cmd_convert(input, output, encoding, flags.contains(&"--mmap"))
        }

        "version" | "--version" | "-V" => {
            println!("{}", plyio::version_string());
            Ok(())
        }

        "help" | "h" | "--help" | "-h" => {
            print_help();
            Ok(())
        }

        // A bare path is shorthand for `info`
        other if Path::new(other).extension().is_some_and(|e| e.eq_ignore_ascii_case("ply")) => {
            cmd_info(other, false)
        }

        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn usage_error(message: &str, usage: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("Usage: {}", usage);
    std::process::exit(1);
}

fn print_help() {
    println!("plyio - PLY file toolkit");
    println!();
    println!("USAGE:");
    println!("    plyio [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info    <file> [--json]         Show format, comments and schema");
    println!("    c, convert <in> <out> [FLAGS]      Re-encode a file");
    println!("    version                            Show version and build date");
    println!("    h, help                            Show this help");
    println!();
    println!("CONVERT FLAGS:");
    println!("    --ascii      Write ASCII body");
    println!("    --binary     Write binary little-endian body");
    println!("    --mmap       Write through a memory-mapped reservation");
    println!("    (without --ascii/--binary the input encoding is kept)");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!("    RUST_LOG overrides the level when set");
    println!();
    println!("EXAMPLES:");
    println!("    plyio info bunny.ply                  # Quick overview");
    println!("    plyio info bunny.ply --json           # Schema as JSON");
    println!("    plyio convert in.ply out.ply --ascii  # Binary to ASCII");
    println!("    plyio -v convert a.ply b.ply --mmap   # Mapped write, verbose");
}

fn cmd_info(path: &str, json: bool) -> plyio::Result<()> {
    debug!(path, "opening file");
    let mut reader = PlyFileReader::open(path)?;
    let encoding = reader.encoding();
    let document = reader.parse_header()?;

    if json {
        let elements: Vec<_> = document
            .elements
            .iter()
            .map(|element| {
                let properties: Vec<_> = element
                    .properties
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "name": p.name,
                            "type": p.type_name(),
                        })
                    })
                    .collect();
                serde_json::json!({
                    "name": element.name,
                    "count": element.count,
                    "properties": properties,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "file": path,
                "format": encoding.keyword(),
                "comments": document.comments,
                "elements": elements,
            }))
            .unwrap_or_default()
        );
        return Ok(());
    }

    println!("File:   {}", path);
    println!("Format: {}", encoding);
    for comment in &document.comments {
        println!("Comment: {}", comment);
    }
    println!();
    for element in &document.elements {
        println!("element {} ({} rows)", element.name, element.count);
        for property in &element.properties {
            println!("  {:<20} {}", property.name, property.type_name());
        }
    }
    println!();
    println!("Total rows: {}", document.total_rows());
    Ok(())
}

fn cmd_convert(input: &str, output: &str, encoding: Option<Encoding>, use_mmap: bool) -> plyio::Result<()> {
    let source_encoding = detect_format(input)?;
    let target = encoding.unwrap_or(source_encoding);
    info!(input, output, from = %source_encoding, to = %target, mmap = use_mmap, "converting");

    // Staged next to the output, so converting a file onto itself is safe.
    let written = transcode_file(input, output, Some(target), use_mmap)?;
    info!(bytes = written, "done");
    Ok(())
}
