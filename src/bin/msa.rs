/// Interactive MSA console application

use msamanager::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "chunks",
                "create",
                "exit",
                "help",
                "info",
                "load",
                "open",
                "quit",
                "read-sector",
                "save",
                "tracks",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete the first word (command name)
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

/// Get the path to the history file
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".msamanager_history");
        p
    })
}

fn main() {
    env_logger::init();

    println!("=== MSAManager ===");
    println!("Interactive console for Atari ST MSA and raw ST disk images.");
    println!("Type 'help' for available commands\n");

    let mut rl = match Editor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create editor: {}", e);
            return;
        }
    };
    rl.set_helper(Some(CommandCompleter::new()));

    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    let mut image: Option<DiskImage> = None;

    loop {
        let input = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => print_help(),
            "quit" | "exit" => break,
            "open" | "load" => {
                if parts.len() < 2 {
                    println!("Usage: open <path>");
                    continue;
                }
                match DiskImage::open(&parts[1]) {
                    Ok(img) => {
                        println!("Opened: {} ({})", parts[1], img.format().name());
                        image = Some(img);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "create" => {
                let geometry = match parts.get(1).map(|s| s.as_str()) {
                    Some("ss") => DiskGeometry::atari_ss_dd(),
                    Some("ds10") => DiskGeometry::atari_ds_dd_10(),
                    Some("ds11") => DiskGeometry::atari_ds_dd_11(),
                    Some("hd") => DiskGeometry::atari_ds_hd(),
                    _ => DiskGeometry::atari_ds_dd(),
                };
                match DiskImage::create(geometry) {
                    Ok(img) => {
                        println!("Created new {} KB image", img.total_capacity_kb());
                        image = Some(img);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "info" => match image {
                Some(ref img) => print_info(img),
                None => println!("No image loaded. Use 'open <path>' or 'create' first."),
            },
            "tracks" | "chunks" => match image {
                Some(ref img) => list_chunks(img),
                None => println!("No image loaded."),
            },
            "read-sector" => {
                let Some(ref img) = image else {
                    println!("No image loaded.");
                    continue;
                };
                if parts.len() < 4 {
                    println!("Usage: read-sector <side> <track> <sector>");
                    continue;
                }
                let (Some(side), Some(track), Some(sector)) = (
                    parts[1].parse::<u8>().ok(),
                    parse_hex_or_dec(&parts[2]),
                    parse_hex_or_dec(&parts[3]),
                ) else {
                    println!("Usage: read-sector <side> <track> <sector>");
                    continue;
                };

                match img.read_sector(side, track, sector) {
                    Ok(data) => {
                        println!("Sector {}:{}:{} ({} bytes):", side, track, sector, data.len());
                        print_hex_dump(data, 256);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "save" => {
                let Some(ref mut img) = image else {
                    println!("No image loaded.");
                    continue;
                };
                if parts.len() < 2 {
                    println!("Usage: save <path> [nocompress]");
                    continue;
                }
                let options = if parts.iter().skip(2).any(|p| p.eq_ignore_ascii_case("nocompress")) {
                    EncodeOptions::uncompressed()
                } else {
                    EncodeOptions::default()
                };
                let format = ImageFormat::from_path(&parts[1]);
                match img.save_as(&parts[1], format, &options) {
                    Ok(()) => println!("Saved {} image to {}", format.name(), parts[1]),
                    Err(e) => println!("Error: {}", e),
                }
            }
            _ => {
                println!("Unknown command: {}. Type 'help' for available commands.", command);
            }
        }
    }

    if let Some(history_path) = history_path() {
        let _ = rl.save_history(&history_path);
    }
    println!("Goodbye!");
}

/// Parse command line input, respecting quoted strings
fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn print_help() {
    println!("Available commands:");
    println!("  open <path>                    - Open an .msa or raw .st image (use quotes for paths with spaces)");
    println!("  create [ss|ds|ds10|ds11|hd]    - Create a blank formatted image (default: ds, 720K)");
    println!("  info                           - Show image information");
    println!("  tracks                         - Show how each track would be stored in MSA (chunks)");
    println!("  read-sector <side> <t> <s>     - Read and display a sector (sectors start at 1)");
    println!("  save <path> [nocompress]       - Save as .msa or raw .st by extension");
    println!("  help                           - Show this help");
    println!("  quit, exit                     - Exit");
}

fn print_info(image: &DiskImage) {
    let geometry = image.geometry();
    if let Some(filename) = image.filename() {
        println!("Filename: {}", filename);
    }
    println!("Format: {}", image.format().name());
    println!("Sides: {}", geometry.sides);
    println!("Tracks per side: {}", geometry.tracks);
    println!("Sectors per track: {}", geometry.sectors_per_track);
    println!("Total capacity: {} KB", image.total_capacity_kb());
    println!("Changed: {}", if image.is_changed() { "Yes" } else { "No" });
}

fn list_chunks(image: &DiskImage) {
    let container = match image.to_msa() {
        Ok(container) => container,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    let chunks = match codec::inspect(&container) {
        Ok(chunks) => chunks,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    let track_size = image.geometry().track_size();
    println!(
        "{:<6} {:<5} {:<8} {:<7} {:<9} {:>6}",
        "Track", "Side", "Offset", "Length", "Storage", "Ratio"
    );
    println!("{}", "-".repeat(46));

    for chunk in &chunks {
        println!(
            "{:<6} {:<5} {:<8} {:<7} {:<9} {:>5.1}%",
            chunk.track,
            chunk.side,
            chunk.offset,
            chunk.length,
            if chunk.encoded { "RLE" } else { "Verbatim" },
            chunk.ratio(track_size)
        );
    }

    let compressed = chunks.iter().filter(|c| c.encoded).count();
    println!(
        "{} of {} tracks compressed, {} -> {} bytes",
        compressed,
        chunks.len(),
        image.total_capacity(),
        container.len()
    );
}

fn print_hex_dump(data: &[u8], max_bytes: usize) {
    let len = data.len().min(max_bytes);

    for (i, chunk) in data[..len].chunks(16).enumerate() {
        print!("{:04X}: ", i * 16);

        for (j, byte) in chunk.iter().enumerate() {
            print!("{:02X} ", byte);
            if j == 7 {
                print!(" ");
            }
        }

        // Pad if less than 16 bytes
        for j in chunk.len()..16 {
            print!("   ");
            if j == 7 {
                print!(" ");
            }
        }

        print!(" |");
        for byte in chunk {
            let c = if (32..127).contains(byte) { *byte as char } else { '.' };
            print!("{}", c);
        }
        println!("|");
    }

    if data.len() > max_bytes {
        println!("... ({} more bytes)", data.len() - max_bytes);
    }
}

fn parse_hex_or_dec(s: &str) -> Option<u16> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}
