/// CLI: reads a JSON build manifest from stdin or a file, emits a Ninja
/// build file to stdout or to `-o`.
///
/// Usage:
///   ninja-gen < manifest.json > build.ninja
///   ninja-gen -o build.ninja manifest.json
///   ninja-gen --line-width 100 manifest.json
///
/// Set `RUST_LOG=ninja_gen=debug` to trace what is written.
use std::io::{Read, Write};
use std::path::PathBuf;

use ninja_gen::{Manifest, NinjaWriter, LINE_WIDTH};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut line_width = LINE_WIDTH;
    let mut output: Option<PathBuf> = None;
    let mut file_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--line-width" | "-w" => {
                i += 1;
                line_width = match args.get(i).map(|s| s.parse::<usize>()) {
                    Some(Ok(n)) if n > 0 => n,
                    _ => {
                        eprintln!("--line-width needs a positive integer");
                        std::process::exit(1);
                    }
                };
            }
            "--output" | "-o" => {
                i += 1;
                match args.get(i) {
                    Some(path) => output = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("--output needs a file path");
                        std::process::exit(1);
                    }
                }
            }
            "--help" | "-h" => {
                eprintln!("Usage: ninja-gen [--line-width N] [-o build.ninja] [manifest.json]");
                eprintln!("  Reads a JSON build manifest from file or stdin, emits a Ninja build file.");
                std::process::exit(0);
            }
            path => {
                file_path = Some(path);
            }
        }
        i += 1;
    }

    let json_str = match file_path {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Cannot read {path}: {e}");
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .unwrap_or_else(|e| {
                    eprintln!("Cannot read stdin: {e}");
                    std::process::exit(1);
                });
            buf
        }
    };

    let manifest = Manifest::from_json(&json_str).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    let result = match &output {
        Some(path) => manifest.write_file(path, line_width),
        None => {
            let stdout = std::io::stdout().lock();
            let mut writer = NinjaWriter::with_line_width(stdout, line_width);
            manifest.write(&mut writer).and_then(|()| {
                writer.into_inner().flush().map_err(ninja_gen::Error::from)?;
                Ok(())
            })
        }
    };

    if let Err(e) = result {
        eprintln!("Cannot generate build file: {e}");
        std::process::exit(1);
    }
}
