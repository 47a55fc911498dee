use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use rluachunk::{DecodeOptions, Utf8Policy, decode};

/// Command-line arguments parser
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Decode compiled Lua 5.1 chunks and dump their function tree"
)]
struct Arguments {
    /// Paths to the Lua bytecode files to decode
    #[clap(
        required = true,
        help = "One or more Lua bytecode files to decode.",
        value_name = "FILE",
        value_hint = clap::ValueHint::FilePath
    )]
    files: Vec<PathBuf>,

    /// Attach opcode number, name and format to every instruction
    #[clap(short, long)]
    verbose_instructions: bool,

    /// Deepest function nesting to accept
    #[clap(long, value_name = "N", default_value_t = rluachunk::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Fail on strings that are not valid UTF-8 instead of replacing bytes
    #[clap(long)]
    strict_utf8: bool,
}

impl Arguments {
    fn decode_options(&self) -> DecodeOptions {
        let utf8 = if self.strict_utf8 {
            Utf8Policy::Reject
        } else {
            Utf8Policy::Replace
        };
        DecodeOptions::default()
            .verbose_instructions(self.verbose_instructions)
            .max_depth(self.max_depth)
            .utf8(utf8)
    }
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Arguments::parse();
    let options = args.decode_options();
    let mut failed = false;

    for file_path in &args.files {
        info!("Decoding file: {}", file_path.display());

        let bytecode = match std::fs::read(file_path) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("Error reading {}: {}", file_path.display(), err);
                failed = true;
                continue;
            }
        };

        match decode(&bytecode, &options) {
            Ok(chunk) => {
                info!(
                    "Decoded {} ({} nested functions)",
                    file_path.display(),
                    chunk.main.descendants()
                );
                println!("{}:", file_path.display());
                println!("Header: {:#?}", chunk.header);
                println!("Function Prototype: {:#?}", chunk.main);
            }
            Err(err) => {
                eprintln!("Error decoding {}: {}", file_path.display(), err);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
