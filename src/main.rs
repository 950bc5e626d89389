// src/main.rs
mod logger;

use clap::{ArgAction, Parser, Subcommand};
use huf::{END_OF_STREAM, EncodingMap, HuffmanTree, Symbol};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "huf", version)]
#[command(about = "Huffman file compressor.", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress FILE into FILE.huf
    Compress {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompress NAME.EXT.huf into NAME_unc.EXT
    Decompress {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the frequency table and codes stored in a .huf file
    Inspect { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> huf::Result<()> {
    match command {
        Commands::Compress { file, output } => {
            let output = output.unwrap_or_else(|| huf::compressed_path(&file));
            let bits = huf::compress_file(&file, &output)?;
            println!("Compressed {} -> {} ({} bits)", file.display(), output.display(), bits.len());
        }
        Commands::Decompress { file, output } => {
            let output = match output {
                Some(path) => path,
                None => huf::decompressed_path(&file)?,
            };
            let bytes = huf::decompress_file(&file, &output)?;
            println!("Decompressed {} -> {} ({} bytes)", file.display(), output.display(), bytes.len());
        }
        Commands::Inspect { file } => inspect(&file)?,
    }
    Ok(())
}

fn inspect(path: &Path) -> huf::Result<()> {
    let table = huf::read_table(path)?;
    let tree = HuffmanTree::build(&table)?;
    let map = EncodingMap::build(&tree);

    println!("{:>8}  {:>10}  code", "symbol", "count");
    for (symbol, count) in table.iter() {
        let code = map.get(symbol).unwrap_or("");
        println!("{:>8}  {:>10}  {}", describe(symbol), count, code);
    }
    println!(
        "{} symbols, {} bytes, {} payload bits",
        table.len(),
        table.total_bytes(),
        map.weighted_path_length(&table)
    );
    Ok(())
}

fn describe(symbol: Symbol) -> String {
    match u8::try_from(symbol) {
        Ok(byte) if byte.is_ascii_graphic() => format!("'{}'", byte as char),
        Ok(byte) => format!("0x{byte:02x}"),
        Err(_) if symbol == END_OF_STREAM => "EOF".to_string(),
        Err(_) => symbol.to_string(),
    }
}
