use clap::{Parser, Subcommand};
use seqpak::error::Result;
use seqpak::{archive, codec};
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Filename convention for uncompressed archives; `build` appends it when
/// missing.
const ARCHIVE_EXT: &str = "spk";

#[derive(Parser)]
#[command(name = "seqpak", about = "The .spk sequential archive CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack files and directories into a new archive
    #[command(visible_alias = "b")]
    Build {
        archive: PathBuf,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// List stored names without extracting
    #[command(visible_alias = "l")]
    List {
        archive: PathBuf,
    },
    /// Extract every record onto disk
    #[command(visible_alias = "u")]
    Unpack {
        archive: PathBuf,
        /// Destination prefix (default: current location)
        #[arg(default_value = ".")]
        dest: PathBuf,
    },
    /// Compress a finished archive into a .zst sibling
    #[command(visible_alias = "c")]
    Compress {
        archive: PathBuf,
    },
    /// Decompress a .zst archive back into its plain form
    #[command(visible_alias = "d")]
    Decompress {
        archive: PathBuf,
    },
    /// Build, compress, and drop the intermediate archive
    BuildCompress {
        archive: PathBuf,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Decompress, unpack, and drop the intermediate archive
    UnpackDecompress {
        archive: PathBuf,
        /// Destination prefix (default: current location)
        #[arg(default_value = ".")]
        dest: PathBuf,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build { archive, inputs } => {
            let report = archive::build(&with_archive_ext(archive), &inputs)?;
            println!(
                "Packed {} file(s) ({} payload bytes) into {}",
                report.records,
                report.payload_bytes,
                report.archive.display()
            );
        }

        Commands::List { archive } => {
            for name in archive::list(&archive)? {
                println!("{name}");
            }
        }

        Commands::Unpack { archive, dest } => {
            print_unpack_summary(&archive::unpack(&archive, &dest)?);
        }

        Commands::Compress { archive } => {
            let out = codec::compress(&archive)?;
            println!("Compressed to {}", out.display());
        }

        Commands::Decompress { archive } => {
            let out = codec::decompress(&archive)?;
            println!("Decompressed to {}", out.display());
        }

        Commands::BuildCompress { archive, inputs } => {
            let plain = with_archive_ext(archive);
            archive::build(&plain, &inputs)?;
            let compressed = codec::compress(&plain);
            // The intermediate archive goes away whether or not the
            // compression step succeeded.
            let _ = fs::remove_file(&plain);
            println!("Packed and compressed to {}", compressed?.display());
        }

        Commands::UnpackDecompress { archive, dest } => {
            let plain = codec::decompress(&archive)?;
            let unpacked = archive::unpack(&plain, &dest);
            let _ = fs::remove_file(&plain);
            print_unpack_summary(&unpacked?);
        }
    }

    Ok(())
}

fn print_unpack_summary(report: &archive::UnpackReport) {
    if report.dest.as_os_str().is_empty() {
        println!("Unpacked {} file(s)", report.records);
    } else {
        println!("Unpacked {} file(s) to {}", report.records, report.dest.display());
    }
}

fn with_archive_ext(path: PathBuf) -> PathBuf {
    if path.extension() == Some(OsStr::new(ARCHIVE_EXT)) {
        return path;
    }
    let mut name = path.into_os_string();
    name.push(".");
    name.push(ARCHIVE_EXT);
    PathBuf::from(name)
}
