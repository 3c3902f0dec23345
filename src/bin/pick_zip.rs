use std::path::PathBuf;
use std::process;

use clap::Parser;

use sjis_zip::extract::pick;
use sjis_zip::resolve::{PickRequest, TargetSpec};

#[derive(Parser)]
#[command(
    name = "pick-zip",
    about = "Extract a single entry from a zip file with Shift-JIS names",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Input zip file
    #[arg(short = 'i', value_name = "ZIP")]
    zip_file: PathBuf,

    /// Entry to extract, by name
    #[arg(short = 'f', value_name = "NAME")]
    file: Option<String>,

    /// Entry to extract, by hash as shown by `list-zip -s`
    #[arg(short = 'H', long = "hash", value_name = "HASH")]
    hash: Option<String>,

    /// Name of the extracted file (required with --hash)
    #[arg(short = 'o', value_name = "NAME")]
    output: Option<String>,

    /// Directory to extract the file to
    #[arg(short = 'd', value_name = "DIR")]
    dest_dir: PathBuf,

    /// Suppress messages
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    let request = PickRequest {
        zip_path: cli.zip_file,
        target: TargetSpec {
            archive_name: cli.file,
            archive_hash: cli.hash,
            extract_name: cli.output,
            ..TargetSpec::default()
        },
        dest_dir: cli.dest_dir,
    };

    match pick(&request) {
        Ok(result) => {
            if !cli.quiet {
                println!(
                    "{} was extracted to {} ({} bytes)",
                    request.target,
                    result.path.display(),
                    result.bytes
                );
            }
        }
        Err(e) => {
            eprintln!("err: {e}");
            process::exit(e.exit_code());
        }
    }
}
