use std::path::PathBuf;
use std::process;

use clap::Parser;

use sjis_zip::list::{NamingPolicy, list_archive};

#[derive(Parser)]
#[command(
    name = "list-zip",
    about = "List the entries in a zip file",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Display file names as stored (default: convert from Shift-JIS to UTF-8)
    #[arg(short = 'r', long = "raw-string")]
    raw_string: bool,

    /// Convert only names whose UTF-8 flag is not set
    #[arg(short = 'a', long = "auto-detect")]
    auto_detect: bool,

    /// Display the hash value of each entry
    #[arg(short = 's', long = "show-hash")]
    show_hash: bool,

    /// Zip file
    archive: PathBuf,
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

    let result = NamingPolicy::from_flags(cli.raw_string, cli.auto_detect).and_then(|policy| {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        list_archive(&cli.archive, policy, cli.show_hash, &mut out)
    });

    if let Err(e) = result {
        eprintln!("err: {e}");
        process::exit(e.exit_code());
    }
}
