use color_print::cprintln;
use hackasm::{assemble, util};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input files
    #[clap(default_value = "main.asm")]
    input: Vec<String>,

    /// Dump decoded instructions and symbols
    #[clap(short, long)]
    dump: bool,

    /// Verbose logging (per-character transition traces with RUST_LOG=trace)
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let mut failed = false;
    for path in &args.input {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                cprintln!("<red,bold>error</>: Failed to open file `{}`: {}", path, e);
                failed = true;
                continue;
            }
        };
        match assemble(&source) {
            Ok(result) => {
                println!(
                    "{}: {} instructions, {} symbols",
                    path,
                    result.instructions.len(),
                    result.symbols.len()
                );
                if args.dump {
                    util::print_dump(&result);
                }
            }
            Err(e) => {
                e.print_diag(path);
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}
