use std::path::PathBuf;

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command-line arguments
#[derive(Debug, Default)]
pub(crate) struct CliArgs {
    pub(crate) command: Option<String>,
    pub(crate) config: Option<PathBuf>,
    pub(crate) help: bool,
    pub(crate) version: bool,
    pub(crate) trace: bool,
}

/// Parse command-line arguments
pub(crate) fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs::default();

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "--trace" => {
                cli.trace = true;
            }
            "--config" => {
                if i + 1 < args.len() {
                    cli.config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "-c" => {
                // Everything after -c is the line to run
                if i + 1 < args.len() {
                    cli.command = Some(args[i + 1..].join(" "));
                    break;
                }
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            other => {
                eprintln!("Warning: ignoring unknown argument {}", other);
            }
        }
        i += 1;
    }

    cli
}

pub(crate) fn print_help() {
    println!(
        r#"netprompt-{} - a menu-driven command line

USAGE:
    netprompt                   Start interactive prompt
    netprompt -c <line>         Run a single line and exit
    netprompt --config <path>   Read configuration from <path>
    netprompt --trace           Log engine decisions to stderr
    netprompt --help            Show this help message
    netprompt --version         Show version

STARTUP:
    $NETPROMPT_CONFIG           Config file, when --config is not given
    ~/.netprompt.toml           Config file otherwise
    ~/.netpromptrc              Lines run before the first prompt
    NETPROMPT_PROMPT            Overrides the configured prompt
    RUST_LOG                    Log filter (e.g. netprompt=debug)

INPUT:
    cmd arg arg                 Run a command
    cmd; cmd                    Run commands in order
    cmd | filter args           Send output through a filter
    cmd > file                  Write output to a file
    "a b" 'a b' `a b`           Quoted word
    \ at end of line            Continue on the next line

MENUS:
    names                       Enter the names menu (hello $*)
    list-files                  Enter the files menu (ls $1)
    exit                        Leave the current menu, or quit at the top

FILTERS:
    grep [-i] [-v] <regex>      Keep matching lines
"#,
        VERSION
    );
}

pub(crate) fn print_version() {
    println!("netprompt {}", VERSION);
}
