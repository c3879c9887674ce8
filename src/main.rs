use repo_transfer::{cli::Cli, run};
use std::io::Write;

fn main() {
    let cli = match Cli::parse_lenient(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    let status = {
        let mut stdout = std::io::stdout().lock();
        let result = run(&cli, &mut stdout);
        let _ = stdout.flush();
        result
    };

    match status {
        Ok(status) => std::process::exit(status),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
