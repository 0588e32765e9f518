extern crate mapsugar;

use std::process;

use mapsugar::driver::options::MapsugarOptions;
use mapsugar::driver::rewrite;
use mapsugar::driver::source::SourceLoader;
use mapsugar::driver::statistics::Timings;

pub fn main() {
    let mut opt = MapsugarOptions::from_args();
    setup_logging(opt.log_filter());

    let mut loader = SourceLoader::new();
    if let Err(e) = opt.process_defaults() {
        loader.diagnose_to_stderr(&loader.diagnostic(None, &e));
        process::exit(e.exit_code());
    }

    // For a dry run, just explain the options
    if opt.explain() {
        println!("{}", opt.explanation());
        process::exit(0);
    }

    let mut timings = Timings::default();

    let file_id = match rewrite::load(&opt, &mut loader, &mut timings) {
        Ok(id) => id,
        Err(e) => {
            loader.diagnose_to_stderr(&loader.diagnostic(None, &e));
            exit(&opt, e.exit_code(), &timings);
        }
    };

    match rewrite::process(&opt, &loader, file_id, &mut timings) {
        Ok(()) => exit(&opt, 0, &timings),
        Err(e) => {
            loader.diagnose_to_stderr(&loader.diagnostic(Some(file_id), &e));
            exit(&opt, e.exit_code(), &timings)
        }
    }
}

/// Install a stderr subscriber filtered at `level` unless `RUST_LOG`
/// says otherwise
fn setup_logging(level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .init();
}

/// Optionally dump timings to stderr then exit
pub fn exit(opts: &MapsugarOptions, code: i32, timings: &Timings) -> ! {
    if opts.statistics() {
        eprintln!();
        eprintln!("~~~~~~~~~~");
        eprintln!("STATISTICS");
        eprintln!("~~~~~~~~~~");
        eprintln!();
        eprintln!("{timings}");
    }
    process::exit(code)
}
