#![forbid(unsafe_code)]

//! obsdict demo binary entry point.

use std::io::{self, BufRead};

use obsdict_demo::{DemoWindow, cli, run};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let opts = cli::Opts::parse();
    init_tracing(opts.log_filter.as_deref());
    info!(seed = opts.seed, scripted = opts.script.is_some(), "demo started");

    let mut window = DemoWindow::new(opts.seed);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match opts.script_items() {
        Some(items) => run(&mut window, items.into_iter().map(Ok), opts.show_status, &mut out),
        None => run(
            &mut window,
            io::stdin().lock().lines(),
            opts.show_status,
            &mut out,
        ),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {e}");
        std::process::exit(1);
    }
}
