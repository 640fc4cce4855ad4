use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use reqgauge::app::{print_report, run_local};
use reqgauge::args::BenchArgs;
use reqgauge::config::{apply_config, load_config};
use reqgauge::error::AppResult;
use reqgauge::logger::init_logging;
use reqgauge::shutdown::shutdown_channel;

use crate::shutdown_handlers::setup_signal_shutdown_handler;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args(std::env::args_os().collect())?;

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    init_logging(args.verbose, args.no_color);

    // Missing URL prints usage and exits successfully.
    let Some(url) = args.url.clone() else {
        BenchArgs::command().print_help()?;
        println!();
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&args, &url))
}

fn parse_args(raw_args: Vec<OsString>) -> AppResult<(BenchArgs, ArgMatches)> {
    let matches = BenchArgs::command().get_matches_from(raw_args);
    let args = BenchArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: &BenchArgs, url: &str) -> AppResult<()> {
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let result = run_local(args, url, &shutdown_tx).await;

    drop(shutdown_tx.send(()));
    signal_handle.await?;

    print_report(&result?, args.output_format)
}
