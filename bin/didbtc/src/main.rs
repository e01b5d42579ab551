//! Command line tool for building and resolving did:btc transactions.
//!
//! Built transactions are printed as JSON and never broadcast.

mod args;
mod cmd;
mod output;

use std::process;

use args::Args;
use cmd::{exec_subc, CmdContext};
use didbtc_common::logging::{self, LoggerConfig};

fn main() {
    let args: Args = argh::from_env();
    let inner = || -> anyhow::Result<()> {
        let ctx = CmdContext::from_args(&args)?;
        logging::init(LoggerConfig::new("didbtc").with_json_logging(ctx.config.logging.json));
        exec_subc(args.subc, &ctx)?;
        Ok(())
    };
    if let Err(e) = inner() {
        eprintln!("ERROR\n{e:?}");
        process::exit(1);
    }
}
