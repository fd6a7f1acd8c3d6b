mod cache;
mod config;
mod error;
mod prefetch;
mod replace;
mod replay;
mod stats;
#[cfg(test)]
mod testing;
mod trace;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use serde::Serialize;

use crate::{
    config::Config,
    error::{ConfigError, Error},
    replay::Replayer,
    stats::CacheStats,
    trace::Trace,
};

#[derive(Serialize)]
struct Report<'a> {
    config: &'a Config,
    replayed: u64,
    caches: &'a [CacheStats],
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        log::debug!("{err}");
        println!("error");
        process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let mut args = pico_args::Arguments::from_env();
    let json_path: Option<PathBuf> = args.opt_value_from_str("--json")?;

    let free: Vec<String> = args
        .finish()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let [size, assoc, policy, block_size, trace_path] = free.as_slice() else {
        return Err(ConfigError::Arity(free.len()).into());
    };

    let config = Config::parse(size, assoc, policy, block_size)?;
    let geometry = config.geometry()?;
    log::info!(
        "{} sets x {} ways x {} byte blocks, {:?}",
        geometry.n_sets,
        geometry.n_ways,
        geometry.block_size,
        config.policy
    );

    let trace_err = |source: io::Error| Error::Trace {
        path: trace_path.into(),
        source,
    };
    let mut trace = Trace::open(Path::new(trace_path)).map_err(trace_err)?;
    let mut replayer = Replayer::new(config.to_caches(geometry));
    let replayed = replayer.replay(&mut trace).map_err(trace_err)?;
    log::info!("replayed {replayed} entries, skipped {}", trace.skipped);

    let reports = replayer.report();
    if let Some(path) = json_path {
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(
            file,
            &Report {
                config: &config,
                replayed,
                caches: &reports,
            },
        )?;
    }

    let mut out = io::stdout().lock();
    for report in &reports {
        write!(out, "{report}")?;
    }
    out.flush()?;
    Ok(())
}
