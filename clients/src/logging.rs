//! Subscriber setup shared by the binaries.

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Target prefix covering every phenocat crate and binary.
const TARGET: &str = "phenocat";

/// Installs a `fmt` subscriber writing to stderr.
///
/// `phenocat` crates log at `info`, or at `debug` when `verbose` is set.
/// A `RUST_LOG` directive naming `phenocat` replaces that default; other
/// `RUST_LOG` directives apply alongside it.
///
/// # Errors
///
/// Returns an error if `RUST_LOG` is not a valid filter.
pub fn init(verbose: bool) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose, env.as_deref())?)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Builds the filter from the `RUST_LOG` value, if any.
///
/// # Errors
///
/// Returns an error if `env` is not a valid filter.
pub fn filter(verbose: bool, env: Option<&str>) -> Result<EnvFilter> {
    let env = env.unwrap_or_default();
    let filter = EnvFilter::try_new(env)
        .with_context(|| format!("Invalid {} value {:?}", EnvFilter::DEFAULT_ENV, env))?;
    if env_targets(env).any(|target| TARGET.starts_with(target)) {
        return Ok(filter);
    }
    let level = if verbose { "debug" } else { "info" };
    Ok(filter.add_directive(format!("{TARGET}={level}").parse()?))
}

/// Targets named by the directives in a filter string. Bare levels such as
/// `warn` name no target.
fn env_targets(env: &str) -> impl Iterator<Item = &str> {
    env.split(',').filter_map(|directive| {
        let directive = directive.trim();
        let target = directive.split(['[', '=']).next().unwrap_or_default().trim();
        let bare = !directive.contains(['[', '=']);
        if target.is_empty() || (bare && target.parse::<LevelFilter>().is_ok()) {
            None
        } else {
            Some(target)
        }
    })
}
