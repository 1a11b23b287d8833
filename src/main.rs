use anyhow::{anyhow, Context, Result};

use shader_preview::config::USAGE;
use shader_preview::{headless, run_interactive, ParameterStore, PreviewConfig, WindowInitError};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = PreviewConfig::from_env().map_err(|err| anyhow!("{err}\n{USAGE}"))?;
    config.validate().context("invalid configuration")?;
    let store = ParameterStore::new(&config.layout);

    let names: Vec<String> = config
        .layout
        .names
        .iter()
        .map(|name| name.to_string())
        .collect();
    println!(
        "Preview variant: {} (parameters: {})",
        config.variant,
        names.join(", ")
    );

    if config.headless {
        return run_headless(&config, &store);
    }

    match run_interactive(&config, store.clone()) {
        Ok(()) => Ok(()),
        Err(err) => {
            if err.downcast_ref::<WindowInitError>().is_some() {
                eprintln!(
                    "{err}. Falling back to --headless mode (set DISPLAY or WAYLAND_DISPLAY to open a window)."
                );
                run_headless(&config, &store)
            } else {
                Err(err)
            }
        }
    }
}

fn run_headless(config: &PreviewConfig, store: &ParameterStore) -> Result<()> {
    let report = headless::run(config, store).context("headless run failed")?;
    headless::print_report(&report);
    Ok(())
}
