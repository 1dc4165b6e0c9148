//! TourBox Elite Driver CLI
//!
//! Compiles a per-application settings file and drives the device:
//! control events in, synthetic keyboard events out.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

use tourbox_driver::config;
use tourbox_driver::controls::Control;
use tourbox_driver::focus::XpropFocus;
use tourbox_driver::inject::{VirtualKeyboard, DEVICE_NAME};
use tourbox_driver::keycodes::{key_name, KEY_NAMES};
use tourbox_driver::profile::{KeySequence, Step};
use tourbox_driver::session::Session;
use tourbox_driver::transport::HidTransport;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { settings } => run(&settings),
        Commands::Check { settings } => check(&settings),
        Commands::GenTest { output } => gen_test(&output),
        Commands::Controls => {
            for control in Control::all() {
                println!("{control}");
            }
            Ok(())
        }
        Commands::Keys => {
            for &(name, _) in KEY_NAMES {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn load_settings(path: &Path) -> anyhow::Result<config::CompileOutput> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read settings file {}", path.display()))?;
    Ok(config::compile(&text))
}

fn run(settings: &Path) -> anyhow::Result<()> {
    let output = load_settings(settings)?;
    info!(
        profiles = output.store.len(),
        problems = output.diagnostics.len(),
        "settings compiled"
    );

    let mut transport = HidTransport::open()
        .context("TourBox Elite not found (check cabling and udev permissions)")?;
    transport.handshake().context("device handshake failed")?;
    let keyboard =
        VirtualKeyboard::new(DEVICE_NAME).context("failed to set up key injection")?;

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("failed to install the interrupt handler")?;

    let mut session = Session::new(transport, keyboard, XpropFocus, output.store, stop);
    session.run().context("driver session failed")?;
    Ok(())
}

fn describe_steps(sequence: &KeySequence) -> String {
    sequence
        .steps()
        .iter()
        .map(|step| match *step {
            Step::Key(key) => key_name(key).unwrap_or("KEY_?").to_string(),
            Step::Flush => ">".to_string(),
            Step::Pause(duration) => format!("SLEEP_{}", duration.as_millis()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn check(settings: &Path) -> anyhow::Result<()> {
    let output = load_settings(settings)?;
    for (id, profile) in output.store.iter() {
        println!(
            "profile {:2}  \"{}\"  {} bindings",
            id.0,
            profile.pattern(),
            profile.binding_count()
        );
        let mut lines: Vec<String> = profile
            .bindings()
            .map(|((control, modifier), sequence)| {
                let slot = match modifier {
                    Some(m) => format!("{} {control}", m.name()),
                    None => control.to_string(),
                };
                format!("  {slot:<30} {}", describe_steps(sequence))
            })
            .collect();
        lines.sort();
        for line in lines {
            println!("{line}");
        }
    }
    for diag in &output.diagnostics {
        println!("warning: {diag}");
    }
    println!(
        "{} profiles, {} problems",
        output.store.len(),
        output.diagnostics.len()
    );
    Ok(())
}

fn gen_test(output: &Path) -> anyhow::Result<()> {
    fs::write(output, config::test_settings())
        .with_context(|| format!("cannot write {}", output.display()))?;
    println!("wrote {}", output.display());
    Ok(())
}
