use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use label_print_rust::batch::{BatchProgress, CancelFlag};
use label_print_rust::cli::{Cli, Commands};
use label_print_rust::config::Config;
use label_print_rust::device::{self, LabelDevice};
use label_print_rust::order::CategoryFilter;
use label_print_rust::price::PriceUpdate;
use label_print_rust::printer::{ItemOutcome, PrintOutcome};
use label_print_rust::session::{self, SessionEnd};
use label_print_rust::template::DaySelector;
use label_print_rust::{AppContext, LabelError};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG があればそちらを優先
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Config { show, set_root, set_primary_site, set_bridge } => {
            let mut config = config;
            let changed = set_root.is_some() || set_primary_site.is_some() || set_bridge.is_some();

            if let Some(root) = set_root {
                config.root_dir = Some(root);
            }
            if let Some(site) = set_primary_site {
                config.primary_site = Some(site);
            }
            if let Some(command) = set_bridge {
                config.bridge.command = command;
            }
            if changed {
                config.save()?;
                println!("✔ Saved {}", Config::config_path()?.display());
            }

            if show || !changed {
                show_config(&config);
            }
        }

        Commands::Sites => {
            let app = load_app(config, cli.root)?;
            println!("📁 {}\n", app.root().display());

            for site in app.sites() {
                let primary = if app.config().is_primary_site(site.id.as_str()) { " *" } else { "" };
                println!("{}{}", site.id, primary);
                for folder in &site.categories {
                    match folder.folder {
                        Some(_) => println!("  {:<6} {} label(s)", folder.category, folder.documents.len()),
                        None => println!("  {:<6} (no '{}' folder)", folder.category, folder.category),
                    }
                }
            }

            if app.sites().is_empty() {
                println!("No site folders found");
            }
        }

        Commands::Price { site, set } => {
            let mut app = load_app(config, cli.root)?;
            app.select_site(&site)?;
            let mut device = device::connect(&app.config().bridge, cli.dry_run)?;

            match set {
                None => {
                    let price = app.refresh_price(&mut device)?;
                    println!("Current Price: {}", price);
                }
                Some(input) => {
                    let bar = progress_bar("Updating Prices")?;
                    let update = app.set_price(&mut device, &input, &CancelFlag::new(), |p| tick(&bar, p))?;
                    bar.finish_and_clear();
                    report_price_update(&update);
                    println!("Current Price: {}", app.displayed_price());
                }
            }
        }

        Commands::Print { site, day, quantities, list } => {
            let mut app = load_app(config, cli.root)?;
            app.select_site(&site)?;

            if let Some(day) = day {
                populate(&mut app, day)?;
            }
            for spec in &quantities {
                app.apply_quantity_spec(spec)?;
            }

            if list {
                print_selection(&app)?;
                return Ok(());
            }

            let mut device = device::connect(&app.config().bridge, cli.dry_run)?;
            run_print(&mut app, &mut device)?;
        }

        Commands::Order { site, day } => {
            let mut app = load_app(config, cli.root)?;
            app.select_site(&site)?;
            println!("🏷  {} (total: {})\n", site, app.total()?);

            if let Some(day) = day {
                populate(&mut app, day)?;
            }

            match session::run_interactive_order(&mut app)? {
                SessionEnd::Quit => {
                    println!("Total: {}", app.total()?);
                }
                SessionEnd::Print => {
                    let mut device = device::connect(&app.config().bridge, cli.dry_run)?;
                    run_print(&mut app, &mut device)?;
                }
            }
        }
    }

    Ok(())
}

fn load_app(config: Config, root_override: Option<PathBuf>) -> Result<AppContext> {
    let root = match root_override {
        Some(root) => root,
        None => config.resolve_root()?,
    };
    AppContext::load(config, &root).with_context(|| format!("Failed to load {}", root.display()))
}

fn show_config(config: &Config) {
    let not_set = "(not set)".to_string();
    println!("Config:");
    println!(
        "  root: {}",
        config.root_dir.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| not_set.clone())
    );
    println!("  primary site: {}", config.primary_site.as_ref().unwrap_or(&not_set));
    println!("  price field: {}", config.price_field);
    println!("  currency: {}", config.currency_symbol);
    println!("  extensions: {}", config.document_extensions.join(", "));
    println!("  bridge: {} {}", config.bridge.command, config.bridge.args.join(" "));
}

fn populate(app: &mut AppContext, day: DaySelector) -> Result<()> {
    let summary = app.populate(day)?;
    println!(
        "✔ {}: {} label(s) set, {} not in template (total: {})",
        day, summary.updated, summary.untouched, summary.total
    );
    Ok(())
}

fn progress_bar(message: &'static str) -> Result<ProgressBar> {
    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")?.progress_chars("=> "));
    bar.set_message(message);
    Ok(bar)
}

fn tick(bar: &ProgressBar, progress: BatchProgress) {
    bar.set_length(progress.total as u64);
    bar.set_position(progress.processed as u64);
}

fn report_price_update(update: &PriceUpdate) {
    match update {
        PriceUpdate::Cancelled => println!("No price entered"),
        PriceUpdate::NothingToUpdate => println!("No labels to update."),
        PriceUpdate::Completed(report) => {
            println!("✔ {} → {}/{} label(s)", report.requested, report.updated, report.total);
            for failure in &report.failures {
                eprintln!("  ✗ {}: {}", failure.path.display(), failure.error);
            }
            if report.cancelled {
                println!("Price update was cancelled");
            }
        }
    }
}

fn run_print<D: LabelDevice + ?Sized>(app: &mut AppContext, device: &mut D) -> Result<()> {
    let bar = progress_bar("Printing")?;
    let outcome = app.print(device, &CancelFlag::new(), |p| tick(&bar, p))?;
    bar.finish_and_clear();

    match outcome {
        PrintOutcome::NothingToPrint => println!("No labels selected."),
        PrintOutcome::Completed(report) => {
            for item in &report.items {
                match &item.outcome {
                    ItemOutcome::Printed => {}
                    ItemOutcome::OpenFailed(_) => eprintln!("✗ Failed to open: {}", file_name(&item.path)),
                    ItemOutcome::PrintFailed(e) => eprintln!("✗ {}", e),
                }
            }

            if report.failures().is_empty() {
                println!("✅ All selected labels printed successfully! ({} copies)", report.copies_printed());
            } else {
                println!(
                    "Print job completed: {} copies, {} label(s) failed",
                    report.copies_printed(),
                    report.failures().len()
                );
            }
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// 印刷対象の一覧を表示
fn print_selection(app: &AppContext) -> Result<()> {
    let site = app.active_site().ok_or(LabelError::NoSiteSelected)?;
    let entries = app.model().entries_matching(site, CategoryFilter::All);

    let mut any = false;
    for entry in entries.iter().filter(|e| e.quantity > 0) {
        println!("  {:<6} {:<30} {:>4}", entry.category(), entry.label(), entry.quantity);
        any = true;
    }

    if !any {
        println!("No labels selected.");
    }
    println!("Total: {}", app.total()?);
    Ok(())
}
