//! dotfold command line.
//!
//! Plans a migration of a dot-path-named note corpus into folder-style
//! titled names, prints the report, and writes only with `--apply`.

use std::env;
use std::fs;
use std::process::ExitCode;

use dotfold_core::{apply_import, plan_import, DirectoryStore, MigrationConfig, PageRecord};

fn print_usage() {
    eprintln!("Usage: dotfold <root-dir> [--config dotfold.yaml] [--apply]");
    eprintln!();
    eprintln!("Plans the migration and prints the name mapping, conflicts and");
    eprintln!("skipped pages. Nothing is written unless --apply is given.");
}

fn main() -> ExitCode {
    env_logger::init();

    let mut root: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut apply = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--apply" => apply = true,
            "--config" => config_path = args.next(),
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            _ if root.is_none() => root = Some(arg),
            _ => {
                log::error!("unexpected argument: {}", arg);
                print_usage();
                return ExitCode::FAILURE;
            }
        }
    }

    let root = match root {
        Some(root) => root,
        None => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    log::error!("cannot read config {}: {}", path, err);
                    return ExitCode::FAILURE;
                }
            };
            match MigrationConfig::from_yaml(&content) {
                Ok(config) => config,
                Err(err) => {
                    log::error!("invalid config {}: {}", path, err);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => MigrationConfig::default(),
    };

    let mut store = DirectoryStore::new(root);
    let is_exempt = |record: &PageRecord| record.content_length == 0;

    let plan = match plan_import(&store, &config, is_exempt) {
        Ok(plan) => plan,
        Err(err) => {
            log::error!("planning failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    println!("{} page(s) to import", plan.page_count());
    for (old_name, new_name) in &plan.mapping {
        println!("  {} -> {}", old_name, new_name);
    }
    for name in &plan.skipped {
        println!("skipped (no importable header): {}", name);
    }
    for (new_name, old_names) in &plan.conflicts.duplicate_targets {
        println!(
            "conflict: {} pages map to '{}': {}",
            old_names.len(),
            new_name,
            old_names.join(", ")
        );
    }
    for new_name in &plan.conflicts.overwrites {
        println!("conflict: '{}' would overwrite an existing page", new_name);
    }

    if !plan.is_applicable(&config) {
        log::warn!("plan is not applicable; resolve the reported issues first");
        return ExitCode::FAILURE;
    }

    if !apply {
        println!("dry run only; pass --apply to write pages");
        return ExitCode::SUCCESS;
    }

    match apply_import(&mut store, &plan, &config) {
        Ok(summary) => {
            println!(
                "imported {} page(s), skipped {}",
                summary.imported, summary.skipped
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("import failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
