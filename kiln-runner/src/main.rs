mod shapes;

use clap::Parser;
use kiln_manifest::load_manifest;
use log::{error, info};
use shapes::catalog;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(author, version, about = "Instantiates registered shapes from a manifest", long_about = None)]
struct Args {
    /// Path to the spawn manifest
    #[arg(short, long, default_value = "manifest.json")]
    manifest: PathBuf,

    /// List the registered shape keys and exit
    #[arg(long)]
    list: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    // Explicit registration pass: apply everything submitted at link time
    // before any lookups happen.
    let installed = catalog::install();
    info!("installed {} shape constructors", installed);

    if args.list {
        let mut keys = catalog::keys();
        keys.sort();
        for key in keys {
            println!("{key}");
        }
        return;
    }

    let manifest = match load_manifest(&args.manifest) {
        Ok(manifest) => manifest,
        Err(err) => {
            error!("failed to load {}: {}", args.manifest.display(), err);
            process::exit(1);
        }
    };

    let unknown = manifest.unknown_keys(catalog::contains);
    if !unknown.is_empty() {
        error!(
            "manifest references unregistered shapes: {}",
            unknown.join(", ")
        );
        process::exit(1);
    }

    info!(
        "spawning {} shapes from {}",
        manifest.total_count(),
        args.manifest.display()
    );
    for spawn in &manifest.spawns {
        for _ in 0..spawn.count {
            match catalog::try_create(&spawn.type_key, spawn.params.clone()) {
                Ok(shape) => println!("{}", shape.describe()),
                Err(err) => {
                    error!("{err}");
                    process::exit(1);
                }
            }
        }
    }
}
