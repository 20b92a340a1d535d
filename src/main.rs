use clap::{App, Arg};
use plume::build::build;
use plume::config::Config;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("plume=info")),
        )
        .init();

    let matches = App::new("plume")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plans the pages of a blog from its articles and authors")
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .value_name("DIR")
                .help("The project directory (or any directory beneath it)")
                .takes_value(true)
                .default_value("."),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Where to write the page plan [default: <project>/public/pages.yaml]")
                .takes_value(true),
        )
        .get_matches();

    // `project` has a default value
    let project = Path::new(matches.value_of("project").unwrap_or("."));
    let output = matches.value_of("output").map(Path::new);

    if let Err(e) = run(project, output) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(project: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_directory(&project.canonicalize()?, output)?;
    let pages = build(&config)?;
    info!(pages, "Done");
    Ok(())
}
