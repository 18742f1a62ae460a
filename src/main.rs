use clap::Parser;

use weather_app::{run_app, Cli};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_app(Cli::parse())
}
