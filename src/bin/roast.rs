use std::process;

use clap::Parser;
use firmroast::commands::VERSION;
use firmroast::commands::analyze::{self, AnalyzeArgs};

#[derive(Debug, Parser)]
#[command(name = "roast", about = "Roast a company", version = VERSION)]
struct Cli {
    #[command(flatten)]
    analyze: AnalyzeArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = analyze::run(cli.analyze).await {
        eprintln!("{err}");
        process::exit(1);
    }
}
