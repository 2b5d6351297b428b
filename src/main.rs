mod cli;

use clap::Parser;
use cli::Cli;

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match cli::run(cli) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
