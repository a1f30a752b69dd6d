#![forbid(unsafe_code)]

//! cuecard binary entry point.

use std::process;

use cuecard::app;
use cuecard::cli::{self, Command};

fn main() {
    let opts = match cli::Opts::parse() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{}", cli::HELP_TEXT);
            return;
        }
        Ok(Command::Version) => {
            println!("cuecard {}", cli::VERSION);
            return;
        }
        Err(err) => {
            println!("{err}");
            println!("{}", cli::USAGE);
            process::exit(1);
        }
    };

    if let Err(err) = app::run(&opts) {
        println!("{err}");
        process::exit(1);
    }
}
