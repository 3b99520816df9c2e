use std::process::exit;

use turnstile::ui::output;

fn main() {
    if let Err(err) = turnstile::cli::run() {
        output::error(format!("{err:#}"));
        exit(1);
    }
}
