//! skatesync main entrypoint.

use skatesync::run;
use skatesync::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
