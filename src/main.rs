mod entry;
mod shutdown_handlers;

use reqgauge::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
