use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    frameset::example_apps::run_ingest(std::env::args().skip(1))
}
