use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    coverage_atlas::example_apps::run_coverage_report(std::env::args().skip(1))
}
