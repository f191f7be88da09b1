use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    route_planner::example_apps::run_route_planner(std::env::args().skip(1))
}
