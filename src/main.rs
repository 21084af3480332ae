use aws_public_topology::engine::write_plan;
use aws_public_topology::output::print_plan;
use aws_public_topology::{load_config, plan_topology};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default())
        .map_err(|e| format!("Error initializing log4rs: {e}"))?;
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let config_file = std::env::args().nth(1);
    let config = load_config(config_file.as_deref())?;

    let (outputs, plan) = plan_topology(&config)?;
    log::info!(
        "vpc={} subnets={} resources={}",
        outputs.vpc_id,
        outputs.subnet_ids.len(),
        plan.resources.len()
    );

    print_plan(&plan);
    write_plan(&plan, None, &config.timezone)?;

    Ok(())
}
