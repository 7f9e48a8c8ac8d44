use creatura::simulation::catalog::OrganCatalog;
use creatura::simulation::params::Params;
use creatura::simulation::population::PopulationManager;

fn main() {
    env_logger::init();

    let params = Params::default();
    let catalog = OrganCatalog::default();

    println!(
        "Starting neuroevolution run: {} creatures, {} generations",
        params.population_size, params.max_generations
    );

    let mut manager = PopulationManager::new(params, catalog);
    manager.run_to_completion(0.05);

    let stats = manager.fitness_stats();
    println!(
        "Finished after {} generations. Best fitness: {:.2}, average: {:.2}",
        manager.generation(),
        stats.best,
        stats.average
    );

    if let Some(best) = manager
        .creatures
        .iter()
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    {
        println!("Best genome:\n{}", best.genome.encode());
    }
}
