use loam::loam_core::{ChunkCoords, CHUNK_SIZE};
use loam::{Config, LoamError, World};

use rand::rngs::StdRng;
use rand::SeedableRng;

const DEFAULT_CONFIG_PATH: &str = "config/loam.ron";
const DEFAULT_RADIUS: i32 = 2;

fn main() -> Result<(), LoamError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
    let radius = args
        .next()
        .and_then(|r| r.parse().ok())
        .unwrap_or(DEFAULT_RADIUS);

    let config = Config::read_file(&config_path)?;
    let world = World::new(&config)?;
    log::info!(
        "Loaded {} with {} dimensions on {} threads",
        config_path,
        world.dimensions().len(),
        world.threads()
    );

    for (dim_config, dimension) in config.dimensions.iter().zip(world.dimensions()) {
        let mut rng = StdRng::seed_from_u64(dim_config.seed);
        let (mut chunks, mut solid, mut overdraws, mut failures) = (0, 0, 0, 0);
        for cx in -radius..=radius {
            for cz in -radius..=radius {
                let (buffer, report) = dimension.generate_chunk_with_report(ChunkCoords::new(cx, cz), &mut rng)?;
                chunks += 1;
                solid += buffer.as_slice().iter().filter(|b| b.is_solid()).count();
                overdraws += report.overdraws.len();
                failures += report.failed_units;
            }
        }
        println!(
            "{}: {} chunks, {:.1}% solid, {} overdraws, {} failed units",
            dimension.name(),
            chunks,
            100.0 * solid as f64 / (chunks * CHUNK_SIZE) as f64,
            overdraws,
            failures
        );
    }

    for (metric, timer) in world.metrics().snapshot() {
        println!(
            "{:<8} {:>6} samples, avg {:>8.3} ms, max {:>8.3} ms",
            metric,
            timer.items_completed(),
            timer.average_time_ms(),
            timer.max_time().as_secs_f64() * 1000.0
        );
    }

    Ok(())
}
