use stress_test::{run_stress_test, StressConfig};
use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => StressConfig::from_file(&path)?,
        None => StressConfig::default(),
    };

    let rt = tokio::runtime::Runtime::new()?;
    let stats = rt
        .block_on(run_stress_test(config))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    stats.print();

    if stats.isolation_violations > 0 || stats.uncommitted_snapshots > 0 {
        println!("\n✗ Snapshot isolation violated!");
        std::process::exit(1);
    }
    println!("\n✓ Stress test completed successfully!");
    Ok(())
}
