use anyhow::{ensure, Result};
use log::{info, LevelFilter};
use primestark::fibonacci::{fibonacci_air, fibonacci_result, fibonacci_trace};
use primestark::field::PrimeField;
use primestark::{StarkConfig, StarkSystem};

const NUM_ROWS: usize = 16;

fn main() -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();
    builder.format_timestamp(None);
    builder.try_init()?;

    let field = PrimeField::stark252();
    let config = StarkConfig::standard_fast_config();
    info!(
        "Proving {} Fibonacci steps with blowup {} and {} queries",
        NUM_ROWS, config.blowup_factor, config.num_queries
    );

    let result = fibonacci_result(&field, NUM_ROWS);
    let trace = fibonacci_trace(&field, NUM_ROWS);
    let air = fibonacci_air(&field, NUM_ROWS, &result);
    info!("Claimed result: F({}) = {}", NUM_ROWS, result);

    let system = StarkSystem::new(field, config)?;
    let proof = system.generate_proof(&trace, &air)?;
    info!(
        "Proof generated in {} ms ({} bytes, trace root {})",
        proof.metadata.proving_time_ms, proof.metadata.proof_size_bytes, proof.trace_root
    );

    let verified = system.verify_proof(&proof, &air);
    info!("Verification {}", if verified { "succeeded" } else { "failed" });
    ensure!(verified, "the proof did not verify");
    Ok(())
}
