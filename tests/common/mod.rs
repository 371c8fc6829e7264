use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const OWNER: &str = "0x0000000000000000000000000000000000000001";

/// Text form of the `n`-th test identity.
pub fn address(n: u8) -> String {
    format!("0x{:040x}", n)
}

/// Writes `rows` random operations issued by `requesters` distinct callers.
///
/// Chain time starts at 1 and advances by 0..=40 seconds per row, so both
/// cooldown hits and misses occur.
pub fn generate_operations_csv(
    path: &Path,
    rows: usize,
    requesters: u8,
    seed: u64,
) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    let mut rng = StdRng::seed_from_u64(seed);

    wtr.write_record(["type", "caller", "amount", "at"])?;

    let mut at: u64 = 1;
    for _ in 0..rows {
        at += rng.gen_range(0..=40);
        let caller = address(rng.gen_range(2..2 + requesters));
        match rng.gen_range(0..10) {
            0 => wtr.write_record(["fund", caller.as_str(), "0.5", &at.to_string()])?,
            1 => wtr.write_record(["update", OWNER, "0.05", &at.to_string()])?,
            _ => wtr.write_record(["request", caller.as_str(), "", &at.to_string()])?,
        }
    }

    wtr.flush()?;
    Ok(())
}
