use std::fs::File;
use std::io::{BufWriter, Write};

use serde::Serialize;

const QUBITS: u32 = 4;
const SHOTS: usize = 5000;

/// Payload layout read by the viewer.
#[derive(Serialize)]
struct Measurements {
    statevector: Vec<String>,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Measure a noisy GHZ state: mostly all-zeros or all-ones, with each qubit
/// flipped independently with probability `flip`.
fn measure(rng: &mut SimpleRng, flip: f64) -> String {
    let all_ones = rng.next_f64() < 0.5;
    (0..QUBITS)
        .map(|_| {
            let bit = all_ones ^ (rng.next_f64() < flip);
            if bit {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let statevector: Vec<String> = (0..SHOTS).map(|_| measure(&mut rng, 0.08)).collect();

    let output_path = "sample_states.json";
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &Measurements { statevector })?;
    writer.flush()?;

    println!("Wrote {SHOTS} measurements of {QUBITS} qubits to {output_path}");
    Ok(())
}
