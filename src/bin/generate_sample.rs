use anyhow::{Context, Result};
use serde::Serialize;

/// One race result in the wire shape consumed by the viewer.
#[derive(Serialize)]
struct SampleRecord {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Place")]
    place: u32,
    #[serde(rename = "Seconds")]
    seconds: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Nationality")]
    nationality: String,
    #[serde(rename = "Doping")]
    doping: String,
    #[serde(rename = "URL")]
    url: String,
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let riders = [
        ("Paolo Conti", "ITA"),
        ("Luc Moreau", "FRA"),
        ("Jens Keller", "GER"),
        ("Iban Zubeldia", "ESP"),
        ("Tom Verbeek", "BEL"),
        ("Dylan Hart", "USA"),
        ("Mikkel Sørensen", "DEN"),
        ("Pierre Lachaux", "FRA"),
        ("Andrea Rossi", "ITA"),
        ("Carlos Iglesias", "COL"),
        ("Stef van Dam", "NED"),
        ("Pavel Novák", "CZE"),
    ];
    let allegations = [
        "EPO positive in retrospective testing",
        "Admitted EPO use in a 2013 interview",
        "Suspended for blood doping",
        "Implicated in Operación Puerto",
    ];

    let mut records = Vec::new();
    for year in 1994..=2016 {
        // One or two entries per year keeps the scatter readable.
        let entries = 1 + (rng.next_u64() % 2) as usize;
        for _ in 0..entries {
            let (name, nationality) = *rng.pick(&riders);
            let seconds = rng.gauss(2280.0, 75.0).max(2100.0).round() as u32;
            let doped = rng.next_f64() < 0.45;
            records.push(SampleRecord {
                time: format!("{:02}:{:02}", seconds / 60, seconds % 60),
                place: 0,
                seconds,
                name: name.to_string(),
                year,
                nationality: nationality.to_string(),
                doping: if doped {
                    rng.pick(&allegations).to_string()
                } else {
                    String::new()
                },
                url: if doped {
                    "https://en.wikipedia.org/wiki/List_of_doping_cases_in_cycling".to_string()
                } else {
                    String::new()
                },
            });
        }
    }

    // Rank by ascent time, fastest first.
    records.sort_by_key(|r| r.seconds);
    for (i, rec) in records.iter_mut().enumerate() {
        rec.place = i as u32 + 1;
    }

    let output_path = "sample_data.json";
    let json = serde_json::to_string_pretty(&records).context("serialising sample records")?;
    std::fs::write(output_path, json).with_context(|| format!("writing {output_path}"))?;

    println!("Wrote {} race results to {output_path}", records.len());
    Ok(())
}
