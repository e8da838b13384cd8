use anyhow::{Context, Result};
use csv::WriterBuilder;

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

    /// Weighted categorical draw. Weights need not sum to one; the last
    /// entry absorbs any rounding slack.
    fn pick<'a>(&mut self, choices: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_f64() * total;
        for (value, weight) in choices {
            roll -= weight;
            if roll <= 0.0 {
                return value;
            }
        }
        choices.last().map(|(v, _)| *v).unwrap_or("")
    }
}

const JOBS: &[(&str, f64)] = &[
    ("admin.", 0.25),
    ("blue-collar", 0.22),
    ("technician", 0.17),
    ("services", 0.10),
    ("management", 0.07),
    ("retired", 0.04),
    ("entrepreneur", 0.04),
    ("self-employed", 0.03),
    ("housemaid", 0.03),
    ("unemployed", 0.03),
    ("student", 0.02),
];

const MARITAL: &[(&str, f64)] = &[("married", 0.60), ("single", 0.28), ("divorced", 0.12)];
const DEFAULT: &[(&str, f64)] = &[("no", 0.79), ("unknown", 0.20), ("yes", 0.01)];
const HOUSING: &[(&str, f64)] = &[("yes", 0.52), ("no", 0.45), ("unknown", 0.03)];
const LOAN: &[(&str, f64)] = &[("no", 0.82), ("yes", 0.15), ("unknown", 0.03)];
const CONTACT: &[(&str, f64)] = &[("cellular", 0.63), ("telephone", 0.37)];

const MONTHS: &[(&str, f64)] = &[
    ("may", 0.33),
    ("jul", 0.17),
    ("aug", 0.15),
    ("jun", 0.13),
    ("nov", 0.10),
    ("apr", 0.06),
    ("oct", 0.02),
    ("sep", 0.02),
    ("mar", 0.01),
    ("dec", 0.01),
];

const WEEKDAYS: &[(&str, f64)] = &[
    ("mon", 0.2),
    ("tue", 0.2),
    ("wed", 0.2),
    ("thu", 0.2),
    ("fri", 0.2),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = 4000;

    let output_path = "bank_sample.csv";
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record([
        "age",
        "job",
        "marital",
        "default",
        "housing",
        "loan",
        "contact",
        "month",
        "day_of_week",
        "y",
    ])?;

    for _ in 0..rows {
        let age = rng.gauss(40.0, 10.0).round().clamp(18.0, 95.0) as i64;
        let job = rng.pick(JOBS);
        let marital = rng.pick(MARITAL);
        let default = rng.pick(DEFAULT);
        let housing = rng.pick(HOUSING);
        let loan = rng.pick(LOAN);
        let contact = rng.pick(CONTACT);
        let month = rng.pick(MONTHS);
        let day_of_week = rng.pick(WEEKDAYS);

        // Subscription odds roughly follow the public bank-marketing data:
        // students and retirees convert better, as do the quiet months.
        let mut p_yes: f64 = 0.08;
        if job == "student" || job == "retired" {
            p_yes += 0.15;
        }
        if matches!(month, "mar" | "sep" | "oct" | "dec") {
            p_yes += 0.20;
        }
        let y = if rng.next_f64() < p_yes { "yes" } else { "no" };

        writer.write_record([
            age.to_string().as_str(),
            job,
            marital,
            default,
            housing,
            loan,
            contact,
            month,
            day_of_week,
            y,
        ])?;
    }

    writer.flush()?;
    println!("Wrote {rows} campaign records to {output_path}");
    Ok(())
}
