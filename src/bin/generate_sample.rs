use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

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

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let apps = ["Chess", "Sudoku", "Solitaire", "Minesweeper"];
    // Relative popularity; weights sum to 10.
    let weights = [4u64, 3, 2, 1];
    let users = 25;
    let days = 30;
    let first_day = NaiveDate::from_ymd_opt(2023, 2, 1).context("invalid start date")?;

    let output_path = "sample_events.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(["Date", "App", "User", "Duration"])?;

    let mut rows = 0usize;
    for offset in 0..days {
        let date = first_day + Duration::days(offset);
        // Weekends are busier.
        let busy = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let events = 3 + rng.below(if busy { 12 } else { 6 });

        for _ in 0..events {
            let mut pick = rng.below(10);
            let mut app = apps[0];
            for (name, w) in apps.into_iter().zip(weights) {
                if pick < w {
                    app = name;
                    break;
                }
                pick -= w;
            }

            let user = format!("u{:02}", rng.below(users) + 1);
            let duration = (5 + rng.below(55)).to_string();
            writer.write_record([
                date.format("%d/%m/%Y").to_string().as_str(),
                app,
                user.as_str(),
                duration.as_str(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} events over {days} days to {output_path}");
    Ok(())
}
