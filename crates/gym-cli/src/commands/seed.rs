// Sample data bootstrap command

use anyhow::Result;
use chrono::Utc;
use gym_core::Seeder;

use crate::output::OutputFormat;

pub async fn run(seeder: &Seeder, output: OutputFormat) -> Result<()> {
    let seeded = seeder.seed_if_empty(Utc::now()).await?;
    let names: Vec<&str> = seeded.iter().map(|k| k.as_str()).collect();

    if output.is_text() {
        if names.is_empty() {
            println!("Nothing to seed, every collection already has data.");
        } else {
            println!("Seeded: {}", names.join(", "));
        }
    } else {
        output.print_value(&names)?;
    }
    Ok(())
}
