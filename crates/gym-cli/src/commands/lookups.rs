// Lookup list command

use anyhow::{anyhow, Result};
use gym_core::{CollectionKey, Gym};
use serde_json::Value;

use crate::output::OutputFormat;

pub async fn run(gym: &Gym, output: OutputFormat, collection: &str) -> Result<()> {
    let key: CollectionKey = collection.parse().map_err(|e: String| anyhow!(e))?;
    if matches!(key, CollectionKey::Members | CollectionKey::Classes) {
        anyhow::bail!("{key} is not a lookup list, use the `{key}` command instead");
    }

    let items: Vec<Value> = gym.store().get_all(key).await?;

    if output.is_text() {
        if items.is_empty() {
            println!("No entries in {key}.");
        }
        for item in &items {
            match item {
                Value::String(s) => println!("{s}"),
                other => println!("{other}"),
            }
        }
    } else {
        output.print_value(&items)?;
    }
    Ok(())
}
