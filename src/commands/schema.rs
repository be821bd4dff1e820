use schemars::schema_for;

use crate::catalog::CatalogDef;

/// Print the JSON Schema for rule catalog documents to stdout.
pub fn run_schema() -> anyhow::Result<()> {
    let schema = schema_for!(CatalogDef);
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{json}");
    Ok(())
}
