use crate::conf::{build_runtime_config, resolve_spec_config};
use serde::Serialize;
use std::path::PathBuf;

pub fn dump(path: Option<PathBuf>) -> anyhow::Result<()> {
    let spec = resolve_spec_config(path.as_deref())?;
    let validated = build_runtime_config(spec)?;
    dump_json(&validated.config)
}

fn dump_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}
