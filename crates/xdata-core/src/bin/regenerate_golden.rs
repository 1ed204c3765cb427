use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde_json::Value;
use xdata_core::DecodeOptions;
use xdata_core::record::XdataInputs;

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.json");
        if !input.exists() {
            continue;
        }
        let output = path.join("expected.json");
        regenerate_one(&input, &output)?;
    }

    Ok(())
}

fn regenerate_one(input: &Path, output: &Path) -> Result<(), String> {
    let text = fs::read_to_string(input)
        .map_err(|err| format!("failed to read {}: {}", input.display(), err))?;
    let record: Value = serde_json::from_str(&text)
        .map_err(|err| format!("invalid JSON in {}: {}", input.display(), err))?;
    let inputs = XdataInputs::from_record(&record)
        .map_err(|err| format!("invalid record in {}: {}", input.display(), err))?
        .ok_or_else(|| format!("no xdata in {}", input.display()))?;
    let result = inputs.decode(&DecodeOptions::default());
    let json = serde_json::to_string_pretty(&result)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    fs::write(output, json + "\n")
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
