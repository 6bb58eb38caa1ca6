use crate::callbacks::{Inputs, Registry, AVERAGE_PRICE, BAR_TOGGLE, PRICE_CEILING, TOP_TOGGLE, WINE_COUNT};
use crate::render::{bubble_map, Figure};
use crate::types::{CountOrder, Dataset, PriceCeiling};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// One figure the page can show, with the file it is written to.
struct Job {
    file: String,
    output: &'static str,
    inputs: Inputs,
}

fn jobs() -> Vec<Job> {
    let mut jobs = Vec::new();

    for ceiling in PriceCeiling::OPTIONS {
        for bar in [false, true] {
            let kind = if bar { "bar" } else { "pie" };
            jobs.push(Job {
                file: format!("{}-{}-{}.json", AVERAGE_PRICE, ceiling.to_string().to_lowercase(), kind),
                output: AVERAGE_PRICE,
                inputs: Inputs::from([
                    (PRICE_CEILING.to_string(), Value::String(ceiling.to_string())),
                    (BAR_TOGGLE.to_string(), Value::Bool(bar)),
                ]),
            });
        }
    }

    for show_top in [false, true] {
        jobs.push(Job {
            file: format!("{}-{}.json", WINE_COUNT, CountOrder::from_show_top(show_top).as_str()),
            output: WINE_COUNT,
            inputs: Inputs::from([(TOP_TOGGLE.to_string(), Value::Bool(show_top))]),
        });
    }

    jobs
}

fn write_figure(path: &Path, figure: &Figure) -> Result<()> {
    let json = serde_json::to_vec_pretty(figure)?;
    fs::write(path, json).with_context(|| format!("Failed to write figure: {:?}", path))
}

/// Writes the map and every reachable panel figure under `out_dir`.
pub fn export_figures(out_dir: &Path, dataset: &Dataset) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create export directory: {:?}", out_dir))?;

    let map_path = out_dir.join("map.json");
    write_figure(&map_path, &bubble_map(dataset))?;

    let registry = Registry::dashboard();
    let mut written: Vec<PathBuf> = jobs()
        .par_iter()
        .map(|job| -> Result<PathBuf> {
            let figure = registry.dispatch(job.output, &job.inputs, dataset)?;
            let path = out_dir.join(&job.file);
            write_figure(&path, &figure)?;
            Ok(path)
        })
        .collect::<Result<_>>()?;

    written.insert(0, map_path);
    info!("Exported {} figures to {:?}", written.len(), out_dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::tests::sample_dataset;

    #[test]
    fn test_exports_every_combination() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_figures(dir.path(), &sample_dataset()).unwrap();

        // map + 4 ceilings x 2 chart types + 2 count orders
        assert_eq!(written.len(), 11);
        assert!(dir.path().join("map.json").exists());
        assert!(dir.path().join("average-price-all-pie.json").exists());
        assert!(dir.path().join("average-price-20-bar.json").exists());
        assert!(dir.path().join("wine-count-most.json").exists());
    }

    #[test]
    fn test_exported_figure_matches_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = sample_dataset();
        export_figures(dir.path(), &dataset).unwrap();

        let raw = fs::read_to_string(dir.path().join("average-price-30-bar.json")).unwrap();
        let exported: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            exported["layout"]["title"]["text"],
            "5 countries with the highest average price up to $30"
        );
    }
}
