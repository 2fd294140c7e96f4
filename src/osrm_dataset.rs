//! Local OSRM dataset provisioning (download + preprocess).
//!
//! Fetches a Geofabrik extract and prepares it for `osrm-routed --algorithm
//! mld` with the `osrm/osrm-backend` Docker image. Every step is skipped
//! when its output already exists, so repeated calls are cheap.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::info;

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("{step} failed: {status}")]
    Process { step: String, status: String },
}

/// A Geofabrik region path such as `europe/monaco`.
#[derive(Debug, Clone)]
pub struct GeofabrikRegion(String);

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Last path component, e.g. `monaco`.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    /// Lua profile inside the image, e.g. `/opt/car.lua`.
    pub profile: String,
}

impl DatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            profile: "/opt/car.lua".to_string(),
        }
    }
}

/// Files of a prepared dataset.
#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    /// `<region>-latest.osrm`, the argument to `osrm-routed`.
    pub osrm_base: PathBuf,
}

impl OsrmDataset {
    pub fn ensure(config: &DatasetConfig) -> Result<Self, DatasetError> {
        let region = config.region.name();
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let data_dir = data_root.join(region);
        fs::create_dir_all(&data_dir)?;

        let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", region));
        if !pbf_path.exists() {
            info!("downloading {}", config.region.url());
            download(&config.region.url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", region));
        let osrm_name = format!("/data/{}-latest.osrm", region);

        if !osrm_base.exists() {
            let pbf_name = format!("/data/{}-latest.osm.pbf", region);
            run_in_image(&data_dir, &["osrm-extract", "-p", &config.profile, &pbf_name])?;
        }
        if !mld_ready(&osrm_base) {
            run_in_image(&data_dir, &["osrm-partition", &osrm_name])?;
            run_in_image(&data_dir, &["osrm-customize", &osrm_name])?;
        }

        Ok(Self {
            data_dir,
            osrm_base,
        })
    }

    /// Path of the prepared dataset as seen from inside the container.
    pub fn container_path(&self) -> String {
        let name = self
            .osrm_base
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("/data/{}", name)
    }
}

fn download(url: &str, dest: &Path) -> Result<(), DatasetError> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    writer.write_all(&response.bytes()?)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    ["osrm.partition", "osrm.mldgr", "osrm.cells"]
        .iter()
        .all(|extension| osrm_base.with_extension(extension).exists())
        && osrm_base.exists()
}

fn run_in_image(data_dir: &Path, args: &[&str]) -> Result<(), DatasetError> {
    info!("running {} in {}", args[0], OSRM_IMAGE);
    let status = Command::new("docker")
        .args(["run", "--rm", "-t", "-v"])
        .arg(format!("{}:/data", data_dir.display()))
        .arg(OSRM_IMAGE)
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(DatasetError::Process {
            step: args[0].to_string(),
            status: status.to_string(),
        })
    }
}
