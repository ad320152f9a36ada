//! A complete scenario rendered to named files

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result as AnyResult};
use log::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::additional::render_additional;
use super::demand::render_demand;
use super::network::{render_connections, render_junctions, render_links, render_signal_logic};
use super::run_config::render_run_config;
use crate::scenario::additional::AdditionalSet;
use crate::scenario::demand::DemandSet;
use crate::scenario::error::{require_id, Result};
use crate::scenario::road_network::NetworkGraph;
use crate::scenario::run_config::RunConfig;

/// One rendered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

/// Every file of one scenario, in write order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioFiles {
    pub files: Vec<GeneratedFile>,
}

impl ScenarioFiles {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.contents.as_str())
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    /// Writes every file into `dir`, creating it if needed. Concurrent writers
    /// must not share a directory.
    pub fn write_to_dir(&self, dir: &Path) -> AnyResult<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Could not create output directory {}", dir.display()))?;
        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = dir.join(&file.name);
            fs::write(&path, &file.contents)
                .with_context(|| format!("Could not write {}", path.display()))?;
            debug!("wrote {} ({} bytes)", path.display(), file.contents.len());
            written.push(path);
        }
        info!("Wrote {} scenario files to {}", written.len(), dir.display());
        Ok(written)
    }

    /// Deflate-compressed archive holding every file under its own name.
    pub fn to_archive(&self) -> AnyResult<Vec<u8>> {
        let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for file in &self.files {
            archive
                .start_file(file.name.as_str(), options)
                .with_context(|| format!("Could not add {} to archive", file.name))?;
            archive.write_all(file.contents.as_bytes())?;
        }
        Ok(archive.finish()?.into_inner())
    }

    pub fn write_archive(&self, path: &Path) -> AnyResult<()> {
        let bytes = self.to_archive()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Could not create output directory {}", parent.display())
            })?;
        }
        fs::write(path, &bytes).with_context(|| format!("Could not write {}", path.display()))?;
        info!(
            "Wrote archive of {} scenario files to {} ({} bytes)",
            self.files.len(),
            path.display(),
            bytes.len()
        );
        Ok(())
    }
}

/// A network plus everything needed to run it
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    network: NetworkGraph,
    demand: Option<DemandSet>,
    additional: Option<AdditionalSet>,
    run_config: RunConfig,
}

impl Scenario {
    pub fn new(name: impl Into<String>, network: NetworkGraph) -> Result<Self> {
        let name = name.into();
        require_id("name", &name)?;
        Ok(Self {
            name,
            network,
            demand: None,
            additional: None,
            run_config: RunConfig::default(),
        })
    }

    pub fn with_demand(mut self, demand: DemandSet) -> Self {
        self.demand = Some(demand);
        self
    }

    pub fn with_additional(mut self, additional: AdditionalSet) -> Self {
        self.additional = Some(additional);
        self
    }

    pub fn with_run_config(mut self, run_config: RunConfig) -> Self {
        self.run_config = run_config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn network(&self) -> &NetworkGraph {
        &self.network
    }

    fn file_name(&self, suffix: &str) -> String {
        format!("{}.{suffix}", self.name)
    }

    /// The run configuration with the scenario's own files as inputs.
    fn effective_run_config(&self) -> RunConfig {
        let mut config = self.run_config.clone();
        if config.net_file.is_none() {
            config.net_file = Some(self.file_name("net.xml"));
        }
        let routes = self.file_name("rou.xml");
        if self.demand.is_some() && !config.route_files.contains(&routes) {
            config.route_files.push(routes);
        }
        let additional = self.file_name("add.xml");
        if self.additional.is_some() && !config.additional_files.contains(&additional) {
            config.additional_files.push(additional);
        }
        config
    }

    /// Renders every file. Fails without output on the first dangling reference
    /// or unusable signal program.
    pub fn render(&self) -> Result<ScenarioFiles> {
        self.network.validate_references()?;

        let mut files = Vec::new();
        let mut push = |suffix: &str, contents: String| {
            files.push(GeneratedFile {
                name: self.file_name(suffix),
                contents,
            })
        };

        push("nod.xml", render_junctions(&self.network)?);
        push("edg.xml", render_links(&self.network)?);
        if let Some(connections) = render_connections(&self.network)? {
            push("con.xml", connections);
        }
        if let Some(signal_logic) = render_signal_logic(&self.network)? {
            push("tll.xml", signal_logic);
        }
        if let Some(demand) = &self.demand {
            push("rou.xml", render_demand(demand, Some(&self.network))?);
        }
        if let Some(additional) = &self.additional {
            push("add.xml", render_additional(additional, &self.network)?);
        }
        push("sumocfg", render_run_config(&self.effective_run_config())?);

        Ok(ScenarioFiles { files })
    }
}
