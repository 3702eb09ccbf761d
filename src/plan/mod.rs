//! Build plan assembly and serialization.
//!
//! The plan is the single output of a configure run: everything the
//! resolution pass decided, flattened into one serializable record.
//! Two runs with the same inputs produce byte-identical plans, which
//! the fingerprint makes cheap to compare.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Topo;
use serde::Serialize;
use tracing::info;

use crate::core::build_type::BuildType;
use crate::core::manifest::Manifest;
use crate::errors::ConfigError;
use crate::probe::{CompilerFamily, LinkerFamily, PlatformProbe};
use crate::registry::targets::{TargetRegistry, TestKind};
use crate::registry::thirdparty::{ThirdPartyLibrary, ThirdPartyRegistry};
use crate::registry::ToolTarget;
use crate::resolve::configuration::BuildConfiguration;
use crate::resolve::flags::FlagSet;
use crate::resolve::link_mode::LinkResolution;
use crate::util::hash::Fingerprint;

/// Project-local directory the plan is written into.
pub const PLAN_DIR: &str = ".slipway";

/// File name of the serialized plan.
pub const PLAN_FILE: &str = "plan.json";

/// Toolchain facts recorded in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainSummary {
    pub cc: PathBuf,
    pub cxx: PathBuf,
    pub compiler_family: CompilerFamily,
    pub linker_family: LinkerFamily,
}

/// A test target as the execution harness will see it: the runner
/// wrapper followed by the resolved executable or script path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestEntry {
    pub name: String,
    pub kind: TestKind,
    pub command: Vec<String>,
    pub link_libs: Vec<String>,
    pub properties: BTreeMap<String, String>,
}

/// The complete output of a configure run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub project: String,
    pub build_type: BuildType,
    pub link: LinkResolution,
    pub coverage: bool,
    pub sanitizers: Vec<String>,
    pub pic: bool,
    pub flags: FlagSet,
    pub toolchain: ToolchainSummary,
    pub output_dir: PathBuf,
    pub libraries: Vec<ThirdPartyLibrary>,
    pub link_line: Vec<String>,
    pub tests: Vec<TestEntry>,
    pub tools: Vec<ToolTarget>,
    pub fingerprint: String,
}

impl BuildPlan {
    /// Flatten the run's results into a plan.
    pub fn assemble(
        manifest: &Manifest,
        configuration: &BuildConfiguration,
        probe: &dyn PlatformProbe,
        libraries: &ThirdPartyRegistry,
        targets: &TargetRegistry,
        output_dir: PathBuf,
    ) -> Result<BuildPlan, ConfigError> {
        let link_line = link_line(libraries)?;

        let runner = targets.runner().display().to_string();
        let tests = targets
            .tests()
            .iter()
            .map(|test| TestEntry {
                name: test.identity.clone(),
                kind: test.kind,
                command: vec![runner.clone(), test.path.display().to_string()],
                link_libs: test.link_libs.clone(),
                properties: test.properties.clone(),
            })
            .collect();

        let mut plan = BuildPlan {
            project: manifest.project.name.clone(),
            build_type: configuration.build_type,
            link: configuration.link.clone(),
            coverage: configuration.coverage,
            sanitizers: configuration
                .sanitizers
                .names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            pic: configuration.pic_enabled(),
            flags: configuration.flags.clone(),
            toolchain: ToolchainSummary {
                cc: probe.cc().to_path_buf(),
                cxx: probe.cxx().to_path_buf(),
                compiler_family: configuration.compiler_family,
                linker_family: configuration.linker_family,
            },
            output_dir,
            libraries: libraries.libraries().cloned().collect(),
            link_line,
            tests,
            tools: targets.tools().to_vec(),
            fingerprint: String::new(),
        };
        plan.fingerprint = plan.compute_fingerprint();
        Ok(plan)
    }

    /// Fingerprint over every field that affects the build, in a fixed
    /// order. Equal inputs hash equal; any semantic change does not.
    fn compute_fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.project)
            .update_str(&self.build_type.to_string())
            .update_str(&self.link.mode.to_string())
            .update_str(&self.link.reason.to_string())
            .update_bool(self.coverage)
            .update_bool(self.pic)
            .update_strs(self.sanitizers.iter().map(String::as_str))
            .update_strs(self.flags.tokens().iter().map(String::as_str))
            .update_str(&self.toolchain.cc.display().to_string())
            .update_str(&self.toolchain.cxx.display().to_string())
            .update_str(&self.toolchain.compiler_family.to_string())
            .update_str(&self.toolchain.linker_family.to_string())
            .update_str(&self.output_dir.display().to_string());

        for library in &self.libraries {
            fp.update_str(&library.name)
                .update_str(&library.artifact.display().to_string())
                .update_strs(library.deps.iter().map(String::as_str));
        }
        fp.update_strs(self.link_line.iter().map(String::as_str));

        for test in &self.tests {
            fp.update_str(&test.name)
                .update_strs(test.command.iter().map(String::as_str))
                .update_strs(test.link_libs.iter().map(String::as_str));
            for (key, value) in &test.properties {
                fp.update_str(key).update_str(value);
            }
        }
        for tool in &self.tools {
            fp.update_str(&tool.name)
                .update_strs(tool.command.iter().map(String::as_str));
        }

        fp.finish()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize build plan")
    }

    /// Write the plan under `<project_root>/.slipway/plan.json`,
    /// creating the directory on first use. Returns the written path.
    pub fn write(&self, project_root: &Path) -> Result<PathBuf> {
        let dir = project_root.join(PLAN_DIR);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create plan directory: {}", dir.display()))?;

        let path = dir.join(PLAN_FILE);
        let json = self.to_json()?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write build plan: {}", path.display()))?;

        info!("wrote build plan to {}", path.display());
        Ok(path)
    }
}

/// Compute the link line: every registered library's chosen artifact
/// plus `-l` tokens for dependency names nothing registered, ordered so
/// dependents precede their dependencies.
pub fn link_line(registry: &ThirdPartyRegistry) -> Result<Vec<String>, ConfigError> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut nodes: BTreeMap<String, NodeIndex> = BTreeMap::new();

    for library in registry.libraries() {
        node_for(&mut graph, &mut nodes, &library.name);
    }
    for library in registry.libraries() {
        let from = node_for(&mut graph, &mut nodes, &library.name);
        for dep in &library.deps {
            let to = node_for(&mut graph, &mut nodes, dep);
            if !graph.contains_edge(from, to) {
                graph.add_edge(from, to, ());
            }
        }
    }

    // Topo emits a before b for every edge a -> b, and an edge means
    // "a depends on b", so dependents come out first.
    let mut topo = Topo::new(&graph);
    let mut order = Vec::new();
    while let Some(node) = topo.next(&graph) {
        order.push(node);
    }

    if order.len() != graph.node_count() {
        let emitted: HashSet<NodeIndex> = order.iter().copied().collect();
        let name = graph
            .node_indices()
            .find(|node| !emitted.contains(node))
            .map(|node| graph[node].clone())
            .unwrap_or_default();
        return Err(ConfigError::DependencyCycle { name });
    }

    let line = order
        .into_iter()
        .map(|node| {
            let name = &graph[node];
            match registry.get(name) {
                Some(library) => library.artifact.display().to_string(),
                None => format!("-l{name}"),
            }
        })
        .collect();
    Ok(line)
}

fn node_for(
    graph: &mut DiGraph<String, ()>,
    nodes: &mut BTreeMap<String, NodeIndex>,
    name: &str,
) -> NodeIndex {
    if let Some(&index) = nodes.get(name) {
        return index;
    }
    let index = graph.add_node(name.to_string());
    nodes.insert(name.to_string(), index);
    index
}
