//! Statement-level dependence graph.
//!
//! Collapses the pointwise dependence relations into a directed graph over
//! statement names. Used for fusion failure diagnostics and available to
//! callers that want a coarse view of which computes constrain which.

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::dependence::{DepKind, Dependences};
use crate::error::AnalysisError;

/// One statement-level dependence edge.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DepEdge {
    pub source: String,
    pub kind: DepKind,
    pub target: String,
}

impl std::fmt::Display for DepEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.kind, self.target)
    }
}

/// Builds the statement-level dependence graph. Nodes are statement names
/// in first-seen order; each edge is labeled with its dependence kind.
pub fn statement_graph(
    deps: &Dependences<'_>,
) -> Result<DiGraph<String, DepKind>, AnalysisError> {
    let mut graph = DiGraph::new();
    let mut nodes: IndexMap<String, NodeIndex> = IndexMap::new();

    let mut node = |graph: &mut DiGraph<String, DepKind>, name: String| -> NodeIndex {
        *nodes
            .entry(name.clone())
            .or_insert_with(|| graph.add_node(name))
    };

    for kind in DepKind::ALL {
        for map in deps.get(kind).maps()? {
            let (Some(source), Some(target)) = (map.domain_name(), map.range_name()) else {
                continue;
            };
            let from = node(&mut graph, source);
            let to = node(&mut graph, target);
            if !graph
                .edges_connecting(from, to)
                .any(|edge| *edge.weight() == kind)
            {
                graph.add_edge(from, to, kind);
            }
        }
    }
    Ok(graph)
}

/// The statement-level edges as displayable records, deterministic order.
pub fn dependence_edges(deps: &Dependences<'_>) -> Result<Vec<DepEdge>, AnalysisError> {
    let graph = statement_graph(deps)?;
    let mut edges: Vec<DepEdge> = graph
        .edge_references()
        .map(|edge| DepEdge {
            source: graph[edge.source()].clone(),
            kind: *edge.weight(),
            target: graph[edge.target()].clone(),
        })
        .collect();
    edges.sort_by(|a, b| {
        (&a.source, &a.target, a.kind.as_str()).cmp(&(&b.source, &b.target, b.kind.as_str()))
    });
    Ok(edges)
}
