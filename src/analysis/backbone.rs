use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::{debug, info};
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::data::model::{DifferenceRecord, EntryKind};
use crate::error::AnalysisError;

/// Rendering hint for an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRole {
    Backbone,
    Branch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    /// Lighter peak.
    pub source: f64,
    /// Heavier peak.
    pub target: f64,
    pub symbol: String,
    pub delta: f64,
    pub role: EdgeRole,
}

/// Outcome of the shortest-path search between the extreme masses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum Backbone {
    /// No assigned, non-modification differences at all.
    Empty,
    /// The lightest and heaviest nodes lie in different components.
    Disconnected,
    /// Node masses from the heaviest to the lightest peak.
    Path(Vec<f64>),
}

/// A non-backbone neighbour hanging off a backbone node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub from: f64,
    pub to: f64,
    pub symbol: String,
}

/// Undirected graph of assigned differences plus its backbone.
///
/// Nodes are kept sorted by mass; parallel matches between the same two
/// peaks collapse onto one edge, the last one winning.
#[derive(Debug, Clone, PartialEq)]
pub struct BackboneGraph {
    nodes: Vec<f64>,
    adjacency: Vec<BTreeSet<usize>>,
    edges: BTreeMap<(usize, usize), GraphEdge>,
    backbone: Backbone,
}

/// Build the match graph from assigned differences and find its backbone.
///
/// Modification matches are left out of the graph.
pub fn extract_backbone(assigned: &[DifferenceRecord]) -> BackboneGraph {
    let records: Vec<&DifferenceRecord> = assigned
        .iter()
        .filter(|r| r.kind().is_some_and(|k| k != EntryKind::Modification))
        .collect();

    let masses: BTreeSet<OrderedFloat<f64>> = records
        .iter()
        .flat_map(|r| [OrderedFloat(r.peak1), OrderedFloat(r.peak2)])
        .collect();
    let index: BTreeMap<OrderedFloat<f64>, usize> =
        masses.iter().enumerate().map(|(i, &m)| (m, i)).collect();
    let nodes: Vec<f64> = masses.into_iter().map(|m| m.0).collect();

    let mut adjacency = vec![BTreeSet::new(); nodes.len()];
    let mut edges = BTreeMap::new();
    for record in records {
        let a = index[&OrderedFloat(record.peak1)];
        let b = index[&OrderedFloat(record.peak2)];
        let key = (a.min(b), a.max(b));
        adjacency[a].insert(b);
        adjacency[b].insert(a);
        edges.insert(
            key,
            GraphEdge {
                source: nodes[key.0],
                target: nodes[key.1],
                symbol: record.assigned_symbol().to_string(),
                delta: record.delta,
                role: EdgeRole::Branch,
            },
        );
    }

    let mut graph = BackboneGraph {
        nodes,
        adjacency,
        edges,
        backbone: Backbone::Empty,
    };
    graph.backbone = graph.find_backbone();

    match &graph.backbone {
        Backbone::Path(path) => info!(
            "Backbone of {} steps over {} nodes and {} edges",
            path.len() - 1,
            graph.nodes.len(),
            graph.edges.len()
        ),
        Backbone::Disconnected => info!(
            "No backbone: {} nodes and {} edges, extremes disconnected",
            graph.nodes.len(),
            graph.edges.len()
        ),
        Backbone::Empty => debug!("No assigned differences to build a graph from"),
    }
    graph
}

impl BackboneGraph {
    /// Breadth-first search from the heaviest to the lightest node, tagging
    /// the edges on the path.
    fn find_backbone(&mut self) -> Backbone {
        let Some(start) = self.nodes.len().checked_sub(1) else {
            return Backbone::Empty;
        };
        let goal = 0;

        let mut previous: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(node) = queue.pop_front() {
            if node == goal {
                break;
            }
            for &next in &self.adjacency[node] {
                if !visited[next] {
                    visited[next] = true;
                    previous[next] = Some(node);
                    queue.push_back(next);
                }
            }
        }

        if !visited[goal] {
            return Backbone::Disconnected;
        }

        let mut path = vec![goal];
        let mut node = goal;
        while let Some(prev) = previous[node] {
            path.push(prev);
            node = prev;
        }
        path.reverse();

        for step in path.windows(2) {
            let key = (step[0].min(step[1]), step[0].max(step[1]));
            if let Some(edge) = self.edges.get_mut(&key) {
                edge.role = EdgeRole::Backbone;
            }
        }
        Backbone::Path(path.into_iter().map(|i| self.nodes[i]).collect())
    }

    /// Peak masses, ascending.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn backbone(&self) -> &Backbone {
        &self.backbone
    }

    /// The backbone path, or [`AnalysisError::NoBackbone`] when there is none.
    pub fn require_backbone(&self) -> Result<&[f64], AnalysisError> {
        match &self.backbone {
            Backbone::Path(path) => Ok(path.as_slice()),
            Backbone::Empty | Backbone::Disconnected => Err(AnalysisError::NoBackbone),
        }
    }

    /// Number of distinct neighbours of the node at `mz`; 0 if absent.
    pub fn degree(&self, mz: f64) -> usize {
        self.position(mz).map_or(0, |i| self.adjacency[i].len())
    }

    fn position(&self, mz: f64) -> Option<usize> {
        self.nodes.binary_search_by(|n| n.total_cmp(&mz)).ok()
    }

    /// Off-backbone neighbours of every backbone node with degree above 2.
    ///
    /// The lightest node ends the ladder and never starts a branch.
    pub fn branches(&self) -> Vec<Branch> {
        let Backbone::Path(path) = &self.backbone else {
            return Vec::new();
        };
        let on_path: BTreeSet<usize> = path.iter().filter_map(|&m| self.position(m)).collect();
        let lightest = path.last().and_then(|&m| self.position(m));

        let mut branches = Vec::new();
        for &node in on_path.iter().filter(|&&n| Some(n) != lightest) {
            if self.adjacency[node].len() <= 2 {
                continue;
            }
            for &next in self.adjacency[node].difference(&on_path) {
                let key = (node.min(next), node.max(next));
                branches.push(Branch {
                    from: self.nodes[node],
                    to: self.nodes[next],
                    symbol: self.edges[&key].symbol.clone(),
                });
            }
        }
        branches
    }
}
