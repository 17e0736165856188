use std::collections::{HashMap, VecDeque};

use crate::entity::blacklist::Blacklist;
use crate::error::GraphError;
use crate::ingest::types::{Transaction, WalletAddress};

use super::arena::AddressArena;
use super::builder::nodes_for;
use super::types::{GraphEdge, TxGraph};

pub const MIN_HOP_LIMIT: usize = 1;

/// Clamp a requested hop count to at least one hop.
pub fn clamp_hop_limit(hop_limit: i64) -> usize {
    usize::try_from(hop_limit)
        .unwrap_or(MIN_HOP_LIMIT)
        .max(MIN_HOP_LIMIT)
}

/// Coerce a textual hop parameter; anything unparseable means one hop.
pub fn parse_hop_limit(raw: Option<&str>) -> usize {
    raw.and_then(|r| r.trim().parse::<i64>().ok())
        .map(clamp_hop_limit)
        .unwrap_or(MIN_HOP_LIMIT)
}

/// Subgraph of everything within `hop_limit` hops of `start_address`.
///
/// Adjacency is undirected: a transaction links its endpoints both ways, and
/// each traversed `current -> neighbor` pair yields one edge per transaction
/// between the two, oriented along the traversal. Nodes at the hop limit are
/// included but not expanded. An empty batch yields an empty graph; a start
/// address absent from a non-empty batch yields just the start node.
pub fn bfs_subgraph(
    transactions: &[Transaction],
    start_address: &str,
    hop_limit: i64,
    blacklist: &Blacklist,
) -> Result<TxGraph, GraphError> {
    if start_address.trim().is_empty() {
        return Err(GraphError::MissingStartAddress);
    }
    if transactions.is_empty() {
        return Ok(TxGraph::default());
    }
    let hop_limit = clamp_hop_limit(hop_limit);
    let start = WalletAddress::new(start_address);

    let mut arena = AddressArena::new();
    // (current, neighbor) -> indices into `transactions`
    let mut edge_lookup: HashMap<(usize, usize), Vec<usize>> = HashMap::new();

    for (i, tx) in transactions.iter().enumerate() {
        let from = arena.intern(tx.from.as_str());
        let to = arena.intern(tx.to.as_str());
        if from == to {
            continue;
        }
        arena.link(from, to);
        edge_lookup.entry((from, to)).or_default().push(i);
        edge_lookup.entry((to, from)).or_default().push(i);
    }

    let start_idx = arena.intern(start.as_str());
    let mut visited = vec![false; arena.len()];
    let mut order = Vec::new();
    let mut links = Vec::new();
    let mut queue = VecDeque::new();

    visited[start_idx] = true;
    queue.push_back((start_idx, 0usize));

    while let Some((current, depth)) = queue.pop_front() {
        order.push(current);
        if depth >= hop_limit {
            continue;
        }

        for &neighbor in arena.neighbors(current) {
            if !visited[neighbor] {
                visited[neighbor] = true;
                queue.push_back((neighbor, depth + 1));
            }

            let Some(tx_indices) = edge_lookup.get(&(current, neighbor)) else {
                continue;
            };
            for &i in tx_indices {
                let tx = &transactions[i];
                links.push(GraphEdge {
                    source: arena.address(current).to_string(),
                    target: arena.address(neighbor).to_string(),
                    value: tx.usd_weight(),
                    time: Some(tx.time_label().to_string()),
                });
            }
        }
    }

    let nodes = nodes_for(order.iter().map(|&idx| arena.address(idx)), blacklist);

    tracing::debug!(
        start = %start,
        hop_limit,
        nodes = nodes.len(),
        links = links.len(),
        "Built n-hop subgraph"
    );
    Ok(TxGraph { nodes, links })
}
