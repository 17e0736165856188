use crate::entity::blacklist::Blacklist;
use crate::ingest::types::Transaction;

use super::arena::AddressArena;
use super::types::{GraphEdge, GraphNode, TxGraph};

/// Build the directed graph of a whole batch.
///
/// Every endpoint becomes a node (once, in first-seen order); every
/// non-self transaction becomes one edge weighted by its USD value.
pub fn build_graph(transactions: &[Transaction], blacklist: &Blacklist) -> TxGraph {
    let mut arena = AddressArena::new();
    let mut links = Vec::with_capacity(transactions.len());

    for tx in transactions {
        arena.intern(tx.from.as_str());
        arena.intern(tx.to.as_str());

        if tx.is_self_transfer() {
            tracing::debug!(address = %tx.from, tx_hash = %tx.hash, "Self transfer, no edge");
            continue;
        }

        links.push(GraphEdge {
            source: tx.from.as_str().to_string(),
            target: tx.to.as_str().to_string(),
            value: tx.usd_weight(),
            time: None,
        });
    }

    let nodes = nodes_for(arena.addresses(), blacklist);

    tracing::debug!(nodes = nodes.len(), links = links.len(), "Built transaction graph");
    TxGraph { nodes, links }
}

pub(crate) fn nodes_for<'a>(
    addresses: impl Iterator<Item = &'a str>,
    blacklist: &Blacklist,
) -> Vec<GraphNode> {
    addresses
        .map(|id| GraphNode {
            id: id.to_string(),
            is_blacklisted: blacklist.contains_str(id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::UsdValue;

    fn tx(hash: &str, from: &str, to: &str, usd: f64) -> Transaction {
        Transaction::new(hash, from, to, 1.0, "2021-01-01 00:00:00").with_usd_value(usd)
    }

    #[test]
    fn test_build_graph_basic() {
        let txs = vec![
            tx("0x1", "0xAAA", "0xbbb", 50.0),
            tx("0x2", "0xbbb", "0xblacklisted", 120.0),
            tx("0x3", "0xaaa", "0xbbb", 5.0),
        ];
        let graph = build_graph(&txs, &Blacklist::default());

        assert_eq!(graph.node_ids(), vec!["0xaaa", "0xbbb", "0xblacklisted"]);
        assert!(graph.node("0xblacklisted").unwrap().is_blacklisted);
        assert!(!graph.node("0xaaa").unwrap().is_blacklisted);

        assert_eq!(graph.links.len(), 3);
        assert_eq!(
            graph.links[0],
            GraphEdge {
                source: "0xaaa".to_string(),
                target: "0xbbb".to_string(),
                value: 50.0,
                time: None,
            }
        );
    }

    #[test]
    fn test_self_loop_makes_node_not_edge() {
        let txs = vec![tx("0x1", "0xabc", "0xABC", 10.0)];
        let graph = build_graph(&txs, &Blacklist::default());
        assert_eq!(graph.node_ids(), vec!["0xabc"]);
        assert!(graph.links.is_empty());
    }

    #[test]
    fn test_missing_address_and_bad_usd() {
        let mut t = Transaction::new("0x1", "0xa", "", 1.0, "2021-01-01 00:00:00");
        t.usd_value = Some(UsdValue::Text("lots".to_string()));
        let graph = build_graph(&[t], &Blacklist::default());
        assert_eq!(graph.node_ids(), vec!["0xa", "unknown"]);
        assert_eq!(graph.links[0].target, "unknown");
        assert_eq!(graph.links[0].value, 0.0);
    }

    #[test]
    fn test_empty_batch() {
        let graph = build_graph(&[], &Blacklist::default());
        assert_eq!(graph, TxGraph::default());
    }

    #[test]
    fn test_deterministic() {
        let txs = vec![
            tx("0x1", "0xa", "0xb", 1.0),
            tx("0x2", "0xc", "0xa", 2.0),
            tx("0x3", "0xb", "0xc", 3.0),
        ];
        let blacklist = Blacklist::new(["0xc"]);
        assert_eq!(build_graph(&txs, &blacklist), build_graph(&txs, &blacklist));
    }
}
