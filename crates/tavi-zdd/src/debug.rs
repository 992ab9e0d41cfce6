//! Debug utilities: DOT export and a short text dump.

use crate::node::NodeId;
use crate::zdd::Zdd;
use rustc_hash::FxHashSet;
use std::fmt::Write;

impl Zdd {
    /// Export the diagram to DOT format for visualisation with Graphviz.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        let mut visited = FxHashSet::default();

        writeln!(out, "digraph ZDD {{").unwrap();
        writeln!(out, "  rankdir=TB;").unwrap();
        writeln!(out, "  node [shape=circle];").unwrap();
        writeln!(out).unwrap();

        writeln!(out, "  // Terminals").unwrap();
        writeln!(
            out,
            "  Zero [shape=box, label=\"⊥\", style=filled, fillcolor=lightgray];"
        )
        .unwrap();
        writeln!(
            out,
            "  One [shape=box, label=\"⊤\", style=filled, fillcolor=lightgreen];"
        )
        .unwrap();
        writeln!(out).unwrap();

        writeln!(out, "  // Internal nodes").unwrap();
        if !self.root().is_null() {
            self.emit_dot_node(self.root(), &mut out, &mut visited);
        }

        writeln!(out, "}}").unwrap();
        out
    }

    fn emit_dot_node(&self, id: NodeId, out: &mut String, visited: &mut FxHashSet<NodeId>) {
        if id.is_terminal() || !visited.insert(id) {
            return;
        }

        let node = self.table.node(id);
        writeln!(out, "  N{} [label=\"{}\"];", id.raw(), node.level).unwrap();
        writeln!(
            out,
            "  N{} -> {} [style=dashed, label=\"0\"];",
            id.raw(),
            id_name(node.lo)
        )
        .unwrap();
        writeln!(out, "  N{} -> {} [label=\"1\"];", id.raw(), id_name(node.hi)).unwrap();

        self.emit_dot_node(node.lo, out, visited);
        self.emit_dot_node(node.hi, out, visited);
    }

    /// Short text rendering: root, sizes, and up to 20 solutions.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "ZDD (root={}, {} nodes, {} solutions)",
            id_name(self.root()),
            self.size(),
            self.count().unwrap_or(0)
        )
        .unwrap();

        if self.root().is_null() {
            writeln!(out, "  <not built>").unwrap();
        } else if self.root() == NodeId::ZERO {
            writeln!(out, "  <infeasible>").unwrap();
        } else {
            for (i, subset) in self.solutions().enumerate() {
                if i >= 20 {
                    writeln!(out, "  ...").unwrap();
                    break;
                }
                writeln!(out, "  {:?}", subset).unwrap();
            }
        }

        out
    }
}

fn id_name(id: NodeId) -> String {
    match id {
        NodeId::NULL => "Null".to_string(),
        NodeId::ZERO => "Zero".to_string(),
        NodeId::ONE => "One".to_string(),
        other => format!("N{}", other.raw()),
    }
}
