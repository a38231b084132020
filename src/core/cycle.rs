//! Cycle detection over a prerequisite adjacency relation.
//!
//! Three-colour depth-first search: a node is unvisited (absent from the
//! colour map), `Visiting` while its descendants are being explored, and
//! `Visited` once they are exhausted. Reaching a `Visiting` node again means
//! the graph has a cycle. The traversal keeps an explicit stack so deep
//! prerequisite chains cannot overflow the call stack.

use std::collections::HashMap;

/// Skill id -> direct prerequisite ids. Duplicate entries are allowed.
pub type Adjacency = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Visiting,
    Visited,
}

/// Detects cycles in an [`Adjacency`].
#[derive(Debug, Clone, Copy)]
pub struct CycleDetector<'a> {
    graph: &'a Adjacency,
}

impl<'a> CycleDetector<'a> {
    pub const fn new(graph: &'a Adjacency) -> Self {
        Self { graph }
    }

    /// True if any cycle exists, including self-loops.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Find a cycle anywhere in the graph.
    ///
    /// Returns the node whose outgoing edge closed the cycle. Roots are tried
    /// in sorted order so the answer is deterministic.
    #[must_use]
    pub fn find_cycle(&self) -> Option<String> {
        let mut roots: Vec<&str> = self.graph.keys().map(String::as_str).collect();
        roots.sort_unstable();

        let mut colors: HashMap<&str, Color> = HashMap::new();
        for root in roots {
            if colors.contains_key(root) {
                continue;
            }
            if let Some(node) = visit(self.graph, root, &mut colors) {
                return Some(node);
            }
        }
        None
    }

    /// Find a cycle reachable from `start`.
    ///
    /// When the graph was acyclic before `start`'s edges changed, any new
    /// cycle must pass through `start`, so this is all a mutation needs to
    /// check.
    #[must_use]
    pub fn find_cycle_from(&self, start: &str) -> Option<String> {
        let mut colors: HashMap<&str, Color> = HashMap::new();
        visit(self.graph, start, &mut colors)
    }
}

/// Convenience wrapper for [`CycleDetector::has_cycle`].
#[must_use]
pub fn has_cycle(graph: &Adjacency) -> bool {
    CycleDetector::new(graph).has_cycle()
}

fn visit<'g>(
    graph: &'g Adjacency,
    root: &'g str,
    colors: &mut HashMap<&'g str, Color>,
) -> Option<String> {
    // (node, index of the next prerequisite to explore)
    let mut stack: Vec<(&'g str, usize)> = vec![(root, 0)];
    colors.insert(root, Color::Visiting);

    while let Some(frame) = stack.last_mut() {
        let (node, cursor) = *frame;
        frame.1 += 1;

        let next = graph
            .get(node)
            .and_then(|prereqs| prereqs.get(cursor))
            .map(String::as_str);

        match next {
            Some(prereq) => match colors.get(prereq) {
                Some(Color::Visiting) => return Some(node.to_string()),
                Some(Color::Visited) => {}
                None => {
                    colors.insert(prereq, Color::Visiting);
                    stack.push((prereq, 0));
                }
            },
            None => {
                colors.insert(node, Color::Visited);
                stack.pop();
            }
        }
    }

    None
}
