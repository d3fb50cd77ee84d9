//! Cycle-safe hierarchy traversal.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Lazy breadth-first walk along one direction of the `is_a` hierarchy.
///
/// Every reachable term is yielded exactly once; a visited set bounds the
/// walk, so cycles and diamonds terminate. Neighbours are visited in sorted
/// order, which makes the sequence identical across runs. The walk borrows
/// the graph; calling `ancestors`/`descendants` again restarts it.
#[derive(Debug, Clone)]
pub struct TermWalk<'a> {
    edges: &'a BTreeMap<String, BTreeSet<String>>,
    queue: VecDeque<&'a str>,
    visited: HashSet<&'a str>,
}

impl<'a> TermWalk<'a> {
    pub(crate) fn new(edges: &'a BTreeMap<String, BTreeSet<String>>, start: &str) -> Self {
        let mut walk = Self {
            edges,
            queue: VecDeque::new(),
            visited: HashSet::new(),
        };
        walk.enqueue_neighbours(start);
        walk
    }

    fn enqueue_neighbours(&mut self, term_id: &str) {
        let Some(next) = self.edges.get(term_id) else {
            return;
        };
        for id in next {
            if self.visited.insert(id.as_str()) {
                self.queue.push_back(id.as_str());
            }
        }
    }
}

impl<'a> Iterator for TermWalk<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        self.enqueue_neighbours(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(&str, &str)]) -> BTreeMap<String, BTreeSet<String>> {
        let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (from, to) in pairs {
            map.entry((*from).to_string())
                .or_default()
                .insert((*to).to_string());
        }
        map
    }

    #[test]
    fn diamond_yields_each_term_once() {
        let edges = edges(&[("d", "b"), ("d", "c"), ("b", "a"), ("c", "a")]);
        let walked: Vec<&str> = TermWalk::new(&edges, "d").collect();
        assert_eq!(walked, vec!["b", "c", "a"]);
    }

    #[test]
    fn cycle_terminates_and_revisits_start_once() {
        let edges = edges(&[("t1", "t2"), ("t2", "t1")]);
        let walked: Vec<&str> = TermWalk::new(&edges, "t1").collect();
        assert_eq!(walked, vec!["t2", "t1"]);
    }

    #[test]
    fn self_loop_terminates() {
        let edges = edges(&[("t1", "t1")]);
        let walked: Vec<&str> = TermWalk::new(&edges, "t1").collect();
        assert_eq!(walked, vec!["t1"]);
    }

    #[test]
    fn unknown_start_yields_nothing() {
        let edges = edges(&[("t1", "t2")]);
        assert_eq!(TermWalk::new(&edges, "unknown").count(), 0);
    }
}
