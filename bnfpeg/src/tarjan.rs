//! Strongly connected components of a named directed graph.
//!
//! Components come out in the order Tarjan's algorithm closes them. Every name
//! a member of a component refers to outside of it belongs to a component
//! emitted earlier, so walking the result front to back always visits
//! dependencies first.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Edge lookup for [`components`]. Vertices with no entry have no successors.
pub trait Graph {
    fn successors(&self, vertex: &str) -> &[String];
}

impl Graph for BTreeMap<String, Vec<String>> {
    fn successors(&self, vertex: &str) -> &[String] {
        self.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<H: BuildHasher> Graph for HashMap<String, Vec<String>, H> {
    fn successors(&self, vertex: &str) -> &[String] {
        self.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }
}

struct Mark {
    index: usize,
    low: usize,
    on_stack: bool,
}

/// Partition every vertex reachable from `vertices` into strongly connected
/// components. Each component is sorted by name.
pub fn components<'a, V, G>(vertices: &'a [V], graph: &'a G) -> Vec<Vec<String>>
where
    V: AsRef<str>,
    G: Graph + ?Sized,
{
    let mut marks: HashMap<&'a str, Mark> = HashMap::new();
    let mut stack: Vec<&'a str> = Vec::new();
    let mut res = Vec::new();

    // explicit call stack of (vertex, next successor to look at)
    let mut calls: Vec<(&'a str, usize)> = Vec::new();

    for root in vertices {
        let root = root.as_ref();

        if marks.contains_key(root) {
            continue;
        }

        discover(root, &mut marks, &mut stack);
        calls.push((root, 0));

        while let Some((v, next)) = calls.last_mut() {
            let v = *v;
            let successors = graph.successors(v);

            if let Some(w) = successors.get(*next) {
                *next += 1;
                let w = w.as_str();

                match marks.get(w) {
                    None => {
                        discover(w, &mut marks, &mut stack);
                        calls.push((w, 0));
                    }
                    Some(mark) if mark.on_stack => {
                        let index = mark.index;
                        if let Some(mark) = marks.get_mut(v) {
                            mark.low = mark.low.min(index);
                        }
                    }
                    Some(_) => (),
                }

                continue;
            }

            calls.pop();

            let (index, low) = {
                let mark = &marks[v];
                (mark.index, mark.low)
            };

            if low == index {
                let mut scc = Vec::new();

                while let Some(w) = stack.pop() {
                    if let Some(mark) = marks.get_mut(w) {
                        mark.on_stack = false;
                    }
                    scc.push(w.to_owned());
                    if w == v {
                        break;
                    }
                }

                scc.sort();
                res.push(scc);
            }

            if let Some((parent, _)) = calls.last() {
                if let Some(mark) = marks.get_mut(parent) {
                    mark.low = mark.low.min(low);
                }
            }
        }
    }

    res
}

fn discover<'a>(v: &'a str, marks: &mut HashMap<&'a str, Mark>, stack: &mut Vec<&'a str>) {
    let index = marks.len();

    marks.insert(
        v,
        Mark {
            index,
            low: index,
            on_stack: true,
        },
    );
    stack.push(v);
}
