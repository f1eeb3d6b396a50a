//! Location browser tree.
//!
//! Flat aggregation rows (one per distinct country/region/city/place
//! combination, with an entry count) are folded into a country → region →
//! city → place tree. Counts roll up to every ancestor. A node that has
//! children and also rows ending exactly at it gets a synthetic `<unnamed>`
//! child carrying those direct entries, so child counts always add up to the
//! parent's count.

use std::collections::HashMap;
use tracing::{debug, trace};
use uuid::Uuid;

use trace_core::defaults::{NO_LOCATION_LABEL, UNNAMED_LOCATION_LABEL};
use trace_core::logging;
use trace_core::{LocationHierarchyRow, LocationNodeType, LocationTreeNode};

const LEVELS: [LocationNodeType; 4] = [
    LocationNodeType::Country,
    LocationNodeType::Region,
    LocationNodeType::City,
    LocationNodeType::Place,
];

#[derive(Debug)]
struct PendingNode {
    node_type: LocationNodeType,
    value: String,
    entry_count: u64,
    /// Entries on rows that end at this node.
    direct_count: u64,
    location_id: Option<Uuid>,
    /// Ancestor values by level (country, region, city).
    parents: [Option<String>; 3],
    children: Vec<usize>,
}

/// Level values from the country down to a node.
type LevelPath = Vec<Option<String>>;

/// Insertion-ordered arena keyed by level paths.
#[derive(Debug, Default)]
struct TreeArena {
    nodes: Vec<PendingNode>,
    index: HashMap<LevelPath, usize>,
    roots: Vec<usize>,
}

impl TreeArena {
    fn insert_row(&mut self, row: &LocationHierarchyRow) -> bool {
        let slots = row_levels(row);
        let Some(deepest) = slots.iter().rposition(Option::is_some) else {
            return false;
        };

        let mut parent: Option<usize> = None;
        for (level, slot) in slots.iter().enumerate().take(deepest + 1) {
            let Some(value) = slot else {
                continue;
            };
            let key = level_path(&slots[..=level]);
            let id = match self.index.get(&key) {
                Some(&id) => id,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(PendingNode {
                        node_type: LEVELS[level],
                        value: value.to_string(),
                        entry_count: 0,
                        direct_count: 0,
                        location_id: None,
                        parents: parent_values(&slots, level),
                        children: Vec::new(),
                    });
                    self.index.insert(key, id);
                    match parent {
                        Some(p) => self.nodes[p].children.push(id),
                        None => self.roots.push(id),
                    }
                    id
                }
            };

            let node = &mut self.nodes[id];
            node.entry_count += row.entry_count;
            if level == deepest {
                node.direct_count += row.entry_count;
                if node.location_id.is_none() {
                    node.location_id = row.location_id;
                }
            }
            parent = Some(id);
        }
        true
    }

    fn build(&self, id: usize) -> LocationTreeNode {
        let node = &self.nodes[id];
        let mut children: Vec<LocationTreeNode> =
            node.children.iter().map(|&child| self.build(child)).collect();

        if node.direct_count > 0 && !children.is_empty() {
            if let Some(child_type) = node.node_type.child_type() {
                let mut parents = node.parents.clone();
                if let Some(i) = level_index(node.node_type) {
                    if let Some(slot) = parents.get_mut(i) {
                        *slot = Some(node.value.clone());
                    }
                }
                children.push(tree_node(
                    child_type,
                    None,
                    UNNAMED_LOCATION_LABEL.to_string(),
                    node.direct_count,
                    Vec::new(),
                    None,
                    parents,
                ));
            }
        }
        sort_children(&mut children);

        tree_node(
            node.node_type,
            Some(node.value.clone()),
            node.value.clone(),
            node.entry_count,
            children,
            node.location_id,
            node.parents.clone(),
        )
    }
}

fn row_levels(row: &LocationHierarchyRow) -> [Option<&str>; 4] {
    fn clean(v: &Option<String>) -> Option<&str> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
    [
        clean(&row.country),
        clean(&row.region),
        clean(&row.city),
        clean(&row.place_name),
    ]
}

fn level_path(slots: &[Option<&str>]) -> LevelPath {
    slots.iter().map(|s| s.map(str::to_string)).collect()
}

fn parent_values(slots: &[Option<&str>; 4], level: usize) -> [Option<String>; 3] {
    let upto = |i: usize| {
        if i < level {
            slots[i].map(str::to_string)
        } else {
            None
        }
    };
    [upto(0), upto(1), upto(2)]
}

fn level_index(node_type: LocationNodeType) -> Option<usize> {
    LEVELS.iter().position(|t| *t == node_type)
}

fn tree_node(
    node_type: LocationNodeType,
    value: Option<String>,
    display_name: String,
    entry_count: u64,
    children: Vec<LocationTreeNode>,
    location_id: Option<Uuid>,
    parents: [Option<String>; 3],
) -> LocationTreeNode {
    let [parent_country, parent_region, parent_city] = parents;
    LocationTreeNode {
        node_type,
        value,
        display_name,
        entry_count,
        children,
        location_id,
        parent_country,
        parent_region,
        parent_city,
    }
}

/// `<unnamed>` first, then count desc, then display name.
fn sort_children(children: &mut [LocationTreeNode]) {
    children.sort_by(|a, b| {
        b.is_unnamed()
            .cmp(&a.is_unnamed())
            .then_with(|| b.entry_count.cmp(&a.entry_count))
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
}

/// Build the location tree from aggregation rows.
///
/// Rows without any of country, region, city or place are skipped; their
/// entries belong in `no_location_count`, which becomes a trailing
/// `"No Location"` root when positive.
pub fn build_location_tree(
    rows: &[LocationHierarchyRow],
    no_location_count: u64,
) -> Vec<LocationTreeNode> {
    let mut arena = TreeArena::default();
    let mut skipped = 0usize;
    for row in rows {
        if !arena.insert_row(row) {
            trace!(entry_count = row.entry_count, "Skipping location row without levels");
            skipped += 1;
        }
    }

    let mut roots: Vec<LocationTreeNode> = arena.roots.iter().map(|&id| arena.build(id)).collect();
    roots.sort_by(|a, b| {
        b.entry_count
            .cmp(&a.entry_count)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });

    if no_location_count > 0 {
        roots.push(tree_node(
            LocationNodeType::NoLocation,
            None,
            NO_LOCATION_LABEL.to_string(),
            no_location_count,
            Vec::new(),
            None,
            [None, None, None],
        ));
    }

    debug!(
        { logging::COMPONENT } = "location_tree",
        { logging::INPUT_COUNT } = rows.len(),
        skipped,
        nodes = arena.nodes.len(),
        { logging::RESULT_COUNT } = roots.len(),
        "Location tree built"
    );
    roots
}

/// Total entries across the roots of a tree.
pub fn get_location_tree_total_count(nodes: &[LocationTreeNode]) -> u64 {
    nodes.iter().map(|n| n.entry_count).sum()
}

/// Depth-first search for the first node matching `predicate`.
pub fn find_location_node<'a, P>(nodes: &'a [LocationTreeNode], predicate: P) -> Option<&'a LocationTreeNode>
where
    P: Fn(&LocationTreeNode) -> bool + Copy,
{
    for node in nodes {
        if predicate(node) {
            return Some(node);
        }
        if let Some(found) = find_location_node(&node.children, predicate) {
            return Some(found);
        }
    }
    None
}

/// Pre-order listing of `(depth, node)` pairs.
pub fn flatten_location_tree(nodes: &[LocationTreeNode]) -> Vec<(usize, &LocationTreeNode)> {
    fn walk<'a>(nodes: &'a [LocationTreeNode], depth: usize, out: &mut Vec<(usize, &'a LocationTreeNode)>) {
        for node in nodes {
            out.push((depth, node));
            walk(&node.children, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}
