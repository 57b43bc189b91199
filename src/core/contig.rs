use std::collections::HashMap;
use std::fmt;

/// Index of a contig in the order its `@SQ` line appeared in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContigId(pub u32);

impl ContigId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A contig together with the strand it is read from.
///
/// Ordering is by id first, then sense, so forward (`+`) sorts before
/// reverse (`-`) for the same contig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContigNode {
    pub id: ContigId,
    /// `true` for the reverse-complement strand
    pub sense: bool,
}

impl ContigNode {
    #[must_use]
    pub fn new(id: ContigId, sense: bool) -> Self {
        Self { id, sense }
    }

    /// Return the same contig on the opposite strand
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            id: self.id,
            sense: !self.sense,
        }
    }

    /// Display this node as `NAME+` or `NAME-` using the names from `table`
    #[must_use]
    pub fn display(self, table: &ContigTable) -> NodeDisplay<'_> {
        NodeDisplay { node: self, table }
    }
}

pub struct NodeDisplay<'a> {
    node: ContigNode,
    table: &'a ContigTable,
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.node.sense { '-' } else { '+' };
        write!(f, "{}{sign}", self.table.name(self.node.id))
    }
}

/// A single contig/sequence from the alignment header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    /// Sequence name (SN tag in SAM)
    pub name: String,

    /// Sequence length (LN tag in SAM)
    pub length: u32,
}

impl Contig {
    pub fn new(name: impl Into<String>, length: u32) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

/// Collects contigs while the header is read.
///
/// Ids are handed out in first-seen order. A repeated name keeps its
/// original id and length.
#[derive(Debug, Default)]
pub struct ContigTableBuilder {
    contigs: Vec<Contig>,
    index: HashMap<String, ContigId>,
}

impl ContigTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contig, returning its id
    pub fn insert(&mut self, name: impl Into<String>, length: u32) -> ContigId {
        let name = name.into();
        if let Some(&id) = self.index.get(&name) {
            return id;
        }
        #[allow(clippy::cast_possible_truncation)]
        let id = ContigId(self.contigs.len() as u32);
        self.index.insert(name.clone(), id);
        self.contigs.push(Contig::new(name, length));
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    /// Lock the table. No names can be added afterwards.
    #[must_use]
    pub fn freeze(self) -> ContigTable {
        ContigTable {
            contigs: self.contigs,
            index: self.index,
        }
    }
}

/// Immutable contig name/length lookup shared by all workers
#[derive(Debug)]
pub struct ContigTable {
    contigs: Vec<Contig>,
    index: HashMap<String, ContigId>,
}

impl ContigTable {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ContigId> {
        self.index.get(name).copied()
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this table.
    #[must_use]
    pub fn name(&self, id: ContigId) -> &str {
        &self.contigs[id.index()].name
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this table.
    #[must_use]
    pub fn length(&self, id: ContigId) -> u32 {
        self.contigs[id.index()].length
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contig> {
        self.contigs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_first_seen_order() {
        let mut builder = ContigTableBuilder::new();
        assert_eq!(builder.insert("ctg7", 500), ContigId(0));
        assert_eq!(builder.insert("ctg2", 120), ContigId(1));
        assert_eq!(builder.insert("ctg7", 999), ContigId(0));
        assert_eq!(builder.len(), 2);

        let table = builder.freeze();
        assert_eq!(table.get("ctg2"), Some(ContigId(1)));
        assert_eq!(table.get("ctg9"), None);
        assert_eq!(table.name(ContigId(0)), "ctg7");
        assert_eq!(table.length(ContigId(0)), 500);
    }

    #[test]
    fn test_node_display_and_flip() {
        let mut builder = ContigTableBuilder::new();
        let id = builder.insert("scaffold_1", 1000);
        let table = builder.freeze();

        let node = ContigNode::new(id, false);
        assert_eq!(node.display(&table).to_string(), "scaffold_1+");
        assert_eq!(node.flipped().display(&table).to_string(), "scaffold_1-");
        assert_eq!(node.flipped().flipped(), node);
    }

    #[test]
    fn test_node_ordering() {
        let a = ContigNode::new(ContigId(1), true);
        let b = ContigNode::new(ContigId(2), false);
        let c = ContigNode::new(ContigId(1), false);
        let mut nodes = vec![a, b, c];
        nodes.sort();
        assert_eq!(nodes, vec![c, a, b]);
    }
}
