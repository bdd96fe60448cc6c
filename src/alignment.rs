use indexmap::map::{Iter, IterMut};
use indexmap::IndexMap;

/// An ordered set of named sequences, as read from a FASTA alignment.
///
/// Records are kept in the order their headers first appear in the file. Declaring the same
/// header twice keeps the original position but throws away everything accumulated under the
/// first declaration (last write wins).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Alignment {
    records: IndexMap<String, Vec<u8>>,
}

impl Alignment {
    pub fn new() -> Self {
        Alignment {
            records: Default::default(),
        }
    }

    /// Inserts a record, replacing any sequence previously stored under `name`.
    ///
    /// # Returns
    ///
    /// The position of the record, and `true` if a record with this name already existed.
    pub fn insert(&mut self, name: String, seq: Vec<u8>) -> (usize, bool) {
        let (idx, old) = self.records.insert_full(name, seq);
        (idx, old.is_some())
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Vec<u8>> {
        self.records.get(name)
    }

    /// Sequence of the record at position `idx`, as returned by `insert`.
    pub fn get_index_mut(&mut self, idx: usize) -> Option<&mut Vec<u8>> {
        self.records.get_index_mut(idx).map(|(_, seq)| seq)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all sequence lengths.
    pub fn total_len(&self) -> usize {
        self.records.values().map(|s| s.len()).sum()
    }

    pub fn iter(&self) -> Iter<'_, String, Vec<u8>> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, String, Vec<u8>> {
        self.records.iter_mut()
    }
}

impl<'a> IntoIterator for &'a Alignment {
    type Item = (&'a String, &'a Vec<u8>);
    type IntoIter = Iter<'a, String, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Alignment;

    #[test]
    fn keeps_file_order() {
        let mut aln = Alignment::new();
        aln.insert("zeta".into(), b"AC".to_vec());
        aln.insert("alpha".into(), b"GT".to_vec());
        aln.insert("mu".into(), b"--".to_vec());

        let names: Vec<&str> = aln.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mu"]);
        assert_eq!(aln.total_len(), 6);
    }

    #[test]
    fn duplicate_header_overwrites_in_place() {
        let mut aln = Alignment::new();
        assert_eq!(aln.insert("a".into(), b"AAAA".to_vec()), (0, false));
        assert_eq!(aln.insert("b".into(), b"CCCC".to_vec()), (1, false));
        assert_eq!(aln.insert("a".into(), b"GG".to_vec()), (0, true));

        assert_eq!(aln.len(), 2);
        assert_eq!(aln.get("a").unwrap(), b"GG");
        assert_eq!(aln.iter().next().unwrap().0, "a");
    }

    #[test]
    fn append_by_position() {
        let mut aln = Alignment::new();
        let (a, _) = aln.insert("a".into(), Vec::new());
        let (b, _) = aln.insert("b".into(), b"C".to_vec());

        aln.get_index_mut(a).unwrap().extend_from_slice(b"AC");
        aln.get_index_mut(b).unwrap().extend_from_slice(b"GT");

        assert_eq!(aln.get("a").unwrap(), b"AC");
        assert_eq!(aln.get("b").unwrap(), b"CGT");
        assert!(aln.get_index_mut(2).is_none());
    }

    #[test]
    fn empty() {
        let aln = Alignment::default();
        assert!(aln.is_empty());
        assert_eq!(aln.total_len(), 0);
    }
}
