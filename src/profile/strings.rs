use indexmap::IndexSet;
use serde::{Deserialize, Serialize, Serializer};

/// Name of the root function every profile starts with; always at index 0.
pub const ROOT: &str = "(root)";

/// A thread's string table.
///
/// Other tables refer to strings by their index in this table. Interning a string that is
/// already present returns the existing index, so each distinct string is stored once and
/// indices never change after insertion.
///
/// A table is (de)serialized as a plain array. An array that holds the same string twice is
/// rejected, since merging the copies would shift every index after the second one.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct StringTable(IndexSet<String>);

impl Serialize for StringTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.0)
    }
}

impl TryFrom<Vec<String>> for StringTable {
    type Error = String;

    fn try_from(strings: Vec<String>) -> Result<Self, Self::Error> {
        let mut table = IndexSet::with_capacity(strings.len());
        for s in strings {
            if let (index, false) = table.insert_full(s) {
                return Err(format!(
                    "duplicate string {:?} in string table",
                    table[index]
                ));
            }
        }
        Ok(StringTable(table))
    }
}

impl Default for StringTable {
    fn default() -> Self {
        let mut strings = IndexSet::new();
        strings.insert(ROOT.to_string());
        StringTable(strings)
    }
}

impl StringTable {
    /// Returns the index of `s`, adding it to the table first if necessary.
    pub fn intern(&mut self, s: &str) -> usize {
        if let Some(index) = self.0.get_index_of(s) {
            return index;
        }
        self.0.insert_full(s.to_string()).0
    }

    /// Looks up the string at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get_index(index).map(String::as_str)
    }

    /// Number of distinct strings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty. A table built with `default()` never is.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_comes_first() {
        let strings = StringTable::default();
        assert_eq!(strings.get(0), Some(ROOT));
        assert_eq!(strings.len(), 1);
    }

    #[test]
    fn interning_dedups() {
        let mut strings = StringTable::default();
        let build = strings.intern("Build");
        let test = strings.intern("Test");
        assert_eq!(strings.intern("Build"), build);
        assert_eq!((build, test), (1, 2));
        assert_eq!(strings.len(), 3);
        assert_eq!(strings.get(test), Some("Test"));
        assert_eq!(strings.get(3), None);
    }

    #[test]
    fn serializes_as_array() {
        let mut strings = StringTable::default();
        strings.intern("Build");
        assert_eq!(
            serde_json::to_string(&strings).unwrap(),
            r#"["(root)","Build"]"#
        );
        let back: StringTable = serde_json::from_str(r#"["(root)","Build"]"#).unwrap();
        assert_eq!(back, strings);
    }

    #[test]
    fn rejects_duplicate_strings() {
        let err = serde_json::from_str::<StringTable>(r#"["(root)","Build","Test","Build"]"#)
            .unwrap_err();
        assert!(
            err.to_string().contains(r#"duplicate string "Build""#),
            "unexpected error: {}",
            err
        );
    }
}
