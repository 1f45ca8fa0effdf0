use crate::models::ClientKey;

/// A repeatable row on a list stage.
pub trait StageEntry: Default + Clone {
    /// Typed single-field edit.
    type Field;

    fn apply(&mut self, field: Self::Field);

    /// Every required field is populated.
    fn is_complete(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    pub key: ClientKey,
    /// Id of the stored record this row was loaded from, if any.
    pub server_id: Option<i64>,
    pub value: T,
}

/// Ordered rows of one stage. Never empty: it is seeded with a blank row and
/// refuses to drop its last one.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryList<T> {
    rows: Vec<Row<T>>,
}

impl<T: StageEntry> Default for EntryList<T> {
    fn default() -> Self {
        Self::seeded(Vec::new())
    }
}

impl<T: StageEntry> EntryList<T> {
    /// Builds the list from loaded records, assigning keys 1..=n.
    pub fn seeded(loaded: Vec<(Option<i64>, T)>) -> Self {
        let mut rows: Vec<Row<T>> = loaded
            .into_iter()
            .zip(1u32..)
            .map(|((server_id, value), key)| Row {
                key: ClientKey::new(key),
                server_id,
                value,
            })
            .collect();
        if rows.is_empty() {
            rows.push(Row {
                key: ClientKey::FIRST,
                server_id: None,
                value: T::default(),
            });
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: ClientKey) -> Option<&T> {
        self.rows.iter().find(|r| r.key == key).map(|r| &r.value)
    }

    pub fn keys(&self) -> Vec<ClientKey> {
        self.rows.iter().map(|r| r.key).collect()
    }

    fn next_key(&self) -> ClientKey {
        self.rows
            .iter()
            .map(|r| r.key)
            .max()
            .map(ClientKey::next)
            .unwrap_or(ClientKey::FIRST)
    }

    /// Appends a blank row and returns its key.
    pub fn add(&mut self) -> ClientKey {
        let key = self.next_key();
        self.rows.push(Row {
            key,
            server_id: None,
            value: T::default(),
        });
        key
    }

    /// Returns false when no row has the key.
    pub fn update(&mut self, key: ClientKey, field: T::Field) -> bool {
        match self.rows.iter_mut().find(|r| r.key == key) {
            Some(row) => {
                row.value.apply(field);
                true
            }
            None => false,
        }
    }

    /// No-op on the last remaining row.
    pub fn remove(&mut self, key: ClientKey) -> bool {
        if self.rows.len() <= 1 {
            return false;
        }
        let before = self.rows.len();
        self.rows.retain(|r| r.key != key);
        self.rows.len() != before
    }

    pub fn has_complete(&self) -> bool {
        self.rows.iter().any(|r| r.value.is_complete())
    }

    /// Rows with every required field set, in list order. Incomplete rows
    /// are dropped, not reported.
    pub fn complete_entries(&self) -> impl Iterator<Item = &T> {
        self.rows
            .iter()
            .map(|r| &r.value)
            .filter(|v| v.is_complete())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|r| &r.value)
    }
}
