use crate::models::{CredentialTable, ScheduleTimeTable, SettingsTable, Table};

/// Collects the table definitions and emits the bootstrap statements in
/// declaration order. The tables carry no foreign keys between them, so
/// declaration order is creation order.
pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(tables: Vec<Box<dyn Table>>) -> Self {
        Self { tables }
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![
            Box::new(CredentialTable),
            Box::new(SettingsTable),
            Box::new(ScheduleTimeTable),
        ])
    }
}
