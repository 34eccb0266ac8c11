#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use dbsnap_core::provider::{INDEX_TYPE_OTHER, INDEX_TYPE_STATISTIC};
use dbsnap_core::{
    ColumnRow, ExportedKeyRow, IndexInfoRow, MetadataProvider, ObjectKind, PrimaryKeyRow,
    ProviderError, ProviderResult, TableRow,
};

/// In-memory provider fed by the test.
#[derive(Default)]
pub struct MockProvider {
    pub objects: Vec<TableRow>,
    pub view_definitions: HashMap<String, String>,
    pub columns: Vec<ColumnRow>,
    pub exported_keys: HashMap<String, Vec<ExportedKeyRow>>,
    pub index_info: HashMap<String, Vec<IndexInfoRow>>,
    pub primary_keys: HashMap<String, Vec<PrimaryKeyRow>>,
    pub sequence_support: bool,
    pub sequence_names: Vec<String>,
    pub deferrable_support: bool,
    pub system_prefix: Option<String>,
    pub bookkeeping: Vec<String>,
    pub fail_on: Option<&'static str>,
    pub calls: RefCell<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: &str) -> Self {
        self.objects.push(object(ObjectKind::Table, name));
        self
    }

    pub fn view(mut self, name: &str, definition: &str) -> Self {
        self.objects.push(object(ObjectKind::View, name));
        self.view_definitions
            .insert(name.to_string(), definition.to_string());
        self
    }

    pub fn object_of_kind(mut self, kind: &str, name: &str) -> Self {
        self.objects
            .push(object(ObjectKind::from_table_type(kind), name));
        self
    }

    pub fn column(mut self, table: &str, column: &str) -> Self {
        self.columns.push(column_row(table, column, None, 1));
        self
    }

    pub fn column_with_default(mut self, table: &str, column: &str, raw_default: &str) -> Self {
        self.columns
            .push(column_row(table, column, Some(raw_default), 0));
        self
    }

    pub fn column_row(mut self, row: ColumnRow) -> Self {
        self.columns.push(row);
        self
    }

    /// Registers `fk_table.fk_column -> pk_table.pk_column` as an exported key of `pk_table`.
    pub fn foreign_key(
        mut self,
        name: &str,
        fk_table: &str,
        fk_column: &str,
        pk_table: &str,
        pk_column: &str,
        deferrability_code: i16,
    ) -> Self {
        self.exported_keys
            .entry(pk_table.to_string())
            .or_default()
            .push(ExportedKeyRow {
                pk_table: pk_table.to_string(),
                pk_column: pk_column.to_string(),
                fk_table: fk_table.to_string(),
                fk_column: fk_column.to_string(),
                constraint_name: Some(name.to_string()),
                deferrability_code,
            });
        self
    }

    /// Attaches an exported key row to `listed_under` regardless of its pk table.
    pub fn exported_key_row(mut self, listed_under: &str, row: ExportedKeyRow) -> Self {
        self.exported_keys
            .entry(listed_under.to_string())
            .or_default()
            .push(row);
        self
    }

    pub fn index(mut self, table: &str, name: &str, column: &str, position: i32) -> Self {
        self.index_info
            .entry(table.to_string())
            .or_default()
            .push(IndexInfoRow {
                index_name: Some(name.to_string()),
                type_code: INDEX_TYPE_OTHER,
                table: table.to_string(),
                column: Some(column.to_string()),
                ordinal_position: position,
            });
        self
    }

    pub fn index_statistics(mut self, table: &str) -> Self {
        self.index_info
            .entry(table.to_string())
            .or_default()
            .push(IndexInfoRow {
                index_name: None,
                type_code: INDEX_TYPE_STATISTIC,
                table: table.to_string(),
                column: None,
                ordinal_position: 0,
            });
        self
    }

    pub fn index_row(mut self, row: IndexInfoRow) -> Self {
        self.index_info
            .entry(row.table.clone())
            .or_default()
            .push(row);
        self
    }

    pub fn primary_key(mut self, table: &str, column: &str, key_sequence: i32, name: &str) -> Self {
        self.primary_keys
            .entry(table.to_string())
            .or_default()
            .push(PrimaryKeyRow {
                table: table.to_string(),
                column: column.to_string(),
                key_sequence,
                constraint_name: Some(name.to_string()),
            });
        self
    }

    pub fn sequences(mut self, supported: bool, names: &[&str]) -> Self {
        self.sequence_support = supported;
        self.sequence_names = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    pub fn deferrable(mut self) -> Self {
        self.deferrable_support = true;
        self
    }

    pub fn system_prefix(mut self, prefix: &str) -> Self {
        self.system_prefix = Some(prefix.to_string());
        self
    }

    pub fn bookkeeping(mut self, name: &str) -> Self {
        self.bookkeeping.push(name.to_string());
        self
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn was_called(&self, operation: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == operation)
    }

    fn record(&self, operation: &'static str) -> ProviderResult<()> {
        self.calls.borrow_mut().push(operation.to_string());
        if self.fail_on == Some(operation) {
            return Err(ProviderError::new(operation, "connection reset by peer"));
        }
        Ok(())
    }
}

fn object(kind: ObjectKind, name: &str) -> TableRow {
    TableRow {
        kind,
        name: name.to_string(),
        schema: Some("APP".to_string()),
        catalog: None,
    }
}

pub fn column_row(
    table: &str,
    column: &str,
    raw_default: Option<&str>,
    nullable_code: i32,
) -> ColumnRow {
    ColumnRow {
        table: table.to_string(),
        schema: Some("APP".to_string()),
        catalog: None,
        column: column.to_string(),
        data_type: 4,
        size: 10,
        decimal_digits: 0,
        type_name: "INTEGER".to_string(),
        raw_default: raw_default.map(str::to_string),
        nullable_code,
    }
}

impl MetadataProvider for MockProvider {
    fn database_label(&self) -> String {
        "mock://app".to_string()
    }

    fn list_tables_and_views(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
    ) -> ProviderResult<Vec<TableRow>> {
        self.record("list_tables_and_views")?;
        Ok(self.objects.clone())
    }

    fn view_definition(&self, name: &str) -> ProviderResult<Option<String>> {
        self.record("view_definition")?;
        Ok(self.view_definitions.get(name).cloned())
    }

    fn list_columns(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
    ) -> ProviderResult<Vec<ColumnRow>> {
        self.record("list_columns")?;
        Ok(self.columns.clone())
    }

    fn list_exported_foreign_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> ProviderResult<Vec<ExportedKeyRow>> {
        self.record("list_exported_foreign_keys")?;
        Ok(self.exported_keys.get(table).cloned().unwrap_or_default())
    }

    fn list_index_info(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> ProviderResult<Vec<IndexInfoRow>> {
        self.record("list_index_info")?;
        Ok(self.index_info.get(table).cloned().unwrap_or_default())
    }

    fn list_primary_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> ProviderResult<Vec<PrimaryKeyRow>> {
        self.record("list_primary_keys")?;
        Ok(self.primary_keys.get(table).cloned().unwrap_or_default())
    }

    fn supports_sequences(&self) -> bool {
        self.sequence_support
    }

    fn list_sequence_names(&self) -> ProviderResult<Vec<String>> {
        self.record("list_sequence_names")?;
        Ok(self.sequence_names.clone())
    }

    fn supports_deferrable_constraints(&self) -> bool {
        self.deferrable_support
    }

    fn is_system_object(&self, _catalog: Option<&str>, _schema: Option<&str>, name: &str) -> bool {
        self.system_prefix
            .as_deref()
            .is_some_and(|prefix| name.starts_with(prefix))
    }

    fn is_bookkeeping_object(&self, name: &str) -> bool {
        self.bookkeeping.iter().any(|b| b.eq_ignore_ascii_case(name))
    }
}
