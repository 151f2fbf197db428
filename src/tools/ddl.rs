//! DDL reconstruction from catalog rows.
//!
//! Output is a fenced `sql` block with one `CREATE TABLE` statement per table.
//! Tables come out sorted by name and columns in catalog order, so identical
//! input always renders to identical text.

use crate::models::{ColumnDescriptor, SchemaDocument, TableSchema};

const INDENT: &str = "    ";

/// Render catalog rows as DDL text.
pub fn render_schema(columns: &[ColumnDescriptor]) -> String {
    render_document(&SchemaDocument::from_columns(columns.iter().cloned()))
}

pub fn render_document(document: &SchemaDocument) -> String {
    let blocks: Vec<String> = document.tables.iter().map(render_table).collect();
    format!("```sql\n{}\n```", blocks.join("\n\n"))
}

fn render_table(table: &TableSchema) -> String {
    let lines: Vec<String> = table.columns.iter().map(render_column).collect();
    format!(
        "CREATE TABLE {} (\n{}\n);",
        quote_identifier(&table.table_name),
        lines.join(",\n")
    )
}

fn render_column(column: &ColumnDescriptor) -> String {
    let mut line = format!(
        "{INDENT}{} {}",
        quote_identifier(&column.column_name),
        column.data_type
    );
    if !column.is_nullable {
        line.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default_value {
        line.push_str(" DEFAULT ");
        line.push_str(default);
    }
    line
}

/// Backtick-quote an identifier, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
