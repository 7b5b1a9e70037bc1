//! Schema model for the five e-commerce tables.
//!
//! The same definitions drive the CSV header rows and the DDL the store
//! executes, so the file contract and the table layout cannot drift apart.

use std::collections::HashSet;

/// Column types used by the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SqlType {
    Integer,
    Text,
    /// Double-precision float (money columns are stored rounded to cents)
    Double,
    Date,
}

impl SqlType {
    /// Returns the DuckDB type string
    pub fn to_duckdb(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "VARCHAR",
            SqlType::Double => "DOUBLE",
            SqlType::Date => "DATE",
        }
    }
}

/// Target of a foreign key column
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub to_table: String,
    pub to_column: String,
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    pub not_null: bool,
    pub primary_key: bool,
    pub default: Option<String>,
    pub check: Option<String>,
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            not_null: false,
            primary_key: false,
            default: None,
            check: None,
            foreign_key: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attach a CHECK constraint; the expression refers to the column by name
    pub fn check(mut self, expr: impl Into<String>) -> Self {
        self.check = Some(expr.into());
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            to_table: table.into(),
            to_column: column.into(),
        });
        self
    }

    fn to_duckdb(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type.to_duckdb());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(ref default) = self.default {
            sql.push_str(&format!(" DEFAULT {}", default));
        }
        if let Some(ref check) = self.check {
            sql.push_str(&format!(" CHECK ({})", check));
        }
        sql
    }
}

/// One table plus the CSV file it is exchanged through
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub file_name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let name = name.into();
        Self {
            file_name: format!("{}.csv", name),
            name,
            columns,
        }
    }

    pub fn primary_key_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }

    /// (column, target) for every column carrying a foreign key
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&str, &ForeignKey)> {
        self.columns
            .iter()
            .flat_map(|c| c.foreign_key.as_ref().map(|fk| (c.name.as_str(), fk)))
    }

    /// Names of the tables this one references, self-references excluded
    fn parents(&self) -> impl Iterator<Item = &str> {
        self.foreign_keys()
            .map(|(_, fk)| fk.to_table.as_str())
            .filter(move |parent| *parent != self.name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// DuckDB `CREATE TABLE` with column and foreign key constraints
    pub fn create_table_sql(&self) -> String {
        let definitions: Vec<String> = self
            .columns
            .iter()
            .map(Column::to_duckdb)
            .chain(self.foreign_keys().map(|(column, fk)| {
                format!(
                    "FOREIGN KEY ({}) REFERENCES {}({})",
                    column, fk.to_table, fk.to_column
                )
            }))
            .collect();
        format!(
            "CREATE TABLE {} (\n    {}\n)",
            self.name,
            definitions.join(",\n    ")
        )
    }

    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }
}

/// Ordered set of tables
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn find(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Parents before children. Ties keep declaration order; tables caught in
    /// a cycle are appended in declaration order.
    pub fn tables_in_order(&self) -> Vec<&Table> {
        let mut placed: HashSet<&str> = HashSet::with_capacity(self.tables.len());
        let mut ordered = Vec::with_capacity(self.tables.len());

        while ordered.len() < self.tables.len() {
            let ready = self.tables.iter().find(|t| {
                !placed.contains(t.name.as_str())
                    && t.parents()
                        .all(|p| placed.contains(p) || self.find(p).is_none())
            });
            let next = match ready {
                Some(table) => table,
                None => match self
                    .tables
                    .iter()
                    .find(|t| !placed.contains(t.name.as_str()))
                {
                    Some(table) => table,
                    None => break,
                },
            };
            placed.insert(next.name.as_str());
            ordered.push(next);
        }

        ordered
    }

    /// The e-commerce schema: customers, products, orders, order_items, reviews
    pub fn ecommerce() -> Self {
        use SqlType::{Date, Double, Integer, Text};

        Schema::new(vec![
            Table::new(
                "customers",
                vec![
                    Column::new("customer_id", Integer).primary_key(),
                    Column::new("name", Text).not_null(),
                    Column::new("email", Text).not_null(),
                    Column::new("location", Text),
                    Column::new("join_date", Date),
                ],
            ),
            Table::new(
                "products",
                vec![
                    Column::new("product_id", Integer).primary_key(),
                    Column::new("product_name", Text).not_null(),
                    Column::new("category", Text),
                    Column::new("price", Double).not_null(),
                    Column::new("stock_quantity", Integer).default("0"),
                ],
            ),
            Table::new(
                "orders",
                vec![
                    Column::new("order_id", Integer).primary_key(),
                    Column::new("customer_id", Integer)
                        .not_null()
                        .references("customers", "customer_id"),
                    Column::new("order_date", Date),
                    Column::new("total_amount", Double).not_null(),
                    Column::new("status", Text),
                ],
            ),
            Table::new(
                "order_items",
                vec![
                    Column::new("order_item_id", Integer).primary_key(),
                    Column::new("order_id", Integer)
                        .not_null()
                        .references("orders", "order_id"),
                    Column::new("product_id", Integer)
                        .not_null()
                        .references("products", "product_id"),
                    Column::new("quantity", Integer).not_null(),
                    Column::new("price", Double).not_null(),
                ],
            ),
            Table::new(
                "reviews",
                vec![
                    Column::new("review_id", Integer).primary_key(),
                    Column::new("product_id", Integer)
                        .not_null()
                        .references("products", "product_id"),
                    Column::new("customer_id", Integer)
                        .not_null()
                        .references("customers", "customer_id"),
                    Column::new("rating", Integer)
                        .not_null()
                        .check("rating >= 1 AND rating <= 5"),
                    Column::new("comment", Text),
                    Column::new("review_date", Date),
                ],
            ),
        ])
    }
}
