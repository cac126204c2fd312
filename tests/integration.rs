// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for the Druid metadata extractor.

use arrow_array::{Int64Array, RecordBatch, RecordBatchIterator, RecordBatchReader, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use async_trait::async_trait;
use druid_metadata::client::JsonRow;
use druid_metadata::{
    ArrowRowSource, Config, DruidClient, DruidMetadataExtractor, DruidSqlRowSource, ErrorKind,
    Extractor, TableMetadata,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Druid client returning canned rows and recording the statements it ran.
#[derive(Debug, Default)]
struct CannedDruid {
    rows: Vec<JsonRow>,
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl DruidClient for CannedDruid {
    async fn execute_sql(&self, sql: &str) -> druid_metadata::Result<Vec<JsonRow>> {
        self.queries.lock().unwrap().push(sql.to_string());
        Ok(self.rows.clone())
    }
}

fn json_row(schema: &str, table: &str, col: &str, ty: &str, pos: i64) -> JsonRow {
    json!({
        "schema": schema,
        "name": table,
        "col_name": col,
        "col_type": ty,
        "col_sort_order": pos,
    })
    .as_object()
    .unwrap()
    .clone()
}

fn drain<S: druid_metadata::RowSource>(
    extractor: &mut DruidMetadataExtractor<S>,
) -> Vec<TableMetadata> {
    let mut tables = Vec::new();
    while let Some(table) = extractor.extract().expect("extraction failed") {
        tables.push(table);
    }
    tables
}

#[test]
fn test_druid_sql_flow_with_root_config() {
    let druid = Arc::new(CannedDruid {
        rows: vec![
            json_row("druid", "wikipedia", "__time", "TIMESTAMP", 1),
            json_row("druid", "wikipedia", "channel", "VARCHAR", 2),
            json_row("druid", "wikipedia", "added", "BIGINT", 3),
            json_row("druid", "koalas", "__time", "TIMESTAMP", 1),
            json_row("lookup", "countries", "k", "VARCHAR", 1),
            json_row("lookup", "countries", "v", "VARCHAR", 2),
        ],
        ..Default::default()
    });

    let root = Config::from_pairs([
        ("extractor.druid_metadata.cluster", "prod"),
        (
            "extractor.druid_metadata.where_clause_suffix",
            "WHERE TABLE_SCHEMA <> 'sys'",
        ),
    ]);

    let mut extractor =
        DruidMetadataExtractor::with_row_source(DruidSqlRowSource::with_client(druid.clone()));
    extractor.init(&root.scoped(extractor.scope())).unwrap();
    assert!(druid.queries.lock().unwrap().is_empty());

    let tables = drain(&mut extractor);
    let keys: Vec<String> = tables.iter().map(TableMetadata::key).collect();
    assert_eq!(
        keys,
        vec![
            "druid://prod.druid/wikipedia",
            "druid://prod.druid/koalas",
            "druid://prod.lookup/countries",
        ]
    );
    let wiki_columns: Vec<&str> = tables[0].columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(wiki_columns, vec!["__time", "channel", "added"]);

    let queries = druid.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("FROM INFORMATION_SCHEMA.COLUMNS\nWHERE TABLE_SCHEMA <> 'sys'\norder by"));
}

#[test]
fn test_druid_sql_missing_broker_url_fails_at_init() {
    let mut extractor = DruidMetadataExtractor::new();
    let err = extractor.init(&Config::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("broker_url"));

    let adbc = err.to_adbc();
    assert_eq!(adbc.status, adbc_core::error::Status::InvalidArguments);
}

#[test]
fn test_malformed_row_is_fatal() {
    let mut bad = json_row("druid", "wikipedia", "channel", "VARCHAR", 2);
    bad.remove("col_type");
    let druid = Arc::new(CannedDruid {
        rows: vec![json_row("druid", "wikipedia", "__time", "TIMESTAMP", 1), bad],
        ..Default::default()
    });

    let mut extractor =
        DruidMetadataExtractor::with_row_source(DruidSqlRowSource::with_client(druid));
    extractor.init(&Config::new()).unwrap();

    let err = extractor.extract().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(extractor.extract().unwrap().is_none());
}

fn metadata_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("schema", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("col_name", DataType::Utf8, false),
        Field::new("col_type", DataType::Utf8, false),
        Field::new("col_sort_order", DataType::Int64, false),
    ]))
}

#[test]
fn test_arrow_flow() {
    let batch = RecordBatch::try_new(
        metadata_schema(),
        vec![
            Arc::new(StringArray::from(vec!["s1", "s1", "s1"])),
            Arc::new(StringArray::from(vec!["t1", "t1", "t2"])),
            Arc::new(StringArray::from(vec!["a", "b", "c"])),
            Arc::new(StringArray::from(vec!["STRING", "LONG", "STRING"])),
            Arc::new(Int64Array::from(vec![1, 2, 1])),
        ],
    )
    .unwrap();

    let executed = Arc::new(Mutex::new(None));
    let record = executed.clone();
    let source = ArrowRowSource::new(move |sql| {
        *record.lock().unwrap() = Some(sql.to_string());
        let reader: Box<dyn RecordBatchReader + Send> = Box::new(RecordBatchIterator::new(
            vec![Ok(batch.clone())],
            metadata_schema(),
        ));
        Ok(reader)
    });

    let mut extractor = DruidMetadataExtractor::with_row_source(source);
    extractor.init(&Config::new()).unwrap();
    let tables = drain(&mut extractor);

    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].name, "t1");
    assert_eq!(tables[0].cluster, "gold");
    assert_eq!(tables[0].columns[1].col_type, "LONG");
    assert_eq!(tables[1].name, "t2");
    assert!(tables
        .iter()
        .all(|t| t.database == "druid" && t.description.is_empty()));

    let sql = executed.lock().unwrap().clone().unwrap();
    assert_eq!(sql, extractor.sql());
}

#[test]
fn test_tables_serialize_for_ingestion() {
    let druid = Arc::new(CannedDruid {
        rows: vec![json_row("s1", "t1", "a", "STRING", 1)],
        ..Default::default()
    });
    let mut extractor =
        DruidMetadataExtractor::with_row_source(DruidSqlRowSource::with_client(druid));
    extractor.init(&Config::new()).unwrap();

    let tables: Vec<TableMetadata> = extractor
        .tables()
        .collect::<druid_metadata::Result<_>>()
        .unwrap();
    let json = serde_json::to_value(&tables).unwrap();
    assert_eq!(
        json,
        json!([{
            "database": "druid",
            "cluster": "gold",
            "schema": "s1",
            "name": "t1",
            "description": "",
            "columns": [{"name": "a", "description": "", "type": "STRING", "sort_order": 1}]
        }])
    );
}
