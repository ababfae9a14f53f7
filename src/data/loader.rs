use std::fs::File;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use csv::StringRecord;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::LoadError;
use super::model::{Dataset, HousingRecord, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a housing dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least the [`REQUIRED_COLUMNS`]
/// * `.parquet` – the same columns as flat numeric / string columns
///
/// The whole file is read before anything is returned; there is no partial result.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset =
        Dataset::from_records(records).ok_or_else(|| LoadError::Empty(path.to_path_buf()))?;
    log::info!(
        "Loaded {} housing records from {} ({} region types)",
        dataset.len(),
        path.display(),
        dataset.regions.len()
    );
    Ok(dataset)
}

/// Names from [`REQUIRED_COLUMNS`] absent from `present`.
fn missing_columns(present: &[&str]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.contains(*col))
        .map(|col| col.to_string())
        .collect()
}

/// Reject values no downstream consumer can place on a map or histogram.
fn validate(record: HousingRecord, row: usize) -> Result<HousingRecord, LoadError> {
    let numeric = [
        ("longitude", record.longitude),
        ("latitude", record.latitude),
        ("median_income", record.median_income),
        ("median_house_value", record.median_house_value),
    ];
    if let Some((col, value)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
        return Err(LoadError::InvalidRow {
            row,
            message: format!("'{col}' is not a finite number ({value})"),
        });
    }
    if record.ocean_proximity.is_empty() {
        return Err(LoadError::InvalidRow {
            row,
            message: "'ocean_proximity' is empty".to_string(),
        });
    }
    Ok(record)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: UTF-8, header row, one census block group per line.
/// Columns beyond [`REQUIRED_COLUMNS`] (e.g. `total_bedrooms`) are ignored,
/// including any empty cells they contain.
fn load_csv(path: &Path) -> Result<Vec<HousingRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers: StringRecord = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();

    let missing = missing_columns(&headers.iter().collect::<Vec<_>>());
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }
    reader.set_headers(headers);

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<HousingRecord>().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| LoadError::InvalidRow {
            row,
            message: e.to_string(),
        })?;
        records.push(validate(record, row)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the housing columns stored flat.
///
/// Numeric columns may be Float64, Float32, Int64 or Int32 (Pandas writes whole
/// dollar values as integers); `ocean_proximity` must be Utf8 or LargeUtf8.
fn load_parquet(path: &Path) -> Result<Vec<HousingRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let pq_err = |source: parquet::errors::ParquetError| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(pq_err)?;
    let schema = builder.schema().clone();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let missing = missing_columns(&names);
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }
    let reader = builder.build().map_err(pq_err)?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let column = |name: &str| -> Result<ArrayRef, LoadError> {
            let idx = batch.schema().index_of(name)?;
            Ok(batch.column(idx).clone())
        };
        let lon = column("longitude")?;
        let lat = column("latitude")?;
        let income = column("median_income")?;
        let value = column("median_house_value")?;
        let region = column("ocean_proximity")?;

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;
            let num = |col: &ArrayRef, name: &str| {
                numeric_at(col, i).ok_or_else(|| LoadError::InvalidRow {
                    row,
                    message: format!("'{name}' is null or of type {:?}", col.data_type()),
                })
            };
            let record = HousingRecord {
                longitude: num(&lon, "longitude")?,
                latitude: num(&lat, "latitude")?,
                median_income: num(&income, "median_income")?,
                median_house_value: num(&value, "median_house_value")?,
                ocean_proximity: string_at(&region, i).ok_or_else(|| LoadError::InvalidRow {
                    row,
                    message: format!(
                        "'ocean_proximity' is null or of type {:?}",
                        region.data_type()
                    ),
                })?,
            };
            records.push(validate(record, row)?);
        }
    }
    Ok(records)
}

// -- Arrow helpers --

fn numeric_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        _ => None,
    }
}

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    const HEADER: &str = "longitude,latitude,housing_median_age,total_rooms,total_bedrooms,\
population,households,median_income,median_house_value,ocean_proximity\n";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn loads_full_schema_and_ignores_extra_columns() {
        let file = create_temp_csv(&format!(
            "{HEADER}\
-122.23,37.88,41,880,129,322,126,8.3252,452600,NEAR BAY\n\
-121.97,37.64,32,1283,,1015,352,3.5,300000,<1H OCEAN\n\
-119.01,36.06,25,1505,,1392,359,1.6812,47700,INLAND\n"
        ));

        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].median_income, 8.3252);
        assert_eq!(ds.records[1].ocean_proximity, "<1H OCEAN");
        assert_eq!(ds.price_bounds.min, 47_700.0);
        assert_eq!(ds.price_bounds.max, 452_600.0);
        assert_eq!(ds.regions.len(), 3);
    }

    #[test]
    fn tolerates_byte_order_mark() {
        let file = create_temp_csv(
            "\u{feff}longitude,latitude,median_income,median_house_value,ocean_proximity\n\
-122.0,37.0,2.0,100000,ISLAND\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].ocean_proximity, "ISLAND");
    }

    #[test]
    fn reports_every_missing_column() {
        let file = create_temp_csv("longitude,latitude,median_income\n-122.0,37.0,2.0\n");
        match load_file(file.path()) {
            Err(LoadError::MissingColumns { columns, .. }) => {
                assert_eq!(columns, vec!["median_house_value", "ocean_proximity"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn malformed_number_fails_whole_load() {
        let file = create_temp_csv(&format!(
            "{HEADER}\
-122.23,37.88,41,880,129,322,126,8.3252,452600,NEAR BAY\n\
-122.23,37.88,41,880,129,322,126,abc,452600,NEAR BAY\n"
        ));
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::InvalidRow { row: 2, .. })
        ));
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let file = create_temp_csv(
            "longitude,latitude,median_income,median_house_value,ocean_proximity\n\
-122.0,37.0,NaN,100000,INLAND\n",
        );
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::InvalidRow { row: 1, .. })
        ));
    }

    #[test]
    fn empty_region_is_rejected() {
        let file = create_temp_csv(
            "longitude,latitude,median_income,median_house_value,ocean_proximity\n\
-122.0,37.0,2.0,100000,\n",
        );
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::InvalidRow { row: 1, .. })
        ));
    }

    #[test]
    fn header_only_file_is_empty() {
        let file = create_temp_csv(HEADER);
        assert!(matches!(load_file(file.path()), Err(LoadError::Empty(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(Path::new("/definitely/not/here/housing.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("housing.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "xlsx"));
    }

    #[test]
    fn loads_parquet_with_integer_values() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("longitude", DataType::Float64, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("median_income", DataType::Float32, false),
            Field::new("median_house_value", DataType::Int64, false),
            Field::new("ocean_proximity", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![-122.2, -118.3])),
                Arc::new(Float64Array::from(vec![37.9, 34.1])),
                Arc::new(Float32Array::from(vec![2.5_f32, 6.0])),
                Arc::new(Int64Array::from(vec![150_000, 500_001])),
                Arc::new(StringArray::from(vec!["NEAR BAY", "<1H OCEAN"])),
            ],
        )
        .unwrap();

        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].median_income, 2.5);
        assert_eq!(ds.records[1].median_house_value, 500_001.0);
        assert_eq!(ds.records[1].ocean_proximity, "<1H OCEAN");
    }

    #[test]
    fn parquet_missing_column_is_reported() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("longitude", DataType::Float64, false),
            Field::new("latitude", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![-122.2])),
                Arc::new(Float64Array::from(vec![37.9])),
            ],
        )
        .unwrap();
        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        match load_file(file.path()) {
            Err(LoadError::MissingColumns { columns, .. }) => assert_eq!(columns.len(), 3),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}
