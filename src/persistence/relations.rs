//! CSV readers and writers for the input and output relations

use super::{PersistenceError, PersistenceResult};
use crate::graph::{Connection, Employee, EmployeeId, ManagerAssignment, Prediction};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Columns the employee relation must carry; `location` and `name` are optional
pub const EMPLOYEE_COLUMNS: &[&str] = &["employee_id", "job_title_current", "profile_summary"];
pub const CONNECTION_COLUMNS: &[&str] = &["employee_id_a", "employee_id_b"];
pub const PREDICTION_COLUMNS: &[&str] = &["employee_id", "manager_id"];

const EMPLOYEES: &str = "employees";
const CONNECTIONS: &str = "connections";
const PREDICTIONS: &str = "predictions";

/// Prediction row as stored; a blank manager cell reads as unresolved
#[derive(Deserialize)]
struct PredictionRecord {
    employee_id: EmployeeId,
    manager_id: Option<i64>,
}

impl From<PredictionRecord> for Prediction {
    fn from(record: PredictionRecord) -> Self {
        let manager = record
            .manager_id
            .map_or(ManagerAssignment::Unresolved, ManagerAssignment::from_i64);
        Prediction::new(record.employee_id, manager)
    }
}

fn open(path: &Path) -> PersistenceResult<File> {
    File::open(path).map_err(|source| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn read_relation<R, T>(reader: R, relation: &'static str, required: &[&str]) -> PersistenceResult<Vec<T>>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|source| PersistenceError::Csv { relation, source })?;
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PersistenceError::MissingColumns {
            relation,
            columns: missing,
        });
    }

    reader
        .deserialize()
        .map(|row| row.map_err(|source| PersistenceError::Csv { relation, source }))
        .collect()
}

pub fn read_employees<R: Read>(reader: R) -> PersistenceResult<Vec<Employee>> {
    read_relation(reader, EMPLOYEES, EMPLOYEE_COLUMNS)
}

pub fn read_connections<R: Read>(reader: R) -> PersistenceResult<Vec<Connection>> {
    read_relation(reader, CONNECTIONS, CONNECTION_COLUMNS)
}

pub fn read_predictions<R: Read>(reader: R) -> PersistenceResult<Vec<Prediction>> {
    let records: Vec<PredictionRecord> = read_relation(reader, PREDICTIONS, PREDICTION_COLUMNS)?;
    Ok(records.into_iter().map(Prediction::from).collect())
}

/// Load the employee relation from a CSV file
pub fn load_employees(path: impl AsRef<Path>) -> PersistenceResult<Vec<Employee>> {
    let path = path.as_ref();
    let employees = read_employees(open(path)?)?;
    info!(path = %path.display(), rows = employees.len(), "loaded employees");
    Ok(employees)
}

/// Load the connection relation from a CSV file
pub fn load_connections(path: impl AsRef<Path>) -> PersistenceResult<Vec<Connection>> {
    let path = path.as_ref();
    let connections = read_connections(open(path)?)?;
    info!(path = %path.display(), rows = connections.len(), "loaded connections");
    Ok(connections)
}

/// Load a prediction (or ground-truth) relation from a CSV file
pub fn load_predictions(path: impl AsRef<Path>) -> PersistenceResult<Vec<Prediction>> {
    let path = path.as_ref();
    let predictions = read_predictions(open(path)?)?;
    info!(path = %path.display(), rows = predictions.len(), "loaded predictions");
    Ok(predictions)
}

/// Write predictions as CSV with an `employee_id,manager_id` header
pub fn write_predictions_to<W: Write>(writer: W, predictions: &[Prediction]) -> PersistenceResult<()> {
    let csv_error = |source: csv::Error| PersistenceError::Csv {
        relation: PREDICTIONS,
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // written explicitly so an empty relation still has its header
    writer.write_record(PREDICTION_COLUMNS).map_err(csv_error)?;
    for prediction in predictions {
        writer.serialize(prediction).map_err(csv_error)?;
    }
    writer
        .flush()
        .map_err(|e| csv_error(csv::Error::from(e)))
}

/// Write predictions to a CSV file, replacing it
pub fn write_predictions(path: impl AsRef<Path>, predictions: &[Prediction]) -> PersistenceResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write_predictions_to(file, predictions)?;
    info!(path = %path.display(), rows = predictions.len(), "wrote predictions");
    Ok(())
}
