use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use crate::error::LoadError;
use crate::record::SurveyRecord;

/// Loads a dataset, picking the parser from the file extension.
pub fn read_dataset(path: &Path) -> Result<Vec<SurveyRecord>, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = match extension.as_str() {
        "json" => read_json(BufReader::new(file))?,
        "csv" => read_csv(file)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    info!(
        "event=dataset_loaded module=reader status=ok path={} records={}",
        path.display(),
        records.len()
    );
    Ok(records)
}

/// A JSON array of survey objects.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<SurveyRecord>, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// A CSV file whose header row uses the same column names as the JSON form.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<SurveyRecord>, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::<SurveyRecord>::new();
    for result in rdr.deserialize() {
        let record: SurveyRecord = result?;
        records.push(record);
    }
    Ok(records)
}

/// Writes rows back out as CSV with the dataset's column names.
pub fn write_csv<'a, W, I>(writer: W, records: I) -> Result<(), LoadError>
where
    W: std::io::Write,
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
