// src/write.rs

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Int32Array, StringArray},
    csv::WriterBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::config::OutputFormat;
use crate::table::{pipeline::SEASON_END_YEAR_COLUMN, NormalizedTable, Season};

/// Persists tables under `<out_dir>/<end_year>/<stem>.<ext>`.
#[derive(Debug, Clone)]
pub struct TableWriter {
    out_dir: PathBuf,
    format: OutputFormat,
}

impl TableWriter {
    pub fn new(out_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            out_dir: out_dir.into(),
            format,
        }
    }

    pub fn season_dir(&self, season: Season) -> PathBuf {
        self.out_dir.join(season.end_year.to_string())
    }

    pub fn path_for(&self, season: Season, stem: &str) -> PathBuf {
        self.season_dir(season)
            .join(format!("{}.{}", stem, self.format.extension()))
    }

    pub fn write(&self, table: &NormalizedTable, season: Season, stem: &str) -> Result<PathBuf> {
        let dir = self.season_dir(season);
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        let path = self.path_for(season, stem);
        let batch = to_record_batch(table)?;
        match self.format {
            OutputFormat::Csv => write_csv(&batch, &path),
            OutputFormat::Parquet => write_parquet(&batch, &path),
        }
        .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// All columns Utf8, except `season_end_year` which is Int32 when every
/// value parses.
pub fn to_record_batch(table: &NormalizedTable) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.columns().len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns().len());

    for name in table.columns() {
        let values = table.column_values(name);
        let years: Option<Vec<i32>> = if name == SEASON_END_YEAR_COLUMN {
            values.iter().map(|v| v.parse::<i32>().ok()).collect()
        } else {
            None
        };
        match years {
            Some(years) => {
                fields.push(Field::new(name, DataType::Int32, false));
                arrays.push(Arc::new(Int32Array::from(years)));
            }
            None => {
                fields.push(Field::new(name, DataType::Utf8, false));
                arrays.push(Arc::new(StringArray::from(values)));
            }
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building record batch")
}

fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    writer.write(batch)?;
    Ok(())
}

fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}
