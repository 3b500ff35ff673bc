//! Loader and writer for the fixed stellar-collapse HDF5 layout.
//!
//! Grid sizes are stored as 1-element integer datasets, axes as 1-D f64
//! datasets, and every quantity as a 3-D f64 dataset with on-disk shape
//! `(n_ye, n_temperature, n_rho)` -- slowest to fastest, which matches
//! the in-memory flattening with density fastest.

use crate::{IoResult, TableIoError};
use eos_core::{Grid, Quantity, Table};
use hdf5::File;
use std::path::Path;
use tracing::debug;

/// Read a full table. Fails on the first missing dataset or any
/// dimension inconsistency; a table is never partially loaded.
pub fn read_table(path: &Path) -> IoResult<Table> {
    let file = File::open(path).map_err(|source| TableIoError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let n_rho = read_scalar_i32(&file, "pointsrho")? as usize;
    let n_temperature = read_scalar_i32(&file, "pointstemp")? as usize;
    let n_ye = read_scalar_i32(&file, "pointsye")? as usize;
    let grid = Grid::new(n_rho, n_temperature, n_ye);

    let mut table = Table::zeroed(grid);
    table.energy_shift = read_scalar_f64(&file, "energy_shift")?;
    table.log10_rho = read_f64_array(&file, "logrho")?;
    table.log10_temperature = read_f64_array(&file, "logtemp")?;
    table.ye = read_f64_array(&file, "ye")?;

    for quantity in Quantity::ALL {
        let values = read_f64_array(&file, quantity.name())?;
        table.set_field(quantity, values)?;
    }
    table.check_dimensions()?;

    debug!(path = %path.display(), ?grid, "read table");
    Ok(table)
}

/// Persist a full table, truncating any existing file at `path`.
pub fn write_table(path: &Path, table: &Table) -> IoResult<()> {
    table.check_dimensions()?;
    let file = File::create(path).map_err(|source| TableIoError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let grid = table.grid();
    write_scalar_i32(&file, "pointsrho", grid.n_rho as i32)?;
    write_scalar_i32(&file, "pointstemp", grid.n_temperature as i32)?;
    write_scalar_i32(&file, "pointsye", grid.n_ye as i32)?;
    write_f64_dataset(&file, "energy_shift", &[1], &[table.energy_shift])?;

    write_f64_dataset(&file, "logrho", &[grid.n_rho], &table.log10_rho)?;
    write_f64_dataset(&file, "logtemp", &[grid.n_temperature], &table.log10_temperature)?;
    write_f64_dataset(&file, "ye", &[grid.n_ye], &table.ye)?;

    let shape = [grid.n_ye, grid.n_temperature, grid.n_rho];
    for quantity in Quantity::ALL {
        write_f64_dataset(&file, quantity.name(), &shape, table.field(quantity))?;
    }

    debug!(path = %path.display(), ?grid, "wrote table");
    Ok(())
}

fn open_dataset(file: &File, name: &str) -> IoResult<hdf5::Dataset> {
    file.dataset(name).map_err(|source| TableIoError::MissingDataset {
        name: name.to_string(),
        source,
    })
}

fn read_f64_array(file: &File, name: &str) -> IoResult<Vec<f64>> {
    let dataset = open_dataset(file, name)?;
    let values = dataset
        .read_raw::<f64>()
        .map_err(|source| TableIoError::Read {
            name: name.to_string(),
            source,
        })?;
    debug!(name, len = values.len(), "read dataset");
    Ok(values)
}

fn read_scalar_i32(file: &File, name: &str) -> IoResult<i32> {
    let dataset = open_dataset(file, name)?;
    let values = dataset
        .read_raw::<i32>()
        .map_err(|source| TableIoError::Read {
            name: name.to_string(),
            source,
        })?;
    one_element(name, &values)
}

fn read_scalar_f64(file: &File, name: &str) -> IoResult<f64> {
    let values = read_f64_array(file, name)?;
    one_element(name, &values)
}

fn one_element<T: Copy>(name: &str, values: &[T]) -> IoResult<T> {
    match values {
        [v] => Ok(*v),
        _ => Err(TableIoError::BadScalar {
            name: name.to_string(),
            len: values.len(),
        }),
    }
}

fn write_scalar_i32(file: &File, name: &str, value: i32) -> IoResult<()> {
    let dataset = file
        .new_dataset::<i32>()
        .shape([1])
        .create(name)
        .map_err(|source| TableIoError::Write {
            name: name.to_string(),
            source,
        })?;
    dataset.write_raw(&[value]).map_err(|source| TableIoError::Write {
        name: name.to_string(),
        source,
    })
}

fn write_f64_dataset(file: &File, name: &str, shape: &[usize], values: &[f64]) -> IoResult<()> {
    let dataset = file
        .new_dataset::<f64>()
        .shape(shape)
        .create(name)
        .map_err(|source| TableIoError::Write {
            name: name.to_string(),
            source,
        })?;
    dataset.write_raw(values).map_err(|source| TableIoError::Write {
        name: name.to_string(),
        source,
    })
}
