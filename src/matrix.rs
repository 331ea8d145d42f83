//! A dense, square, row-major matrix of `f64`.

use std::io::Write;

use csv::WriterBuilder;

use crate::error::TrachomaError;

#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl DenseMatrix {
    /// A `dim` × `dim` matrix of zeros.
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        DenseMatrix {
            dim,
            values: vec![0.0; dim * dim],
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// # Panics
    ///
    /// Panics if `row` or `column` is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[self.offset(row, column)]
    }

    /// # Panics
    ///
    /// Panics if `row` or `column` is out of bounds.
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        let offset = self.offset(row, column);
        self.values[offset] = value;
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.dim;
        &self.values[start..start + self.dim]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // `chunks` panics on a zero chunk size.
        self.values.chunks(self.dim.max(1))
    }

    /// Writes one CSV line per row, without a header.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TrachomaError> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
        for row in self.rows() {
            writer.write_record(row.iter().map(f64::to_string))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn offset(&self, row: usize, column: usize) -> usize {
        assert!(
            row < self.dim && column < self.dim,
            "index ({row}, {column}) out of bounds for {0}x{0} matrix",
            self.dim
        );
        row * self.dim + column
    }
}
