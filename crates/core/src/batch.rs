//! Typed accumulator for the rows accepted during one import run.

/// Ordered collection of accepted rows plus a count of discarded ones.
///
/// Holds no validation logic. Rows keep insertion order; the accumulator is
/// consumed with [`RowAccumulator::into_rows`] when the batch is handed to
/// the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct RowAccumulator<R> {
    rows: Vec<R>,
    discarded: usize,
}

impl<R> Default for RowAccumulator<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            discarded: 0,
        }
    }
}

impl<R> RowAccumulator<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, row: R) {
        self.rows.push(row);
    }

    pub fn increment_discarded(&mut self) {
        self.discarded += 1;
    }

    /// Accepted rows in insertion order.
    pub fn accepted_rows(&self) -> &[R] {
        &self.rows
    }

    pub fn accepted_count(&self) -> usize {
        self.rows.len()
    }

    pub fn discarded_count(&self) -> usize {
        self.discarded
    }

    /// Accepted plus discarded: every data record seen so far.
    pub fn total_count(&self) -> usize {
        self.rows.len() + self.discarded
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}
