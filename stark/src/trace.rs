use quartz_math::fft::errors::FFTError;
use quartz_math::fft::polynomial::FFTPoly;
use quartz_math::field::element::FieldElement;
use quartz_math::field::traits::{IsFFTField, IsField};
use quartz_math::polynomial::Polynomial;

/// A two-dimensional representation of an execution trace: one row per
/// step, one column per register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceTable<F: IsField> {
    data: Vec<FieldElement<F>>,
    n_cols: usize,
}

impl<F: IsField> TraceTable<F> {
    pub fn new(data: Vec<FieldElement<F>>, n_cols: usize) -> Self {
        debug_assert!(n_cols > 0 && data.len() % n_cols == 0);
        Self { data, n_cols }
    }

    pub fn from_columns(columns: Vec<Vec<FieldElement<F>>>) -> Self {
        let n_cols = columns.len();
        let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);
        debug_assert!(columns.iter().all(|c| c.len() == n_rows));
        let mut data = Vec::with_capacity(n_cols * n_rows);
        for row in 0..n_rows {
            for column in columns.iter() {
                data.push(column[row].clone());
            }
        }
        Self { data, n_cols }
    }

    pub fn n_rows(&self) -> usize {
        if self.n_cols == 0 {
            0
        } else {
            self.data.len() / self.n_cols
        }
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn get_row(&self, row_idx: usize) -> &[FieldElement<F>] {
        &self.data[row_idx * self.n_cols..(row_idx + 1) * self.n_cols]
    }

    pub fn get(&self, row_idx: usize, col_idx: usize) -> &FieldElement<F> {
        &self.data[row_idx * self.n_cols + col_idx]
    }

    pub fn columns(&self) -> Vec<Vec<FieldElement<F>>> {
        (0..self.n_cols)
            .map(|col| {
                (0..self.n_rows())
                    .map(|row| self.get(row, col).clone())
                    .collect()
            })
            .collect()
    }
}

impl<F: IsFFTField> TraceTable<F> {
    /// Interpolates each register history over the execution domain.
    pub fn compute_trace_polys(&self) -> Result<Vec<Polynomial<FieldElement<F>>>, FFTError> {
        self.columns()
            .iter()
            .map(|column| Polynomial::interpolate_fft(column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_math::field::fields::u64_prime_field::{F17, FE17};

    #[test]
    fn columns_roundtrip() {
        let col_1 = vec![FE17::from(1), FE17::from(2), FE17::from(5), FE17::from(13)];
        let col_2 = vec![FE17::from(1), FE17::from(3), FE17::from(8), FE17::from(4)];
        let trace = TraceTable::from_columns(vec![col_1.clone(), col_2.clone()]);
        assert_eq!(trace.n_rows(), 4);
        assert_eq!(trace.n_cols(), 2);
        assert_eq!(trace.columns(), vec![col_1, col_2]);
        assert_eq!(trace.get_row(1), &[FE17::from(2), FE17::from(3)]);
    }

    #[test]
    fn trace_polys_interpolate_the_columns() {
        let column: Vec<FE17> = [3u64, 1, 4, 1].iter().map(|x| FE17::from(*x)).collect();
        let trace = TraceTable::<F17>::from_columns(vec![column.clone()]);
        let polys = trace.compute_trace_polys().unwrap();
        let domain =
            quartz_math::fft::cpu::roots_of_unity::get_powers_of_primitive_root::<F17>(2, 4)
                .unwrap();
        for (x, value) in domain.iter().zip(column.iter()) {
            assert_eq!(&polys[0].evaluate(x), value);
        }
    }
}
