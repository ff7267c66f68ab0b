use primestark_field::{FieldElement, ValidationError};
use primestark_util::transpose;

/// A `length x width` matrix of field elements, one row per step of the computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionTrace {
    length: usize,
    width: usize,
    rows: Vec<Vec<FieldElement>>,
}

impl ExecutionTrace {
    /// A zero-filled trace.
    pub fn new(length: usize, width: usize) -> Self {
        Self {
            length,
            width,
            rows: vec![vec![FieldElement::zero(); width]; length],
        }
    }

    pub fn from_rows(rows: Vec<Vec<FieldElement>>) -> Result<Self, ValidationError> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(ValidationError::LengthMismatch {
                expected: width,
                actual: row.len(),
            });
        }
        Ok(Self {
            length: rows.len(),
            width,
            rows,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), ValidationError> {
        if row >= self.length || col >= self.width {
            return Err(ValidationError::IndexOutOfBounds {
                row,
                col,
                length: self.length,
                width: self.width,
            });
        }
        Ok(())
    }

    pub fn set(&mut self, row: usize, col: usize, value: FieldElement) -> Result<(), ValidationError> {
        self.check_bounds(row, col)?;
        self.rows[row][col] = value;
        Ok(())
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&FieldElement, ValidationError> {
        self.check_bounds(row, col)?;
        Ok(&self.rows[row][col])
    }

    pub fn row(&self, row: usize) -> Result<&[FieldElement], ValidationError> {
        self.rows
            .get(row)
            .map(Vec::as_slice)
            .ok_or(ValidationError::IndexOutOfBounds {
                row,
                col: 0,
                length: self.length,
                width: self.width,
            })
    }

    pub fn column(&self, col: usize) -> Result<Vec<FieldElement>, ValidationError> {
        if col >= self.width {
            return Err(ValidationError::IndexOutOfBounds {
                row: 0,
                col,
                length: self.length,
                width: self.width,
            });
        }
        Ok(self.rows.iter().map(|row| row[col].clone()).collect())
    }

    pub fn rows(&self) -> &[Vec<FieldElement>] {
        &self.rows
    }

    /// All columns, in order.
    pub fn columns(&self) -> Vec<Vec<FieldElement>> {
        transpose(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use primestark_field::PrimeField;

    use super::*;

    #[test]
    fn set_and_get() {
        let field = PrimeField::goldilocks();
        let mut trace = ExecutionTrace::new(4, 2);
        assert_eq!((trace.length(), trace.width()), (4, 2));
        assert!(trace.get(3, 1).unwrap().is_zero());

        trace.set(2, 1, field.element(7)).unwrap();
        assert_eq!(trace.get(2, 1).unwrap(), &field.element(7));
        assert_eq!(trace.row(2).unwrap(), &[field.zero(), field.element(7)]);
        assert_eq!(
            trace.column(1).unwrap(),
            vec![field.zero(), field.zero(), field.element(7), field.zero()]
        );
        assert_eq!(trace.columns().len(), 2);
    }

    #[test]
    fn out_of_bounds() {
        let field = PrimeField::goldilocks();
        let mut trace = ExecutionTrace::new(4, 2);
        let err = ValidationError::IndexOutOfBounds {
            row: 4,
            col: 0,
            length: 4,
            width: 2,
        };
        assert_eq!(trace.set(4, 0, field.one()), Err(err.clone()));
        assert_eq!(trace.get(4, 0), Err(err));
        assert!(trace.get(0, 2).is_err());
        assert!(trace.row(4).is_err());
        assert!(trace.column(2).is_err());
    }

    #[test]
    fn ragged_rows_rejected() {
        let field = PrimeField::goldilocks();
        let rows = vec![vec![field.one(), field.one()], vec![field.one()]];
        assert_eq!(
            ExecutionTrace::from_rows(rows),
            Err(ValidationError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(ExecutionTrace::from_rows(vec![]).unwrap().length(), 0);
    }
}
