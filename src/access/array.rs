//! Array, vector and matrix codec
//!
//! Stored shapes:
//!
//! ```text
//! <map>
//!   <mach mapType="vector">0.2;0.6</mach>           dimension, size 2
//!   <alpha mapType="vector">-4;0;4</alpha>          dimension, size 3
//!   <cl mapType="array">v00;v01;v02;v10;v11;v12</cl> parameter, 2*3 values
//! </map>
//!
//! <m storageMode="rowWise"><row><col>1</col><col>2</col></row>...</m>
//! ```
//!
//! Parameters are flattened row-major over the dimensions in document
//! order: the last dimension varies fastest.

use super::scalar::{check_attribute_name, check_element_name};
use super::value::Scalar;
use crate::dom::NodeId;
use crate::error::{Error, Result};
use crate::path;
use crate::session::Session;
use tracing::debug;

pub const MAP_TYPE_ATTRIBUTE: &str = "mapType";
pub const VECTOR_MAP_TYPE: &str = "vector";
pub const ARRAY_MAP_TYPE: &str = "array";
pub const STORAGE_MODE_ATTRIBUTE: &str = "storageMode";

/// Separator between values in vector and array text
pub const VALUE_SEPARATOR: char = ';';

// ============================================================================
// Flat addressing
// ============================================================================

fn too_large(name: impl Into<String>, size: usize) -> Error {
    Error::MatrixDimensionError {
        name: name.into(),
        size: i64::try_from(size).unwrap_or(i64::MAX),
    }
}

/// Number of values in an array of `sizes`; fails when the product does
/// not fit in `usize`
pub fn element_count(sizes: &[usize]) -> Result<usize> {
    sizes.iter().enumerate().try_fold(1usize, |acc, (dim, &size)| {
        acc.checked_mul(size)
            .ok_or_else(|| too_large(format!("dimension {}", dim + 1), size))
    })
}

/// Row-major offset of `positions` (0-based) in an array of `sizes`.
///
/// `offset = Σ positions[i] * Π sizes[j] for j > i`
pub fn flat_index(sizes: &[usize], positions: &[usize]) -> Result<usize> {
    if sizes.len() != positions.len() {
        return Err(Error::NonMatchingSize {
            expected: sizes.len(),
            found: positions.len(),
        });
    }
    let mut offset = 0usize;
    for (dim, (&size, &position)) in sizes.iter().zip(positions).enumerate() {
        if size == 0 {
            return Err(Error::MatrixDimensionError {
                name: format!("dimension {}", dim + 1),
                size: 0,
            });
        }
        if position >= size {
            return Err(Error::IndexOutOfRange {
                path: format!("dimension {}", dim + 1),
                index: position as i64,
            });
        }
        offset = offset
            .checked_mul(size)
            .and_then(|o| o.checked_add(position))
            .ok_or_else(|| too_large(format!("dimension {}", dim + 1), size))?;
    }
    Ok(offset)
}

/// Value at `positions` in a flattened array
pub fn array_value(values: &[f64], sizes: &[usize], positions: &[usize]) -> Result<f64> {
    let offset = flat_index(sizes, positions)?;
    match values.get(offset) {
        Some(&value) => Ok(value),
        None => Err(Error::NonMatchingSize {
            expected: element_count(sizes)?,
            found: values.len(),
        }),
    }
}

// ============================================================================
// Array descriptors
// ============================================================================

/// One axis of an array with its coordinate values
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub name: String,
    pub labels: Vec<f64>,
}

impl Dimension {
    pub fn labelled(name: impl Into<String>, labels: Vec<f64>) -> Self {
        Dimension {
            name: name.into(),
            labels,
        }
    }

    /// Dimension without coordinates; stored with labels `1..=size`
    pub fn sized(name: impl Into<String>, size: usize) -> Self {
        Dimension {
            name: name.into(),
            labels: (1..=size).map(|i| i as f64).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }
}

/// A named flattened payload
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub values: Vec<f64>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Parameter {
            name: name.into(),
            values,
        }
    }
}

/// Dimensions and parameters of one stored array
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayDescriptor {
    pub dimensions: Vec<Dimension>,
    pub parameters: Vec<Parameter>,
}

impl ArrayDescriptor {
    pub fn new(dimensions: Vec<Dimension>, parameters: Vec<Parameter>) -> Self {
        ArrayDescriptor {
            dimensions,
            parameters,
        }
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.dimensions.iter().map(Dimension::size).collect()
    }

    /// Number of values each parameter must hold
    pub fn value_count(&self) -> Result<usize> {
        self.dimensions.iter().try_fold(1usize, |acc, dim| {
            acc.checked_mul(dim.size())
                .ok_or_else(|| too_large(dim.name.as_str(), dim.size()))
        })
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Value of parameter `name` at `positions`
    pub fn value(&self, name: &str, positions: &[usize]) -> Result<f64> {
        let parameter = self
            .parameter(name)
            .ok_or_else(|| Error::ElementNotFound(name.to_string()))?;
        array_value(&parameter.values, &self.sizes(), positions)
    }

    /// Every dimension non-empty and every payload sized to the product
    pub fn validate(&self) -> Result<()> {
        if let Some(dim) = self.dimensions.iter().find(|d| d.size() < 1) {
            return Err(Error::MatrixDimensionError {
                name: dim.name.clone(),
                size: dim.size() as i64,
            });
        }
        let expected = self.value_count()?;
        match self.parameters.iter().find(|p| p.values.len() != expected) {
            Some(p) => Err(Error::NonMatchingSize {
                expected,
                found: p.values.len(),
            }),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Matrices
// ============================================================================

/// Order of a flattened matrix payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// (1,1), (1,2), ..., (2,1), ...
    #[default]
    RowWise,
    /// (1,1), (2,1), ..., (1,2), ...
    ColumnWise,
}

impl StorageMode {
    /// Numeric code used by foreign callers
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(StorageMode::RowWise),
            1 => Ok(StorageMode::ColumnWise),
            other => Err(Error::UnknownStorageMode(other)),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            StorageMode::RowWise => 0,
            StorageMode::ColumnWise => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StorageMode::RowWise => "rowWise",
            StorageMode::ColumnWise => "columnWise",
        }
    }

    fn parse(path: &str, text: &str) -> Result<Self> {
        match text {
            "rowWise" => Ok(StorageMode::RowWise),
            "columnWise" => Ok(StorageMode::ColumnWise),
            _ => Err(Error::InvalidValue {
                path: path.to_string(),
                text: text.to_string(),
                expected: "storage mode",
            }),
        }
    }

    /// Offset of (row, col) in a payload of this order
    pub fn index(self, row: usize, col: usize, rows: usize, cols: usize) -> usize {
        match self {
            StorageMode::RowWise => row * cols + col,
            StorageMode::ColumnWise => row + col * rows,
        }
    }
}

/// A 2-D matrix over a flattened payload in a given order
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    mode: StorageMode,
    data: Vec<f64>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>, mode: StorageMode) -> Result<Self> {
        for (name, size) in [("rows", rows), ("columns", cols)] {
            if size < 1 {
                return Err(Error::MatrixDimensionError {
                    name: name.to_string(),
                    size: size as i64,
                });
            }
        }
        let expected = rows.checked_mul(cols).ok_or_else(|| too_large("columns", cols))?;
        if data.len() != expected {
            return Err(Error::NonMatchingSize {
                expected,
                found: data.len(),
            });
        }
        Ok(Matrix {
            rows,
            cols,
            mode,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Payload in [`mode`](Self::mode) order
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Logical (row, col), 0-based, independent of the storage order
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data
            .get(self.mode.index(row, col, self.rows, self.cols))
            .copied()
    }

    /// Same matrix with its payload reordered
    pub fn to_mode(&self, mode: StorageMode) -> Matrix {
        let mut data = vec![0.0; self.data.len()];
        for row in 0..self.rows {
            for col in 0..self.cols {
                data[mode.index(row, col, self.rows, self.cols)] =
                    self.data[self.mode.index(row, col, self.rows, self.cols)];
            }
        }
        Matrix {
            rows: self.rows,
            cols: self.cols,
            mode,
            data,
        }
    }

    /// Fail unless the matrix has exactly the given shape
    pub fn expect_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.rows != rows {
            return Err(Error::NonMatchingSize {
                expected: rows,
                found: self.rows,
            });
        }
        if self.cols != cols {
            return Err(Error::NonMatchingSize {
                expected: cols,
                found: self.cols,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Session operations
// ============================================================================

fn parse_values(session: &Session, path: &str, id: NodeId) -> Result<Vec<f64>> {
    session
        .document()
        .text(id)
        .split(VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| f64::from_text(path, token))
        .collect()
}

impl Session {
    fn join_values(&self, values: &[f64], format: Option<&str>) -> Result<String> {
        let parts = values
            .iter()
            .map(|v| self.render(v, format))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(&VALUE_SEPARATOR.to_string()))
    }

    /// Store `values` as `v1;v2;...` in the element at `path`
    pub fn write_vector(&mut self, path: &str, values: &[f64], format: Option<&str>) -> Result<()> {
        let text = self.join_values(values, format)?;
        self.save_element(path, &text, None)?;
        self.save_attribute(path, MAP_TYPE_ATTRIBUTE, &VECTOR_MAP_TYPE.to_string(), None)
    }

    pub fn read_vector(&self, path: &str) -> Result<Vec<f64>> {
        let id = self.resolve_element(path)?;
        parse_values(self, path, id)
    }

    pub fn vector_size(&self, path: &str) -> Result<usize> {
        Ok(self.read_vector(path)?.len())
    }

    /// Append `<list_name>` to `parent` holding one `<child_name>` per entry.
    /// Each child carries the entry's value as text and its label in
    /// attribute `attribute_name`.
    pub fn write_list_with_attributes(
        &mut self,
        parent: &str,
        list_name: &str,
        child_name: &str,
        attribute_name: &str,
        entries: &[(f64, &str)],
        format: Option<&str>,
    ) -> Result<()> {
        self.ensure_writable()?;
        check_element_name(list_name)?;
        check_element_name(child_name)?;
        check_attribute_name(attribute_name)?;
        let rendered = entries
            .iter()
            .map(|&(value, label)| self.render(&value, format).map(|text| (text, label)))
            .collect::<Result<Vec<_>>>()?;
        let parent_id = self.resolve_element(parent)?;

        let doc = self.document_mut()?;
        let list = doc.append_element(parent_id, list_name);
        for (text, label) in &rendered {
            let child = doc.append_element(list, child_name);
            doc.set_text(child, text);
            doc.set_attribute(child, attribute_name, label);
        }
        Ok(())
    }

    /// Element children of the array at `path` with the given `mapType`
    fn map_children(&self, path: &str, map_type: &str) -> Result<Vec<NodeId>> {
        let id = self.resolve_element(path)?;
        let doc = self.document();
        Ok(doc
            .element_children(id)
            .filter(|&c| doc.attribute(c, MAP_TYPE_ATTRIBUTE) == Some(map_type))
            .collect())
    }

    /// Names of the `vector` (dimension) or `array` (parameter) children
    pub fn array_element_names(&self, path: &str, map_type: &str) -> Result<Vec<String>> {
        let doc = self.document();
        Ok(self
            .map_children(path, map_type)?
            .into_iter()
            .map(|c| doc.name(c).to_string())
            .collect())
    }

    /// Number of values stored in child `name` of the array at `path`
    pub fn array_element_count(&self, path: &str, name: &str) -> Result<usize> {
        self.vector_size(&path::join(path, name))
    }

    /// Store an array, replacing same-named dimensions and parameters
    pub fn write_array(&mut self, path: &str, array: &ArrayDescriptor, format: Option<&str>) -> Result<()> {
        self.ensure_writable()?;
        array.validate()?;
        self.create_element_if_not_exists(path)?;

        for dim in &array.dimensions {
            self.write_vector(&path::join(path, &dim.name), &dim.labels, format)?;
        }
        for parameter in &array.parameters {
            let child = path::join(path, &parameter.name);
            let text = self.join_values(&parameter.values, format)?;
            self.save_element(&child, &text, None)?;
            self.save_attribute(&child, MAP_TYPE_ATTRIBUTE, &ARRAY_MAP_TYPE.to_string(), None)?;
        }
        debug!(
            handle = self.handle().raw(),
            path,
            dimensions = array.dimensions.len(),
            parameters = array.parameters.len(),
            "array written"
        );
        Ok(())
    }

    /// Read and validate the array at `path`
    pub fn read_array(&self, path: &str) -> Result<ArrayDescriptor> {
        let doc = self.document();
        let mut array = ArrayDescriptor::default();

        for id in self.map_children(path, VECTOR_MAP_TYPE)? {
            let name = doc.name(id).to_string();
            let child = path::join(path, &name);
            array.dimensions.push(Dimension::labelled(name, parse_values(self, &child, id)?));
        }
        for id in self.map_children(path, ARRAY_MAP_TYPE)? {
            let name = doc.name(id).to_string();
            let child = path::join(path, &name);
            array.parameters.push(Parameter::new(name, parse_values(self, &child, id)?));
        }

        array.validate()?;
        Ok(array)
    }

    /// Payload of one parameter, checked against the size the caller expects
    pub fn array_parameter(&self, path: &str, name: &str, expected: usize) -> Result<Vec<f64>> {
        let array = self.read_array(path)?;
        let parameter = array.parameter(name).ok_or_else(|| Error::ElementNotFound(path::join(path, name)))?;
        if parameter.values.len() != expected {
            return Err(Error::NonMatchingSize {
                expected,
                found: parameter.values.len(),
            });
        }
        Ok(parameter.values.clone())
    }

    /// Store a matrix as `<row><col>v</col>...</row>...`. Existing rows
    /// named `row_name` are replaced.
    pub fn write_matrix(
        &mut self,
        path: &str,
        row_name: &str,
        col_name: &str,
        matrix: &Matrix,
        format: Option<&str>,
    ) -> Result<()> {
        self.ensure_writable()?;
        for name in [row_name, col_name] {
            if name.is_empty() {
                return Err(Error::NoElementName);
            }
        }
        self.create_element_if_not_exists(path)?;

        let old_rows = self.named_children_count(path, row_name)?;
        let first = path::indexed(&path::join(path, row_name), 1);
        for _ in 0..old_rows {
            self.remove_element(&first)?;
        }

        let mode = matrix.mode().as_str().to_string();
        self.save_attribute(path, STORAGE_MODE_ATTRIBUTE, &mode, None)?;

        for row in 0..matrix.rows() {
            let row_path = path::indexed(&path::join(path, row_name), row + 1);
            self.create_element(&row_path)?;
            for col in 0..matrix.cols() {
                let value = matrix.get(row, col).unwrap_or_default();
                let cell = path::indexed(&path::join(&row_path, col_name), col + 1);
                self.save_element(&cell, &value, format)?;
            }
        }
        Ok(())
    }

    /// Row and column count; every row must hold the same number of columns
    pub fn matrix_size(&self, path: &str, row_name: &str, col_name: &str) -> Result<(usize, usize)> {
        let id = self.resolve_element(path)?;
        let doc = self.document();

        if let Some(first) = doc.element_children(id).next() {
            if doc.name(first) != row_name {
                return Err(Error::NonMatchingName {
                    expected: row_name.to_string(),
                    found: doc.name(first).to_string(),
                });
            }
        }

        let mut cols = None;
        let mut rows = 0usize;
        for row in doc.named_children(id, row_name) {
            rows += 1;
            if let Some(cell) = doc.element_children(row).find(|&c| doc.name(c) != col_name) {
                return Err(Error::NonMatchingName {
                    expected: col_name.to_string(),
                    found: doc.name(cell).to_string(),
                });
            }
            let count = doc.named_children(row, col_name).count();
            match cols {
                None => cols = Some(count),
                Some(expected) if expected != count => {
                    return Err(Error::NonMatchingSize {
                        expected,
                        found: count,
                    })
                }
                Some(_) => {}
            }
        }
        Ok((rows, cols.unwrap_or(0)))
    }

    /// Read a matrix in the order recorded when it was written
    pub fn read_matrix(&self, path: &str, row_name: &str, col_name: &str) -> Result<Matrix> {
        let (rows, cols) = self.matrix_size(path, row_name, col_name)?;
        let id = self.resolve_element(path)?;
        let doc = self.document();
        let mode = match doc.attribute(id, STORAGE_MODE_ATTRIBUTE) {
            Some(text) => StorageMode::parse(path, text)?,
            None => StorageMode::RowWise,
        };

        let mut logical = Vec::with_capacity(rows * cols);
        for (r, row) in doc.named_children(id, row_name).enumerate() {
            for (c, cell) in doc.named_children(row, col_name).enumerate() {
                let cell_path = format!("{path}/{row_name}[{}]/{col_name}[{}]", r + 1, c + 1);
                logical.push(f64::from_text(&cell_path, &doc.text(cell))?);
            }
        }

        Ok(Matrix::new(rows, cols, logical, StorageMode::RowWise)?.to_mode(mode))
    }
}
