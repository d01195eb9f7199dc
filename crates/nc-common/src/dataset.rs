//! In-memory labeled dataset model.
//!
//! A [`LabeledDataset`] is a read-only snapshot of a gridded dataset: an
//! ordered set of dimensions, coordinate variables, data variables and global
//! attributes. Checks borrow it; the only way to change one is to build a new
//! copy.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{NcError, NcResult};
use crate::time::{epoch_millis, format_label, TimeUnits};

/// Attribute name used for fill-value sentinels.
pub const FILL_VALUE_ATTR: &str = "_FillValue";

/// Attribute mapping of a variable or of the dataset.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
    FloatList(Vec<f64>),
}

impl AttrValue {
    /// Borrow the value as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of scalar values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Text(_) => "str",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::FloatList(_) => "list",
        }
    }

    /// Convert to a JSON value for reports. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AttrValue::Text(s) => serde_json::Value::String(s.clone()),
            AttrValue::Int(v) => serde_json::Value::from(*v),
            AttrValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            AttrValue::FloatList(values) => serde_json::Value::Array(
                values
                    .iter()
                    .map(|v| {
                        serde_json::Number::from_f64(*v)
                            .map(serde_json::Value::Number)
                            .unwrap_or(serde_json::Value::Null)
                    })
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => write!(f, "{}", s),
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::FloatList(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(value as i64)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(value: Vec<f64>) -> Self {
        AttrValue::FloatList(value)
    }
}

/// Element type of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Float64,
    Int64,
    Bool,
    DateTime,
    Text,
    /// Dynamic/untyped elements with no fixed binary representation.
    Object,
}

impl DType {
    /// Numbers only; booleans, date/times and text are not numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Float64 | DType::Int64)
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, DType::DateTime)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Float64 => "float64",
            DType::Int64 => "int64",
            DType::Bool => "bool",
            DType::DateTime => "datetime64",
            DType::Text => "str",
            DType::Object => "object",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flat, row-major element storage of a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values", rename_all = "lowercase")]
pub enum ArrayData {
    /// NaN marks a null element; serialized as JSON `null`.
    Float(#[serde(with = "nan_as_null")] Vec<f64>),
    Int(Vec<i64>),
    Bool(Vec<bool>),
    /// `None` marks a null (not-a-time) element.
    DateTime(Vec<Option<NaiveDateTime>>),
    Text(Vec<String>),
    /// `Null` marks a null element.
    Object(Vec<serde_json::Value>),
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Float(v) => v.len(),
            ArrayData::Int(v) => v.len(),
            ArrayData::Bool(v) => v.len(),
            ArrayData::DateTime(v) => v.len(),
            ArrayData::Text(v) => v.len(),
            ArrayData::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            ArrayData::Float(_) => DType::Float64,
            ArrayData::Int(_) => DType::Int64,
            ArrayData::Bool(_) => DType::Bool,
            ArrayData::DateTime(_) => DType::DateTime,
            ArrayData::Text(_) => DType::Text,
            ArrayData::Object(_) => DType::Object,
        }
    }

    /// Whether the element at `index` is null in its own representation.
    pub fn is_null_at(&self, index: usize) -> bool {
        match self {
            ArrayData::Float(v) => v.get(index).map_or(false, |x| x.is_nan()),
            ArrayData::DateTime(v) => v.get(index).map_or(false, |x| x.is_none()),
            ArrayData::Object(v) => v.get(index).map_or(false, |x| x.is_null()),
            _ => false,
        }
    }

    /// Whether the element at `index` equals the given fill sentinel.
    ///
    /// Numbers compare numerically across int/float storage, text compares
    /// against text sentinels; other combinations never match.
    pub fn equals_fill_at(&self, index: usize, fill: &AttrValue) -> bool {
        match (self, fill) {
            (ArrayData::Float(v), _) => match (v.get(index), fill.as_f64()) {
                (Some(x), Some(f)) => *x == f,
                _ => false,
            },
            (ArrayData::Int(v), _) => match (v.get(index), fill.as_f64()) {
                (Some(x), Some(f)) => *x as f64 == f,
                _ => false,
            },
            (ArrayData::Text(v), AttrValue::Text(f)) => v.get(index).map_or(false, |x| x == f),
            (ArrayData::Object(v), _) => match (v.get(index).and_then(|x| x.as_f64()), fill.as_f64())
            {
                (Some(x), Some(f)) => x == f,
                _ => false,
            },
            _ => false,
        }
    }
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(values: &Vec<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| if v.is_nan() { None } else { Some(*v) }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let raw: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

/// A named array with dimension names and attribute/encoding mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub data: ArrayData,
    #[serde(default)]
    pub attrs: Attributes,
    /// Storage-encoding hints kept apart from the attributes (e.g. `_FillValue`).
    #[serde(default)]
    pub encoding: Attributes,
}

impl Variable {
    /// Create a variable, checking that dims, shape and data agree.
    pub fn new(
        name: impl Into<String>,
        dims: &[&str],
        shape: &[usize],
        data: ArrayData,
    ) -> NcResult<Self> {
        let var = Self {
            name: name.into(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            shape: shape.to_vec(),
            data,
            attrs: Attributes::new(),
            encoding: Attributes::new(),
        };
        var.check_shape()?;
        Ok(var)
    }

    /// Create a 1-D dimension coordinate whose dimension shares its name.
    pub fn coordinate(name: impl Into<String>, data: ArrayData) -> Self {
        let name = name.into();
        Self {
            dims: vec![name.clone()],
            shape: vec![data.len()],
            name,
            data,
            attrs: Attributes::new(),
            encoding: Attributes::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Builder-style encoding setter.
    pub fn with_encoding(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.encoding.insert(key.into(), value.into());
        self
    }

    /// Verify rank and element count.
    pub fn check_shape(&self) -> NcResult<()> {
        if self.dims.len() != self.shape.len() {
            return Err(NcError::RankMismatch {
                name: self.name.clone(),
                dims: self.dims.len(),
                rank: self.shape.len(),
            });
        }
        let expected: usize = self.shape.iter().product();
        if expected != self.data.len() {
            return Err(NcError::ShapeMismatch {
                name: self.name.clone(),
                expected,
                found: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Text attribute lookup.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(AttrValue::as_str)
    }

    /// Position of a dimension in this variable's dims.
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Size along a named dimension.
    pub fn size_of(&self, dim: &str) -> Option<usize> {
        self.axis_of(dim).map(|axis| self.shape[axis])
    }

    /// Fill sentinels declared in the attribute map and the encoding map.
    pub fn fill_values(&self) -> Vec<&AttrValue> {
        [&self.attrs, &self.encoding]
            .into_iter()
            .filter_map(|source| source.get(FILL_VALUE_ATTR))
            .collect()
    }

    /// Values as `f64` for numeric and date/time storage.
    ///
    /// Date/times map to epoch milliseconds; any null date/time makes the
    /// sequence unusable and yields `None`, as do booleans, text and objects.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        match &self.data {
            ArrayData::Float(v) => Some(v.clone()),
            ArrayData::Int(v) => Some(v.iter().map(|x| *x as f64).collect()),
            ArrayData::DateTime(v) => v
                .iter()
                .map(|x| x.map(|dt| epoch_millis(&dt) as f64))
                .collect(),
            _ => None,
        }
    }

    /// Display label for the element at `index`.
    ///
    /// Native date/times and numbers carrying CF time units are rendered at
    /// second precision; other values use their natural display.
    pub fn label_at(&self, index: usize) -> String {
        let time_units = self.attr_str("units").and_then(|u| TimeUnits::parse(u).ok());
        match &self.data {
            ArrayData::DateTime(v) => match v.get(index) {
                Some(Some(dt)) => format_label(dt),
                Some(None) => "NaT".to_string(),
                None => index.to_string(),
            },
            ArrayData::Float(v) => match v.get(index) {
                Some(x) => match time_units.and_then(|u| u.decode(*x)) {
                    Some(dt) => format_label(&dt),
                    None => x.to_string(),
                },
                None => index.to_string(),
            },
            ArrayData::Int(v) => match v.get(index) {
                Some(x) => match time_units.and_then(|u| u.decode(*x as f64)) {
                    Some(dt) => format_label(&dt),
                    None => x.to_string(),
                },
                None => index.to_string(),
            },
            ArrayData::Bool(v) => v.get(index).map_or(index.to_string(), |x| x.to_string()),
            ArrayData::Text(v) => v.get(index).cloned().unwrap_or_else(|| index.to_string()),
            ArrayData::Object(v) => v.get(index).map_or(index.to_string(), |x| x.to_string()),
        }
    }
}

/// A named dimension and its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub size: usize,
}

/// Read-only snapshot of a gridded dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledDataset {
    #[serde(default)]
    dims: Vec<Dimension>,
    #[serde(default)]
    coords: Vec<Variable>,
    #[serde(default)]
    data_vars: Vec<Variable>,
    #[serde(default)]
    attrs: Attributes,
}

impl LabeledDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON snapshot and verify its internal consistency.
    pub fn from_json_str(json: &str) -> NcResult<Self> {
        let mut ds: Self = serde_json::from_str(json)?;
        ds.reconcile()?;
        Ok(ds)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> NcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder-style global attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Builder-style dimension declaration (for dimensions without coordinates).
    pub fn with_dim(mut self, name: impl Into<String>, size: usize) -> NcResult<Self> {
        self.insert_dim(name, size)?;
        Ok(self)
    }

    pub fn with_coord(mut self, var: Variable) -> NcResult<Self> {
        self.insert_coord(var)?;
        Ok(self)
    }

    pub fn with_data_var(mut self, var: Variable) -> NcResult<Self> {
        self.insert_data_var(var)?;
        Ok(self)
    }

    /// Declare a dimension; re-declaring with the same size is a no-op.
    pub fn insert_dim(&mut self, name: impl Into<String>, size: usize) -> NcResult<()> {
        let name = name.into();
        match self.dims.iter().find(|d| d.name == name) {
            Some(existing) if existing.size != size => Err(NcError::dimension_mismatch(
                name.clone(),
                name,
                existing.size,
                size,
            )),
            Some(_) => Ok(()),
            None => {
                self.dims.push(Dimension { name, size });
                Ok(())
            }
        }
    }

    pub fn insert_coord(&mut self, var: Variable) -> NcResult<()> {
        if self.coord(&var.name).is_some() {
            return Err(NcError::DuplicateVariable(var.name));
        }
        self.register_dims(&var)?;
        self.coords.push(var);
        Ok(())
    }

    pub fn insert_data_var(&mut self, var: Variable) -> NcResult<()> {
        if self.data_var(&var.name).is_some() {
            return Err(NcError::DuplicateVariable(var.name));
        }
        self.register_dims(&var)?;
        self.data_vars.push(var);
        Ok(())
    }

    /// Insert a coordinate or replace the existing one of the same name.
    pub fn set_coord(&mut self, var: Variable) -> NcResult<()> {
        self.register_dims(&var)?;
        match self.coords.iter_mut().find(|c| c.name == var.name) {
            Some(existing) => *existing = var,
            None => self.coords.push(var),
        }
        Ok(())
    }

    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn dim_size(&self, name: &str) -> Option<usize> {
        self.dims.iter().find(|d| d.name == name).map(|d| d.size)
    }

    pub fn coords(&self) -> &[Variable] {
        &self.coords
    }

    pub fn data_vars(&self) -> &[Variable] {
        &self.data_vars
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    pub fn coord(&self, name: &str) -> Option<&Variable> {
        self.coords.iter().find(|c| c.name == name)
    }

    pub fn data_var(&self, name: &str) -> Option<&Variable> {
        self.data_vars.iter().find(|v| v.name == name)
    }

    /// Attribute/encoding access for coordinates. Shape-changing edits must
    /// go through [`LabeledDataset::set_coord`].
    pub fn coords_attrs_mut(&mut self) -> impl Iterator<Item = (&str, &mut Attributes, &mut Attributes)> {
        self.coords
            .iter_mut()
            .map(|c| (c.name.as_str(), &mut c.attrs, &mut c.encoding))
    }

    /// Attribute access for data variables.
    pub fn data_vars_attrs_mut(&mut self) -> impl Iterator<Item = (&str, &mut Attributes)> {
        self.data_vars
            .iter_mut()
            .map(|v| (v.name.as_str(), &mut v.attrs))
    }

    /// Coordinate or data variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.coord(name).or_else(|| self.data_var(name))
    }

    /// Names of every coordinate and data variable.
    pub fn variable_names(&self) -> BTreeSet<String> {
        self.coords
            .iter()
            .chain(self.data_vars.iter())
            .map(|v| v.name.clone())
            .collect()
    }

    /// Re-derive the dimension table from the variables and check every shape.
    fn reconcile(&mut self) -> NcResult<()> {
        let vars: Vec<Variable> = self
            .coords
            .iter()
            .chain(self.data_vars.iter())
            .cloned()
            .collect();
        for var in &vars {
            var.check_shape()?;
            self.register_dims(var)?;
        }
        Ok(())
    }

    fn register_dims(&mut self, var: &Variable) -> NcResult<()> {
        var.check_shape()?;
        for (dim, size) in var.dims.iter().zip(var.shape.iter()) {
            match self.dims.iter().find(|d| &d.name == dim) {
                Some(existing) if existing.size != *size => {
                    return Err(NcError::dimension_mismatch(
                        dim.clone(),
                        var.name.clone(),
                        existing.size,
                        *size,
                    ));
                }
                Some(_) => {}
                None => self.dims.push(Dimension {
                    name: dim.clone(),
                    size: *size,
                }),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lat() -> Variable {
        Variable::coordinate("lat", ArrayData::Float(vec![-10.0, 0.0, 10.0]))
            .with_attr("units", "degrees_north")
    }

    #[test]
    fn test_variable_shape_checked() {
        let err = Variable::new("v", &["x"], &[3], ArrayData::Float(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(err, NcError::ShapeMismatch { expected: 3, found: 2, .. }));

        let err = Variable::new("v", &["x", "y"], &[2], ArrayData::Float(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(err, NcError::RankMismatch { .. }));
    }

    #[test]
    fn test_dims_registered_in_order() {
        let ds = LabeledDataset::new()
            .with_coord(lat())
            .unwrap()
            .with_data_var(
                Variable::new("v", &["lat", "x"], &[3, 2], ArrayData::Float(vec![0.0; 6])).unwrap(),
            )
            .unwrap();
        let names: Vec<&str> = ds.dims().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["lat", "x"]);
        assert_eq!(ds.dim_size("x"), Some(2));
    }

    #[test]
    fn test_conflicting_dimension_size_rejected() {
        let ds = LabeledDataset::new().with_coord(lat()).unwrap();
        let result = ds.with_data_var(
            Variable::new("v", &["lat"], &[4], ArrayData::Float(vec![0.0; 4])).unwrap(),
        );
        assert!(matches!(result, Err(NcError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let ds = LabeledDataset::new().with_coord(lat()).unwrap();
        assert!(matches!(ds.with_coord(lat()), Err(NcError::DuplicateVariable(_))));
    }

    #[test]
    fn test_fill_values_from_attrs_and_encoding() {
        let var = lat().with_attr("_FillValue", -999.0).with_encoding("_FillValue", 1e20);
        assert_eq!(var.fill_values().len(), 2);
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(lat().numeric_values(), Some(vec![-10.0, 0.0, 10.0]));
        let text = Variable::coordinate("lat", ArrayData::Text(vec!["a".into()]));
        assert!(text.numeric_values().is_none());
        let flags = Variable::coordinate("f", ArrayData::Bool(vec![true]));
        assert!(flags.numeric_values().is_none());
    }

    #[test]
    fn test_label_at_decodes_time_units() {
        let time = Variable::coordinate("time", ArrayData::Int(vec![0, 1, 2]))
            .with_attr("units", "days since 2020-01-01");
        assert_eq!(time.label_at(2), "2020-01-03T00:00:00");
        assert_eq!(lat().label_at(0), "-10");
    }

    #[test]
    fn test_label_at_out_of_range_time_falls_back_to_value() {
        let raw = -9223372036854775.808_f64;
        let time = Variable::coordinate("time", ArrayData::Float(vec![raw, 0.0]))
            .with_attr("units", "seconds since 1970-01-01");
        assert_eq!(time.label_at(0), raw.to_string());
        assert_eq!(time.label_at(1), "1970-01-01T00:00:00");
    }

    #[test]
    fn test_json_snapshot_round_trip_keeps_nulls() {
        let ds = LabeledDataset::new()
            .with_attr("Conventions", "CF-1.12")
            .with_coord(Variable::coordinate(
                "lat",
                ArrayData::Float(vec![0.0, f64::NAN]),
            ))
            .unwrap();
        let json = ds.to_json_string().unwrap();
        assert!(json.contains("null"));
        let loaded = LabeledDataset::from_json_str(&json).unwrap();
        assert!(loaded.coord("lat").unwrap().data.is_null_at(1));
        assert_eq!(loaded.attrs().get("Conventions"), Some(&AttrValue::from("CF-1.12")));
    }

    #[test]
    fn test_snapshot_with_bad_shape_rejected() {
        let json = r#"{
            "coords": [{"name": "lat", "dims": ["lat"], "shape": [3],
                        "data": {"dtype": "float", "values": [1.0, 2.0]}}]
        }"#;
        assert!(matches!(
            LabeledDataset::from_json_str(json),
            Err(NcError::ShapeMismatch { .. })
        ));
    }
}
