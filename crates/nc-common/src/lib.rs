//! Common types and utilities shared across the nc-check crates.

pub mod array;
pub mod axis;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod ranges;
pub mod time;

pub use array::{MaskReduce, MissingMask};
pub use axis::{classify, classify_dataset, expected_coord_attrs, AxisGuess, AxisType};
pub use dataset::{ArrayData, AttrValue, Attributes, DType, Dimension, LabeledDataset, Variable};
pub use error::{NcError, NcResult};
pub use grid::{is_global_grid, nearest_index, AxisExtent, LongitudeConvention};
pub use ranges::{compress, labeled_ranges, value_ranges, Range, ValueRange};
pub use time::{TimeUnit, TimeUnits};
