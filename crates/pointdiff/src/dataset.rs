use std::path::Path;

use geo_types::Coord;
use geojson::feature::Id;
use geojson::JsonObject;

use crate::spatial::Crs;

/// A single point together with the attributes it was loaded with.
#[derive(Clone, Debug, PartialEq)]
pub struct PointRecord {
    /// `None` when the source row or feature has no usable geometry. Such
    /// records never intersect anything and are written with a null geometry.
    pub coord: Option<Coord>,

    /// attribute fields in the order of the source
    pub properties: JsonObject,

    /// feature identifier of the source, if it had one
    pub id: Option<Id>,

    /// ordinates following `x` and `y` in the source position (z, m).
    /// They are not touched by reprojection.
    pub extra_ordinates: Vec<f64>,
}

impl PointRecord {
    pub fn new(coord: Option<Coord>, properties: JsonObject) -> Self {
        Self {
            coord,
            properties,
            id: None,
            extra_ordinates: vec![],
        }
    }

    pub fn with_id(mut self, id: Option<Id>) -> Self {
        self.id = id;
        self
    }

    pub fn with_extra_ordinates(mut self, extra_ordinates: Vec<f64>) -> Self {
        self.extra_ordinates = extra_ordinates;
        self
    }
}

/// Ordered sequence of [`PointRecord`]s sharing one [`Crs`].
#[derive(Clone, Debug)]
pub struct Dataset {
    /// name used in log messages and errors
    pub label: String,
    pub crs: Crs,
    pub records: Vec<PointRecord>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, crs: Crs, records: Vec<PointRecord>) -> Self {
        Self {
            label: label.into(),
            crs,
            records,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// reproject all coordinates to `crs`
    pub fn to_crs(mut self, crs: Crs) -> Self {
        if self.crs != crs {
            let from = self.crs;
            for coord in self.records.iter_mut().filter_map(|r| r.coord.as_mut()) {
                *coord = from.reproject(*coord, crs);
            }
            self.crs = crs;
        }
        self
    }
}

/// label for a dataset loaded from `path`
pub(crate) fn label_from_path(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
