//! Report data models: the values read from a vendor skin analysis PDF.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eight skin measurements printed by the analysis device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Spots,
    Wrinkles,
    Texture,
    Pores,
    UvSpots,
    BrownSpots,
    RedAreas,
    Porphyrins,
}

impl Metric {
    /// All metrics in the order they are searched for.
    pub const ALL: [Metric; 8] = [
        Metric::Spots,
        Metric::Wrinkles,
        Metric::Texture,
        Metric::Pores,
        Metric::UvSpots,
        Metric::BrownSpots,
        Metric::RedAreas,
        Metric::Porphyrins,
    ];

    /// The label exactly as it appears in the vendor PDF.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Spots => "Spots",
            Metric::Wrinkles => "Wrinkles",
            Metric::Texture => "Texture",
            Metric::Pores => "Pores",
            Metric::UvSpots => "UV Spots",
            Metric::BrownSpots => "Brown Spots",
            Metric::RedAreas => "Red Areas",
            Metric::Porphyrins => "Porphyrins",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Any field of [`ReportData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Metric(Metric),
    /// Session date, as printed (e.g. `12/03/2024`).
    Date,
    /// Patient name.
    Name,
}

impl Field {
    /// Key used in logs, errors and serialized output.
    pub fn key(self) -> &'static str {
        match self {
            Field::Metric(metric) => metric.label(),
            Field::Date => "date",
            Field::Name => "name",
        }
    }
}

impl From<Metric> for Field {
    fn from(metric: Metric) -> Self {
        Field::Metric(metric)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Values extracted from one analysis session.
///
/// Every value is the literal text matched in the source PDF; numbers are
/// never reparsed so the report shows exactly what the device printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(rename = "Spots")]
    pub spots: String,
    #[serde(rename = "Wrinkles")]
    pub wrinkles: String,
    #[serde(rename = "Texture")]
    pub texture: String,
    #[serde(rename = "Pores")]
    pub pores: String,
    #[serde(rename = "UV Spots")]
    pub uv_spots: String,
    #[serde(rename = "Brown Spots")]
    pub brown_spots: String,
    #[serde(rename = "Red Areas")]
    pub red_areas: String,
    #[serde(rename = "Porphyrins")]
    pub porphyrins: String,
    pub date: String,
    pub name: String,
}

impl ReportData {
    /// Build report data from metric values given in [`Metric::ALL`] order.
    pub fn from_values(metrics: [String; 8], date: String, name: String) -> Self {
        let [spots, wrinkles, texture, pores, uv_spots, brown_spots, red_areas, porphyrins] =
            metrics;
        Self {
            spots,
            wrinkles,
            texture,
            pores,
            uv_spots,
            brown_spots,
            red_areas,
            porphyrins,
            date,
            name,
        }
    }

    /// Look up a field value.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Metric(metric) => self.metric(metric),
            Field::Date => &self.date,
            Field::Name => &self.name,
        }
    }

    /// Look up a metric value.
    pub fn metric(&self, metric: Metric) -> &str {
        match metric {
            Metric::Spots => &self.spots,
            Metric::Wrinkles => &self.wrinkles,
            Metric::Texture => &self.texture,
            Metric::Pores => &self.pores,
            Metric::UvSpots => &self.uv_spots,
            Metric::BrownSpots => &self.brown_spots,
            Metric::RedAreas => &self.red_areas,
            Metric::Porphyrins => &self.porphyrins,
        }
    }

    /// All fields with their keys, metrics first.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        Metric::ALL
            .iter()
            .map(|&m| (m.label(), self.metric(m)))
            .chain([("date", self.date.as_str()), ("name", self.name.as_str())])
            .collect()
    }
}
