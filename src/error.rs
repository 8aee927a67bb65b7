//! Error types for the preview pipeline and the chart generator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading texture assets.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The descriptor sequence was empty, nothing can be displayed
    #[error("no texture descriptors to load")]
    NoTextures,

    /// The source could not be read
    #[error("failed to read texture {index} ({source_name}): {message}")]
    Read {
        index: usize,
        source_name: String,
        message: String,
    },

    /// The bytes were read but could not be decoded as an image
    #[error("failed to decode texture {index} ({source_name}): {message}")]
    Decode {
        index: usize,
        source_name: String,
        message: String,
    },
}

impl LoadError {
    /// Position of the failing descriptor, if the error concerns one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::NoTextures => None,
            Self::Read { index, .. } | Self::Decode { index, .. } => Some(*index),
        }
    }
}

/// Errors raised while turning the event tables into a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Every event is the target of some edge
    #[error("no root event: every event is the target of an edge")]
    NoRoot,

    /// Several events qualify as root and the strict policy is active
    #[error("ambiguous root: {} events have no incoming edge ({})", .0.len(), .0.join(", "))]
    MultipleRoots(Vec<String>),

    #[error("events table is empty")]
    EmptyEvents,

    #[error("failed to encode chart image: {0}")]
    Encode(String),
}

/// Errors raised while building display geometry.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("outline needs at least 3 points, got {0}")]
    DegenerateOutline(usize),

    #[error("extrusion supports at most one hole, got {0}")]
    TooManyHoles(usize),
}

/// Errors raised while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
