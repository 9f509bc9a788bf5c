//! Configuration and constants for the library and CLI.

/// Current export schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Maximum number of hierarchy labels walked per record when rebuilding the tree
pub const MAX_TREE_DEPTH: usize = 10;

/// Maximum nesting of dimension items when building the structural tree
pub const MAX_STRUCTURE_DEPTH: usize = 20;

// Year range used when a record carries no parsable year keys
pub const DEFAULT_START_YEAR: i32 = 2024;
pub const DEFAULT_END_YEAR: i32 = 2032;

// Metadata fallbacks when the converter omits them
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_VALUE_UNIT: &str = "Million";
pub const DEFAULT_VOLUME_UNIT: &str = "Units";

/// Label used when the KPI covers every geography
pub const ALL_GEOGRAPHIES_LABEL: &str = "All Geographies";

/// Leaf markers written into the exported tree
pub const CAGR_FIELD: &str = "CAGR";
pub const AGGREGATED_FIELD: &str = "_aggregated";
pub const LEVEL_FIELD: &str = "_level";

// Export bundle file names
pub const VALUE_FILE_NAME: &str = "value.json";
pub const VOLUME_FILE_NAME: &str = "volume.json";
pub const SEGMENTATION_FILE_NAME: &str = "segmentation_analysis.json";
pub const MANIFEST_FILE_NAME: &str = "manifest.json";
