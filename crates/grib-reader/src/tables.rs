//! GRIB2 parameter and level lookup tables.
//!
//! Translates the numeric codes of a product definition into the names and
//! units shown in the message list. The built-in defaults cover the common
//! WMO and NCEP parameters; callers can add or override entries.

use std::collections::HashMap;

/// Lookup key for parameter: (discipline, category, number)
pub type ParamKey = (u8, u8, u8);

/// Names and units of one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Short parameter name (e.g., "TMP", "UGRD")
    pub short_name: String,
    /// Long parameter name (e.g., "Temperature")
    pub name: String,
    pub units: String,
}

impl ParameterInfo {
    pub fn new(short_name: &str, name: &str, units: &str) -> Self {
        Self {
            short_name: short_name.to_string(),
            name: name.to_string(),
            units: units.to_string(),
        }
    }
}

/// Name of a fixed-surface type and the factor that converts its raw
/// value into the displayed level (e.g. Pa to hPa for isobaric surfaces).
#[derive(Debug, Clone, PartialEq)]
pub struct LevelType {
    pub name: String,
    pub scale: f64,
}

impl LevelType {
    pub fn new(name: &str, scale: f64) -> Self {
        Self {
            name: name.to_string(),
            scale,
        }
    }
}

/// GRIB2 parameter and level lookup tables.
#[derive(Debug, Clone, Default)]
pub struct Grib2Tables {
    parameters: HashMap<ParamKey, ParameterInfo>,
    levels: HashMap<u8, LevelType>,
}

impl Grib2Tables {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables pre-filled with common WMO/NCEP parameters and level types.
    pub fn with_defaults() -> Self {
        let mut tables = Self::new();

        let parameters: &[(ParamKey, &str, &str, &str)] = &[
            // Discipline 0, category 0: temperature
            ((0, 0, 0), "TMP", "Temperature", "K"),
            ((0, 0, 2), "POT", "Potential temperature", "K"),
            ((0, 0, 4), "TMAX", "Maximum temperature", "K"),
            ((0, 0, 5), "TMIN", "Minimum temperature", "K"),
            ((0, 0, 6), "DPT", "Dew point temperature", "K"),
            // Category 1: moisture
            ((0, 1, 0), "SPFH", "Specific humidity", "kg kg-1"),
            ((0, 1, 1), "RH", "Relative humidity", "%"),
            ((0, 1, 3), "PWAT", "Precipitable water", "kg m-2"),
            ((0, 1, 7), "PRATE", "Precipitation rate", "kg m-2 s-1"),
            ((0, 1, 8), "APCP", "Total precipitation", "kg m-2"),
            ((0, 1, 13), "WEASD", "Water equivalent of accumulated snow depth", "kg m-2"),
            // Category 2: momentum
            ((0, 2, 0), "WDIR", "Wind direction", "degree true"),
            ((0, 2, 1), "WIND", "Wind speed", "m s-1"),
            ((0, 2, 2), "UGRD", "U-component of wind", "m s-1"),
            ((0, 2, 3), "VGRD", "V-component of wind", "m s-1"),
            ((0, 2, 8), "VVEL", "Vertical velocity (pressure)", "Pa s-1"),
            ((0, 2, 10), "ABSV", "Absolute vorticity", "s-1"),
            ((0, 2, 22), "GUST", "Wind speed (gust)", "m s-1"),
            // Category 3: mass
            ((0, 3, 0), "PRES", "Pressure", "Pa"),
            ((0, 3, 1), "PRMSL", "Pressure reduced to MSL", "Pa"),
            ((0, 3, 5), "HGT", "Geopotential height", "gpm"),
            // Category 6: cloud
            ((0, 6, 1), "TCDC", "Total cloud cover", "%"),
            // Category 7: stability
            ((0, 7, 6), "CAPE", "Convective available potential energy", "J kg-1"),
            ((0, 7, 7), "CIN", "Convective inhibition", "J kg-1"),
            // Category 16: radar (NCEP local)
            ((0, 16, 195), "REFD", "Reflectivity", "dB"),
            ((0, 16, 196), "REFC", "Composite reflectivity", "dB"),
            // Category 19: physical atmospheric properties
            ((0, 19, 0), "VIS", "Visibility", "m"),
            // Discipline 2: land surface
            ((2, 0, 0), "LAND", "Land cover (1=land, 0=sea)", "Proportion"),
            // Discipline 10: oceanographic
            ((10, 0, 3), "HTSGW", "Significant height of combined wind waves and swell", "m"),
            ((10, 3, 0), "WTMP", "Water temperature", "K"),
            // Discipline 209: MRMS (local use)
            ((209, 0, 16), "REFL", "Merged reflectivity QC", "dBZ"),
        ];
        for &((d, c, n), short_name, name, units) in parameters {
            tables.add_parameter(d, c, n, ParameterInfo::new(short_name, name, units));
        }

        let levels: &[(u8, &str, f64)] = &[
            (1, "surface", 1.0),
            (2, "cloudBase", 1.0),
            (3, "cloudTop", 1.0),
            (4, "isothermZero", 1.0),
            (6, "maxWind", 1.0),
            (7, "tropopause", 1.0),
            (8, "nominalTop", 1.0),
            (10, "entireAtmosphere", 1.0),
            (100, "isobaricInhPa", 0.01),
            (101, "meanSea", 1.0),
            (102, "heightAboveSea", 1.0),
            (103, "heightAboveGround", 1.0),
            (104, "sigma", 1.0),
            (105, "hybrid", 1.0),
            (106, "depthBelowLand", 1.0),
            (107, "theta", 1.0),
            (108, "pressureFromGroundLayer", 0.01),
            (200, "atmosphere", 1.0),
        ];
        for &(code, name, scale) in levels {
            tables.add_level(code, LevelType::new(name, scale));
        }

        tables
    }

    /// Add or replace a parameter mapping
    pub fn add_parameter(&mut self, discipline: u8, category: u8, number: u8, info: ParameterInfo) {
        self.parameters.insert((discipline, category, number), info);
    }

    /// Add or replace a level type mapping
    pub fn add_level(&mut self, level_type: u8, level: LevelType) {
        self.levels.insert(level_type, level);
    }

    pub fn parameter(&self, discipline: u8, category: u8, number: u8) -> Option<&ParameterInfo> {
        self.parameters.get(&(discipline, category, number))
    }

    /// Look up parameter short name by GRIB2 codes.
    ///
    /// Returns "P{discipline}_{category}_{number}" if not found.
    pub fn get_parameter_name(&self, discipline: u8, category: u8, number: u8) -> String {
        self.parameter(discipline, category, number)
            .map(|p| p.short_name.clone())
            .unwrap_or_else(|| format!("P{}_{}_{}", discipline, category, number))
    }

    pub fn level(&self, level_type: u8) -> Option<&LevelType> {
        self.levels.get(&level_type)
    }

    /// Level type name, or "level{type}" if not found.
    pub fn get_level_name(&self, level_type: u8) -> String {
        self.level(level_type)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| format!("level{}", level_type))
    }

    /// Convert a raw fixed-surface value into the displayed level.
    pub fn scale_level(&self, level_type: u8, raw_value: f64) -> f64 {
        match self.level(level_type) {
            Some(level) => raw_value * level.scale,
            None => raw_value,
        }
    }

    /// Get the number of parameters in the table
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Get the number of level types in the table
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Check if the tables are empty
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.levels.is_empty()
    }
}
