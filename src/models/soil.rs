use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthBand {
    /// 0-1 cm
    Shallow,
    /// 3-9 cm
    Mid,
    /// 9-27 cm
    Deep,
}

impl DepthBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepthBand::Shallow => "Shallow (0-1cm)",
            DepthBand::Mid => "Mid (3-9cm)",
            DepthBand::Deep => "Deep (9-27cm)",
        }
    }
}

impl std::fmt::Display for DepthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoistureStatus {
    Dry,
    Low,
    Adequate,
    Saturated,
}

impl MoistureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoistureStatus::Dry => "Dry",
            MoistureStatus::Low => "Low",
            MoistureStatus::Adequate => "Adequate",
            MoistureStatus::Saturated => "Saturated",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            MoistureStatus::Dry => "Consider irrigating soon",
            MoistureStatus::Low => "Monitor closely",
            MoistureStatus::Adequate => "No action needed",
            MoistureStatus::Saturated => "Drainage may help",
        }
    }
}

impl std::fmt::Display for MoistureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilMoistureReading {
    pub depth: DepthBand,
    /// Volumetric water content as reported (m³/m³)
    pub volumetric_fraction: f64,
    /// Percent of the 0.5 m³/m³ scale, capped at 100
    pub percent: u8,
    pub status: MoistureStatus,
}

/// Soil values read at the representative hour of the live-conditions series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub shallow: Option<f64>,
    pub mid: Option<f64>,
    pub deep: Option<f64>,
    pub soil_temp_c: Option<f64>,
}

impl SoilSample {
    pub fn by_depth(&self) -> [(DepthBand, Option<f64>); 3] {
        [
            (DepthBand::Shallow, self.shallow),
            (DepthBand::Mid, self.mid),
            (DepthBand::Deep, self.deep),
        ]
    }
}
