use crate::models::{DepthBand, MoistureStatus, SoilMoistureReading, SoilSample};

/// Volumetric fraction treated as 100% on the moisture scale
pub const SATURATION_FRACTION: f64 = 0.5;

/// Hourly index read from the live soil series (early morning)
pub const REPRESENTATIVE_HOUR_INDEX: usize = 6;

/// Percent of the saturation scale, rounded half-up and clamped to 0..=100
pub fn moisture_percent(fraction: f64) -> u8 {
    let pct = ((fraction / SATURATION_FRACTION) * 100.0 + 0.5).floor();
    pct.clamp(0.0, 100.0) as u8
}

pub fn moisture_status(percent: u8) -> MoistureStatus {
    match percent {
        0..=19 => MoistureStatus::Dry,
        20..=49 => MoistureStatus::Low,
        50..=74 => MoistureStatus::Adequate,
        _ => MoistureStatus::Saturated,
    }
}

pub fn classify_moisture(depth: DepthBand, fraction: f64) -> SoilMoistureReading {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction };
    let percent = moisture_percent(fraction);
    SoilMoistureReading {
        depth,
        volumetric_fraction: fraction,
        percent,
        status: moisture_status(percent),
    }
}

/// Classify every depth band that has a reading
pub fn classify_sample(sample: &SoilSample) -> Vec<SoilMoistureReading> {
    sample
        .by_depth()
        .into_iter()
        .filter_map(|(depth, value)| value.map(|v| classify_moisture(depth, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_low_boundary() {
        let dry = classify_moisture(DepthBand::Shallow, 0.09);
        assert_eq!(dry.percent, 18);
        assert_eq!(dry.status, MoistureStatus::Dry);

        let low = classify_moisture(DepthBand::Shallow, 0.10);
        assert_eq!(low.percent, 20);
        assert_eq!(low.status, MoistureStatus::Low);
    }

    #[test]
    fn band_cut_points() {
        assert_eq!(moisture_status(0), MoistureStatus::Dry);
        assert_eq!(moisture_status(19), MoistureStatus::Dry);
        assert_eq!(moisture_status(20), MoistureStatus::Low);
        assert_eq!(moisture_status(49), MoistureStatus::Low);
        assert_eq!(moisture_status(50), MoistureStatus::Adequate);
        assert_eq!(moisture_status(74), MoistureStatus::Adequate);
        assert_eq!(moisture_status(75), MoistureStatus::Saturated);
        assert_eq!(moisture_status(100), MoistureStatus::Saturated);
    }

    #[test]
    fn out_of_range_is_clamped() {
        let wet = classify_moisture(DepthBand::Deep, 0.62);
        assert_eq!(wet.percent, 100);
        assert_eq!(wet.status, MoistureStatus::Saturated);
        assert_eq!(wet.volumetric_fraction, 0.62);

        let negative = classify_moisture(DepthBand::Deep, -0.02);
        assert_eq!(negative.percent, 0);
        assert_eq!(negative.status, MoistureStatus::Dry);
    }

    #[test]
    fn rounds_half_up() {
        // 0.0625 / 0.5 = 12.5%
        assert_eq!(moisture_percent(0.0625), 13);
        assert_eq!(moisture_percent(0.25), 50);
    }

    #[test]
    fn guidance_per_band() {
        assert_eq!(MoistureStatus::Dry.guidance(), "Consider irrigating soon");
        assert_eq!(MoistureStatus::Saturated.guidance(), "Drainage may help");
    }

    #[test]
    fn sample_skips_missing_depths() {
        let sample = SoilSample {
            shallow: Some(0.08),
            mid: None,
            deep: Some(0.31),
            soil_temp_c: Some(21.4),
        };
        let readings = classify_sample(&sample);
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].depth, DepthBand::Shallow);
        assert_eq!(readings[0].status, MoistureStatus::Dry);
        assert_eq!(readings[1].depth, DepthBand::Deep);
        assert_eq!(readings[1].status, MoistureStatus::Adequate);
    }
}
