//! Soil Normalizer
//!
//! Turns either manual soil parameters or an image reference into a
//! [`SoilProfile`]. Unset fields are filled from per-type defaults or from the
//! injected random source.
//!
//! The image path is a filename-keyword heuristic, not a classifier: keywords
//! "clay", "sand" and "loam" are checked in that order against the lower-cased
//! base filename, and anything else picks a soil type at random.

use super::profile::{SoilProfile, SoilType};
use crate::error::{parse_optional_number, PlannerResult};
use rand::seq::SliceRandom;
use rand::Rng;

pub const MOISTURE_RANGE: (f64, f64) = (5.0, 35.0);
pub const PH_RANGE: (f64, f64) = (6.0, 7.5);

/// Texture reported when the soil type was picked at random
pub const INFERRED_TEXTURE: &str = "inferred";

/// Manually entered soil parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoilParams {
    pub soil_type: String,
    pub texture: Option<String>,
    pub moisture_pct: Option<f64>,
    pub ph: Option<f64>,
}

impl SoilParams {
    pub fn new(soil_type: impl Into<String>) -> Self {
        Self {
            soil_type: soil_type.into(),
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn with_moisture(mut self, moisture_pct: f64) -> Self {
        self.moisture_pct = Some(moisture_pct);
        self
    }

    pub fn with_ph(mut self, ph: f64) -> Self {
        self.ph = Some(ph);
        self
    }

    /// Build from raw form/prompt strings.
    ///
    /// Blank strings count as "not supplied". A non-blank moisture or pH that
    /// does not parse as a number is an error.
    pub fn from_raw(
        soil_type: &str,
        texture: Option<&str>,
        moisture_pct: Option<&str>,
        ph: Option<&str>,
    ) -> PlannerResult<Self> {
        let texture = texture
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(Self {
            soil_type: soil_type.to_string(),
            texture,
            moisture_pct: parse_optional_number("moisture_pct", moisture_pct)?,
            ph: parse_optional_number("pH", ph)?,
        })
    }
}

/// Where the soil description comes from
#[derive(Debug, Clone, PartialEq)]
pub enum SoilInput {
    Params(SoilParams),
    /// Path or filename of an uploaded soil image
    Image(String),
}

/// Normalize a soil input according to its mode
pub fn normalize_soil<R: Rng + ?Sized>(input: &SoilInput, rng: &mut R) -> SoilProfile {
    match input {
        SoilInput::Params(params) => from_params(params, rng),
        SoilInput::Image(image_ref) => from_image_ref(image_ref, rng),
    }
}

/// Normalize manually entered parameters
pub fn from_params<R: Rng + ?Sized>(params: &SoilParams, rng: &mut R) -> SoilProfile {
    let soil_type = SoilType::parse_or_default(&params.soil_type);

    let texture = params
        .texture
        .clone()
        .unwrap_or_else(|| soil_type.default_texture().to_string());

    let moisture_pct = match params.moisture_pct {
        Some(moisture_pct) => moisture_pct,
        None => random_one_decimal(rng, MOISTURE_RANGE),
    };

    let ph = match params.ph {
        Some(ph) => ph,
        None => random_one_decimal(rng, PH_RANGE),
    };

    SoilProfile {
        soil_type,
        texture,
        moisture_pct,
        ph: Some(ph),
    }
}

/// Infer a soil profile from an image path or filename
pub fn from_image_ref<R: Rng + ?Sized>(image_ref: &str, rng: &mut R) -> SoilProfile {
    let basename = base_filename(image_ref).to_lowercase();

    let (soil_type, texture) = match keyword_soil_type(&basename) {
        Some(soil_type) => {
            tracing::debug!("Image '{}' matched soil keyword '{}'", basename, soil_type);
            (soil_type, soil_type.default_texture())
        }
        None => {
            let soil_type = *SoilType::ALL.choose(rng).unwrap_or(&SoilType::Loam);
            tracing::debug!("Image '{}' has no soil keyword, picked '{}'", basename, soil_type);
            (soil_type, INFERRED_TEXTURE)
        }
    };

    SoilProfile {
        soil_type,
        texture: texture.to_string(),
        moisture_pct: random_one_decimal(rng, MOISTURE_RANGE),
        ph: None,
    }
}

/// Keyword match on an already lower-cased filename
fn keyword_soil_type(basename: &str) -> Option<SoilType> {
    if basename.contains("clay") {
        Some(SoilType::Clay)
    } else if basename.contains("sand") {
        Some(SoilType::Sandy)
    } else if basename.contains("loam") {
        Some(SoilType::Loam)
    } else {
        None
    }
}

/// Last path component, treating both `/` and `\` as separators
fn base_filename(image_ref: &str) -> &str {
    image_ref.rsplit(['/', '\\']).next().unwrap_or(image_ref)
}

/// Uniform sample in `[lo, hi]` rounded to one decimal place
fn random_one_decimal<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    let value: f64 = rng.gen_range(lo..=hi);
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn has_one_decimal(v: f64) -> bool {
        ((v * 10.0).round() - v * 10.0).abs() < 1e-9
    }

    #[test]
    fn test_params_all_explicit() {
        let params = SoilParams::new("loam")
            .with_texture("balanced")
            .with_moisture(20.0)
            .with_ph(6.8);
        let soil = from_params(&params, &mut rng());

        assert_eq!(soil.soil_type, SoilType::Loam);
        assert_eq!(soil.texture, "balanced");
        assert_eq!(soil.moisture_pct, 20.0);
        assert_eq!(soil.ph, Some(6.8));
    }

    #[test]
    fn test_params_texture_defaults_from_type() {
        let soil = from_params(&SoilParams::new("sandy").with_moisture(15.0).with_ph(7.0), &mut rng());
        assert_eq!(soil.texture, "coarse");

        for soil_type in SoilType::ALL {
            let soil = from_params(&SoilParams::new(soil_type.as_str()), &mut rng());
            assert_eq!(soil.texture, soil_type.default_texture());
        }
    }

    #[test]
    fn test_params_random_defaults_in_range() {
        let mut rng = rng();
        for _ in 0..200 {
            let soil = from_params(&SoilParams::new("clay"), &mut rng);
            assert!((5.0..=35.0).contains(&soil.moisture_pct));
            let ph = soil.ph.unwrap();
            assert!((6.0..=7.5).contains(&ph));
            assert!(has_one_decimal(soil.moisture_pct));
            assert!(has_one_decimal(ph));
        }
    }

    #[test]
    fn test_params_invalid_type_defaults_to_loam() {
        let soil = from_params(&SoilParams::new("invalid_type"), &mut rng());
        assert_eq!(soil.soil_type, SoilType::Loam);
        assert_eq!(soil.texture, "balanced");
    }

    #[test]
    fn test_params_seeded_rng_is_reproducible() {
        let a = from_params(&SoilParams::new("silty"), &mut StdRng::seed_from_u64(7));
        let b = from_params(&SoilParams::new("silty"), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_raw_parses_numbers() {
        let params = SoilParams::from_raw("loam", Some(""), Some("15"), Some(" 6.5 ")).unwrap();
        assert_eq!(params.texture, None);
        assert_eq!(params.moisture_pct, Some(15.0));
        assert_eq!(params.ph, Some(6.5));
    }

    #[test]
    fn test_from_raw_rejects_non_numeric() {
        assert!(SoilParams::from_raw("loam", None, Some("wet"), None).is_err());
        assert!(SoilParams::from_raw("loam", None, None, Some("neutral")).is_err());
    }

    #[test]
    fn test_image_keywords() {
        let cases = [
            ("path/to/soil_loam.jpg", SoilType::Loam, "balanced"),
            ("samples/soil_sandy.jpg", SoilType::Sandy, "coarse"),
            ("samples/soil_clay.jpg", SoilType::Clay, "fine"),
            ("C:\\uploads\\CLAY_field.PNG", SoilType::Clay, "fine"),
        ];
        for (image_ref, soil_type, texture) in cases {
            let soil = from_image_ref(image_ref, &mut rng());
            assert_eq!(soil.soil_type, soil_type, "{image_ref}");
            assert_eq!(soil.texture, texture, "{image_ref}");
            assert_eq!(soil.ph, None);
        }
    }

    #[test]
    fn test_image_keyword_precedence() {
        // clay is checked before sand
        let soil = from_image_ref("sandy_clay.jpg", &mut rng());
        assert_eq!(soil.soil_type, SoilType::Clay);
    }

    #[test]
    fn test_image_keyword_only_in_basename() {
        let soil = from_image_ref("clay_samples/IMG_001.jpg", &mut rng());
        assert_eq!(soil.texture, INFERRED_TEXTURE);
    }

    #[test]
    fn test_image_no_keyword_is_inferred() {
        let mut rng = rng();
        for _ in 0..50 {
            let soil = from_image_ref("placeholder.jpg", &mut rng);
            assert_eq!(soil.texture, INFERRED_TEXTURE);
            assert!(SoilType::ALL.contains(&soil.soil_type));
            assert!((5.0..=35.0).contains(&soil.moisture_pct));
            assert!(soil.ph.is_none());
        }
    }

    #[test]
    fn test_normalize_dispatches_on_mode() {
        let soil = normalize_soil(&SoilInput::Image("soil_clay.jpg".into()), &mut rng());
        assert_eq!(soil.soil_type, SoilType::Clay);

        let soil = normalize_soil(&SoilInput::Params(SoilParams::new("silty")), &mut rng());
        assert_eq!(soil.soil_type, SoilType::Silty);
        assert!(soil.ph.is_some());
    }
}
