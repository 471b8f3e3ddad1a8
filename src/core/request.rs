use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::StudioError;
use super::image::ImagePayload;

/// Requested output resolution for generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["1K", "2K", "4K"]
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1K" => Ok(ImageSize::OneK),
            "2K" => Ok(ImageSize::TwoK),
            "4K" => Ok(ImageSize::FourK),
            _ => Err(StudioError::InvalidParameter(format!(
                "invalid size '{}'. Valid values: {}",
                s,
                Self::variants().join(", ")
            ))),
        }
    }
}

/// One image-edit submission: source image plus the edit instruction.
/// Built on user action, consumed by a single adapter call.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub image: ImagePayload,
    pub instruction: String,
}

impl EditRequest {
    pub fn new(image: ImagePayload, instruction: impl Into<String>) -> Self {
        Self {
            image,
            instruction: instruction.into(),
        }
    }
}

/// One text-to-image submission with a requested output size.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub instruction: String,
    pub size: ImageSize,
}

impl GenerateRequest {
    pub fn new(instruction: impl Into<String>, size: ImageSize) -> Self {
        Self {
            instruction: instruction.into(),
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parses_case_insensitive() {
        assert_eq!("1K".parse::<ImageSize>().unwrap(), ImageSize::OneK);
        assert_eq!("2k".parse::<ImageSize>().unwrap(), ImageSize::TwoK);
        assert_eq!("4K".parse::<ImageSize>().unwrap(), ImageSize::FourK);
    }

    #[test]
    fn size_rejects_unknown_values() {
        let err = "8K".parse::<ImageSize>().unwrap_err();
        assert!(err.to_string().contains("1K, 2K, 4K"));
        assert!("".parse::<ImageSize>().is_err());
    }

    #[test]
    fn size_serializes_to_wire_form() {
        assert_eq!(
            serde_json::to_string(&ImageSize::FourK).unwrap(),
            "\"4K\""
        );
    }
}
