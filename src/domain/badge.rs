//! The fixed badge layout.
//!
//! The badge frame is a 433x909 template. Two user photos and a name are
//! composited onto it at hard-coded positions; the external service does the
//! actual rendering. Layer order matters: the "how it started" photo goes
//! down first, then the "how it's going" photo, then the name text.

use crate::domain::transformation::{
    Crop, Gravity, Overlay, TextStyle, Transformation, TransformationChain,
};

// "How it started" photo slot.
const THEN_SIZE: u32 = 110;
const THEN_X: i32 = 56;
const THEN_Y: i32 = 478;

// "How it's going" photo slot.
const NOW_SIZE: u32 = 150;
const NOW_X: i32 = 220;
const NOW_Y: i32 = 405;

// Name banner.
const NAME_WIDTH: u32 = 333;
const NAME_X: i32 = 50;
const NAME_Y: i32 = 650;
const NAME_FONT_FAMILY: &str = "Arial";
const NAME_FONT_SIZE: u32 = 36;
const NAME_LETTER_SPACING: u32 = 2;
const NAME_BORDER: &str = "5px_solid_black";
const NAME_COLOR: &str = "white";

/// Build the three-layer overlay chain for a badge.
///
/// `then_id` and `now_id` are the public ids returned by the media store for
/// the two uploaded photos.
pub fn compose_layers(then_id: &str, now_id: &str, name: &str) -> TransformationChain {
    let mut chain = TransformationChain::new();

    chain.push(Transformation {
        overlay: Overlay::Image {
            public_id: then_id.to_string(),
        },
        width: Some(THEN_SIZE),
        height: Some(THEN_SIZE),
        crop: Some(Crop::Scale),
        gravity: Some(Gravity::NorthWest),
        x: THEN_X,
        y: THEN_Y,
        border: None,
        color: None,
    });

    chain.push(Transformation {
        overlay: Overlay::Image {
            public_id: now_id.to_string(),
        },
        width: Some(NOW_SIZE),
        height: Some(NOW_SIZE),
        crop: Some(Crop::Scale),
        gravity: Some(Gravity::NorthWest),
        x: NOW_X,
        y: NOW_Y,
        border: None,
        color: None,
    });

    chain.push(Transformation {
        overlay: Overlay::Text {
            style: TextStyle {
                font_family: NAME_FONT_FAMILY.to_string(),
                font_size: NAME_FONT_SIZE,
                bold: true,
                stroke: true,
                letter_spacing: Some(NAME_LETTER_SPACING),
            },
            text: name.to_string(),
        },
        width: Some(NAME_WIDTH),
        height: None,
        crop: Some(Crop::Fit),
        gravity: Some(Gravity::NorthWest),
        x: NAME_X,
        y: NAME_Y,
        border: Some(NAME_BORDER.to_string()),
        color: Some(NAME_COLOR.to_string()),
    });

    chain
}
