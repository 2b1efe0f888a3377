#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use graymorph_image as image;

#[doc(inline)]
pub use graymorph_imgproc as imgproc;
