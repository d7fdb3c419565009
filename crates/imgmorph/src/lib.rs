#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use imgmorph_image as image;

#[doc(inline)]
pub use imgmorph_imgproc as imgproc;

#[doc(inline)]
pub use imgmorph_io as io;
