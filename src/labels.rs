pub mod decode;
pub mod palette;
pub mod propagate;
