pub mod effect_set;
/// Effect Analysis Domain Models
pub mod effect_type;
pub mod ports;
pub mod trusted_library;

pub use effect_set::*;
pub use effect_type::*;
pub use ports::*;
pub use trusted_library::*;
