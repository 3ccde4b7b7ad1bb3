pub mod crop_profile;
pub mod planting;
pub mod reminder;
pub mod sensor;

pub use crop_profile::*;
pub use planting::*;
pub use reminder::*;
pub use sensor::*;
