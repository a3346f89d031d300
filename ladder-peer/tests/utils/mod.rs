pub mod link_pair;
pub mod relay_helpers;

pub use link_pair::*;
pub use relay_helpers::*;
