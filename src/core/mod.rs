// Domain-layer modules and shared errors/models
pub mod validator {
    pub use crate::validator::*;
}

pub mod scorer {
    pub use crate::scorer::*;
}

pub mod duplicates {
    pub use crate::duplicates::*;
}

pub mod pipeline {
    pub use crate::pipeline::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
