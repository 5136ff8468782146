// Domain-layer modules and shared errors/models
pub mod artifact {
    pub use crate::artifact::*;
}

pub mod features {
    pub use crate::features::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod recommendation {
    pub use crate::recommendation::*;
}

pub mod scoring {
    pub use crate::scoring::*;
}

pub mod errors {
    pub use crate::errors::*;
}
