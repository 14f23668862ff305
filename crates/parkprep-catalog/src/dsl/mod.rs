//! Text front-ends for catalogs and run configuration.

pub mod yaml;
