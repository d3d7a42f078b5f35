pub mod chart;
pub mod market_cap;
pub mod price;
pub mod purchase;
pub mod series;
pub mod settings;
pub mod snapshot;
