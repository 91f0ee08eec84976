pub mod item;
pub mod request_params;
pub mod sample;
pub mod series;
pub mod timestep;
