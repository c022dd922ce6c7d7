pub mod air_quality_sim;
pub mod constants;
