pub mod rolling_std;
pub mod stats;
