mod docker;
mod gpu;
pub mod value;

pub use docker::{parse_stats, ContainerSample};
pub use gpu::{parse_status, GpuSample};
