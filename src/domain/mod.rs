// Domain layer: core models and ports (interfaces). No dependencies on the
// adapters; serde only where the wire formats require it.

pub mod model;
pub mod ports;
