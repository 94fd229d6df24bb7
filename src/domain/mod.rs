// Domain layer: value records for exported configs and the ports the exporter talks through.
// No AWS SDK types leak past this boundary; adapters convert into these records.

pub mod model;
pub mod ports;
