//! Compute Runtime Implementations

mod ray_head;

pub use ray_head::RayHeadRuntime;
