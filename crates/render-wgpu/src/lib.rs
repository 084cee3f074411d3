//! wgpu implementation of the frame sink.
//!
//! One render pipeline serves every object kind: per-instance model
//! matrices live in a single storage buffer indexed by
//! `@builtin(instance_index)`, and each kind's draw call sets its first
//! instance to the kind's base slot so the shader reads the right rows
//! without any per-instance vertex data.

mod gpu;
mod shaders;

pub use gpu::GpuFrameSink;
pub use shaders::SCENE_SHADER;
